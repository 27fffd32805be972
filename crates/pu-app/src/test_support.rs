//! Hand-written fakes shared by the use case unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pu_core::ports::{
    ClockPort, NotificationLevel, ProgressIndicator, TransferProgress, UserInteractionPort,
};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

pub struct FixedClock(pub i64);

impl ClockPort for FixedClock {
    fn now_ms(&self) -> i64 {
        self.0
    }
}

/// UI answering from a script and recording everything shown to the user.
#[derive(Default)]
pub struct ScriptedUi {
    pub confirm_answer: bool,
    pub input_answer: Option<String>,
    pub pick_answer: Option<usize>,
    /// Cancel the transfer as soon as the progress indicator appears.
    pub cancel_on_progress: bool,

    pub notifications: Mutex<Vec<(NotificationLevel, String)>>,
    pub questions: Mutex<Vec<String>>,
    pub input_suggestions: Mutex<Vec<Option<String>>>,
    pub picked_from: Mutex<Vec<Vec<String>>>,
    pub progress_shown: AtomicUsize,
    pub progress_finished: Arc<AtomicUsize>,
}

impl ScriptedUi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn confirming(mut self, answer: bool) -> Self {
        self.confirm_answer = answer;
        self
    }

    pub fn answering(mut self, answer: Option<&str>) -> Self {
        self.input_answer = answer.map(str::to_string);
        self
    }

    pub fn picking(mut self, index: Option<usize>) -> Self {
        self.pick_answer = index;
        self
    }

    pub fn cancelling_uploads(mut self) -> Self {
        self.cancel_on_progress = true;
        self
    }

    pub fn messages(&self, level: NotificationLevel) -> Vec<String> {
        self.notifications
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn question_count(&self) -> usize {
        self.questions.lock().unwrap().len()
    }
}

struct CountingIndicator(Arc<AtomicUsize>);

impl ProgressIndicator for CountingIndicator {
    fn finish(self: Box<Self>) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserInteractionPort for ScriptedUi {
    fn notify(&self, level: NotificationLevel, message: &str) {
        self.notifications
            .lock()
            .unwrap()
            .push((level, message.to_string()));
    }

    async fn confirm(&self, question: &str) -> bool {
        self.questions.lock().unwrap().push(question.to_string());
        self.confirm_answer
    }

    async fn input(&self, _prompt: &str, initial: Option<&str>) -> Option<String> {
        self.input_suggestions
            .lock()
            .unwrap()
            .push(initial.map(str::to_string));
        self.input_answer.clone()
    }

    async fn pick(&self, _title: &str, items: &[String]) -> Option<usize> {
        self.picked_from.lock().unwrap().push(items.to_vec());
        self.pick_answer
    }

    fn show_progress(
        &self,
        _title: &str,
        _progress: watch::Receiver<TransferProgress>,
        cancel: CancellationToken,
    ) -> Box<dyn ProgressIndicator> {
        self.progress_shown.fetch_add(1, Ordering::SeqCst);
        if self.cancel_on_progress {
            cancel.cancel();
        }
        Box::new(CountingIndicator(self.progress_finished.clone()))
    }
}
