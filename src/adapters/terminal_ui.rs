//! Terminal implementation of the user interaction port.
//!
//! Prompts run on the blocking pool; a prompt that fails (no terminal,
//! interrupted) counts as dismissed.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use pu_core::ports::{NotificationLevel, ProgressIndicator, TransferProgress, UserInteractionPort};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

const PROGRESS_TEMPLATE: &str =
    "{spinner:.green} {msg} [{bar:30.cyan/blue}] {bytes}/{total_bytes} (Ctrl-C to cancel)";

/// Exit status used when the user interrupts outside of an upload.
const INTERRUPTED_EXIT_CODE: i32 = 130;

#[derive(Default)]
pub struct TerminalUi {
    /// Cancellation of the upload whose progress bar is on screen.
    active_upload: Arc<Mutex<Option<CancellationToken>>>,
}

impl TerminalUi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route Ctrl-C to the visible upload, or exit when nothing is uploading.
    pub fn watch_interrupts(&self) -> JoinHandle<()> {
        let active = self.active_upload.clone();
        tokio::spawn(async move {
            loop {
                if let Err(err) = tokio::signal::ctrl_c().await {
                    warn!(error = %err, "cannot listen for Ctrl-C");
                    return;
                }
                let token = active.lock().ok().and_then(|slot| slot.clone());
                match token {
                    Some(token) => {
                        debug!("Ctrl-C: cancelling upload");
                        token.cancel();
                    }
                    None => std::process::exit(INTERRUPTED_EXIT_CODE),
                }
            }
        })
    }

    async fn blocking<T, F>(f: F) -> Option<T>
    where
        T: Send + 'static,
        F: FnOnce() -> Option<T> + Send + 'static,
    {
        match tokio::task::spawn_blocking(f).await {
            Ok(answer) => answer,
            Err(err) => {
                warn!(error = %err, "prompt task failed");
                None
            }
        }
    }
}

struct TerminalProgress {
    bar: ProgressBar,
    updater: JoinHandle<()>,
    active_upload: Arc<Mutex<Option<CancellationToken>>>,
}

impl ProgressIndicator for TerminalProgress {
    fn finish(self: Box<Self>) {
        self.updater.abort();
        self.bar.finish_and_clear();
        if let Ok(mut slot) = self.active_upload.lock() {
            *slot = None;
        }
    }
}

#[async_trait]
impl UserInteractionPort for TerminalUi {
    fn notify(&self, level: NotificationLevel, message: &str) {
        let prefix = match level {
            NotificationLevel::Info => "info:",
            NotificationLevel::Warning => "warning:",
            NotificationLevel::Error => "error:",
        };
        eprintln!("{prefix} {message}");
    }

    async fn confirm(&self, question: &str) -> bool {
        let question = question.to_string();
        Self::blocking(move || {
            Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(question)
                .default(false)
                .interact_opt()
                .ok()
                .flatten()
        })
        .await
        .unwrap_or(false)
    }

    async fn input(&self, prompt: &str, initial: Option<&str>) -> Option<String> {
        let prompt = prompt.to_string();
        let initial = initial.map(str::to_string);
        Self::blocking(move || {
            let theme = ColorfulTheme::default();
            let mut input = Input::<String>::with_theme(&theme)
                .with_prompt(prompt)
                .allow_empty(true);
            if let Some(initial) = initial {
                input = input.with_initial_text(initial);
            }
            input.interact_text().ok()
        })
        .await
    }

    async fn pick(&self, title: &str, items: &[String]) -> Option<usize> {
        let title = title.to_string();
        let items = items.to_vec();
        Self::blocking(move || {
            Select::with_theme(&ColorfulTheme::default())
                .with_prompt(title)
                .items(&items)
                .default(0)
                .interact_opt()
                .ok()
                .flatten()
        })
        .await
    }

    fn show_progress(
        &self,
        title: &str,
        mut progress: watch::Receiver<TransferProgress>,
        cancel: CancellationToken,
    ) -> Box<dyn ProgressIndicator> {
        let initial = *progress.borrow();
        let bar = ProgressBar::new(initial.total);
        bar.set_style(
            ProgressStyle::default_bar()
                .template(PROGRESS_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        bar.set_message(title.to_string());
        bar.set_position(initial.sent);
        bar.enable_steady_tick(Duration::from_millis(120));

        if let Ok(mut slot) = self.active_upload.lock() {
            *slot = Some(cancel.clone());
        }

        let updater = {
            let bar = bar.clone();
            tokio::spawn(async move {
                loop {
                    tokio::select! {
                        changed = progress.changed() => {
                            if changed.is_err() {
                                break;
                            }
                            let current = *progress.borrow_and_update();
                            bar.set_length(current.total);
                            bar.set_position(current.sent);
                        }
                        _ = cancel.cancelled() => {
                            bar.set_message("cancelling");
                            break;
                        }
                    }
                }
            })
        };

        Box::new(TerminalProgress {
            bar,
            updater,
            active_upload: self.active_upload.clone(),
        })
    }
}
