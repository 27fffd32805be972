//! End-to-end runs of [`PasteUploadPipeline`] and [`UndoUpload`] against the
//! real file system and the local backend.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use pu_app::{AppDeps, PasteContext, PasteUploadPipeline, UndoLedger, UndoResult, UndoUpload};
use pu_core::ports::{
    ClockPort, NotificationLevel, ProgressIndicator, SettingsPort, TransferProgress,
    UserInteractionPort,
};
use pu_core::settings::{LocalSettings, PipelineOptionsOverride};
use pu_core::transfer::URI_LIST_MIME;
use pu_core::{DataTransfer, FileAttachment, MultiFilePolicy, NamingMethod, Settings, UploaderSettings};
use pu_infra::{LocalUploader, TokioFileSystem};
use tempfile::{tempdir, TempDir};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use url::Url;

const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];
const LINK_BASE: &str = "https://static.test/assets";

struct StaticSettings(Settings);

#[async_trait]
impl SettingsPort for StaticSettings {
    async fn load(&self) -> anyhow::Result<Settings> {
        Ok(self.0.clone())
    }

    async fn save(&self, _settings: &Settings) -> anyhow::Result<()> {
        Ok(())
    }
}

struct FixedClock;

impl ClockPort for FixedClock {
    fn now_ms(&self) -> i64 {
        1_700_000_000_000
    }
}

struct NoIndicator;

impl ProgressIndicator for NoIndicator {
    fn finish(self: Box<Self>) {}
}

#[derive(Default)]
struct TestUi {
    confirm: bool,
    pick: Option<usize>,
    questions: AtomicUsize,
    notifications: Mutex<Vec<(NotificationLevel, String)>>,
}

impl TestUi {
    fn errors(&self) -> Vec<String> {
        self.notifications
            .lock()
            .unwrap()
            .iter()
            .filter(|(level, _)| *level == NotificationLevel::Error)
            .map(|(_, message)| message.clone())
            .collect()
    }
}

#[async_trait]
impl UserInteractionPort for TestUi {
    fn notify(&self, level: NotificationLevel, message: &str) {
        self.notifications
            .lock()
            .unwrap()
            .push((level, message.to_string()));
    }

    async fn confirm(&self, _question: &str) -> bool {
        self.questions.fetch_add(1, Ordering::SeqCst);
        self.confirm
    }

    async fn input(&self, _prompt: &str, _initial: Option<&str>) -> Option<String> {
        None
    }

    async fn pick(&self, _title: &str, _items: &[String]) -> Option<usize> {
        self.pick
    }

    fn show_progress(
        &self,
        _title: &str,
        _progress: watch::Receiver<TransferProgress>,
        _cancel: CancellationToken,
    ) -> Box<dyn ProgressIndicator> {
        Box::new(NoIndicator)
    }
}

struct Harness {
    _dir: TempDir,
    workspace: PathBuf,
    outside: PathBuf,
    target: PathBuf,
    ui: Arc<TestUi>,
    ledger: Arc<UndoLedger>,
    pipeline: PasteUploadPipeline,
}

impl Harness {
    fn new(settings: Settings, ui: TestUi) -> Self {
        Self::build(settings, ui, true)
    }

    /// Local backend without a target dir.
    fn unconfigured(settings: Settings, ui: TestUi) -> Self {
        Self::build(settings, ui, false)
    }

    fn build(mut settings: Settings, ui: TestUi, configured: bool) -> Self {
        let dir = tempdir().unwrap();
        let workspace = dir.path().join("workspace");
        let outside = dir.path().join("downloads");
        let target = dir.path().join("uploads");
        std::fs::create_dir_all(&workspace).unwrap();
        std::fs::create_dir_all(&outside).unwrap();

        let local = LocalSettings {
            target_dir: if configured { target.clone() } else { PathBuf::new() },
            link_base: Some(LINK_BASE.to_string()),
        };
        settings.uploader = UploaderSettings::Local(local.clone());

        let ui = Arc::new(ui);
        let ledger = Arc::new(UndoLedger::new(settings.undo_history_size));
        let deps = AppDeps {
            uploader: Arc::new(LocalUploader::new(local)),
            file_system: Arc::new(TokioFileSystem::new()),
            settings: Arc::new(StaticSettings(settings)),
            ui: ui.clone(),
            clock: Arc::new(FixedClock),
            ledger: ledger.clone(),
        };

        Self {
            _dir: dir,
            workspace,
            outside,
            target,
            ui,
            ledger,
            pipeline: PasteUploadPipeline::new(deps),
        }
    }

    fn context(&self, language: Option<&str>) -> PasteContext {
        PasteContext {
            language: language.map(str::to_string),
            workspace_roots: vec![self.workspace.clone()],
        }
    }

    fn uploaded_files(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(&self.target) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

fn write(path: &Path, data: &[u8]) -> Url {
    std::fs::write(path, data).unwrap();
    Url::from_file_path(path).unwrap()
}

fn uri_list(uris: &[Url]) -> DataTransfer {
    let text = uris.iter().map(Url::as_str).collect::<Vec<_>>().join("\r\n");
    DataTransfer::new().with_text(URI_LIST_MIME, text)
}

fn settings(naming: NamingMethod) -> Settings {
    let mut settings = Settings::default();
    settings.pipeline.naming_method = naming;
    settings.pipeline.multi_file_policy = MultiFilePolicy::Allow;
    settings
}

#[tokio::test]
async fn dropped_png_is_uploaded_with_hash_name() {
    let h = Harness::new(settings(NamingMethod::ShortHash), TestUi::default());
    let uri = write(&h.outside.join("Screenshot 1.png"), PNG);

    let edit = h
        .pipeline
        .execute(&uri_list(&[uri]), &h.context(Some("markdown")))
        .await
        .expect("edit produced");

    let name = &edit.uploaded[0].resource.name;
    assert_eq!(name.len(), 8);
    assert_eq!(edit.text, format!("![{name}]({LINK_BASE}/{name}.png)"));
    assert_eq!(h.uploaded_files(), vec![format!("{name}.png")]);
    assert_eq!(h.ledger.len().await, 1);
}

#[tokio::test]
async fn duplicate_attachment_names_get_suffixes() {
    let mut s = settings(NamingMethod::Uuid);
    s.pipeline.keep_original_filename = true;
    let h = Harness::new(s, TestUi::default());

    let transfer = DataTransfer::new()
        .with_file("image/png", FileAttachment::inline("shot.png", PNG.to_vec()))
        .with_file("image/png", FileAttachment::inline("shot.png", PNG.to_vec()));

    let edit = h
        .pipeline
        .execute(&transfer, &h.context(None))
        .await
        .expect("edit produced");

    assert_eq!(
        edit.text,
        format!("![shot]({LINK_BASE}/shot.png) ![shot.1]({LINK_BASE}/shot.1.png)")
    );
    assert_eq!(h.uploaded_files(), vec!["shot.1.png", "shot.png"]);
}

#[tokio::test]
async fn files_inside_the_workspace_are_left_alone() {
    let h = Harness::new(settings(NamingMethod::ShortHash), TestUi::default());
    let uri = write(&h.workspace.join("diagram.png"), PNG);

    let edit = h.pipeline.execute(&uri_list(&[uri]), &h.context(None)).await;

    assert!(edit.is_none());
    assert!(h.uploaded_files().is_empty());
}

#[tokio::test]
async fn declined_size_prompt_uploads_nothing() {
    let mut s = settings(NamingMethod::ShortHash);
    s.pipeline.size_limit = 5 * 1024 * 1024;
    let h = Harness::new(s, TestUi::default());
    let uri = write(&h.outside.join("video.bin"), &vec![1u8; 10 * 1024 * 1024]);

    let edit = h.pipeline.execute(&uri_list(&[uri]), &h.context(None)).await;

    assert!(edit.is_none());
    assert_eq!(h.ui.questions.load(Ordering::SeqCst), 1);
    assert!(h.uploaded_files().is_empty());
    assert!(h.ledger.is_empty().await);
}

#[tokio::test]
async fn ledger_keeps_the_last_two_and_undo_removes_newest() {
    let mut s = settings(NamingMethod::ShortHash);
    s.undo_history_size = 2;
    let ui = TestUi {
        pick: Some(0),
        ..Default::default()
    };
    let h = Harness::new(s, ui);

    for i in 0..3u8 {
        let uri = write(&h.outside.join(format!("f{i}.txt")), &[b'a' + i]);
        h.pipeline
            .execute(&uri_list(&[uri]), &h.context(None))
            .await
            .expect("edit produced");
    }
    assert_eq!(h.ledger.len().await, 2);
    assert_eq!(h.uploaded_files().len(), 3);

    let newest = h.ledger.entries().await[1].1.clone();
    let result = UndoUpload::new(h.ledger.clone(), h.ui.clone()).execute().await;

    assert_eq!(result, UndoResult::Undone(newest));
    assert_eq!(h.ledger.len().await, 1);
    assert_eq!(h.uploaded_files().len(), 2);
}

#[tokio::test]
async fn disabled_language_falls_back_quietly() {
    let mut s = settings(NamingMethod::ShortHash);
    s.languages.insert(
        "plaintext".to_string(),
        PipelineOptionsOverride {
            enabled: Some(false),
            ..Default::default()
        },
    );
    let h = Harness::new(s, TestUi::default());
    let transfer = DataTransfer::new()
        .with_file("image/png", FileAttachment::inline("a.png", Bytes::from_static(PNG)));

    assert!(h
        .pipeline
        .execute(&transfer, &h.context(Some("plaintext")))
        .await
        .is_none());
    assert!(h.ui.notifications.lock().unwrap().is_empty());

    assert!(h
        .pipeline
        .execute(&transfer, &h.context(Some("markdown")))
        .await
        .is_some());
}

#[tokio::test]
async fn invalid_mime_filter_becomes_an_error_notification() {
    let mut s = settings(NamingMethod::ShortHash);
    s.pipeline.mime_filter = Some("image/(".to_string());
    let h = Harness::new(s, TestUi::default());
    let transfer = DataTransfer::new()
        .with_file("image/png", FileAttachment::inline("a.png", PNG.to_vec()));

    assert!(h.pipeline.execute(&transfer, &h.context(None)).await.is_none());
    assert_eq!(h.ui.errors().len(), 1);
    assert!(h.uploaded_files().is_empty());
}

#[tokio::test]
async fn unconfigured_backend_is_reported_once_before_any_prompt() {
    let mut s = settings(NamingMethod::ShortHash);
    s.pipeline.size_limit = 1;
    s.pipeline.multi_file_policy = MultiFilePolicy::Prompt;
    let h = Harness::unconfigured(s, TestUi::default());
    let transfer = DataTransfer::new()
        .with_file("image/png", FileAttachment::inline("a.png", PNG.to_vec()))
        .with_file("image/png", FileAttachment::inline("b.png", PNG.to_vec()));

    assert!(h.pipeline.execute(&transfer, &h.context(None)).await.is_none());

    let errors = h.ui.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("target_dir"), "{}", errors[0]);
    assert_eq!(h.ui.questions.load(Ordering::SeqCst), 0);
    assert!(h.ledger.is_empty().await);
}
