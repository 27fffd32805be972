//! Command handlers. Each returns the process exit status.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use dialoguer::Input;
use pu_app::{AppDeps, PasteContext, PasteUploadPipeline, TestConnection, UndoUpload};
use pu_core::ports::{NotificationLevel, UserInteractionPort};
use tracing::info;

use crate::adapters::drop_payload;
use crate::cli::TargetArgs;

const SESSION_HELP: &str =
    "Enter a path or URI to upload it, `:undo` to reverse an upload, `:test` to check the backend, `:quit` to leave.";

fn context(target: &TargetArgs) -> PasteContext {
    PasteContext {
        language: target.language.clone(),
        workspace_roots: target.workspaces.clone(),
    }
}

pub async fn upload(deps: AppDeps, target: &TargetArgs, items: &[String]) -> Result<ExitCode> {
    let transfer = drop_payload(items)?;
    let pipeline = PasteUploadPipeline::new(deps);

    match pipeline.execute(&transfer, &context(target)).await {
        Some(edit) => {
            println!("{}", edit.text);
            Ok(ExitCode::SUCCESS)
        }
        None => Ok(ExitCode::FAILURE),
    }
}

pub async fn test_connection(deps: AppDeps) -> Result<ExitCode> {
    match TestConnection::new(deps.uploader, deps.ui).execute().await {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(_) => Ok(ExitCode::FAILURE),
    }
}

enum SessionLine {
    Quit,
    Undo,
    Test,
    Help,
    Drop(String),
    Empty,
}

fn parse_line(line: &str) -> SessionLine {
    match line.trim() {
        "" => SessionLine::Empty,
        ":quit" | ":q" => SessionLine::Quit,
        ":undo" => SessionLine::Undo,
        ":test" => SessionLine::Test,
        ":help" | ":h" => SessionLine::Help,
        item => SessionLine::Drop(item.to_string()),
    }
}

async fn read_line() -> Option<String> {
    tokio::task::spawn_blocking(|| {
        Input::<String>::new()
            .with_prompt("pasteup")
            .allow_empty(true)
            .interact_text()
            .ok()
    })
    .await
    .ok()
    .flatten()
}

/// Keeps one undo ledger alive across many drops.
pub async fn session(deps: AppDeps, target: &TargetArgs) -> Result<ExitCode> {
    let ui: Arc<dyn UserInteractionPort> = deps.ui.clone();
    let pipeline = PasteUploadPipeline::new(deps.clone());
    let undo = UndoUpload::new(deps.ledger.clone(), deps.ui.clone());
    let connection = TestConnection::new(deps.uploader.clone(), deps.ui.clone());
    let ctx = context(target);

    ui.notify(NotificationLevel::Info, SESSION_HELP);
    while let Some(line) = read_line().await {
        match parse_line(&line) {
            SessionLine::Empty => {}
            SessionLine::Quit => break,
            SessionLine::Help => ui.notify(NotificationLevel::Info, SESSION_HELP),
            SessionLine::Undo => {
                let result = undo.execute().await;
                info!(?result, "undo finished");
            }
            SessionLine::Test => {
                let _ = connection.execute().await;
            }
            SessionLine::Drop(item) => {
                let transfer = match drop_payload(&[item]) {
                    Ok(transfer) => transfer,
                    Err(err) => {
                        ui.notify(NotificationLevel::Error, &format!("{err:#}"));
                        continue;
                    }
                };
                if let Some(edit) = pipeline.execute(&transfer, &ctx).await {
                    println!("{}", edit.text);
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
