//! pasteup terminal host: bootstrap, terminal adapters and the CLI.

pub mod adapters;
pub mod bootstrap;
pub mod cli;
pub mod commands;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use pu_core::ports::{SettingsPort, UserInteractionPort};
use pu_infra::FileSettingsRepository;

use adapters::TerminalUi;
use bootstrap::{init_config, load_settings, resolve_config_path, wire_dependencies};
use cli::{Cli, Commands};

pub async fn run(cli: Cli) -> Result<ExitCode> {
    let config_path = resolve_config_path(cli.config)?;
    let repo = Arc::new(FileSettingsRepository::new(&config_path));

    if let Commands::InitConfig { force } = cli.command {
        if init_config(&repo, force).await? {
            println!("wrote {}", config_path.display());
        } else {
            println!("{} already exists (use --force to overwrite)", config_path.display());
        }
        return Ok(ExitCode::SUCCESS);
    }

    let settings = load_settings(&repo).await?;
    let terminal = Arc::new(TerminalUi::new());
    let _interrupts = terminal.watch_interrupts();

    let ui: Arc<dyn UserInteractionPort> = terminal;
    let settings_port: Arc<dyn SettingsPort> = repo;
    let deps = wire_dependencies(&settings, settings_port, ui)?;

    match cli.command {
        Commands::Upload { target, items } => commands::upload(deps, &target, &items).await,
        Commands::TestConnection => commands::test_connection(deps).await,
        Commands::Session { target } => commands::session(deps, &target).await,
        Commands::InitConfig { .. } => Ok(ExitCode::SUCCESS),
    }
}
