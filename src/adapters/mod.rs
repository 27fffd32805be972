pub mod payload;
pub mod terminal_ui;

pub use payload::drop_payload;
pub use terminal_ui::TerminalUi;
