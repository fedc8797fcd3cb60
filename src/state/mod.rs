pub mod app;
pub mod media;
pub mod mode;
pub mod preview;
pub mod session;
pub mod ui_state;

pub use ui_state::UiState;
