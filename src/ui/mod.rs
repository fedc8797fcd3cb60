//! UI components

pub mod breadcrumb;
pub mod dialog;
mod dialog_helpers;
pub mod grid;
pub mod help;
pub mod menu;
pub mod preview;
pub mod spinner;
pub mod status;
pub mod theme;

pub use breadcrumb::BreadcrumbBar;
pub use dialog::{ConfirmDeleteDialog, PromptDialog};
pub use grid::{CardGrid, ErrorView, GridLayout};
pub use help::HelpViewer;
pub use menu::OptionsMenuWidget;
pub use preview::PreviewOverlay;
pub use spinner::Spinner;
pub use status::{KeyBar, StatusBar};
pub use theme::Theme;
pub use theme::ThemeConfig;
