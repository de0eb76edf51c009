pub mod app;
pub mod controls_panel;
pub mod stats_panel;
pub mod time_display;
pub mod upgrade_modal;

pub use app::App;
