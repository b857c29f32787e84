pub mod api;
pub mod app;
pub mod session;
#[cfg(feature = "gui")]
pub mod ui;
pub mod utils;
