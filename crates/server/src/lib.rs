mod api;
mod app_state;
pub mod config;

pub use api::build_router;
pub use app_state::AppState;
