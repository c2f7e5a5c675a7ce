pub mod api;
pub mod cli;
pub mod error;
pub mod models;
mod main_lib;

pub use main_lib::{build_state, init_tracing, AppState};
