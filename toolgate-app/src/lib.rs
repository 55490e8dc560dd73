pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod logging;
pub mod routes;
pub mod server;

pub use config::Config;
pub use server::{router, AppState};
