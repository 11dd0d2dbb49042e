pub mod auth;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod database;
pub mod error;
pub mod gift_ideas;
pub mod gifts;
pub mod logging;
pub mod models;
pub mod occasions;
pub mod persons;
pub mod share;
pub mod suggestions;
pub mod tui;
pub mod utils;
pub mod validate;

pub use config::Config;
pub use database::Database;
pub use error::ServiceError;
pub use utils::Profile;
