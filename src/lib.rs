pub mod app;
pub mod config;
pub mod controller;
pub mod document;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod state;
pub mod storage;
pub mod store;
pub mod ui;
pub mod validate;
pub mod view;

pub use app::router;
pub use config::Config;
pub use controller::Controller;
pub use state::AppState;
pub use storage::Storage;
