//! Console for the employee management backend: session handling, a typed
//! REST client, the role gate and the controllers behind each screen.

pub mod api;
pub mod auth;
pub mod config;
pub mod controller;
pub mod errors;
pub mod model;
pub mod models;
pub mod session;
pub mod utils;

pub use api::ApiClient;
pub use config::Config;
pub use errors::{ApiError, StorageError, ValidationError};
pub use session::{Session, SessionStore};
