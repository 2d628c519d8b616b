/// Pulse Service Library
///
/// Core of the Pulse social platform: account credentials, session token
/// lifecycle, engagement (posts, comments, likes), the social graph, and the
/// feed/ranking read path.
///
/// ## Modules
///
/// - `config`: Service configuration
/// - `db`: Repository traits plus in-memory and Postgres backings
/// - `domain`: Plain data structs (accounts, posts, comments, ids)
/// - `error`: Error taxonomy and HTTP status mapping
/// - `security`: Password hashing, token service, refresh-token registry
/// - `services`: Business logic (accounts, gateway, engagement, graph, feed)
/// - `validators`: Input validation (ids, pagination, handles)
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod security;
pub mod services;
pub mod validators;

// Re-export commonly used types
pub use error::{Result, ServiceError};
