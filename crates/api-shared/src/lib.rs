//! # API Shared
//!
//! Request and response types shared by the REST API and the CLI.
//!
//! Contains:
//! - JSON request/response types with OpenAPI schemas (`types` module)
//! - the `HealthService`
//!
//! Used by `api-rest` and `notes-cli` so both surfaces emit the same JSON shape.

pub mod health;
pub mod types;

pub use health::HealthService;
pub use types::*;
