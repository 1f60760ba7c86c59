//! Users backend library modules.
//!
//! The crate is laid out hexagonally: [`domain`] holds the users pipeline and
//! its ports, [`inbound`] exposes it over HTTP, and [`outbound`] provides the
//! PostgreSQL and in-memory storage adapters.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
