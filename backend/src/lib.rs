//! Patient and doctor portal backend.
//!
//! The crate follows a hexagonal layout: [`domain`] holds entities, ports and
//! services; [`inbound`] exposes them over HTTP; [`outbound`] implements the
//! storage ports against PostgreSQL or process memory.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
