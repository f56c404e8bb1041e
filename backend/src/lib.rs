//! Focus backend library modules.
//!
//! `domain` holds the rules and ports, `inbound` the HTTP adapter, and
//! `outbound` the PostgreSQL and in-memory adapters.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
