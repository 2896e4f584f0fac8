// Campaign request-to-delivery flow.
// Validation, multipart intake, the HTTP handler and the orchestrator that
// sequences imaging → caption → delivery.

pub mod handlers;
pub mod intake;
pub mod models;
pub mod pipeline;
pub mod validation;
