//! Audit adapters.
//!
//! - `tracing_logger` - Emits every entry as a structured `tracing` event,
//!   then forwards it to an optional persistent logger

mod tracing_logger;

pub use tracing_logger::{TracingAuditLogger, AUDIT_TARGET};
