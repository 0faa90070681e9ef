//! avscan Infrastructure Library
//!
//! Shared infrastructure used by the CLI and the web service:
//! - Telemetry initialization (tracing subscriber)
//! - Webhook delivery of scan reports

#[cfg(feature = "observability-basic")]
pub mod telemetry;

#[cfg(feature = "webhook")]
pub mod webhook;

// Re-export commonly used types
#[cfg(feature = "observability-basic")]
pub use telemetry::init_telemetry;

#[cfg(feature = "webhook")]
pub use webhook::{DeliveryResponse, WebhookService, WebhookServiceConfig};
