//! Networking - client side of the move-evaluation service
//!
//! - `protocol` - JSON request/response bodies
//! - `client` - the [`EngineService`] trait and its reqwest implementation
//! - `health` - readiness flag and the background `/health` probe
//! - `error` - [`ServiceError`]

pub mod client;
pub mod error;
pub mod health;
pub mod protocol;

pub use client::{EngineService, HttpEngineClient};
pub use error::{ServiceError, ServiceResult};
pub use health::{probe_once, spawn_health_probe, ReadinessFlag};
