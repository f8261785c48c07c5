//! Sensor subscription error types

use crate::advisory::{Advisory, SensorKind};

/// Errors reported by a fix or orientation stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SensorError {
    /// The user or platform refused access
    #[error("permission denied")]
    PermissionDenied,
    /// No signal could be acquired
    #[error("position unavailable")]
    SignalUnavailable,
    /// The platform has no such sensor
    #[error("sensor not supported")]
    Unsupported,
    /// No fix arrived within the acquisition timeout
    #[error("no fix within {timeout_ms}ms")]
    Timeout { timeout_ms: u32 },
}

/// Result type for sensor operations
pub type SensorResult<T> = Result<T, SensorError>;

impl SensorError {
    /// Whether the stream should keep being polled after this error
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, SensorError::Unsupported)
    }

    /// Advisory surfaced to the host for this error
    pub fn to_advisory(&self, sensor: SensorKind) -> Advisory {
        match self {
            SensorError::PermissionDenied => Advisory::PermissionDenied(sensor),
            SensorError::Unsupported => Advisory::SensorUnsupported(sensor),
            SensorError::SignalUnavailable | SensorError::Timeout { .. } => match sensor {
                SensorKind::Gps => Advisory::SignalUnavailable,
                SensorKind::Compass => Advisory::OrientationUnavailable,
            },
        }
    }
}
