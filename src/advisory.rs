//! Non-fatal diagnostics reported to the host
//!
//! Nothing in the tracking core fails hard. Conditions such as a denied
//! permission or a poor fix become [`Advisory`] values: they are always
//! logged, and forwarded to registered callbacks when user-facing alerts are
//! enabled.

use std::collections::HashMap;
use std::fmt;

/// Which sensor stream an advisory concerns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    Gps,
    Compass,
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorKind::Gps => write!(f, "geolocation"),
            SensorKind::Compass => write!(f, "device orientation"),
        }
    }
}

/// Advisory taxonomy
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Advisory {
    #[error("{0} is not supported on this device")]
    SensorUnsupported(SensorKind),

    #[error("{0} permission denied; enable it and reload")]
    PermissionDenied(SensorKind),

    #[error("cannot retrieve GPS position, signal is absent")]
    SignalUnavailable,

    #[error("{sensor} accuracy {accuracy} exceeds limit {limit}")]
    LowAccuracy {
        sensor: SensorKind,
        accuracy: f64,
        limit: f64,
    },

    #[error("GPS accuracy back within {limit}")]
    AccuracyRestored { limit: f64 },

    #[error("orientation event carried no usable angles")]
    OrientationUnavailable,

    #[error("orientation event is not absolute")]
    NonAbsoluteOrientation,
}

impl Advisory {
    /// Whether the host should surface this to the user when alerts are on
    pub fn is_user_facing(&self) -> bool {
        !matches!(
            self,
            Advisory::OrientationUnavailable | Advisory::NonAbsoluteOrientation
        )
    }
}

/// Callback invoked for each forwarded advisory
pub type AdvisoryCallback = Box<dyn FnMut(&Advisory)>;

/// Registration handle for an advisory callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AdvisoryHandle(u32);

/// Fan-out point for advisories
pub struct AdvisoryChannel {
    alert: bool,
    next_handle: u32,
    callbacks: HashMap<AdvisoryHandle, AdvisoryCallback>,
}

impl AdvisoryChannel {
    /// `alert` gates forwarding to callbacks; logging always happens
    pub fn new(alert: bool) -> Self {
        Self {
            alert,
            next_handle: 0,
            callbacks: HashMap::new(),
        }
    }

    pub fn register(&mut self, callback: AdvisoryCallback) -> AdvisoryHandle {
        self.next_handle += 1;
        let handle = AdvisoryHandle(self.next_handle);
        self.callbacks.insert(handle, callback);
        handle
    }

    /// Returns false for an unknown handle
    pub fn unregister(&mut self, handle: AdvisoryHandle) -> bool {
        self.callbacks.remove(&handle).is_some()
    }

    pub fn report(&mut self, advisory: Advisory) {
        // Orientation events arrive at frame rate; keep their noise at debug
        match advisory {
            Advisory::AccuracyRestored { .. } => tracing::info!("{}", advisory),
            _ if !advisory.is_user_facing() => tracing::debug!("{}", advisory),
            _ => tracing::warn!("{}", advisory),
        }

        if !self.alert {
            return;
        }
        for callback in self.callbacks.values_mut() {
            callback(&advisory);
        }
    }
}

impl Default for AdvisoryChannel {
    fn default() -> Self {
        Self::new(false)
    }
}

impl fmt::Debug for AdvisoryChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdvisoryChannel")
            .field("alert", &self.alert)
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}
