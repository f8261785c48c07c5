//! Sensor abstraction layer
//!
//! GPS fixes and device orientation arrive through the [`FixSource`] and
//! [`OrientationSource`] traits. Sources only buffer readings; the session
//! drains them between frames, so arrival rate never drives recomputation.

pub mod stream;
pub mod fixed;
pub mod mock;
pub mod error;

pub use stream::{FixSource, OrientationEvent, OrientationSource};
pub use fixed::FixedFixSource;
pub use mock::{MockFixSource, MockOrientationSource};
pub use error::{SensorError, SensorResult};
