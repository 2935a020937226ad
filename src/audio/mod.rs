// Audio module - loopback device driver
//
// This module is broken down into the pieces the audio server talks to:
// - hal / types / property: wire constants, addresses, formats and payloads
// - engine: ring buffer, zero-timestamp anchor and IO refcounting
// - controls / state: master volume & mute, shared device state
// - objects: the PlugIn/Box/Device/Stream/Control property directory
// - notifications / host: host callbacks and deferred notifications
// - driver: the facade exposing every host entry point

pub mod context;
pub mod controls;
pub mod driver;
pub mod engine;
pub mod error;
pub mod hal;
pub mod host;
pub mod notifications;
pub mod objects;
pub mod property;
pub mod state;
pub mod timing;
pub mod types;

// Re-export commonly used types for easier imports
pub use context::{DeviceSlot, DriverContext};
pub use controls::{ControlState, VolumeCurve, VOLUME_MAX_DB, VOLUME_MIN_DB};
pub use driver::AudioDriver;
pub use engine::{CaptureOutcome, RingBuffer, ZeroTimestampState, ZERO_TIMESTAMP_SEED};
pub use error::{DriverError, Result};
pub use host::{DriverHost, StoredValue, STORAGE_KEY_BOX_ACQUIRED, STORAGE_KEY_BOX_NAME};
pub use notifications::{BackgroundScheduler, NotificationDispatcher, ScheduledNotification};
pub use objects::{AudioObject, ControlKind, PropertyObject};
pub use property::{PropertyData, PropertyValue};
pub use timing::{HostClock, MonotonicHostClock, TimeBase};
pub use types::*;
