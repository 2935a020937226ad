pub mod audio;
pub mod config;
pub mod log;

// Re-export the driver surface for hosts and tests
pub use audio::{
    AudioDriver, DriverError, DriverHost, HostClock, MonotonicHostClock, PropertyAddress,
    PropertyData, PropertyValue, StoredValue,
};
pub use config::{DeviceConfig, DriverConfig};
pub use log::{init_logging, set_io_debug};
