// Driver error definitions
//
// Every failure the host can observe is one of these variants. They are
// returned synchronously; the driver never retries and never aborts the
// process.

use super::hal;
use super::types::{ObjectId, Selector};

/// Errors that can occur while servicing host calls
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DriverError {
    #[error("Unknown audio object (ID: {id})")]
    BadObject { id: ObjectId },

    #[error("Object {id} has no property '{}'", hal::fourcc_to_string(*selector))]
    UnknownProperty { id: ObjectId, selector: Selector },

    #[error("Property data size mismatch: {reason}")]
    BadPropertySize { reason: String },

    #[error("Illegal operation: {reason}")]
    IllegalOperation { reason: String },

    #[error("Operation not supported by this driver: {operation}")]
    UnsupportedOperation { operation: &'static str },

    #[error("Unsupported stream format: {reason}")]
    UnsupportedFormat { reason: String },
}

impl DriverError {
    pub fn bad_size(reason: impl Into<String>) -> Self {
        DriverError::BadPropertySize {
            reason: reason.into(),
        }
    }

    pub fn illegal(reason: impl Into<String>) -> Self {
        DriverError::IllegalOperation {
            reason: reason.into(),
        }
    }

    /// Status code reported back to the audio server
    pub fn status(&self) -> i32 {
        match self {
            DriverError::BadObject { .. } => hal::kAudioHardwareBadObjectError,
            DriverError::UnknownProperty { .. } => hal::kAudioHardwareUnknownPropertyError,
            DriverError::BadPropertySize { .. } => hal::kAudioHardwareBadPropertySizeError,
            DriverError::IllegalOperation { .. } => hal::kAudioHardwareIllegalOperationError,
            DriverError::UnsupportedOperation { .. } => {
                hal::kAudioHardwareUnsupportedOperationError
            }
            DriverError::UnsupportedFormat { .. } => hal::kAudioDeviceUnsupportedFormatError,
        }
    }
}

pub type Result<T> = std::result::Result<T, DriverError>;

/// Collapse a driver result into the host's status convention.
pub fn to_status<T>(result: &Result<T>) -> i32 {
    match result {
        Ok(_) => hal::kAudioHardwareNoError,
        Err(e) => e.status(),
    }
}
