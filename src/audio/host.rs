// Host callbacks
//
// The audio server side of the plug-in interface: property-change
// notification, configuration-change requests and the persisted settings
// store. The driver only ever talks to the host through this trait.

use super::types::{ObjectId, PropertyAddress};

/// Storage key of the persisted box acquisition flag
pub const STORAGE_KEY_BOX_ACQUIRED: &str = "box acquired";
/// Storage key of the persisted box display name
pub const STORAGE_KEY_BOX_NAME: &str = "box name";

/// A value read from or written to the host's settings store
#[derive(Debug, Clone, PartialEq)]
pub enum StoredValue {
    Bool(bool),
    Number(i32),
    String(String),
}

impl StoredValue {
    /// Booleans, and numbers with non-zero meaning true
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            StoredValue::Bool(b) => Some(*b),
            StoredValue::Number(n) => Some(*n != 0),
            StoredValue::String(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            StoredValue::String(s) => Some(s),
            _ => None,
        }
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait DriverHost: Send + Sync {
    /// Batched property-changed notification for one object
    fn properties_changed(&self, object_id: ObjectId, addresses: &[PropertyAddress]);

    /// Ask the host to schedule a configuration change; the host answers by
    /// calling the driver's perform entry point with the same action
    fn request_device_configuration_change(&self, device_id: ObjectId, change_action: u64);

    fn copy_from_storage(&self, key: &str) -> Option<StoredValue>;

    fn write_to_storage(&self, key: &str, value: StoredValue);
}
