// Object & property directory
//
// Maps an object identifier onto one of the five object kinds and dispatches
// the property protocol to it. The topology is fixed at construction; which
// objects resolve depends only on the configuration (secondary device present,
// directions enabled).

pub mod box_object;
pub mod control;
pub mod device;
pub mod plugin;
pub mod stream;

pub use box_object::BoxObject;
pub use control::{ControlKind, ControlObject};
pub use device::DeviceObject;
pub use plugin::PlugInObject;
pub use stream::StreamObject;

use super::context::DriverContext;
use super::error::{DriverError, Result};
use super::hal;
use super::property::{items_that_fit, require_capacity, PropertyData, PropertyValue};
use super::types::*;

/// The property protocol every addressable object speaks
pub trait PropertyObject {
    fn object_id(&self) -> ObjectId;

    fn has_property(&self, ctx: &DriverContext, address: &PropertyAddress) -> bool;

    /// Only called for addresses `has_property` accepted
    fn is_property_settable(&self, ctx: &DriverContext, address: &PropertyAddress) -> bool;

    /// Byte size of the full (untruncated) payload
    fn property_data_size(
        &self,
        ctx: &DriverContext,
        address: &PropertyAddress,
        qualifier: Option<&PropertyValue>,
    ) -> Result<usize> {
        Ok(self
            .property_data(ctx, address, qualifier, usize::MAX)?
            .byte_size())
    }

    /// Payload truncated to `capacity` bytes for list-valued properties
    fn property_data(
        &self,
        ctx: &DriverContext,
        address: &PropertyAddress,
        qualifier: Option<&PropertyValue>,
        capacity: usize,
    ) -> Result<PropertyData>;

    fn set_property_data(
        &self,
        ctx: &DriverContext,
        address: &PropertyAddress,
        qualifier: Option<&PropertyValue>,
        value: &PropertyValue,
    ) -> Result<ChangedProperties> {
        let _ = (ctx, qualifier, value);
        Err(unknown_property(self.object_id(), address))
    }
}

/// One resolved object of the fixed topology
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioObject {
    PlugIn(PlugInObject),
    Box(BoxObject),
    Device(DeviceObject),
    Stream(StreamObject),
    Control(ControlObject),
}

impl AudioObject {
    pub fn resolve(ctx: &DriverContext, id: ObjectId) -> Result<Self> {
        let object = match id {
            OBJECT_ID_PLUGIN => AudioObject::PlugIn(PlugInObject),
            OBJECT_ID_BOX => AudioObject::Box(BoxObject),
            OBJECT_ID_DEVICE | OBJECT_ID_DEVICE2 => {
                let slot = ctx.device_slot(id).ok_or(DriverError::BadObject { id })?;
                AudioObject::Device(DeviceObject::new(slot))
            }
            OBJECT_ID_STREAM_INPUT => AudioObject::Stream(StreamObject::new(Direction::Input)),
            OBJECT_ID_STREAM_OUTPUT => AudioObject::Stream(StreamObject::new(Direction::Output)),
            OBJECT_ID_VOLUME_INPUT_MASTER => {
                AudioObject::Control(ControlObject::new(ControlKind::Volume, Direction::Input))
            }
            OBJECT_ID_VOLUME_OUTPUT_MASTER => {
                AudioObject::Control(ControlObject::new(ControlKind::Volume, Direction::Output))
            }
            OBJECT_ID_MUTE_INPUT_MASTER => {
                AudioObject::Control(ControlObject::new(ControlKind::Mute, Direction::Input))
            }
            OBJECT_ID_MUTE_OUTPUT_MASTER => {
                AudioObject::Control(ControlObject::new(ControlKind::Mute, Direction::Output))
            }
            _ => return Err(DriverError::BadObject { id }),
        };

        // Streams and controls only exist for directions some device publishes
        let direction = match object {
            AudioObject::Stream(s) => Some(s.direction()),
            AudioObject::Control(c) => Some(c.direction()),
            _ => None,
        };
        if let Some(direction) = direction {
            if !ctx.any_device_has(direction == Direction::Input) {
                return Err(DriverError::BadObject { id });
            }
        }
        Ok(object)
    }

    pub fn as_property_object(&self) -> &dyn PropertyObject {
        match self {
            AudioObject::PlugIn(o) => o,
            AudioObject::Box(o) => o,
            AudioObject::Device(o) => o,
            AudioObject::Stream(o) => o,
            AudioObject::Control(o) => o,
        }
    }
}

/// Stream and control objects of one device, in publication order, with the
/// direction each belongs to
pub(crate) fn device_owned_objects(
    has_input: bool,
    has_output: bool,
) -> Vec<(ObjectId, Direction, bool)> {
    let mut objects = Vec::with_capacity(6);
    if has_input {
        objects.push((OBJECT_ID_STREAM_INPUT, Direction::Input, true));
        objects.push((OBJECT_ID_VOLUME_INPUT_MASTER, Direction::Input, false));
        objects.push((OBJECT_ID_MUTE_INPUT_MASTER, Direction::Input, false));
    }
    if has_output {
        objects.push((OBJECT_ID_STREAM_OUTPUT, Direction::Output, true));
        objects.push((OBJECT_ID_VOLUME_OUTPUT_MASTER, Direction::Output, false));
        objects.push((OBJECT_ID_MUTE_OUTPUT_MASTER, Direction::Output, false));
    }
    objects
}

/// Object list truncated to what fits in `capacity` bytes
pub(crate) fn object_list(mut ids: Vec<ObjectId>, capacity: usize) -> PropertyData {
    let count = items_that_fit(capacity, hal::SIZE_OF_OBJECT_ID, ids.len());
    ids.truncate(count);
    PropertyData::ObjectList(ids)
}

pub(crate) fn unknown_property(id: ObjectId, address: &PropertyAddress) -> DriverError {
    DriverError::UnknownProperty {
        id,
        selector: address.selector,
    }
}

/// HasProperty: false for unknown objects as well as unknown selectors
pub fn has_property(ctx: &DriverContext, id: ObjectId, address: &PropertyAddress) -> bool {
    match AudioObject::resolve(ctx, id) {
        Ok(object) => object.as_property_object().has_property(ctx, address),
        Err(_) => false,
    }
}

fn checked<'a>(
    ctx: &DriverContext,
    object: &'a AudioObject,
    address: &PropertyAddress,
) -> Result<&'a dyn PropertyObject> {
    let target = object.as_property_object();
    if !target.has_property(ctx, address) {
        return Err(unknown_property(target.object_id(), address));
    }
    Ok(target)
}

pub fn is_property_settable(
    ctx: &DriverContext,
    id: ObjectId,
    address: &PropertyAddress,
) -> Result<bool> {
    let object = AudioObject::resolve(ctx, id)?;
    let target = checked(ctx, &object, address)?;
    Ok(target.is_property_settable(ctx, address))
}

pub fn property_data_size(
    ctx: &DriverContext,
    id: ObjectId,
    address: &PropertyAddress,
    qualifier: Option<&PropertyValue>,
) -> Result<usize> {
    let object = AudioObject::resolve(ctx, id)?;
    checked(ctx, &object, address)?.property_data_size(ctx, address, qualifier)
}

/// GetPropertyData. Lists are truncated to `capacity`; any other payload that
/// does not fit is BadPropertySize.
pub fn property_data(
    ctx: &DriverContext,
    id: ObjectId,
    address: &PropertyAddress,
    qualifier: Option<&PropertyValue>,
    capacity: usize,
) -> Result<PropertyData> {
    let object = AudioObject::resolve(ctx, id)?;
    let data = checked(ctx, &object, address)?.property_data(ctx, address, qualifier, capacity)?;
    if !data.is_list() {
        require_capacity(
            capacity,
            data.byte_size(),
            &format!("'{}'", hal::fourcc_to_string(address.selector)),
        )?;
    }
    Ok(data)
}

/// SetPropertyData. Read-only properties report UnknownProperty, like unknown
/// selectors do.
pub fn set_property_data(
    ctx: &DriverContext,
    id: ObjectId,
    address: &PropertyAddress,
    qualifier: Option<&PropertyValue>,
    value: &PropertyValue,
) -> Result<ChangedProperties> {
    let object = AudioObject::resolve(ctx, id)?;
    let target = checked(ctx, &object, address)?;
    if !target.is_property_settable(ctx, address) {
        return Err(unknown_property(id, address));
    }
    target.set_property_data(ctx, address, qualifier, value)
}
