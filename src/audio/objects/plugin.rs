// PlugIn object
//
// Root of the topology. Publishes the box and, while the box is acquired, the
// devices. Nothing on it is settable.

use super::{object_list, unknown_property, PropertyObject};
use crate::audio::context::DriverContext;
use crate::audio::error::Result;
use crate::audio::hal;
use crate::audio::property::{require_capacity, require_qualifier, PropertyData, PropertyValue};
use crate::audio::types::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlugInObject;

impl PlugInObject {
    fn device_list(ctx: &DriverContext) -> Vec<ObjectId> {
        if ctx.state().box_state.acquired {
            ctx.device_ids()
        } else {
            Vec::new()
        }
    }

    fn translate_uid(
        qualifier: Option<&PropertyValue>,
        capacity: usize,
        what: &str,
        lookup: impl FnOnce(&str) -> ObjectId,
    ) -> Result<PropertyData> {
        require_capacity(capacity, hal::SIZE_OF_OBJECT_ID, what)?;
        let uid = require_qualifier(qualifier, what)?.expect_str(what)?;
        Ok(PropertyData::ObjectId(lookup(uid)))
    }
}

impl PropertyObject for PlugInObject {
    fn object_id(&self) -> ObjectId {
        OBJECT_ID_PLUGIN
    }

    fn has_property(&self, _ctx: &DriverContext, address: &PropertyAddress) -> bool {
        matches!(
            address.selector,
            hal::kAudioObjectPropertyBaseClass
                | hal::kAudioObjectPropertyClass
                | hal::kAudioObjectPropertyOwner
                | hal::kAudioObjectPropertyManufacturer
                | hal::kAudioObjectPropertyOwnedObjects
                | hal::kAudioPlugInPropertyBoxList
                | hal::kAudioPlugInPropertyTranslateUIDToBox
                | hal::kAudioPlugInPropertyDeviceList
                | hal::kAudioPlugInPropertyTranslateUIDToDevice
                | hal::kAudioPlugInPropertyResourceBundle
        )
    }

    fn is_property_settable(&self, _ctx: &DriverContext, _address: &PropertyAddress) -> bool {
        false
    }

    fn property_data_size(
        &self,
        ctx: &DriverContext,
        address: &PropertyAddress,
        qualifier: Option<&PropertyValue>,
    ) -> Result<usize> {
        match address.selector {
            // Size is known without looking at the qualifier
            hal::kAudioPlugInPropertyTranslateUIDToBox
            | hal::kAudioPlugInPropertyTranslateUIDToDevice => Ok(hal::SIZE_OF_OBJECT_ID),
            _ => Ok(self
                .property_data(ctx, address, qualifier, usize::MAX)?
                .byte_size()),
        }
    }

    fn property_data(
        &self,
        ctx: &DriverContext,
        address: &PropertyAddress,
        qualifier: Option<&PropertyValue>,
        capacity: usize,
    ) -> Result<PropertyData> {
        let data = match address.selector {
            hal::kAudioObjectPropertyBaseClass => PropertyData::ClassId(hal::kAudioObjectClassID),
            hal::kAudioObjectPropertyClass => PropertyData::ClassId(hal::kAudioPlugInClassID),
            hal::kAudioObjectPropertyOwner => PropertyData::ObjectId(hal::kAudioObjectUnknown),
            hal::kAudioObjectPropertyManufacturer => {
                PropertyData::String(ctx.config.plugin_manufacturer.clone())
            }
            hal::kAudioObjectPropertyOwnedObjects => {
                let mut owned = vec![OBJECT_ID_BOX];
                owned.extend(Self::device_list(ctx));
                object_list(owned, capacity)
            }
            hal::kAudioPlugInPropertyBoxList => object_list(vec![OBJECT_ID_BOX], capacity),
            hal::kAudioPlugInPropertyTranslateUIDToBox => {
                let box_uid = ctx.config.box_uid();
                Self::translate_uid(qualifier, capacity, "TranslateUIDToBox", |uid| {
                    if uid == box_uid {
                        OBJECT_ID_BOX
                    } else {
                        hal::kAudioObjectUnknown
                    }
                })?
            }
            hal::kAudioPlugInPropertyDeviceList => object_list(Self::device_list(ctx), capacity),
            hal::kAudioPlugInPropertyTranslateUIDToDevice => {
                let primary = ctx.config.device_uid();
                let secondary = ctx
                    .config
                    .secondary_device
                    .as_ref()
                    .map(|_| ctx.config.secondary_device_uid());
                Self::translate_uid(qualifier, capacity, "TranslateUIDToDevice", |uid| {
                    if uid == primary {
                        OBJECT_ID_DEVICE
                    } else if secondary.as_deref() == Some(uid) {
                        OBJECT_ID_DEVICE2
                    } else {
                        hal::kAudioObjectUnknown
                    }
                })?
            }
            hal::kAudioPlugInPropertyResourceBundle => PropertyData::String(String::new()),
            _ => return Err(unknown_property(OBJECT_ID_PLUGIN, address)),
        };
        Ok(data)
    }
}

