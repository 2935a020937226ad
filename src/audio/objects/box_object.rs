// Box object
//
// Stands for the "hardware" that carries the devices. Acquiring it makes the
// devices visible; its name and acquired flag are persisted in the host's
// settings store. Identify simulates a blink with a deferred notification.

use std::time::Duration;

use colored::*;
use tracing::info;

use super::{object_list, unknown_property, PropertyObject};
use crate::audio::context::DriverContext;
use crate::audio::error::Result;
use crate::audio::hal;
use crate::audio::host::{StoredValue, STORAGE_KEY_BOX_ACQUIRED, STORAGE_KEY_BOX_NAME};
use crate::audio::property::{PropertyData, PropertyValue};
use crate::audio::types::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxObject;

impl BoxObject {
    fn set_name(ctx: &DriverContext, name: &str) -> ChangedProperties {
        {
            let mut state = ctx.state();
            if state.box_state.name == name {
                return ChangedProperties::none();
            }
            state.box_state.name = name.to_string();
        }

        ctx.host()
            .write_to_storage(STORAGE_KEY_BOX_NAME, StoredValue::String(name.to_string()));
        info!("🏷️ {}: box renamed to '{}'", "BOX_NAME".bright_cyan(), name);
        ChangedProperties::one(PropertyAddress::global(hal::kAudioObjectPropertyName))
    }

    fn set_acquired(ctx: &DriverContext, acquired: bool) -> ChangedProperties {
        {
            let mut state = ctx.state();
            if state.box_state.acquired == acquired {
                return ChangedProperties::none();
            }
            state.box_state.acquired = acquired;
        }

        ctx.host()
            .write_to_storage(STORAGE_KEY_BOX_ACQUIRED, StoredValue::Bool(acquired));
        info!(
            "📦 {}: box {}",
            "BOX_ACQUIRED".bright_cyan(),
            if acquired { "acquired" } else { "released" }
        );

        // The plug-in's device list changes with the box's
        ctx.notifier().notify_async(
            OBJECT_ID_PLUGIN,
            vec![PropertyAddress::global(hal::kAudioPlugInPropertyDeviceList)],
        );

        ChangedProperties::two(
            PropertyAddress::global(hal::kAudioBoxPropertyAcquired),
            PropertyAddress::global(hal::kAudioBoxPropertyDeviceList),
        )
    }
}

impl PropertyObject for BoxObject {
    fn object_id(&self) -> ObjectId {
        OBJECT_ID_BOX
    }

    fn has_property(&self, _ctx: &DriverContext, address: &PropertyAddress) -> bool {
        matches!(
            address.selector,
            hal::kAudioObjectPropertyBaseClass
                | hal::kAudioObjectPropertyClass
                | hal::kAudioObjectPropertyOwner
                | hal::kAudioObjectPropertyName
                | hal::kAudioObjectPropertyModelName
                | hal::kAudioObjectPropertyManufacturer
                | hal::kAudioObjectPropertyOwnedObjects
                | hal::kAudioObjectPropertyIdentify
                | hal::kAudioObjectPropertySerialNumber
                | hal::kAudioObjectPropertyFirmwareVersion
                | hal::kAudioBoxPropertyBoxUID
                | hal::kAudioBoxPropertyTransportType
                | hal::kAudioBoxPropertyHasAudio
                | hal::kAudioBoxPropertyHasVideo
                | hal::kAudioBoxPropertyHasMIDI
                | hal::kAudioBoxPropertyIsProtected
                | hal::kAudioBoxPropertyAcquired
                | hal::kAudioBoxPropertyAcquisitionFailed
                | hal::kAudioBoxPropertyDeviceList
        )
    }

    fn is_property_settable(&self, _ctx: &DriverContext, address: &PropertyAddress) -> bool {
        matches!(
            address.selector,
            hal::kAudioObjectPropertyName
                | hal::kAudioObjectPropertyIdentify
                | hal::kAudioBoxPropertyAcquired
        )
    }

    fn property_data(
        &self,
        ctx: &DriverContext,
        address: &PropertyAddress,
        _qualifier: Option<&PropertyValue>,
        capacity: usize,
    ) -> Result<PropertyData> {
        let config = &ctx.config;
        let data = match address.selector {
            hal::kAudioObjectPropertyBaseClass => PropertyData::ClassId(hal::kAudioObjectClassID),
            hal::kAudioObjectPropertyClass => PropertyData::ClassId(hal::kAudioBoxClassID),
            hal::kAudioObjectPropertyOwner => PropertyData::ObjectId(OBJECT_ID_PLUGIN),
            hal::kAudioObjectPropertyName => PropertyData::String(ctx.state().box_state.name.clone()),
            hal::kAudioObjectPropertyModelName => {
                PropertyData::String(config.box_model_name.clone())
            }
            hal::kAudioObjectPropertyManufacturer => {
                PropertyData::String(config.box_manufacturer.clone())
            }
            hal::kAudioObjectPropertyOwnedObjects => PropertyData::ObjectList(Vec::new()),
            hal::kAudioObjectPropertyIdentify => PropertyData::U32(0),
            hal::kAudioObjectPropertySerialNumber => {
                PropertyData::String(config.box_serial_number.clone())
            }
            hal::kAudioObjectPropertyFirmwareVersion => {
                PropertyData::String(config.box_firmware_version.clone())
            }
            hal::kAudioBoxPropertyBoxUID => PropertyData::String(config.box_uid()),
            hal::kAudioBoxPropertyTransportType => {
                PropertyData::U32(hal::kAudioDeviceTransportTypeVirtual)
            }
            hal::kAudioBoxPropertyHasAudio => PropertyData::U32(1),
            hal::kAudioBoxPropertyHasVideo
            | hal::kAudioBoxPropertyHasMIDI
            | hal::kAudioBoxPropertyIsProtected
            | hal::kAudioBoxPropertyAcquisitionFailed => PropertyData::U32(0),
            hal::kAudioBoxPropertyAcquired => {
                PropertyData::U32(u32::from(ctx.state().box_state.acquired))
            }
            hal::kAudioBoxPropertyDeviceList => {
                let devices = if ctx.state().box_state.acquired {
                    ctx.device_ids()
                } else {
                    Vec::new()
                };
                object_list(devices, capacity)
            }
            _ => return Err(unknown_property(OBJECT_ID_BOX, address)),
        };
        Ok(data)
    }

    fn set_property_data(
        &self,
        ctx: &DriverContext,
        address: &PropertyAddress,
        _qualifier: Option<&PropertyValue>,
        value: &PropertyValue,
    ) -> Result<ChangedProperties> {
        match address.selector {
            hal::kAudioObjectPropertyName => {
                Ok(Self::set_name(ctx, value.expect_str("box name")?))
            }
            hal::kAudioObjectPropertyIdentify => {
                value.expect_u32("identify")?;
                ctx.notifier().schedule_identify(
                    OBJECT_ID_BOX,
                    PropertyAddress::global(hal::kAudioObjectPropertyIdentify),
                    Duration::from_millis(ctx.config.identify_delay_ms),
                );
                Ok(ChangedProperties::none())
            }
            hal::kAudioBoxPropertyAcquired => {
                let acquired = value.expect_u32("box acquired")? != 0;
                Ok(Self::set_acquired(ctx, acquired))
            }
            _ => Err(unknown_property(OBJECT_ID_BOX, address)),
        }
    }
}
