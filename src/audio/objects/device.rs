// Device objects
//
// The primary device and its optional (normally hidden) companion share one
// engine: the same sample rate, ring, streams and controls. They differ only
// in identity, name, UID, visibility and which directions they publish.

use super::{device_owned_objects, object_list, unknown_property, PropertyObject};
use crate::audio::context::{DeviceSlot, DriverContext};
use crate::audio::error::{DriverError, Result};
use crate::audio::hal;
use crate::audio::property::{items_that_fit, PropertyData, PropertyValue};
use crate::audio::types::*;
use crate::config::DeviceConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceObject {
    slot: DeviceSlot,
}

impl DeviceObject {
    pub fn new(slot: DeviceSlot) -> Self {
        Self { slot }
    }

    pub fn slot(&self) -> DeviceSlot {
        self.slot
    }

    fn config<'a>(&self, ctx: &'a DriverContext) -> Result<&'a DeviceConfig> {
        ctx.device_config(self.slot).ok_or(DriverError::BadObject {
            id: self.slot.object_id(),
        })
    }

    /// Owned streams and controls visible in `scope`
    fn owned(
        &self,
        ctx: &DriverContext,
        scope: Scope,
        filter: impl Fn(bool) -> bool,
    ) -> Result<Vec<ObjectId>> {
        let config = self.config(ctx)?;
        Ok(device_owned_objects(config.has_input, config.has_output)
            .into_iter()
            .filter(|(_, direction, is_stream)| direction.matches_scope(scope) && filter(*is_stream))
            .map(|(id, _, _)| id)
            .collect())
    }
}

/// Selectors that only exist in the input or output scope
fn is_directional_only(selector: Selector) -> bool {
    matches!(
        selector,
        hal::kAudioDevicePropertyDeviceCanBeDefaultDevice
            | hal::kAudioDevicePropertyDeviceCanBeDefaultSystemDevice
            | hal::kAudioDevicePropertyLatency
            | hal::kAudioDevicePropertySafetyOffset
            | hal::kAudioDevicePropertyPreferredChannelsForStereo
            | hal::kAudioDevicePropertyPreferredChannelLayout
    )
}

/// Validate a requested nominal rate and, if it differs from the current one,
/// ask the host to schedule the change. State is untouched until the host
/// commits.
pub(crate) fn request_sample_rate(
    ctx: &DriverContext,
    device_id: ObjectId,
    rate: f64,
) -> Result<ChangedProperties> {
    if !ctx.config.supports_rate(rate) {
        return Err(DriverError::UnsupportedFormat {
            reason: format!("{} Hz is not a supported sample rate", rate),
        });
    }

    let current = ctx.state().sample_rate;
    if rate != current {
        ctx.notifier()
            .request_configuration_change(device_id, rate as u64);
    }
    Ok(ChangedProperties::none())
}

impl PropertyObject for DeviceObject {
    fn object_id(&self) -> ObjectId {
        self.slot.object_id()
    }

    fn has_property(&self, _ctx: &DriverContext, address: &PropertyAddress) -> bool {
        if is_directional_only(address.selector) {
            return address.is_directional();
        }
        matches!(
            address.selector,
            hal::kAudioObjectPropertyBaseClass
                | hal::kAudioObjectPropertyClass
                | hal::kAudioObjectPropertyOwner
                | hal::kAudioObjectPropertyName
                | hal::kAudioObjectPropertyManufacturer
                | hal::kAudioObjectPropertyOwnedObjects
                | hal::kAudioObjectPropertyControlList
                | hal::kAudioDevicePropertyDeviceUID
                | hal::kAudioDevicePropertyModelUID
                | hal::kAudioDevicePropertyTransportType
                | hal::kAudioDevicePropertyRelatedDevices
                | hal::kAudioDevicePropertyClockDomain
                | hal::kAudioDevicePropertyDeviceIsAlive
                | hal::kAudioDevicePropertyDeviceIsRunning
                | hal::kAudioDevicePropertyStreams
                | hal::kAudioDevicePropertyNominalSampleRate
                | hal::kAudioDevicePropertyAvailableNominalSampleRates
                | hal::kAudioDevicePropertyIsHidden
                | hal::kAudioDevicePropertyZeroTimeStampPeriod
                | hal::kAudioDevicePropertyIcon
        )
    }

    fn is_property_settable(&self, _ctx: &DriverContext, address: &PropertyAddress) -> bool {
        address.selector == hal::kAudioDevicePropertyNominalSampleRate
    }

    fn property_data(
        &self,
        ctx: &DriverContext,
        address: &PropertyAddress,
        _qualifier: Option<&PropertyValue>,
        capacity: usize,
    ) -> Result<PropertyData> {
        let config = &ctx.config;
        let device = self.config(ctx)?;
        let id = self.object_id();

        let data = match address.selector {
            hal::kAudioObjectPropertyBaseClass => PropertyData::ClassId(hal::kAudioObjectClassID),
            hal::kAudioObjectPropertyClass => PropertyData::ClassId(hal::kAudioDeviceClassID),
            hal::kAudioObjectPropertyOwner => PropertyData::ObjectId(OBJECT_ID_PLUGIN),
            hal::kAudioObjectPropertyName => PropertyData::String(device.name.clone()),
            hal::kAudioObjectPropertyManufacturer => {
                PropertyData::String(config.device_manufacturer.clone())
            }
            hal::kAudioObjectPropertyOwnedObjects => {
                object_list(self.owned(ctx, address.scope, |_| true)?, capacity)
            }
            hal::kAudioDevicePropertyStreams => {
                object_list(self.owned(ctx, address.scope, |is_stream| is_stream)?, capacity)
            }
            hal::kAudioObjectPropertyControlList => {
                object_list(self.owned(ctx, address.scope, |is_stream| !is_stream)?, capacity)
            }
            hal::kAudioDevicePropertyDeviceUID => PropertyData::String(match self.slot {
                DeviceSlot::Primary => config.device_uid(),
                DeviceSlot::Secondary => config.secondary_device_uid(),
            }),
            hal::kAudioDevicePropertyModelUID => PropertyData::String(config.model_uid()),
            hal::kAudioDevicePropertyTransportType => {
                PropertyData::U32(hal::kAudioDeviceTransportTypeVirtual)
            }
            hal::kAudioDevicePropertyRelatedDevices => object_list(vec![id], capacity),
            hal::kAudioDevicePropertyClockDomain => PropertyData::U32(0),
            hal::kAudioDevicePropertyDeviceIsAlive => PropertyData::U32(1),
            hal::kAudioDevicePropertyDeviceIsRunning => {
                PropertyData::U32(u32::from(ctx.state().io.is_running()))
            }
            hal::kAudioDevicePropertyDeviceCanBeDefaultDevice
            | hal::kAudioDevicePropertyDeviceCanBeDefaultSystemDevice => PropertyData::U32(1),
            hal::kAudioDevicePropertyLatency => PropertyData::U32(config.latency_frames),
            hal::kAudioDevicePropertySafetyOffset => {
                PropertyData::U32(config.safety_offset_frames)
            }
            hal::kAudioDevicePropertyNominalSampleRate => {
                PropertyData::F64(ctx.state().sample_rate)
            }
            hal::kAudioDevicePropertyAvailableNominalSampleRates => {
                let count =
                    items_that_fit(capacity, hal::SIZE_OF_VALUE_RANGE, config.sample_rates.len());
                PropertyData::ValueRanges(
                    config.sample_rates[..count]
                        .iter()
                        .map(|&rate| ValueRange::point(rate))
                        .collect(),
                )
            }
            hal::kAudioDevicePropertyIsHidden => PropertyData::U32(u32::from(device.hidden)),
            hal::kAudioDevicePropertyPreferredChannelsForStereo => PropertyData::U32Pair([1, 2]),
            hal::kAudioDevicePropertyPreferredChannelLayout => {
                PropertyData::ChannelLayout(ChannelLayout::discrete(config.channels))
            }
            hal::kAudioDevicePropertyZeroTimeStampPeriod => {
                PropertyData::U32(config.zero_timestamp_period)
            }
            hal::kAudioDevicePropertyIcon => PropertyData::Url(config.icon_url.clone()),
            _ => return Err(unknown_property(id, address)),
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
            hal::kAudioDevicePropertyNominalSampleRate => {
                let rate = value.expect_f64("nominal sample rate")?;
                request_sample_rate(ctx, self.object_id(), rate)
            }
            _ => Err(unknown_property(self.object_id(), address)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directional_only_selectors() {
        assert!(is_directional_only(hal::kAudioDevicePropertyLatency));
        assert!(is_directional_only(hal::kAudioDevicePropertyPreferredChannelLayout));
        assert!(!is_directional_only(hal::kAudioDevicePropertyStreams));
    }
}
