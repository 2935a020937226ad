// Stream objects
//
// One input and one output stream, each carrying the single float32 format at
// the shared nominal rate. Setting a format is another way of asking for a
// rate change.

use super::device::request_sample_rate;
use super::{unknown_property, PropertyObject};
use crate::audio::context::DriverContext;
use crate::audio::error::{DriverError, Result};
use crate::audio::hal;
use crate::audio::property::{items_that_fit, PropertyData, PropertyValue};
use crate::audio::types::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamObject {
    direction: Direction,
}

impl StreamObject {
    pub fn new(direction: Direction) -> Self {
        Self { direction }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    fn check_format(ctx: &DriverContext, format: &StreamFormat) -> Result<()> {
        let expected = StreamFormat::float32(format.sample_rate, ctx.config.channels);
        if format.format_id != expected.format_id
            || format.channels_per_frame != expected.channels_per_frame
            || format.bits_per_channel != expected.bits_per_channel
        {
            return Err(DriverError::UnsupportedFormat {
                reason: format!(
                    "only {}-channel 32-bit float linear PCM is supported",
                    ctx.config.channels
                ),
            });
        }
        Ok(())
    }
}

impl PropertyObject for StreamObject {
    fn object_id(&self) -> ObjectId {
        match self.direction {
            Direction::Input => OBJECT_ID_STREAM_INPUT,
            Direction::Output => OBJECT_ID_STREAM_OUTPUT,
        }
    }

    fn has_property(&self, _ctx: &DriverContext, address: &PropertyAddress) -> bool {
        matches!(
            address.selector,
            hal::kAudioObjectPropertyBaseClass
                | hal::kAudioObjectPropertyClass
                | hal::kAudioObjectPropertyOwner
                | hal::kAudioObjectPropertyOwnedObjects
                | hal::kAudioStreamPropertyIsActive
                | hal::kAudioStreamPropertyDirection
                | hal::kAudioStreamPropertyTerminalType
                | hal::kAudioStreamPropertyStartingChannel
                | hal::kAudioStreamPropertyLatency
                | hal::kAudioStreamPropertyVirtualFormat
                | hal::kAudioStreamPropertyPhysicalFormat
                | hal::kAudioStreamPropertyAvailableVirtualFormats
                | hal::kAudioStreamPropertyAvailablePhysicalFormats
        )
    }

    fn is_property_settable(&self, _ctx: &DriverContext, address: &PropertyAddress) -> bool {
        matches!(
            address.selector,
            hal::kAudioStreamPropertyIsActive
                | hal::kAudioStreamPropertyVirtualFormat
                | hal::kAudioStreamPropertyPhysicalFormat
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
            hal::kAudioObjectPropertyClass => PropertyData::ClassId(hal::kAudioStreamClassID),
            hal::kAudioObjectPropertyOwner => {
                PropertyData::ObjectId(ctx.direction_owner(self.direction))
            }
            hal::kAudioObjectPropertyOwnedObjects => PropertyData::ObjectList(Vec::new()),
            hal::kAudioStreamPropertyIsActive => {
                PropertyData::U32(u32::from(ctx.state().stream_active(self.direction)))
            }
            hal::kAudioStreamPropertyDirection => PropertyData::U32(match self.direction {
                Direction::Input => 1,
                Direction::Output => 0,
            }),
            hal::kAudioStreamPropertyTerminalType => PropertyData::U32(match self.direction {
                Direction::Input => hal::kAudioStreamTerminalTypeMicrophone,
                Direction::Output => hal::kAudioStreamTerminalTypeSpeaker,
            }),
            hal::kAudioStreamPropertyStartingChannel => PropertyData::U32(1),
            hal::kAudioStreamPropertyLatency => PropertyData::U32(config.latency_frames),
            hal::kAudioStreamPropertyVirtualFormat | hal::kAudioStreamPropertyPhysicalFormat => {
                let rate = ctx.state().sample_rate;
                PropertyData::Format(StreamFormat::float32(rate, config.channels))
            }
            hal::kAudioStreamPropertyAvailableVirtualFormats
            | hal::kAudioStreamPropertyAvailablePhysicalFormats => {
                let count = items_that_fit(
                    capacity,
                    hal::SIZE_OF_STREAM_RANGED_DESCRIPTION,
                    config.sample_rates.len(),
                );
                PropertyData::RangedFormats(
                    config.sample_rates[..count]
                        .iter()
                        .map(|&rate| RangedStreamFormat {
                            format: StreamFormat::float32(rate, config.channels),
                            sample_rate_range: ValueRange::point(rate),
                        })
                        .collect(),
                )
            }
            _ => return Err(unknown_property(self.object_id(), address)),
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
            hal::kAudioStreamPropertyIsActive => {
                let active = value.expect_u32("stream active flag")? != 0;
                let changed = ctx.state().set_stream_active(self.direction, active);
                crate::io_debug!("stream {} active={} changed={}", self.object_id(), active, changed);
                Ok(if changed {
                    ChangedProperties::one(PropertyAddress::global(
                        hal::kAudioStreamPropertyIsActive,
                    ))
                } else {
                    ChangedProperties::none()
                })
            }
            hal::kAudioStreamPropertyVirtualFormat | hal::kAudioStreamPropertyPhysicalFormat => {
                let format = value.expect_format("stream format")?;
                Self::check_format(ctx, format)?;
                request_sample_rate(ctx, ctx.direction_owner(self.direction), format.sample_rate)
            }
            _ => Err(unknown_property(self.object_id(), address)),
        }
    }
}
