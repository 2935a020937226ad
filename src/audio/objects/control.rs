// Control objects
//
// Master volume and mute, published once per direction. Both directions
// address the same shared value, so a change made through the input control
// is visible through the output control and vice versa.

use super::{unknown_property, PropertyObject};
use crate::audio::context::DriverContext;
use crate::audio::error::{DriverError, Result};
use crate::audio::hal;
use crate::audio::property::{require_qualifier, PropertyData, PropertyValue};
use crate::audio::types::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKind {
    Volume,
    Mute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlObject {
    kind: ControlKind,
    direction: Direction,
}

fn volume_changed() -> ChangedProperties {
    ChangedProperties::two(
        PropertyAddress::global(hal::kAudioLevelControlPropertyScalarValue),
        PropertyAddress::global(hal::kAudioLevelControlPropertyDecibelValue),
    )
}

fn finite_volume(value: f32) -> Result<f32> {
    if value.is_nan() {
        return Err(DriverError::illegal("volume must be a number"));
    }
    Ok(value)
}

impl ControlObject {
    pub fn new(kind: ControlKind, direction: Direction) -> Self {
        Self { kind, direction }
    }

    pub fn kind(&self) -> ControlKind {
        self.kind
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    fn common_data(&self, ctx: &DriverContext, selector: Selector) -> Option<PropertyData> {
        let data = match selector {
            hal::kAudioObjectPropertyBaseClass => PropertyData::ClassId(match self.kind {
                ControlKind::Volume => hal::kAudioLevelControlClassID,
                ControlKind::Mute => hal::kAudioBooleanControlClassID,
            }),
            hal::kAudioObjectPropertyClass => PropertyData::ClassId(match self.kind {
                ControlKind::Volume => hal::kAudioVolumeControlClassID,
                ControlKind::Mute => hal::kAudioMuteControlClassID,
            }),
            hal::kAudioObjectPropertyOwner => {
                PropertyData::ObjectId(ctx.direction_owner(self.direction))
            }
            hal::kAudioObjectPropertyOwnedObjects => PropertyData::ObjectList(Vec::new()),
            hal::kAudioControlPropertyScope => PropertyData::U32(self.direction.scope()),
            hal::kAudioControlPropertyElement => {
                PropertyData::U32(hal::kAudioObjectPropertyElementMain)
            }
            _ => return None,
        };
        Some(data)
    }
}

impl PropertyObject for ControlObject {
    fn object_id(&self) -> ObjectId {
        match (self.kind, self.direction) {
            (ControlKind::Volume, Direction::Input) => OBJECT_ID_VOLUME_INPUT_MASTER,
            (ControlKind::Volume, Direction::Output) => OBJECT_ID_VOLUME_OUTPUT_MASTER,
            (ControlKind::Mute, Direction::Input) => OBJECT_ID_MUTE_INPUT_MASTER,
            (ControlKind::Mute, Direction::Output) => OBJECT_ID_MUTE_OUTPUT_MASTER,
        }
    }

    fn has_property(&self, ctx: &DriverContext, address: &PropertyAddress) -> bool {
        if self.common_data(ctx, address.selector).is_some() {
            return true;
        }
        match self.kind {
            ControlKind::Volume => matches!(
                address.selector,
                hal::kAudioLevelControlPropertyScalarValue
                    | hal::kAudioLevelControlPropertyDecibelValue
                    | hal::kAudioLevelControlPropertyDecibelRange
                    | hal::kAudioLevelControlPropertyConvertScalarToDecibels
                    | hal::kAudioLevelControlPropertyConvertDecibelsToScalar
            ),
            ControlKind::Mute => address.selector == hal::kAudioBooleanControlPropertyValue,
        }
    }

    fn is_property_settable(&self, _ctx: &DriverContext, address: &PropertyAddress) -> bool {
        match self.kind {
            ControlKind::Volume => matches!(
                address.selector,
                hal::kAudioLevelControlPropertyScalarValue
                    | hal::kAudioLevelControlPropertyDecibelValue
            ),
            ControlKind::Mute => address.selector == hal::kAudioBooleanControlPropertyValue,
        }
    }

    fn property_data_size(
        &self,
        ctx: &DriverContext,
        address: &PropertyAddress,
        qualifier: Option<&PropertyValue>,
    ) -> Result<usize> {
        match address.selector {
            hal::kAudioLevelControlPropertyConvertScalarToDecibels
            | hal::kAudioLevelControlPropertyConvertDecibelsToScalar => Ok(hal::SIZE_OF_F32),
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
        _capacity: usize,
    ) -> Result<PropertyData> {
        if let Some(data) = self.common_data(ctx, address.selector) {
            return Ok(data);
        }

        let curve = &ctx.config.volume;
        let data = match (self.kind, address.selector) {
            (ControlKind::Volume, hal::kAudioLevelControlPropertyScalarValue) => {
                PropertyData::F32(curve.to_scalar(ctx.state().controls.volume()))
            }
            (ControlKind::Volume, hal::kAudioLevelControlPropertyDecibelValue) => {
                PropertyData::F32(curve.to_decibel(ctx.state().controls.volume()))
            }
            (ControlKind::Volume, hal::kAudioLevelControlPropertyDecibelRange) => {
                PropertyData::ValueRange(ValueRange {
                    minimum: f64::from(curve.min_db),
                    maximum: f64::from(curve.max_db),
                })
            }
            (ControlKind::Volume, hal::kAudioLevelControlPropertyConvertScalarToDecibels) => {
                let scalar = require_qualifier(qualifier, "ConvertScalarToDecibels")?
                    .expect_f32("scalar to convert")?;
                PropertyData::F32(curve.taper_scalar_to_decibels(scalar))
            }
            (ControlKind::Volume, hal::kAudioLevelControlPropertyConvertDecibelsToScalar) => {
                let decibel = require_qualifier(qualifier, "ConvertDecibelsToScalar")?
                    .expect_f32("decibels to convert")?;
                PropertyData::F32(curve.taper_decibels_to_scalar(decibel))
            }
            (ControlKind::Mute, hal::kAudioBooleanControlPropertyValue) => {
                PropertyData::U32(u32::from(ctx.state().controls.is_muted()))
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
        let curve = ctx.config.volume;
        let changed = match (self.kind, address.selector) {
            (ControlKind::Volume, hal::kAudioLevelControlPropertyScalarValue) => {
                let scalar = finite_volume(value.expect_f32("volume scalar")?)?;
                if ctx.state().controls.set_volume_scalar(&curve, scalar) {
                    volume_changed()
                } else {
                    ChangedProperties::none()
                }
            }
            (ControlKind::Volume, hal::kAudioLevelControlPropertyDecibelValue) => {
                let decibel = finite_volume(value.expect_f32("volume decibels")?)?;
                if ctx.state().controls.set_volume_decibel(&curve, decibel) {
                    volume_changed()
                } else {
                    ChangedProperties::none()
                }
            }
            (ControlKind::Mute, hal::kAudioBooleanControlPropertyValue) => {
                let muted = value.expect_u32("mute value")? != 0;
                if ctx.state().controls.set_muted(muted) {
                    ChangedProperties::one(PropertyAddress::global(
                        hal::kAudioBooleanControlPropertyValue,
                    ))
                } else {
                    ChangedProperties::none()
                }
            }
            _ => return Err(unknown_property(self.object_id(), address)),
        };

        crate::io_debug!(
            "control {} '{}' set, {} address(es) changed",
            self.object_id(),
            hal::fourcc_to_string(address.selector),
            changed.len()
        );
        Ok(changed)
    }
}
