// Property payloads
//
// `PropertyData` is what a Get hands back, `PropertyValue` is what a Set (or a
// qualifier) carries in. Byte sizes follow the C structures the host expects
// so that size queries and buffer-capacity truncation behave like the wire
// protocol.

use super::error::{DriverError, Result};
use super::hal;
use super::types::{
    ChannelLayout, ClassId, ObjectId, RangedStreamFormat, StreamFormat, ValueRange,
};

/// Property data returned by GetPropertyData
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyData {
    ClassId(ClassId),
    ObjectId(ObjectId),
    ObjectList(Vec<ObjectId>),
    U32(u32),
    U32Pair([u32; 2]),
    F32(f32),
    F64(f64),
    String(String),
    Url(Option<String>),
    ValueRange(ValueRange),
    ValueRanges(Vec<ValueRange>),
    Format(StreamFormat),
    RangedFormats(Vec<RangedStreamFormat>),
    ChannelLayout(ChannelLayout),
}

impl PropertyData {
    /// Number of bytes this payload occupies in the host's buffer
    pub fn byte_size(&self) -> usize {
        match self {
            PropertyData::ClassId(_) | PropertyData::ObjectId(_) => hal::SIZE_OF_OBJECT_ID,
            PropertyData::ObjectList(ids) => ids.len() * hal::SIZE_OF_OBJECT_ID,
            PropertyData::U32(_) => hal::SIZE_OF_U32,
            PropertyData::U32Pair(_) => 2 * hal::SIZE_OF_U32,
            PropertyData::F32(_) => hal::SIZE_OF_F32,
            PropertyData::F64(_) => hal::SIZE_OF_F64,
            PropertyData::String(_) | PropertyData::Url(_) => hal::SIZE_OF_CF_REF,
            PropertyData::ValueRange(_) => hal::SIZE_OF_VALUE_RANGE,
            PropertyData::ValueRanges(ranges) => ranges.len() * hal::SIZE_OF_VALUE_RANGE,
            PropertyData::Format(_) => hal::SIZE_OF_STREAM_BASIC_DESCRIPTION,
            PropertyData::RangedFormats(formats) => {
                formats.len() * hal::SIZE_OF_STREAM_RANGED_DESCRIPTION
            }
            PropertyData::ChannelLayout(layout) => channel_layout_size(layout.descriptions.len()),
        }
    }

    /// Variable-length payloads that are truncated to the caller's buffer
    /// instead of being rejected
    pub fn is_list(&self) -> bool {
        matches!(
            self,
            PropertyData::ObjectList(_)
                | PropertyData::ValueRanges(_)
                | PropertyData::RangedFormats(_)
        )
    }

    pub fn as_object_list(&self) -> Option<&[ObjectId]> {
        match self {
            PropertyData::ObjectList(ids) => Some(ids),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            PropertyData::U32(v) | PropertyData::ClassId(v) | PropertyData::ObjectId(v) => {
                Some(*v)
            }
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            PropertyData::F32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyData::F64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyData::String(s) => Some(s),
            _ => None,
        }
    }
}

pub fn channel_layout_size(channels: usize) -> usize {
    hal::SIZE_OF_CHANNEL_LAYOUT_HEADER + channels * hal::SIZE_OF_CHANNEL_DESCRIPTION
}

/// How many items of `item_size` bytes fit in a caller buffer of `capacity` bytes,
/// clamped to the `available` count
pub fn items_that_fit(capacity: usize, item_size: usize, available: usize) -> usize {
    (capacity / item_size).min(available)
}

/// Fail unless a buffer of `capacity` bytes can hold `required` bytes
pub fn require_capacity(capacity: usize, required: usize, what: &str) -> Result<()> {
    if capacity < required {
        return Err(DriverError::bad_size(format!(
            "{} needs {} bytes, caller supplied {}",
            what, required, capacity
        )));
    }
    Ok(())
}

/// Property value passed into SetPropertyData, or as qualifier data
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    U32(u32),
    F32(f32),
    F64(f64),
    String(String),
    Format(StreamFormat),
}

impl PropertyValue {
    pub fn expect_u32(&self, what: &str) -> Result<u32> {
        match self {
            PropertyValue::U32(v) => Ok(*v),
            other => Err(type_mismatch(what, "UInt32", other)),
        }
    }

    pub fn expect_f32(&self, what: &str) -> Result<f32> {
        match self {
            PropertyValue::F32(v) => Ok(*v),
            other => Err(type_mismatch(what, "Float32", other)),
        }
    }

    pub fn expect_f64(&self, what: &str) -> Result<f64> {
        match self {
            PropertyValue::F64(v) => Ok(*v),
            other => Err(type_mismatch(what, "Float64", other)),
        }
    }

    pub fn expect_str(&self, what: &str) -> Result<&str> {
        match self {
            PropertyValue::String(s) => Ok(s),
            other => Err(type_mismatch(what, "CFString", other)),
        }
    }

    pub fn expect_format(&self, what: &str) -> Result<&StreamFormat> {
        match self {
            PropertyValue::Format(f) => Ok(f),
            other => Err(type_mismatch(what, "AudioStreamBasicDescription", other)),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            PropertyValue::U32(_) => "UInt32",
            PropertyValue::F32(_) => "Float32",
            PropertyValue::F64(_) => "Float64",
            PropertyValue::String(_) => "CFString",
            PropertyValue::Format(_) => "AudioStreamBasicDescription",
        }
    }
}

fn type_mismatch(what: &str, expected: &str, got: &PropertyValue) -> DriverError {
    DriverError::bad_size(format!("{} expects {}, got {}", what, expected, got.kind()))
}

/// Qualifier value the property needs, or BadPropertySize if it is missing
pub fn require_qualifier<'a>(
    qualifier: Option<&'a PropertyValue>,
    what: &str,
) -> Result<&'a PropertyValue> {
    qualifier.ok_or_else(|| DriverError::bad_size(format!("{} requires qualifier data", what)))
}
