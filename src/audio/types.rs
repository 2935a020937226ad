// Core driver types
//
// Object identifiers, property addresses, stream formats and the IO cycle
// descriptors shared by the property directory and the real-time engine.

use serde::{Deserialize, Serialize};

use super::hal;

pub type ObjectId = u32;
pub type ClassId = u32;
pub type Selector = u32;
pub type Scope = u32;
pub type Element = u32;

// Fixed object identifiers. The topology is static for the process lifetime.
pub const OBJECT_ID_PLUGIN: ObjectId = hal::kAudioObjectPlugInObject;
pub const OBJECT_ID_BOX: ObjectId = 2;
pub const OBJECT_ID_DEVICE: ObjectId = 3;
pub const OBJECT_ID_STREAM_INPUT: ObjectId = 4;
pub const OBJECT_ID_VOLUME_INPUT_MASTER: ObjectId = 5;
pub const OBJECT_ID_MUTE_INPUT_MASTER: ObjectId = 6;
pub const OBJECT_ID_STREAM_OUTPUT: ObjectId = 7;
pub const OBJECT_ID_VOLUME_OUTPUT_MASTER: ObjectId = 8;
pub const OBJECT_ID_MUTE_OUTPUT_MASTER: ObjectId = 9;
pub const OBJECT_ID_DEVICE2: ObjectId = 10;

pub const BITS_PER_CHANNEL: u32 = 32;
pub const BYTES_PER_CHANNEL: u32 = BITS_PER_CHANNEL / 8;

/// (selector, scope, element) triple naming one property of an object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertyAddress {
    pub selector: Selector,
    pub scope: Scope,
    pub element: Element,
}

impl PropertyAddress {
    pub const fn new(selector: Selector, scope: Scope) -> Self {
        Self {
            selector,
            scope,
            element: hal::kAudioObjectPropertyElementMain,
        }
    }

    pub const fn global(selector: Selector) -> Self {
        Self::new(selector, hal::kAudioObjectPropertyScopeGlobal)
    }

    pub fn is_global(&self) -> bool {
        self.scope == hal::kAudioObjectPropertyScopeGlobal
    }

    /// True for the two directional scopes
    pub fn is_directional(&self) -> bool {
        self.scope == hal::kAudioObjectPropertyScopeInput
            || self.scope == hal::kAudioObjectPropertyScopeOutput
    }
}

/// Stream/control direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Input,
    Output,
}

impl Direction {
    pub fn scope(self) -> Scope {
        match self {
            Direction::Input => hal::kAudioObjectPropertyScopeInput,
            Direction::Output => hal::kAudioObjectPropertyScopeOutput,
        }
    }

    /// Whether an address scope selects this direction (global selects both)
    pub fn matches_scope(self, scope: Scope) -> bool {
        scope == hal::kAudioObjectPropertyScopeGlobal || scope == self.scope()
    }
}

/// Linear PCM stream description (mirrors AudioStreamBasicDescription)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamFormat {
    pub sample_rate: f64,
    pub format_id: u32,
    pub format_flags: u32,
    pub bytes_per_packet: u32,
    pub frames_per_packet: u32,
    pub bytes_per_frame: u32,
    pub channels_per_frame: u32,
    pub bits_per_channel: u32,
}

impl StreamFormat {
    /// The driver's only format: packed native-endian 32-bit float
    pub fn float32(sample_rate: f64, channels: u32) -> Self {
        Self {
            sample_rate,
            format_id: hal::kAudioFormatLinearPCM,
            format_flags: hal::kAudioFormatFlagIsFloat
                | hal::kAudioFormatFlagsNativeEndian
                | hal::kAudioFormatFlagIsPacked,
            bytes_per_packet: BYTES_PER_CHANNEL * channels,
            frames_per_packet: 1,
            bytes_per_frame: BYTES_PER_CHANNEL * channels,
            channels_per_frame: channels,
            bits_per_channel: BITS_PER_CHANNEL,
        }
    }
}

/// Closed range of values, used for rates and the decibel span
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub minimum: f64,
    pub maximum: f64,
}

impl ValueRange {
    pub fn point(value: f64) -> Self {
        Self {
            minimum: value,
            maximum: value,
        }
    }
}

/// A format together with the rates it is valid for
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangedStreamFormat {
    pub format: StreamFormat,
    pub sample_rate_range: ValueRange,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelDescription {
    pub label: u32,
    pub flags: u32,
    pub coordinates: [f32; 3],
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChannelLayout {
    pub tag: u32,
    pub bitmap: u32,
    pub descriptions: Vec<ChannelDescription>,
}

impl ChannelLayout {
    /// One description per channel, labelled from Left upward
    pub fn discrete(channels: u32) -> Self {
        Self {
            tag: hal::kAudioChannelLayoutTag_UseChannelDescriptions,
            bitmap: 0,
            descriptions: (0..channels)
                .map(|i| ChannelDescription {
                    label: hal::kAudioChannelLabel_Left + i,
                    flags: 0,
                    coordinates: [0.0; 3],
                })
                .collect(),
        }
    }
}

/// Sample time / host time pair of one IO cycle edge
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IoTimeStamp {
    pub sample_time: f64,
    pub host_time: u64,
}

impl IoTimeStamp {
    pub fn at_sample(sample_time: f64) -> Self {
        Self {
            sample_time,
            host_time: 0,
        }
    }
}

/// Timing of one IO cycle as handed over by the host
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IoCycleInfo {
    pub current_time: IoTimeStamp,
    pub input_time: IoTimeStamp,
    pub output_time: IoTimeStamp,
}

/// Zero timestamp triple anchoring one ring period
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZeroTimestamp {
    pub sample_time: f64,
    pub host_time: u64,
    pub seed: u64,
}

/// IO operations the host may ask about during a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOperation {
    Thread,
    Cycle,
    ReadInput,
    ConvertInput,
    ProcessInput,
    ProcessOutput,
    MixOutput,
    ProcessMix,
    ConvertMix,
    WriteMix,
}

impl IoOperation {
    pub fn from_code(code: u32) -> Option<Self> {
        let op = match code {
            hal::kAudioServerPlugInIOOperationThread => IoOperation::Thread,
            hal::kAudioServerPlugInIOOperationCycle => IoOperation::Cycle,
            hal::kAudioServerPlugInIOOperationReadInput => IoOperation::ReadInput,
            hal::kAudioServerPlugInIOOperationConvertInput => IoOperation::ConvertInput,
            hal::kAudioServerPlugInIOOperationProcessInput => IoOperation::ProcessInput,
            hal::kAudioServerPlugInIOOperationProcessOutput => IoOperation::ProcessOutput,
            hal::kAudioServerPlugInIOOperationMixOutput => IoOperation::MixOutput,
            hal::kAudioServerPlugInIOOperationProcessMix => IoOperation::ProcessMix,
            hal::kAudioServerPlugInIOOperationConvertMix => IoOperation::ConvertMix,
            hal::kAudioServerPlugInIOOperationWriteMix => IoOperation::WriteMix,
            _ => return None,
        };
        Some(op)
    }

    pub fn code(self) -> u32 {
        match self {
            IoOperation::Thread => hal::kAudioServerPlugInIOOperationThread,
            IoOperation::Cycle => hal::kAudioServerPlugInIOOperationCycle,
            IoOperation::ReadInput => hal::kAudioServerPlugInIOOperationReadInput,
            IoOperation::ConvertInput => hal::kAudioServerPlugInIOOperationConvertInput,
            IoOperation::ProcessInput => hal::kAudioServerPlugInIOOperationProcessInput,
            IoOperation::ProcessOutput => hal::kAudioServerPlugInIOOperationProcessOutput,
            IoOperation::MixOutput => hal::kAudioServerPlugInIOOperationMixOutput,
            IoOperation::ProcessMix => hal::kAudioServerPlugInIOOperationProcessMix,
            IoOperation::ConvertMix => hal::kAudioServerPlugInIOOperationConvertMix,
            IoOperation::WriteMix => hal::kAudioServerPlugInIOOperationWriteMix,
        }
    }
}

/// What the driver answers to WillDoIOOperation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IoOperationSupport {
    pub will_do: bool,
    pub in_place: bool,
}

/// Addresses changed by one Set call. Never more than two.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChangedProperties {
    addresses: [Option<PropertyAddress>; 2],
}

impl ChangedProperties {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn one(address: PropertyAddress) -> Self {
        Self {
            addresses: [Some(address), None],
        }
    }

    pub fn two(first: PropertyAddress, second: PropertyAddress) -> Self {
        Self {
            addresses: [Some(first), Some(second)],
        }
    }

    pub fn len(&self) -> usize {
        self.addresses.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses[0].is_none()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PropertyAddress> {
        self.addresses.iter().flatten()
    }

    pub fn to_vec(&self) -> Vec<PropertyAddress> {
        self.iter().copied().collect()
    }
}
