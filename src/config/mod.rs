// Driver configuration
//
// Everything that shapes the published topology and the engine: names and
// UIDs, which devices exist, channel count, rates, buffer sizes, the volume
// range. Defaults reproduce the stock loopback driver. A JSON file may
// override any subset of fields.

pub mod validation;

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::audio::controls::VolumeCurve;

pub use validation::validate_config;

pub const DEFAULT_SAMPLE_RATES: [f64; 12] = [
    8000.0, 16000.0, 44100.0, 48000.0, 88200.0, 96000.0, 176400.0, 192000.0, 352800.0, 384000.0,
    705600.0, 768000.0,
];

/// One published device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    pub name: String,
    pub hidden: bool,
    pub has_input: bool,
    pub has_output: bool,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            name: "Virtual Audio Cable".to_string(),
            hidden: false,
            has_input: true,
            has_output: true,
        }
    }
}

impl DeviceConfig {
    pub fn hidden_companion() -> Self {
        Self {
            hidden: true,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Prefix of every UID the driver publishes
    pub uid_base: String,
    /// Embed the channel count in UIDs ("...2ch_UID")
    pub uid_includes_channel_count: bool,
    pub plugin_manufacturer: String,
    pub device_manufacturer: String,

    pub box_name: String,
    pub box_model_name: String,
    pub box_manufacturer: String,
    pub box_serial_number: String,
    pub box_firmware_version: String,
    pub default_box_acquired: bool,

    pub device: DeviceConfig,
    pub secondary_device: Option<DeviceConfig>,

    pub channels: u32,
    pub sample_rates: Vec<f64>,
    pub default_sample_rate: f64,
    pub ring_buffer_frames: u32,
    pub zero_timestamp_period: u32,
    pub latency_frames: u32,
    pub safety_offset_frames: u32,

    pub volume_control_enabled: bool,
    pub volume: VolumeCurve,

    pub identify_delay_ms: u64,
    pub max_io_clients: u64,
    pub icon_url: Option<String>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            uid_base: "Virtual Audio Cable".to_string(),
            uid_includes_channel_count: true,
            plugin_manufacturer: "Apple Inc.".to_string(),
            device_manufacturer: "Existential Audio Inc.".to_string(),

            box_name: "AVC Box".to_string(),
            box_model_name: "Null Model".to_string(),
            box_manufacturer: "Apple Inc.".to_string(),
            box_serial_number: "00000001".to_string(),
            box_firmware_version: "1.0".to_string(),
            default_box_acquired: true,

            device: DeviceConfig::default(),
            secondary_device: Some(DeviceConfig::hidden_companion()),

            channels: 2,
            sample_rates: DEFAULT_SAMPLE_RATES.to_vec(),
            default_sample_rate: 44100.0,
            ring_buffer_frames: 65536,
            zero_timestamp_period: 16384,
            latency_frames: 0,
            safety_offset_frames: 0,

            volume_control_enabled: true,
            volume: VolumeCurve::default(),

            identify_delay_ms: 2000,
            max_io_clients: u64::MAX,
            icon_url: None,
        }
    }
}

impl DriverConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: DriverConfig =
            serde_json::from_str(json).context("Failed to parse driver configuration JSON")?;
        validate_config(&config)?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read driver configuration {}", path.display()))?;
        Self::from_json_str(&json)
            .with_context(|| format!("Invalid driver configuration {}", path.display()))
    }

    pub fn supports_rate(&self, rate: f64) -> bool {
        self.sample_rates.iter().any(|&r| r == rate)
    }

    fn uid(&self, suffix: &str) -> String {
        if self.uid_includes_channel_count {
            format!("{}{}ch{}", self.uid_base, self.channels, suffix)
        } else {
            format!("{}{}", self.uid_base, suffix)
        }
    }

    pub fn box_uid(&self) -> String {
        self.uid("_UID")
    }

    pub fn device_uid(&self) -> String {
        self.uid("_UID")
    }

    pub fn secondary_device_uid(&self) -> String {
        self.uid("_2_UID")
    }

    pub fn model_uid(&self) -> String {
        self.uid("_ModelUID")
    }
}
