// Configuration validation
//
// Rejects configurations the engine cannot run with before any object is
// published.

use anyhow::Result;

use super::{DeviceConfig, DriverConfig};

pub const MAX_CHANNELS: u32 = 64;

fn validate_device(device: &DeviceConfig, which: &str) -> Result<()> {
    if device.name.trim().is_empty() {
        return Err(anyhow::anyhow!("{} device name cannot be empty", which));
    }
    if !device.has_input && !device.has_output {
        return Err(anyhow::anyhow!(
            "{} device must have at least one stream direction",
            which
        ));
    }
    Ok(())
}

/// Validate a driver configuration
pub fn validate_config(config: &DriverConfig) -> Result<()> {
    if config.uid_base.is_empty() {
        return Err(anyhow::anyhow!("UID base cannot be empty"));
    }
    if config.box_name.is_empty() {
        return Err(anyhow::anyhow!("Box name cannot be empty"));
    }

    if config.channels < 1 || config.channels > MAX_CHANNELS {
        return Err(anyhow::anyhow!(
            "Invalid channel count: {} (must be 1-{} channels)",
            config.channels,
            MAX_CHANNELS
        ));
    }

    if config.sample_rates.is_empty() {
        return Err(anyhow::anyhow!("At least one sample rate must be supported"));
    }
    if let Some(bad) = config
        .sample_rates
        .iter()
        .find(|r| !r.is_finite() || **r <= 0.0)
    {
        return Err(anyhow::anyhow!("Invalid sample rate: {}", bad));
    }
    // Rates travel to the host as whole Hz in configuration change requests
    if let Some(bad) = config.sample_rates.iter().find(|r| r.fract() != 0.0) {
        return Err(anyhow::anyhow!(
            "Sample rate {} must be a whole number of Hz",
            bad
        ));
    }
    if !config.supports_rate(config.default_sample_rate) {
        return Err(anyhow::anyhow!(
            "Default sample rate {} is not in the supported set",
            config.default_sample_rate
        ));
    }

    if !config.ring_buffer_frames.is_power_of_two() {
        return Err(anyhow::anyhow!(
            "Ring buffer size {} must be a power of two",
            config.ring_buffer_frames
        ));
    }
    if config.zero_timestamp_period == 0 || config.zero_timestamp_period > config.ring_buffer_frames
    {
        return Err(anyhow::anyhow!(
            "Zero timestamp period {} must be between 1 and the ring size {}",
            config.zero_timestamp_period,
            config.ring_buffer_frames
        ));
    }

    if config.volume.min_db >= config.volume.max_db {
        return Err(anyhow::anyhow!(
            "Volume range is empty: min {} dB, max {} dB",
            config.volume.min_db,
            config.volume.max_db
        ));
    }

    if config.max_io_clients == 0 {
        return Err(anyhow::anyhow!("At least one IO client must be allowed"));
    }

    validate_device(&config.device, "Primary")?;
    if let Some(secondary) = &config.secondary_device {
        validate_device(secondary, "Secondary")?;
    }

    Ok(())
}
