mod common;

use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use common::*;
use vac_driver_lib::audio::hal;
use vac_driver_lib::audio::*;
use vac_driver_lib::{DriverConfig, PropertyData};

#[cfg(test)]
mod config_tests {
    use super::*;

    fn write_config(json: &str) -> Result<tempfile::NamedTempFile> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(json.as_bytes())?;
        file.flush()?;
        Ok(file)
    }

    #[test]
    fn test_load_from_file() -> Result<()> {
        let file = write_config(
            r#"{
                "uid_base": "Loopback",
                "channels": 4,
                "default_sample_rate": 48000.0,
                "secondary_device": null,
                "device": { "name": "Loopback 4ch" }
            }"#,
        )?;
        let config = DriverConfig::load(file.path())?;
        assert_eq!(config.channels, 4);
        assert_eq!(config.device_uid(), "Loopback4ch_UID");
        assert!(config.secondary_device.is_none());
        assert!(config.device.has_input && config.device.has_output);
        assert_eq!(config.ring_buffer_frames, 65536);
        Ok(())
    }

    #[test]
    fn test_loaded_config_shapes_the_driver() -> Result<()> {
        let file = write_config(
            r#"{ "channels": 4, "default_sample_rate": 96000.0, "ring_buffer_frames": 4096, "zero_timestamp_period": 2048 }"#,
        )?;
        let config = DriverConfig::load(file.path())?;
        let fx = fixture_with(config, RecordingHost::new());

        let format = fx.driver.get_property_data(
            OBJECT_ID_STREAM_INPUT,
            &global(hal::kAudioStreamPropertyVirtualFormat),
            None,
            40,
        )?;
        assert_eq!(format, PropertyData::Format(StreamFormat::float32(96000.0, 4)));

        let period = fx.driver.get_property_data(
            OBJECT_ID_DEVICE,
            &global(hal::kAudioDevicePropertyZeroTimeStampPeriod),
            None,
            4,
        )?;
        assert_eq!(period.as_u32(), Some(2048));

        fx.driver.start_io(OBJECT_ID_DEVICE, 1)?;
        let state = fx.driver.context().state();
        let ring = state.io.ring().expect("ring");
        assert_eq!(ring.capacity_frames(), 4096);
        assert_eq!(ring.channels(), 4);
        Ok(())
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = DriverConfig::load(dir.path().join("absent.json")).unwrap_err();
        assert!(format!("{:#}", err).contains("absent.json"));
    }

    #[test]
    fn test_invalid_values_name_the_problem() -> Result<()> {
        let file = write_config(r#"{ "channels": 0 }"#)?;
        let err = DriverConfig::load(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("channel count"));

        let file = write_config(r#"{ "default_sample_rate": 22050.0 }"#)?;
        assert!(DriverConfig::load(file.path()).is_err());

        let file = write_config("not json")?;
        assert!(DriverConfig::load(file.path()).is_err());
        Ok(())
    }

    #[test]
    fn test_config_serializes_back() -> Result<()> {
        let config = DriverConfig {
            identify_delay_ms: 10,
            icon_url: Some("file:///icon.icns".into()),
            ..DriverConfig::default()
        };
        let json = serde_json::to_string(&config)?;
        assert_eq!(DriverConfig::from_json_str(&json)?, config);
        Ok(())
    }

    #[test]
    fn test_icon_url_published() -> Result<()> {
        let config = DriverConfig {
            icon_url: Some("file:///icon.icns".into()),
            ..DriverConfig::default()
        };
        let fx = fixture_with(config, RecordingHost::new());
        let icon = fx.driver.get_property_data(
            OBJECT_ID_DEVICE,
            &global(hal::kAudioDevicePropertyIcon),
            None,
            usize::MAX,
        )?;
        assert_eq!(icon, PropertyData::Url(Some("file:///icon.icns".into())));
        Ok(())
    }

    #[test]
    fn test_driver_on_platform_clock() -> Result<()> {
        let driver = AudioDriver::with_host(DriverConfig::default(), Arc::new(RecordingHost::new()))?;
        driver.start_io(OBJECT_ID_DEVICE, 1)?;
        let ts = driver.get_zero_timestamp(OBJECT_ID_DEVICE, 1)?;
        assert_eq!(ts.sample_time, 0.0);
        assert_eq!(ts.seed, ZERO_TIMESTAMP_SEED);
        driver.stop_io(OBJECT_ID_DEVICE, 1)?;
        Ok(())
    }
}
