mod common;

use anyhow::Result;
use common::*;
use vac_driver_lib::audio::hal;
use vac_driver_lib::audio::*;
use vac_driver_lib::config::DEFAULT_SAMPLE_RATES;
use vac_driver_lib::{PropertyData, PropertyValue};

#[cfg(test)]
mod sample_rate_negotiation_tests {
    use super::*;

    fn nominal_rate(fx: &Fixture, device: ObjectId) -> Result<f64> {
        let data = fx.driver.get_property_data(
            device,
            &global(hal::kAudioDevicePropertyNominalSampleRate),
            None,
            8,
        )?;
        Ok(data.as_f64().expect("rate payload"))
    }

    fn set_rate(fx: &Fixture, device: ObjectId, rate: f64) -> Result<ChangedProperties, DriverError> {
        fx.driver.set_property_data(
            device,
            &global(hal::kAudioDevicePropertyNominalSampleRate),
            None,
            &PropertyValue::F64(rate),
        )
    }

    fn is_request(event: &HostEvent) -> bool {
        matches!(event, HostEvent::ConfigurationChange { .. })
    }

    /// A Set only asks; the rate moves when the host commits
    #[test]
    fn test_request_then_commit() -> Result<()> {
        let fx = fixture();
        let changed = set_rate(&fx, OBJECT_ID_DEVICE, 48000.0)?;
        assert!(changed.is_empty());
        assert_eq!(nominal_rate(&fx, OBJECT_ID_DEVICE)?, 44100.0);

        let request = fx.host.wait_for(WAIT, is_request).expect("rate request");
        assert_eq!(
            request,
            HostEvent::ConfigurationChange {
                device_id: OBJECT_ID_DEVICE,
                change_action: 48000
            }
        );

        fx.driver
            .perform_device_configuration_change(OBJECT_ID_DEVICE, 48000)?;
        assert_eq!(nominal_rate(&fx, OBJECT_ID_DEVICE)?, 48000.0);
        Ok(())
    }

    #[test]
    fn test_every_supported_rate_commits() -> Result<()> {
        let fx = fixture();
        for rate in DEFAULT_SAMPLE_RATES {
            fx.driver
                .perform_device_configuration_change(OBJECT_ID_DEVICE, rate as u64)?;
            assert_eq!(nominal_rate(&fx, OBJECT_ID_DEVICE)?, rate);

            let format = fx.driver.get_property_data(
                OBJECT_ID_STREAM_OUTPUT,
                &global(hal::kAudioStreamPropertyPhysicalFormat),
                None,
                40,
            )?;
            assert_eq!(format, PropertyData::Format(StreamFormat::float32(rate, 2)));
        }
        Ok(())
    }

    #[test]
    fn test_unsupported_rate_is_rejected() {
        let fx = fixture();
        let err = set_rate(&fx, OBJECT_ID_DEVICE, 22050.0).unwrap_err();
        assert!(matches!(err, DriverError::UnsupportedFormat { .. }));

        let err = fx
            .driver
            .perform_device_configuration_change(OBJECT_ID_DEVICE, 12345)
            .unwrap_err();
        assert!(matches!(err, DriverError::UnsupportedFormat { .. }));
        assert!(fx.host.wait_for(std::time::Duration::from_millis(200), is_request).is_none());
    }

    #[test]
    fn test_same_rate_requests_nothing() -> Result<()> {
        let fx = fixture();
        let changed = set_rate(&fx, OBJECT_ID_DEVICE, 44100.0)?;
        assert!(changed.is_empty());
        assert!(fx
            .host
            .wait_for(std::time::Duration::from_millis(200), is_request)
            .is_none());
        Ok(())
    }

    /// Both devices share one clock
    #[test]
    fn test_rate_shared_between_devices() -> Result<()> {
        let fx = fixture();
        set_rate(&fx, OBJECT_ID_DEVICE2, 96000.0)?;
        let request = fx.host.wait_for(WAIT, is_request).expect("rate request");
        assert_eq!(
            request,
            HostEvent::ConfigurationChange {
                device_id: OBJECT_ID_DEVICE2,
                change_action: 96000
            }
        );

        fx.driver
            .perform_device_configuration_change(OBJECT_ID_DEVICE2, 96000)?;
        assert_eq!(nominal_rate(&fx, OBJECT_ID_DEVICE)?, 96000.0);
        assert_eq!(nominal_rate(&fx, OBJECT_ID_DEVICE2)?, 96000.0);
        Ok(())
    }

    #[test]
    fn test_stream_format_set_requests_rate() -> Result<()> {
        let fx = fixture();
        let format = PropertyValue::Format(StreamFormat::float32(88200.0, 2));
        let changed = fx.driver.set_property_data(
            OBJECT_ID_STREAM_INPUT,
            &global(hal::kAudioStreamPropertyVirtualFormat),
            None,
            &format,
        )?;
        assert!(changed.is_empty());

        let request = fx.host.wait_for(WAIT, is_request).expect("rate request");
        assert_eq!(
            request,
            HostEvent::ConfigurationChange {
                device_id: OBJECT_ID_DEVICE,
                change_action: 88200
            }
        );
        Ok(())
    }

    #[test]
    fn test_stream_format_with_wrong_layout_is_rejected() {
        let fx = fixture();
        let mut format = StreamFormat::float32(48000.0, 2);
        format.channels_per_frame = 6;
        let err = fx
            .driver
            .set_property_data(
                OBJECT_ID_STREAM_OUTPUT,
                &global(hal::kAudioStreamPropertyPhysicalFormat),
                None,
                &PropertyValue::Format(format),
            )
            .unwrap_err();
        assert!(matches!(err, DriverError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_abort_leaves_rate_untouched() -> Result<()> {
        let fx = fixture();
        set_rate(&fx, OBJECT_ID_DEVICE, 192000.0)?;
        fx.driver
            .abort_device_configuration_change(OBJECT_ID_DEVICE, 192000)?;
        assert_eq!(nominal_rate(&fx, OBJECT_ID_DEVICE)?, 44100.0);
        Ok(())
    }

    /// Committing a rate rescales the zero-timestamp period in host ticks
    #[test]
    fn test_commit_rescales_host_ticks_per_frame() -> Result<()> {
        let fx = fixture();
        fx.driver
            .perform_device_configuration_change(OBJECT_ID_DEVICE, 88200)?;
        let ticks = fx.driver.context().timestamps().host_ticks_per_frame();
        assert!((ticks - 0.5).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_wrong_payload_type_is_bad_size() {
        let fx = fixture();
        let err = fx
            .driver
            .set_property_data(
                OBJECT_ID_DEVICE,
                &global(hal::kAudioDevicePropertyNominalSampleRate),
                None,
                &PropertyValue::U32(48000),
            )
            .unwrap_err();
        assert!(matches!(err, DriverError::BadPropertySize { .. }));
    }
}
