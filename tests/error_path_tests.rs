mod common;

use anyhow::Result;
use common::*;
use vac_driver_lib::audio::error::to_status;
use vac_driver_lib::audio::hal;
use vac_driver_lib::audio::*;
use vac_driver_lib::{DriverConfig, PropertyValue};

#[cfg(test)]
mod error_path_tests {
    use super::*;

    #[test]
    fn test_unknown_object_everywhere() {
        let fx = fixture();
        let address = global(hal::kAudioObjectPropertyName);

        assert!(!fx.driver.has_property(42, &address));
        assert_eq!(
            fx.driver.is_property_settable(42, &address),
            Err(DriverError::BadObject { id: 42 })
        );
        assert_eq!(
            fx.driver.get_property_data_size(42, &address, None),
            Err(DriverError::BadObject { id: 42 })
        );
        assert_eq!(
            fx.driver.get_property_data(42, &address, None, 64),
            Err(DriverError::BadObject { id: 42 })
        );
        assert_eq!(
            fx.driver
                .set_property_data(42, &address, None, &PropertyValue::U32(0)),
            Err(DriverError::BadObject { id: 42 })
        );
    }

    #[test]
    fn test_device_entry_points_reject_non_devices() {
        let fx = fixture();
        for id in [OBJECT_ID_PLUGIN, OBJECT_ID_BOX, OBJECT_ID_STREAM_INPUT, 77] {
            assert_eq!(
                fx.driver.start_io(id, 1),
                Err(DriverError::BadObject { id })
            );
            assert_eq!(
                fx.driver.get_zero_timestamp(id, 1),
                Err(DriverError::BadObject { id })
            );
            assert_eq!(
                fx.driver.add_device_client(id, 1),
                Err(DriverError::BadObject { id })
            );
        }
    }

    #[test]
    fn test_missing_secondary_device_is_bad_object() {
        let config = DriverConfig {
            secondary_device: None,
            ..DriverConfig::default()
        };
        let fx = fixture_with(config, RecordingHost::new());
        assert_eq!(
            fx.driver.start_io(OBJECT_ID_DEVICE2, 1),
            Err(DriverError::BadObject {
                id: OBJECT_ID_DEVICE2
            })
        );
    }

    #[test]
    fn test_unknown_selector() {
        let fx = fixture();
        let bogus = global(hal::fourcc(b"zzzz"));
        assert!(!fx.driver.has_property(OBJECT_ID_DEVICE, &bogus));

        let err = fx
            .driver
            .get_property_data(OBJECT_ID_DEVICE, &bogus, None, 64)
            .unwrap_err();
        assert_eq!(
            err,
            DriverError::UnknownProperty {
                id: OBJECT_ID_DEVICE,
                selector: bogus.selector
            }
        );
        assert_eq!(err.status(), hal::kAudioHardwareUnknownPropertyError);
    }

    #[test]
    fn test_set_on_read_only_property() {
        let fx = fixture();
        let err = fx
            .driver
            .set_property_data(
                OBJECT_ID_DEVICE,
                &global(hal::kAudioObjectPropertyName),
                None,
                &PropertyValue::String("renamed".into()),
            )
            .unwrap_err();
        assert!(matches!(err, DriverError::UnknownProperty { .. }));
    }

    #[test]
    fn test_scalar_payload_larger_than_buffer() {
        let fx = fixture();
        let err = fx
            .driver
            .get_property_data(
                OBJECT_ID_DEVICE,
                &global(hal::kAudioDevicePropertyNominalSampleRate),
                None,
                4,
            )
            .unwrap_err();
        assert!(matches!(err, DriverError::BadPropertySize { .. }));
        assert_eq!(err.status(), hal::kAudioHardwareBadPropertySizeError);
    }

    #[test]
    fn test_dynamic_devices_unsupported() {
        let fx = fixture();
        let err = fx.driver.create_device().unwrap_err();
        assert_eq!(err.status(), hal::kAudioHardwareUnsupportedOperationError);
        let err = fx.driver.destroy_device(OBJECT_ID_DEVICE).unwrap_err();
        assert!(matches!(err, DriverError::UnsupportedOperation { .. }));
    }

    #[test]
    fn test_device_clients_accepted() -> Result<()> {
        let fx = fixture();
        fx.driver.add_device_client(OBJECT_ID_DEVICE, 3)?;
        fx.driver.remove_device_client(OBJECT_ID_DEVICE, 3)?;
        fx.driver.add_device_client(OBJECT_ID_DEVICE2, 4)?;
        Ok(())
    }

    #[test]
    fn test_status_codes() {
        let fx = fixture();
        assert_eq!(
            to_status(&fx.driver.get_zero_timestamp(OBJECT_ID_DEVICE, 1)),
            hal::kAudioHardwareNoError
        );
        assert_eq!(
            to_status(&fx.driver.stop_io(OBJECT_ID_DEVICE, 1)),
            hal::kAudioHardwareIllegalOperationError
        );
        assert_eq!(
            to_status(&fx.driver.perform_device_configuration_change(OBJECT_ID_DEVICE, 1)),
            hal::kAudioDeviceUnsupportedFormatError
        );
        assert_eq!(
            to_status(&fx.driver.start_io(99, 1)),
            hal::kAudioHardwareBadObjectError
        );
    }

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let config = DriverConfig {
            ring_buffer_frames: 1000,
            ..DriverConfig::default()
        };
        let host = std::sync::Arc::new(RecordingHost::new());
        let clock = std::sync::Arc::new(ManualClock::new(0));
        assert!(AudioDriver::new(config, host, clock).is_err());
    }
}
