// Shared fixtures for the integration tests: a host that records every
// callback and a host clock the test advances by hand.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crossbeam::channel::{unbounded, Receiver, Sender};
use vac_driver_lib::audio::{hal, IoCycleInfo, IoTimeStamp, ObjectId, PropertyAddress};
use vac_driver_lib::{AudioDriver, DriverConfig, DriverHost, HostClock, StoredValue};

/// Clock frequency chosen so that one host tick is one frame at 44.1 kHz
pub const TICKS_PER_SECOND: f64 = 44100.0;

#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    PropertiesChanged {
        object_id: ObjectId,
        addresses: Vec<PropertyAddress>,
    },
    ConfigurationChange {
        device_id: ObjectId,
        change_action: u64,
    },
    StorageWrite {
        key: String,
        value: StoredValue,
    },
}

pub struct RecordingHost {
    tx: Sender<HostEvent>,
    rx: Receiver<HostEvent>,
    storage: Mutex<HashMap<String, StoredValue>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::with_storage(Vec::new())
    }

    pub fn with_storage(entries: Vec<(&str, StoredValue)>) -> Self {
        let (tx, rx) = unbounded();
        Self {
            tx,
            rx,
            storage: Mutex::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v))
                    .collect(),
            ),
        }
    }

    /// Everything recorded so far
    pub fn drain(&self) -> Vec<HostEvent> {
        self.rx.try_iter().collect()
    }

    /// Block until an event matching `pred` arrives, discarding others
    pub fn wait_for(
        &self,
        timeout: Duration,
        pred: impl Fn(&HostEvent) -> bool,
    ) -> Option<HostEvent> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.checked_duration_since(Instant::now())?;
            match self.rx.recv_timeout(remaining) {
                Ok(event) if pred(&event) => return Some(event),
                Ok(_) => continue,
                Err(_) => return None,
            }
        }
    }

    pub fn stored(&self, key: &str) -> Option<StoredValue> {
        self.storage.lock().unwrap().get(key).cloned()
    }
}

impl DriverHost for RecordingHost {
    fn properties_changed(&self, object_id: ObjectId, addresses: &[PropertyAddress]) {
        let _ = self.tx.send(HostEvent::PropertiesChanged {
            object_id,
            addresses: addresses.to_vec(),
        });
    }

    fn request_device_configuration_change(&self, device_id: ObjectId, change_action: u64) {
        let _ = self.tx.send(HostEvent::ConfigurationChange {
            device_id,
            change_action,
        });
    }

    fn copy_from_storage(&self, key: &str) -> Option<StoredValue> {
        self.stored(key)
    }

    fn write_to_storage(&self, key: &str, value: StoredValue) {
        self.storage
            .lock()
            .unwrap()
            .insert(key.to_string(), value.clone());
        let _ = self.tx.send(HostEvent::StorageWrite {
            key: key.to_string(),
            value,
        });
    }
}

pub struct ManualClock {
    now: AtomicU64,
    ticks_per_second: f64,
}

impl ManualClock {
    pub fn new(start: u64) -> Self {
        Self {
            now: AtomicU64::new(start),
            ticks_per_second: TICKS_PER_SECOND,
        }
    }

    pub fn set(&self, now: u64) {
        self.now.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, ticks: u64) {
        self.now.fetch_add(ticks, Ordering::SeqCst);
    }
}

impl HostClock for ManualClock {
    fn now(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }

    fn ticks_per_second(&self) -> f64 {
        self.ticks_per_second
    }
}

pub struct Fixture {
    pub driver: AudioDriver,
    pub host: Arc<RecordingHost>,
    pub clock: Arc<ManualClock>,
}

pub fn fixture_with(config: DriverConfig, host: RecordingHost) -> Fixture {
    let host = Arc::new(host);
    let clock = Arc::new(ManualClock::new(1_000));
    let driver = AudioDriver::new(config, host.clone(), clock.clone()).expect("driver");
    Fixture {
        driver,
        host,
        clock,
    }
}

pub fn fixture() -> Fixture {
    fixture_with(DriverConfig::default(), RecordingHost::new())
}

/// Small ring so wraparound is cheap to exercise
pub fn small_ring_config(frames: u32) -> DriverConfig {
    DriverConfig {
        ring_buffer_frames: frames,
        zero_timestamp_period: frames,
        ..DriverConfig::default()
    }
}

pub fn global(selector: u32) -> PropertyAddress {
    PropertyAddress::global(selector)
}

pub fn scoped(selector: u32, scope: u32) -> PropertyAddress {
    PropertyAddress::new(selector, scope)
}

pub fn input_scope() -> u32 {
    hal::kAudioObjectPropertyScopeInput
}

pub fn output_scope() -> u32 {
    hal::kAudioObjectPropertyScopeOutput
}

pub fn cycle(current: f64, input: f64, output: f64) -> IoCycleInfo {
    IoCycleInfo {
        current_time: IoTimeStamp::at_sample(current),
        input_time: IoTimeStamp::at_sample(input),
        output_time: IoTimeStamp::at_sample(output),
    }
}

pub const WAIT: Duration = Duration::from_secs(3);
