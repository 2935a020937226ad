// Driver context
//
// The single owner of all driver state. Every host entry point receives it by
// reference. Two locks: `state` (primary) guards device, control and box state
// together with the IO refcount and ring; `timestamps` (secondary) guards only
// the zero-timestamp anchor. When both are needed, take `state` first.

use std::sync::Arc;

use colored::*;
use parking_lot::{Mutex, MutexGuard};
use tracing::info;

use super::engine::ZeroTimestampState;
use super::host::{DriverHost, STORAGE_KEY_BOX_ACQUIRED, STORAGE_KEY_BOX_NAME};
use super::notifications::NotificationDispatcher;
use super::state::{BoxState, DeviceState};
use super::timing::{HostClock, TimeBase};
use super::types::{Direction, ObjectId, OBJECT_ID_DEVICE, OBJECT_ID_DEVICE2};
use crate::config::{DeviceConfig, DriverConfig};

/// Which of the two statically published devices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceSlot {
    Primary,
    Secondary,
}

impl DeviceSlot {
    pub fn object_id(self) -> ObjectId {
        match self {
            DeviceSlot::Primary => OBJECT_ID_DEVICE,
            DeviceSlot::Secondary => OBJECT_ID_DEVICE2,
        }
    }
}

pub struct DriverContext {
    pub config: DriverConfig,
    pub time_base: TimeBase,
    clock: Arc<dyn HostClock>,
    state: Mutex<DeviceState>,
    timestamps: Mutex<ZeroTimestampState>,
    notifier: NotificationDispatcher,
}

impl DriverContext {
    pub fn new(
        config: DriverConfig,
        clock: Arc<dyn HostClock>,
        notifier: NotificationDispatcher,
    ) -> Self {
        let box_state = load_box_state(&config, notifier.host().as_ref());
        let time_base = TimeBase::from_clock(clock.as_ref());
        let host_ticks_per_frame = time_base.host_ticks_per_frame(config.default_sample_rate);

        info!(
            "🎛️ {}: {} Hz, {} ch, ring {} frames, {:.3} host ticks/frame",
            "DRIVER_INIT".bright_cyan(),
            config.default_sample_rate,
            config.channels,
            config.ring_buffer_frames,
            host_ticks_per_frame
        );

        Self {
            state: Mutex::new(DeviceState::new(config.default_sample_rate, box_state)),
            timestamps: Mutex::new(ZeroTimestampState::new(host_ticks_per_frame)),
            config,
            time_base,
            clock,
            notifier,
        }
    }

    /// Primary lock
    pub fn state(&self) -> MutexGuard<'_, DeviceState> {
        self.state.lock()
    }

    /// Secondary lock; take after `state()` when both are held
    pub fn timestamps(&self) -> MutexGuard<'_, ZeroTimestampState> {
        self.timestamps.lock()
    }

    pub fn clock(&self) -> &dyn HostClock {
        self.clock.as_ref()
    }

    pub fn notifier(&self) -> &NotificationDispatcher {
        &self.notifier
    }

    pub fn host(&self) -> &dyn DriverHost {
        self.notifier.host().as_ref()
    }

    pub fn device_config(&self, slot: DeviceSlot) -> Option<&DeviceConfig> {
        match slot {
            DeviceSlot::Primary => Some(&self.config.device),
            DeviceSlot::Secondary => self.config.secondary_device.as_ref(),
        }
    }

    pub fn device_slot(&self, id: ObjectId) -> Option<DeviceSlot> {
        let slot = match id {
            OBJECT_ID_DEVICE => DeviceSlot::Primary,
            OBJECT_ID_DEVICE2 => DeviceSlot::Secondary,
            _ => return None,
        };
        self.device_config(slot).map(|_| slot)
    }

    /// Every configured device, primary first
    pub fn device_ids(&self) -> Vec<ObjectId> {
        [DeviceSlot::Primary, DeviceSlot::Secondary]
            .into_iter()
            .filter(|slot| self.device_config(*slot).is_some())
            .map(DeviceSlot::object_id)
            .collect()
    }

    /// Whether any configured device publishes a stream in this direction
    pub fn any_device_has(&self, input: bool) -> bool {
        [DeviceSlot::Primary, DeviceSlot::Secondary]
            .into_iter()
            .filter_map(|slot| self.device_config(slot))
            .any(|d| if input { d.has_input } else { d.has_output })
    }

    /// The first configured device publishing this direction; streams and
    /// controls of that direction report it as their owner
    pub fn direction_owner(&self, direction: Direction) -> ObjectId {
        [DeviceSlot::Primary, DeviceSlot::Secondary]
            .into_iter()
            .find(|&slot| {
                self.device_config(slot).is_some_and(|d| match direction {
                    Direction::Input => d.has_input,
                    Direction::Output => d.has_output,
                })
            })
            .map_or(OBJECT_ID_DEVICE, DeviceSlot::object_id)
    }
}

fn load_box_state(config: &DriverConfig, host: &dyn DriverHost) -> BoxState {
    let acquired = host
        .copy_from_storage(STORAGE_KEY_BOX_ACQUIRED)
        .and_then(|v| v.as_bool())
        .unwrap_or(config.default_box_acquired);

    let name = host
        .copy_from_storage(STORAGE_KEY_BOX_NAME)
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_else(|| config.box_name.clone());

    info!(
        "📦 {}: box '{}' acquired={}",
        "STORAGE_LOAD".bright_cyan(),
        name,
        acquired
    );
    BoxState { acquired, name }
}
