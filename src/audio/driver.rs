// Audio driver facade
//
// One method per host entry point. Property calls go through the object
// directory; IO calls drive the engine under the primary lock, with the
// zero-timestamp anchor behind its own lock. Changed-property lists returned
// by Sets are forwarded to the host here, after every lock is released.

use std::sync::Arc;

use anyhow::Context;
use colored::*;
use tracing::{debug, info, warn};

use super::context::{DeviceSlot, DriverContext};
use super::engine::{RingBuffer, StartOutcome, StopOutcome};
use super::error::{DriverError, Result};
use super::host::DriverHost;
use super::notifications::{BackgroundScheduler, NotificationDispatcher};
use super::objects::{self, AudioObject};
use super::property::{PropertyData, PropertyValue};
use super::timing::{HostClock, MonotonicHostClock};
use super::types::*;
use crate::config::{validate_config, DriverConfig};

pub struct AudioDriver {
    ctx: DriverContext,
}

impl AudioDriver {
    /// Validate `config`, read the persisted box settings and publish the
    /// fixed topology
    pub fn new(
        config: DriverConfig,
        host: Arc<dyn DriverHost>,
        clock: Arc<dyn HostClock>,
    ) -> anyhow::Result<Self> {
        validate_config(&config)?;
        let scheduler =
            BackgroundScheduler::new().context("Failed to start the notification runtime")?;
        let notifier = NotificationDispatcher::new(host, scheduler);
        Ok(Self {
            ctx: DriverContext::new(config, clock, notifier),
        })
    }

    /// Driver on the platform's monotonic clock
    pub fn with_host(config: DriverConfig, host: Arc<dyn DriverHost>) -> anyhow::Result<Self> {
        Self::new(config, host, Arc::new(MonotonicHostClock::new()))
    }

    pub fn context(&self) -> &DriverContext {
        &self.ctx
    }

    fn device(&self, device_id: ObjectId) -> Result<DeviceSlot> {
        self.ctx
            .device_slot(device_id)
            .ok_or(DriverError::BadObject { id: device_id })
    }

    // Property protocol

    pub fn has_property(&self, object_id: ObjectId, address: &PropertyAddress) -> bool {
        objects::has_property(&self.ctx, object_id, address)
    }

    pub fn is_property_settable(
        &self,
        object_id: ObjectId,
        address: &PropertyAddress,
    ) -> Result<bool> {
        objects::is_property_settable(&self.ctx, object_id, address)
    }

    pub fn get_property_data_size(
        &self,
        object_id: ObjectId,
        address: &PropertyAddress,
        qualifier: Option<&PropertyValue>,
    ) -> Result<usize> {
        objects::property_data_size(&self.ctx, object_id, address, qualifier)
    }

    /// The payload's `byte_size()` is the number of bytes written
    pub fn get_property_data(
        &self,
        object_id: ObjectId,
        address: &PropertyAddress,
        qualifier: Option<&PropertyValue>,
        capacity: usize,
    ) -> Result<PropertyData> {
        let data = objects::property_data(&self.ctx, object_id, address, qualifier, capacity)?;
        crate::io_debug!(
            "get {} '{}' -> {:?}",
            object_id,
            super::hal::fourcc_to_string(address.selector),
            data
        );
        Ok(data)
    }

    /// Apply a Set and notify the host of whatever changed
    pub fn set_property_data(
        &self,
        object_id: ObjectId,
        address: &PropertyAddress,
        qualifier: Option<&PropertyValue>,
        value: &PropertyValue,
    ) -> Result<ChangedProperties> {
        let changes = objects::set_property_data(&self.ctx, object_id, address, qualifier, value)?;
        self.ctx.notifier().dispatch(object_id, &changes);
        Ok(changes)
    }

    // Device lifecycle

    pub fn create_device(&self) -> Result<ObjectId> {
        Err(DriverError::UnsupportedOperation {
            operation: "create device",
        })
    }

    pub fn destroy_device(&self, _device_id: ObjectId) -> Result<()> {
        Err(DriverError::UnsupportedOperation {
            operation: "destroy device",
        })
    }

    pub fn add_device_client(&self, device_id: ObjectId, _client_id: u32) -> Result<()> {
        self.device(device_id).map(|_| ())
    }

    pub fn remove_device_client(&self, device_id: ObjectId, _client_id: u32) -> Result<()> {
        self.device(device_id).map(|_| ())
    }

    /// Host commit of a rate change requested earlier. `change_action` is the
    /// new rate in Hz.
    pub fn perform_device_configuration_change(
        &self,
        device_id: ObjectId,
        change_action: u64,
    ) -> Result<()> {
        self.device(device_id)?;
        let rate = change_action as f64;
        if !self.ctx.config.supports_rate(rate) {
            return Err(DriverError::UnsupportedFormat {
                reason: format!("{} Hz is not a supported sample rate", change_action),
            });
        }

        let host_ticks_per_frame = self.ctx.time_base.host_ticks_per_frame(rate);
        {
            let mut state = self.ctx.state();
            state.sample_rate = rate;
            self.ctx
                .timestamps()
                .set_host_ticks_per_frame(host_ticks_per_frame);
        }

        info!(
            "🔁 {}: device {} now at {} Hz ({:.3} host ticks/frame)",
            "RATE_COMMIT".on_green().black(),
            device_id,
            rate,
            host_ticks_per_frame
        );
        Ok(())
    }

    /// Nothing was mutated when the change was requested, so there is nothing
    /// to undo
    pub fn abort_device_configuration_change(
        &self,
        device_id: ObjectId,
        change_action: u64,
    ) -> Result<()> {
        self.device(device_id)?;
        info!(
            "↩️ {}: host dropped the request for {} Hz on device {}",
            "RATE_ABORT".on_yellow().black(),
            change_action,
            device_id
        );
        Ok(())
    }

    // IO

    pub fn start_io(&self, device_id: ObjectId, client_id: u32) -> Result<()> {
        self.device(device_id)?;
        let config = &self.ctx.config;
        let mut prepared: Option<RingBuffer> = None;

        loop {
            // Allocate outside the lock; only the first client needs a ring
            if prepared.is_none() && !self.ctx.state().io.is_running() {
                prepared = Some(RingBuffer::new(
                    config.ring_buffer_frames as usize,
                    config.channels as usize,
                ));
            }

            let mut state = self.ctx.state();
            match state.io.start(config.max_io_clients, &mut prepared)? {
                StartOutcome::NeedsRing => continue,
                StartOutcome::Started => {
                    let now = self.ctx.clock().now();
                    self.ctx.timestamps().reset(now);
                    drop(state);
                    info!(
                        "▶️ {}: device {} client {} started IO, anchor at host time {}",
                        "IO_START".on_green().white(),
                        device_id,
                        client_id,
                        now
                    );
                    break;
                }
                StartOutcome::Joined { clients } => {
                    drop(state);
                    debug!(
                        "{}: client {} joined, {} clients running",
                        "IO_START".green(),
                        client_id,
                        clients
                    );
                    break;
                }
            }
        }
        Ok(())
    }

    pub fn stop_io(&self, device_id: ObjectId, client_id: u32) -> Result<()> {
        self.device(device_id)?;
        let outcome = self.ctx.state().io.stop()?;

        match outcome {
            StopOutcome::Stopped { ring, late_cycles } => {
                drop(ring);
                if late_cycles > 0 {
                    warn!(
                        "⚠️ {}: {} render cycle(s) arrived too late and were dropped",
                        "LATE_RENDER".on_red().white(),
                        late_cycles
                    );
                }
                info!(
                    "⏹️ {}: device {} client {} stopped IO, ring released",
                    "IO_STOP".on_red().white(),
                    device_id,
                    client_id
                );
            }
            StopOutcome::Left { clients } => {
                debug!(
                    "{}: client {} left, {} clients running",
                    "IO_STOP".red(),
                    client_id,
                    clients
                );
            }
        }
        Ok(())
    }

    pub fn get_zero_timestamp(&self, device_id: ObjectId, _client_id: u32) -> Result<ZeroTimestamp> {
        self.device(device_id)?;
        let now = self.ctx.clock().now();
        let period = self.ctx.config.zero_timestamp_period;
        Ok(self.ctx.timestamps().query(now, period))
    }

    pub fn will_do_io_operation(
        &self,
        device_id: ObjectId,
        _client_id: u32,
        operation_id: u32,
    ) -> Result<IoOperationSupport> {
        self.device(device_id)?;
        let will_do = matches!(
            IoOperation::from_code(operation_id),
            Some(IoOperation::ReadInput) | Some(IoOperation::WriteMix)
        );
        Ok(IoOperationSupport {
            will_do,
            in_place: true,
        })
    }

    pub fn begin_io_operation(
        &self,
        device_id: ObjectId,
        _client_id: u32,
        _operation_id: u32,
        _frame_count: u32,
        _cycle: &IoCycleInfo,
    ) -> Result<()> {
        self.device(device_id).map(|_| ())
    }

    pub fn end_io_operation(
        &self,
        device_id: ObjectId,
        _client_id: u32,
        _operation_id: u32,
        _frame_count: u32,
        _cycle: &IoCycleInfo,
    ) -> Result<()> {
        self.device(device_id).map(|_| ())
    }

    /// One capture (ReadInput) or render (WriteMix) cycle on `buffer`, which
    /// holds `frame_count` interleaved frames. Other operations are accepted
    /// and ignored. Nothing here allocates or logs.
    #[allow(clippy::too_many_arguments)]
    pub fn do_io_operation(
        &self,
        device_id: ObjectId,
        stream_id: ObjectId,
        _client_id: u32,
        operation_id: u32,
        frame_count: u32,
        cycle: &IoCycleInfo,
        buffer: &mut [f32],
    ) -> Result<()> {
        self.device(device_id)?;
        let direction = match AudioObject::resolve(&self.ctx, stream_id)? {
            AudioObject::Stream(stream) => stream.direction(),
            _ => return Err(DriverError::BadObject { id: stream_id }),
        };
        let frames = frame_count as usize;

        match (IoOperation::from_code(operation_id), direction) {
            (Some(IoOperation::ReadInput), Direction::Input) => {
                let apply_volume = self.ctx.config.volume_control_enabled;
                let mut guard = self.ctx.state();
                let state = &mut *guard;
                state
                    .io
                    .read_input(cycle, frames, buffer, &state.controls, apply_volume)?;
                Ok(())
            }
            (Some(IoOperation::WriteMix), Direction::Output) => {
                let latency = self.ctx.config.latency_frames;
                self.ctx
                    .state()
                    .io
                    .write_mix(cycle, frames, buffer, latency)
            }
            (Some(IoOperation::ReadInput), _) | (Some(IoOperation::WriteMix), _) => {
                Err(DriverError::illegal(format!(
                    "operation '{}' does not apply to stream {}",
                    super::hal::fourcc_to_string(operation_id),
                    stream_id
                )))
            }
            _ => Ok(()),
        }
    }
}
