// Real-time IO engine
//
// IO lifecycle refcounting plus the per-cycle capture and render paths. The
// ring buffer exists only while at least one client has IO running. It is
// allocated by the caller before the state lock is taken and handed back on
// the last Stop so it can be freed after the lock is released; nothing in
// here allocates or frees while locked.

pub mod ring_buffer;
pub mod zero_timestamp;

pub use ring_buffer::{CaptureOutcome, RingBuffer, RingSpans};
pub use zero_timestamp::{ZeroTimestampState, ZERO_TIMESTAMP_SEED};

use crate::audio::controls::ControlState;
use crate::audio::error::{DriverError, Result};
use crate::audio::types::IoCycleInfo;

/// Result of a Start request against the refcount
#[derive(Debug, PartialEq)]
pub enum StartOutcome {
    /// Stopped to Running(1); the prepared ring was installed
    Started,
    /// Running(n) to Running(n + 1)
    Joined { clients: u64 },
    /// IO is stopped but no ring was supplied. Allocate one and retry.
    NeedsRing,
}

/// Result of a Stop request against the refcount
#[derive(Debug)]
pub enum StopOutcome {
    /// Running(1) to Stopped; the caller owns and frees the ring
    Stopped { ring: RingBuffer, late_cycles: u64 },
    /// Running(n) to Running(n - 1)
    Left { clients: u64 },
}

#[derive(Debug, Default)]
pub struct IoState {
    running_clients: u64,
    ring: Option<RingBuffer>,
    late_cycles: u64,
}

impl IoState {
    pub fn running_clients(&self) -> u64 {
        self.running_clients
    }

    pub fn is_running(&self) -> bool {
        self.running_clients > 0
    }

    pub fn ring(&self) -> Option<&RingBuffer> {
        self.ring.as_ref()
    }

    pub fn start(
        &mut self,
        max_clients: u64,
        prepared: &mut Option<RingBuffer>,
    ) -> Result<StartOutcome> {
        if self.running_clients >= max_clients {
            return Err(DriverError::illegal(format!(
                "IO already started by the maximum of {} clients",
                max_clients
            )));
        }

        if self.running_clients == 0 {
            let Some(ring) = prepared.take() else {
                return Ok(StartOutcome::NeedsRing);
            };
            self.ring = Some(ring);
            self.running_clients = 1;
            self.late_cycles = 0;
            return Ok(StartOutcome::Started);
        }

        self.running_clients += 1;
        Ok(StartOutcome::Joined {
            clients: self.running_clients,
        })
    }

    pub fn stop(&mut self) -> Result<StopOutcome> {
        match self.running_clients {
            0 => Err(DriverError::illegal("IO stop requested while stopped")),
            1 => {
                self.running_clients = 0;
                let ring = self
                    .ring
                    .take()
                    .ok_or_else(|| DriverError::illegal("IO running without a ring buffer"))?;
                Ok(StopOutcome::Stopped {
                    ring,
                    late_cycles: std::mem::take(&mut self.late_cycles),
                })
            }
            n => {
                self.running_clients = n - 1;
                Ok(StopOutcome::Left {
                    clients: self.running_clients,
                })
            }
        }
    }

    fn ring_for_cycle(&mut self, frame_count: usize, buffer_len: usize) -> Result<&mut RingBuffer> {
        let ring = self
            .ring
            .as_mut()
            .ok_or_else(|| DriverError::illegal("IO cycle while IO is stopped"))?;

        if frame_count > ring.capacity_frames() {
            return Err(DriverError::illegal(format!(
                "cycle of {} frames exceeds ring capacity of {}",
                frame_count,
                ring.capacity_frames()
            )));
        }
        if buffer_len < frame_count * ring.channels() {
            return Err(DriverError::illegal(format!(
                "buffer holds {} samples, cycle needs {}",
                buffer_len,
                frame_count * ring.channels()
            )));
        }
        Ok(ring)
    }

    /// Capture cycle: fill `buffer` from the ring at the cycle's input time
    pub fn read_input(
        &mut self,
        cycle: &IoCycleInfo,
        frame_count: usize,
        buffer: &mut [f32],
        controls: &ControlState,
        apply_volume: bool,
    ) -> Result<CaptureOutcome> {
        let gain = apply_volume.then(|| controls.volume());
        let ring = self.ring_for_cycle(frame_count, buffer.len())?;
        Ok(ring.capture(
            cycle.input_time.sample_time,
            frame_count,
            buffer,
            controls.is_muted(),
            gain,
        ))
    }

    /// Render cycle: copy `buffer` into the ring at the cycle's output time.
    /// A cycle whose deadline has already passed is rejected unwritten.
    pub fn write_mix(
        &mut self,
        cycle: &IoCycleInfo,
        frame_count: usize,
        buffer: &[f32],
        latency_frames: u32,
    ) -> Result<()> {
        let deadline =
            cycle.output_time.sample_time + frame_count as f64 + f64::from(latency_frames);
        let late = cycle.current_time.sample_time > deadline;

        let ring = self.ring_for_cycle(frame_count, buffer.len())?;
        if late {
            self.late_cycles += 1;
            return Err(DriverError::illegal("render cycle arrived after its deadline"));
        }
        ring.render(cycle.output_time.sample_time, frame_count, buffer);
        Ok(())
    }
}
