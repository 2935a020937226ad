// Zero timestamp anchor
//
// The device clock is derived lazily from the host clock. IO start records an
// anchor host time; every query works out how many whole periods have elapsed
// since then by comparing "now" against the next period boundary. No timer
// thread is involved. The anchor sample time is always zero.

use crate::audio::types::ZeroTimestamp;

/// Opaque seed returned with every zero timestamp. The timeline never jumps,
/// so it never changes.
pub const ZERO_TIMESTAMP_SEED: u64 = 1;

#[derive(Debug, Clone, PartialEq)]
pub struct ZeroTimestampState {
    anchor_host_time: u64,
    period_counter: u64,
    host_ticks_per_frame: f64,
}

impl ZeroTimestampState {
    pub fn new(host_ticks_per_frame: f64) -> Self {
        Self {
            anchor_host_time: 0,
            period_counter: 0,
            host_ticks_per_frame,
        }
    }

    /// Re-anchor at `now`; called on the Stopped to Running transition
    pub fn reset(&mut self, now: u64) {
        self.anchor_host_time = now;
        self.period_counter = 0;
    }

    pub fn anchor_host_time(&self) -> u64 {
        self.anchor_host_time
    }

    pub fn anchor_sample_time(&self) -> f64 {
        0.0
    }

    pub fn period_counter(&self) -> u64 {
        self.period_counter
    }

    pub fn host_ticks_per_frame(&self) -> f64 {
        self.host_ticks_per_frame
    }

    pub fn set_host_ticks_per_frame(&mut self, host_ticks_per_frame: f64) {
        self.host_ticks_per_frame = host_ticks_per_frame;
    }

    /// Advance past at most one elapsed period boundary and report the
    /// timestamp of the current period start.
    pub fn query(&mut self, now: u64, period_frames: u32) -> ZeroTimestamp {
        let ticks_per_period = self.host_ticks_per_frame * f64::from(period_frames);
        let next_boundary =
            self.anchor_host_time as f64 + (self.period_counter + 1) as f64 * ticks_per_period;

        if next_boundary <= now as f64 {
            self.period_counter += 1;
        }

        ZeroTimestamp {
            sample_time: (self.period_counter * u64::from(period_frames)) as f64,
            host_time: self.anchor_host_time
                + (self.period_counter as f64 * ticks_per_period) as u64,
            seed: ZERO_TIMESTAMP_SEED,
        }
    }
}
