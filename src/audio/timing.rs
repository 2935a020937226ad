// Host clock and time-base mapping
//
// The host expresses time in ticks of its monotonic clock; the engine works in
// frames. This module converts between the two for a given sample rate. It
// holds no shared state besides the clock frequency.

use std::time::Instant;

/// Monotonic host clock the zero-timestamp anchor is measured against
pub trait HostClock: Send + Sync {
    /// Current reading in host ticks
    fn now(&self) -> u64;

    /// Host ticks per second
    fn ticks_per_second(&self) -> f64;
}

/// The platform's monotonic clock.
///
/// On macOS this is `mach_absolute_time` scaled by `mach_timebase_info`, which
/// is what the audio server stamps its cycles with. Elsewhere it counts
/// nanoseconds since the clock was created.
#[derive(Debug)]
pub struct MonotonicHostClock {
    #[cfg_attr(target_os = "macos", allow(dead_code))]
    origin: Instant,
    ticks_per_second: f64,
}

impl MonotonicHostClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            ticks_per_second: platform_ticks_per_second(),
        }
    }
}

impl Default for MonotonicHostClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_os = "macos")]
#[allow(deprecated)]
fn platform_ticks_per_second() -> f64 {
    let mut info = libc::mach_timebase_info { numer: 0, denom: 0 };
    // SAFETY: mach_timebase_info only writes into the struct we hand it.
    let status = unsafe { libc::mach_timebase_info(&mut info) };
    if status != 0 || info.numer == 0 {
        return 1_000_000_000.0;
    }
    (info.denom as f64 / info.numer as f64) * 1_000_000_000.0
}

#[cfg(not(target_os = "macos"))]
fn platform_ticks_per_second() -> f64 {
    1_000_000_000.0
}

impl HostClock for MonotonicHostClock {
    #[cfg(target_os = "macos")]
    #[allow(deprecated)]
    fn now(&self) -> u64 {
        // SAFETY: mach_absolute_time has no preconditions.
        unsafe { libc::mach_absolute_time() }
    }

    #[cfg(not(target_os = "macos"))]
    fn now(&self) -> u64 {
        self.origin.elapsed().as_nanos() as u64
    }

    fn ticks_per_second(&self) -> f64 {
        self.ticks_per_second
    }
}

/// Converts between host ticks and frames
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeBase {
    ticks_per_second: f64,
}

impl TimeBase {
    pub fn new(ticks_per_second: f64) -> Self {
        Self { ticks_per_second }
    }

    pub fn from_clock(clock: &dyn HostClock) -> Self {
        Self::new(clock.ticks_per_second())
    }

    pub fn ticks_per_second(&self) -> f64 {
        self.ticks_per_second
    }

    /// Host ticks spanned by a single frame at `sample_rate`
    pub fn host_ticks_per_frame(&self, sample_rate: f64) -> f64 {
        self.ticks_per_second / sample_rate
    }

    pub fn frames_to_ticks(&self, frames: f64, sample_rate: f64) -> f64 {
        frames * self.host_ticks_per_frame(sample_rate)
    }

    pub fn ticks_to_frames(&self, ticks: f64, sample_rate: f64) -> f64 {
        ticks / self.host_ticks_per_frame(sample_rate)
    }
}
