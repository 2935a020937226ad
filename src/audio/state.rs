// Device configuration state
//
// Everything guarded by the primary lock: the shared nominal sample rate,
// stream activity, IO refcount and ring, master controls and the box. The
// zero-timestamp anchor lives behind its own lock in the driver context.

use super::controls::ControlState;
use super::engine::IoState;
use super::types::Direction;

#[derive(Debug, Clone, PartialEq)]
pub struct BoxState {
    pub acquired: bool,
    pub name: String,
}

#[derive(Debug)]
pub struct DeviceState {
    pub sample_rate: f64,
    pub io: IoState,
    pub input_stream_active: bool,
    pub output_stream_active: bool,
    pub controls: ControlState,
    pub box_state: BoxState,
}

impl DeviceState {
    pub fn new(sample_rate: f64, box_state: BoxState) -> Self {
        Self {
            sample_rate,
            io: IoState::default(),
            input_stream_active: true,
            output_stream_active: true,
            controls: ControlState::default(),
            box_state,
        }
    }

    pub fn stream_active(&self, direction: Direction) -> bool {
        match direction {
            Direction::Input => self.input_stream_active,
            Direction::Output => self.output_stream_active,
        }
    }

    /// Returns true when the flag changed
    pub fn set_stream_active(&mut self, direction: Direction, active: bool) -> bool {
        let flag = match direction {
            Direction::Input => &mut self.input_stream_active,
            Direction::Output => &mut self.output_stream_active,
        };
        if *flag == active {
            return false;
        }
        *flag = active;
        true
    }
}
