// Loopback ring buffer
//
// Fixed-capacity circular store of interleaved f32 frames. Render cycles write
// into it at `output_time mod capacity`, capture cycles read back from
// `input_time mod capacity`. Every copy is split into at most two contiguous
// spans so a cycle that straddles the end of the buffer wraps to the start.
//
// Nothing in here allocates after construction.

/// Where a cycle lands in the ring: `tail_frames` from `offset` up to the end
/// of the buffer, then `head_frames` from the start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingSpans {
    pub offset: usize,
    pub tail_frames: usize,
    pub head_frames: usize,
}

/// What a capture cycle produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    Audio,
    Silence,
}

#[derive(Debug)]
pub struct RingBuffer {
    samples: Box<[f32]>,
    frames: usize,
    channels: usize,
    /// End sample time of the most recent render, None until the first one
    last_output_end: Option<f64>,
    is_clear: bool,
}

impl RingBuffer {
    /// Zero-filled ring of `frames` frames of `channels` interleaved samples
    pub fn new(frames: usize, channels: usize) -> Self {
        Self {
            samples: vec![0.0; frames * channels].into_boxed_slice(),
            frames,
            channels,
            last_output_end: None,
            is_clear: true,
        }
    }

    pub fn capacity_frames(&self) -> usize {
        self.frames
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn is_clear(&self) -> bool {
        self.is_clear
    }

    pub fn last_output_end(&self) -> Option<f64> {
        self.last_output_end
    }

    pub fn spans(&self, sample_time: f64, frame_count: usize) -> RingSpans {
        let position = sample_time.max(0.0) as u64;
        let offset = (position % self.frames as u64) as usize;
        let tail_frames = (self.frames - offset).min(frame_count);
        RingSpans {
            offset,
            tail_frames,
            head_frames: frame_count - tail_frames,
        }
    }

    /// Copy one render cycle into the ring.
    ///
    /// `source` must hold at least `frame_count * channels` samples and
    /// `frame_count` must not exceed the ring capacity.
    pub fn render(&mut self, output_time: f64, frame_count: usize, source: &[f32]) {
        let spans = self.spans(output_time, frame_count);
        let ch = self.channels;
        let tail = spans.tail_frames * ch;
        let head = spans.head_frames * ch;
        let start = spans.offset * ch;

        self.samples[start..start + tail].copy_from_slice(&source[..tail]);
        self.samples[..head].copy_from_slice(&source[tail..tail + head]);

        self.last_output_end = Some(output_time + frame_count as f64);
        self.is_clear = false;
    }

    /// Whether the writer has already covered the cycle starting at `input_time`
    fn has_audio_for(&self, input_time: f64, frame_count: usize) -> bool {
        match self.last_output_end {
            Some(end) => end - frame_count as f64 >= input_time,
            None => false,
        }
    }

    /// Fill `dest` with one capture cycle.
    ///
    /// Emits silence when muted or when the writer has not reached the requested
    /// region yet. The first silent cycle after real audio wipes the ring so a
    /// later unmuted capture cannot replay stale samples. `gain` is applied as
    /// a per-sample multiply when present.
    pub fn capture(
        &mut self,
        input_time: f64,
        frame_count: usize,
        dest: &mut [f32],
        muted: bool,
        gain: Option<f32>,
    ) -> CaptureOutcome {
        let ch = self.channels;
        let total = frame_count * ch;

        if muted || !self.has_audio_for(input_time, frame_count) {
            dest[..total].fill(0.0);
            if !self.is_clear {
                self.samples.fill(0.0);
                self.is_clear = true;
            }
            return CaptureOutcome::Silence;
        }

        let spans = self.spans(input_time, frame_count);
        let tail = spans.tail_frames * ch;
        let head = spans.head_frames * ch;
        let start = spans.offset * ch;

        dest[..tail].copy_from_slice(&self.samples[start..start + tail]);
        dest[tail..tail + head].copy_from_slice(&self.samples[..head]);

        if let Some(gain) = gain {
            for sample in &mut dest[..total] {
                *sample *= gain;
            }
        }
        CaptureOutcome::Audio
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ramp(frames: usize, channels: usize) -> Vec<f32> {
        (0..frames * channels).map(|i| i as f32 + 1.0).collect()
    }

    #[test]
    fn test_spans_without_wrap() {
        let ring = RingBuffer::new(16, 2);
        let spans = ring.spans(4.0, 8);
        assert_eq!(
            spans,
            RingSpans {
                offset: 4,
                tail_frames: 8,
                head_frames: 0
            }
        );
    }

    #[test]
    fn test_spans_wrap_at_end() {
        let ring = RingBuffer::new(16, 2);
        // k = 3 frames left before the end, 8 requested
        let spans = ring.spans(16.0 * 5.0 + 13.0, 8);
        assert_eq!(spans.offset, 13);
        assert_eq!(spans.tail_frames, 3);
        assert_eq!(spans.head_frames, 5);
    }

    #[test]
    fn test_capture_before_any_render_is_silent() {
        let mut ring = RingBuffer::new(16, 2);
        let mut dest = vec![7.0f32; 8 * 2];
        let outcome = ring.capture(0.0, 8, &mut dest, false, None);
        assert_eq!(outcome, CaptureOutcome::Silence);
        assert!(dest.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_wrapped_render_reads_back_unchanged() {
        let mut ring = RingBuffer::new(16, 2);
        let source = ramp(8, 2);
        ring.render(13.0, 8, &source);

        let mut dest = vec![0.0f32; 8 * 2];
        let outcome = ring.capture(13.0, 8, &mut dest, false, None);
        assert_eq!(outcome, CaptureOutcome::Audio);
        assert_eq!(dest, source);
    }

    #[test]
    fn test_capture_ahead_of_writer_is_silent() {
        let mut ring = RingBuffer::new(16, 2);
        ring.render(0.0, 4, &ramp(4, 2));

        let mut dest = vec![1.0f32; 4 * 2];
        let outcome = ring.capture(4.0, 4, &mut dest, false, None);
        assert_eq!(outcome, CaptureOutcome::Silence);
        assert!(dest.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_mute_clears_ring_once() {
        let mut ring = RingBuffer::new(16, 2);
        ring.render(0.0, 4, &ramp(4, 2));
        assert!(!ring.is_clear());

        let mut dest = vec![0.0f32; 4 * 2];
        assert_eq!(ring.capture(0.0, 4, &mut dest, true, None), CaptureOutcome::Silence);
        assert!(ring.is_clear());

        // Unmuted read of the same region must not replay the old samples
        ring.capture(0.0, 4, &mut dest, false, None);
        assert!(dest.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_gain_applied_per_sample() {
        let mut ring = RingBuffer::new(16, 1);
        ring.render(0.0, 4, &[1.0, -1.0, 0.5, 2.0]);

        let mut dest = vec![0.0f32; 4];
        ring.capture(0.0, 4, &mut dest, false, Some(0.5));
        assert_eq!(dest, vec![0.5, -0.5, 0.25, 1.0]);
    }

    proptest! {
        #[test]
        fn prop_wraparound_round_trip(k in 1usize..32, extra in 1usize..32, periods in 0u64..4) {
            let capacity = 64usize;
            let frame_count = k + extra;
            let start = (periods * capacity as u64 + (capacity - k) as u64) as f64;

            let mut ring = RingBuffer::new(capacity, 2);
            let spans = ring.spans(start, frame_count);
            prop_assert_eq!(spans.tail_frames, k);
            prop_assert_eq!(spans.head_frames, frame_count - k);

            let source = ramp(frame_count, 2);
            ring.render(start, frame_count, &source);
            let mut dest = vec![0.0f32; frame_count * 2];
            prop_assert_eq!(ring.capture(start, frame_count, &mut dest, false, None), CaptureOutcome::Audio);
            prop_assert_eq!(dest, source);
        }
    }
}
