//! Rolling per-frame playback metrics.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::core::constants::METRICS_WINDOW;

/// Tracks frame performance over the last `METRICS_WINDOW` frames.
#[derive(Debug)]
pub struct FrameMetrics {
    frame_times: VecDeque<Duration>,
    ticks_per_frame: VecDeque<u32>,
    frame_start: Instant,
    pub frames: u64,
    pub chart_samples: u64,
    pub presentation_failures: u64,
}

impl Default for FrameMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameMetrics {
    pub fn new() -> Self {
        Self {
            frame_times: VecDeque::with_capacity(METRICS_WINDOW),
            ticks_per_frame: VecDeque::with_capacity(METRICS_WINDOW),
            frame_start: Instant::now(),
            frames: 0,
            chart_samples: 0,
            presentation_failures: 0,
        }
    }

    /// Call at the start of each frame.
    pub fn begin_frame(&mut self) {
        self.frame_start = Instant::now();
    }

    /// Call at the end of each frame with the ticks it stepped.
    pub fn end_frame(&mut self, ticks: u32) {
        self.frames += 1;
        self.frame_times.push_back(self.frame_start.elapsed());
        self.ticks_per_frame.push_back(ticks);
        if self.frame_times.len() > METRICS_WINDOW {
            self.frame_times.pop_front();
            self.ticks_per_frame.pop_front();
        }
    }

    pub fn record_chart_sample(&mut self) {
        self.chart_samples += 1;
    }

    pub fn record_presentation_failure(&mut self) {
        self.presentation_failures += 1;
    }

    /// Average frame time in milliseconds over the window.
    pub fn avg_frame_time_ms(&self) -> f32 {
        if self.frame_times.is_empty() {
            return 0.0;
        }
        let sum: Duration = self.frame_times.iter().sum();
        sum.as_secs_f32() * 1000.0 / self.frame_times.len() as f32
    }

    pub fn max_frame_time_ms(&self) -> f32 {
        self.frame_times
            .iter()
            .max()
            .map(|d| d.as_secs_f32() * 1000.0)
            .unwrap_or(0.0)
    }

    /// Average ticks stepped per frame over the window.
    pub fn avg_ticks_per_frame(&self) -> f32 {
        if self.ticks_per_frame.is_empty() {
            return 0.0;
        }
        self.ticks_per_frame.iter().map(|&t| t as f32).sum::<f32>()
            / self.ticks_per_frame.len() as f32
    }

    pub fn window_len(&self) -> usize {
        self.frame_times.len()
    }
}
