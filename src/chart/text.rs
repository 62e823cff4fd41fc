//! Plain-text chart sink for terminals.

use std::fmt::Write;

use crate::chart::{ChartData, ChartSink};
use crate::core::error::PresentationError;

/// Renders the stacked bands as rows of characters.
///
/// Cells are drawn top down: `.` recovered, `s` susceptible,
/// `I` infectious, `e` exposed.
#[derive(Debug, Clone)]
pub struct TextChart {
    width: usize,
    rows: usize,
    last: Option<ChartData>,
}

impl TextChart {
    pub fn new(width: usize, rows: usize) -> Self {
        Self {
            width,
            rows: rows.max(1),
            last: None,
        }
    }

    pub fn set_display_width(&mut self, width: usize) {
        self.width = width;
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let Some(data) = &self.last else {
            return out;
        };
        let y_max = data.y_range.1.max(1) as f32;

        for row in (0..self.rows).rev() {
            let threshold = (row as f32 + 0.5) / self.rows as f32 * y_max;
            for i in 0..data.series[0].len() {
                let glyph = if (data.series[3][i] as f32) > threshold {
                    'e'
                } else if (data.series[2][i] as f32) > threshold {
                    'I'
                } else if (data.series[1][i] as f32) > threshold {
                    's'
                } else if (data.series[0][i] as f32) > threshold {
                    '.'
                } else {
                    ' '
                };
                out.push(glyph);
            }
            out.push('\n');
        }
        let _ = write!(out, "{} samples, y 0..{}", data.series[0].len(), data.y_range.1);
        out
    }
}

impl ChartSink for TextChart {
    fn display_width(&self) -> usize {
        self.width
    }

    fn set_data(&mut self, data: &ChartData) -> Result<(), PresentationError> {
        match &mut self.last {
            Some(last) => last.clone_from(data),
            None => self.last = Some(data.clone()),
        }
        Ok(())
    }

    fn resize(&mut self, width: u32, _height: u32) -> Result<(), PresentationError> {
        if width == 0 {
            return Err(PresentationError::Chart("zero-width chart".into()));
        }
        self.width = width as usize;
        Ok(())
    }
}
