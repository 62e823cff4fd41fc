//! Fixed-width rolling buffers for the stacked chart.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Cumulative band heights for one sample.
///
/// `a` = exposed, `b` = a + infectious, `c` = b + susceptible,
/// `d` = c + recovered (the whole population).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandSample {
    pub a: u32,
    pub b: u32,
    pub c: u32,
    pub d: u32,
}

/// Four band series sharing an index axis `0..width`.
#[derive(Debug, Clone)]
pub struct RollingSeries {
    width: usize,
    index: Vec<u32>,
    bands: [VecDeque<u32>; 4],
}

impl RollingSeries {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            index: (0..width as u32).collect(),
            bands: std::array::from_fn(|_| VecDeque::with_capacity(width + 1)),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn index(&self) -> &[u32] {
        &self.index
    }

    /// Number of samples held
    pub fn len(&self) -> usize {
        self.bands[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands[0].is_empty()
    }

    /// Append a sample, evicting the oldest once past the width
    pub fn push(&mut self, sample: BandSample) {
        for (band, value) in self.bands.iter_mut().zip([sample.a, sample.b, sample.c, sample.d]) {
            band.push_back(value);
            while band.len() > self.width {
                band.pop_front();
            }
        }
    }

    /// Change the width. Keeps the newest `min(len, width)` samples.
    pub fn resize(&mut self, width: usize) {
        self.width = width;
        self.index.clear();
        self.index.extend(0..width as u32);
        for band in &mut self.bands {
            let excess = band.len().saturating_sub(width);
            band.drain(..excess);
        }
    }

    pub fn clear(&mut self) {
        for band in &mut self.bands {
            band.clear();
        }
    }

    pub fn latest(&self) -> Option<BandSample> {
        Some(BandSample {
            a: *self.bands[0].back()?,
            b: *self.bands[1].back()?,
            c: *self.bands[2].back()?,
            d: *self.bands[3].back()?,
        })
    }

    /// Samples oldest first
    pub fn samples(&self) -> impl Iterator<Item = BandSample> + '_ {
        (0..self.len()).map(move |i| BandSample {
            a: self.bands[0][i],
            b: self.bands[1][i],
            c: self.bands[2][i],
            d: self.bands[3][i],
        })
    }

    /// One band, oldest first. 0 = a ... 3 = d.
    pub fn band(&self, band: usize) -> impl Iterator<Item = u32> + '_ {
        self.bands[band].iter().copied()
    }
}
