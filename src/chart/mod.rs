//! Rolling stacked-area chart of the population by disease status.

pub mod aggregator;
pub mod series;
pub mod text;

pub use aggregator::{ChartAggregator, StatusCounts};
pub use series::{BandSample, RollingSeries};
pub use text::TextChart;

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::error::PresentationError;
use crate::render::colors::{Color, EXPOSED, INFECTIOUS, RECOVERED, SUSCEPTIBLE};

/// Series labels in publication order (top band first)
pub const SERIES_LABELS: [&str; 4] = ["recovered", "susceptible", "infectious", "exposed"];

/// Fill colors in publication order
pub const SERIES_COLORS: [Color; 4] = [RECOVERED, SUSCEPTIBLE, INFECTIOUS, EXPOSED];

/// What a chart widget receives on every publish
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    /// Shared x axis, always `0..width`
    pub index: Vec<u32>,
    /// Bands d, c, b, a
    pub series: [Vec<u32>; 4],
    pub y_range: (u32, u32),
}

impl ChartData {
    pub fn new(num_people: u32) -> Self {
        Self {
            index: Vec::new(),
            series: Default::default(),
            y_range: (0, num_people),
        }
    }

    /// Refill in place from a rolling series
    pub(crate) fn fill_from(&mut self, series: &RollingSeries) {
        self.index.clear();
        self.index.extend_from_slice(series.index());
        for (out, band) in self.series.iter_mut().zip([3, 2, 1, 0]) {
            out.clear();
            out.extend(series.band(band));
        }
    }
}

/// A chart widget.
pub trait ChartSink {
    /// Width the widget currently wants, in samples
    fn display_width(&self) -> usize;

    fn set_data(&mut self, data: &ChartData) -> Result<(), PresentationError>;

    fn resize(&mut self, width: u32, height: u32) -> Result<(), PresentationError>;
}

/// Lets a host keep reading a chart it handed to a simulation
impl<C: ChartSink> ChartSink for Rc<RefCell<C>> {
    fn display_width(&self) -> usize {
        self.borrow().display_width()
    }

    fn set_data(&mut self, data: &ChartData) -> Result<(), PresentationError> {
        self.borrow_mut().set_data(data)
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), PresentationError> {
        self.borrow_mut().resize(width, height)
    }
}
