//! Status tallies and chart publication.

use crate::chart::series::{BandSample, RollingSeries};
use crate::chart::{ChartData, ChartSink};
use crate::core::constants::CHART_HEIGHT;
use crate::core::error::PresentationError;
use crate::engine::state::{DiseaseStatus, PersonState};

/// Population count per disease status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub susceptible: u32,
    pub exposed: u32,
    pub infectious: u32,
    pub recovered: u32,
}

impl StatusCounts {
    pub fn tally(people: &[PersonState]) -> Self {
        let mut counts = Self::default();
        for person in people {
            match person.status {
                DiseaseStatus::Susceptible => counts.susceptible += 1,
                DiseaseStatus::Exposed => counts.exposed += 1,
                DiseaseStatus::Infectious => counts.infectious += 1,
                DiseaseStatus::Recovered => counts.recovered += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> u32 {
        self.susceptible + self.exposed + self.infectious + self.recovered
    }
}

impl From<StatusCounts> for BandSample {
    fn from(counts: StatusCounts) -> Self {
        let a = counts.exposed;
        let b = a + counts.infectious;
        let c = b + counts.susceptible;
        let d = c + counts.recovered;
        BandSample { a, b, c, d }
    }
}

/// Owns the rolling series of one instance and pushes it to a chart sink
#[derive(Debug)]
pub struct ChartAggregator {
    series: RollingSeries,
    data: ChartData,
}

impl ChartAggregator {
    pub fn new(width: usize, num_people: u32) -> Self {
        Self {
            series: RollingSeries::new(width),
            data: ChartData::new(num_people),
        }
    }

    /// Drop all samples and rescale the y axis
    pub fn reset(&mut self, num_people: u32) {
        self.series.clear();
        self.data.y_range = (0, num_people);
    }

    /// Tally the population and append one sample
    pub fn sample(&mut self, people: &[PersonState]) -> BandSample {
        let sample = BandSample::from(StatusCounts::tally(people));
        self.series.push(sample);
        tracing::debug!(?sample, len = self.series.len(), "Chart sample");
        sample
    }

    /// Follow the sink's display width, then hand it the current series.
    pub fn publish<C: ChartSink + ?Sized>(&mut self, chart: &mut C) -> Result<(), PresentationError> {
        let width = chart.display_width();
        if width != self.series.width() {
            tracing::debug!(from = self.series.width(), to = width, "Resizing chart");
            self.series.resize(width);
            chart.resize(width as u32, CHART_HEIGHT)?;
        }
        self.data.fill_from(&self.series);
        chart.set_data(&self.data)
    }

    pub fn series(&self) -> &RollingSeries {
        &self.series
    }
}
