//! Load-once growth pipeline and its derived table
//!
//! `GrowthPipeline` regularizes the observations, computes growth and
//! z-scores once, and afterwards only answers read-only queries. The
//! derived table is never mutated after construction, so a pipeline can be
//! shared between threads without locking.

mod query;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Range;
use std::path::Path;

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::io;
use crate::na::NA;
use crate::series::{Observation, RegularSeries};
use crate::stats::{self, MomentStats};
use crate::temporal::Regularizer;

pub use self::query::{EmptyReason, ViewFrame, ViewQuery, ViewResult, ViewRow, YearRange};

/// One regularized period of one entity with its derived statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedRow {
    pub entity: String,
    pub period: i32,
    pub value: NA<f64>,
    /// Percentage change from the previous period; NA for the first period
    pub growth: NA<f64>,
    /// Z-score of `growth` within the entity
    pub z_score: NA<f64>,
}

impl DerivedRow {
    /// The raw observation this row would be re-ingested as
    pub fn to_observation(&self) -> Observation {
        Observation::new(self.entity.clone(), self.period, self.value)
    }
}

/// Derive growth and z-scores for one regular series
pub fn derive_series(series: &RegularSeries, near_zero_tolerance: f64) -> Vec<DerivedRow> {
    let growth = stats::pct_change(series.values(), near_zero_tolerance);
    let z_scores = stats::zscore(&growth);

    if z_scores.iter().all(|z| z.is_na()) {
        match MomentStats::compute(&growth) {
            Some(moments) => log::debug!(
                "{}: degenerate growth statistics (n = {}, std = {}), z-scores left missing",
                series.entity(),
                moments.count,
                moments.std_dev
            ),
            None => log::debug!("{}: no growth values, z-scores left missing", series.entity()),
        }
    }

    series
        .iter()
        .zip(growth)
        .zip(z_scores)
        .map(|(((period, value), growth), z_score)| DerivedRow {
            entity: series.entity().to_string(),
            period,
            value,
            growth,
            z_score,
        })
        .collect()
}

/// Derived rows of every entity, ordered by `(entity, period)`
#[derive(Debug, Clone, Default)]
pub struct DerivedTable {
    rows: Vec<DerivedRow>,
    /// Row range of each entity within `rows`
    spans: BTreeMap<String, Range<usize>>,
}

impl DerivedTable {
    /// Assemble from per-entity rows; entities must arrive in sorted order
    fn from_entities(per_entity: Vec<Vec<DerivedRow>>) -> Self {
        let mut rows = Vec::with_capacity(per_entity.iter().map(Vec::len).sum());
        let mut spans = BTreeMap::new();

        for entity_rows in per_entity {
            let start = rows.len();
            let entity = match entity_rows.first() {
                Some(row) => row.entity.clone(),
                None => continue,
            };
            rows.extend(entity_rows);
            spans.insert(entity, start..rows.len());
        }

        DerivedTable { rows, spans }
    }

    pub fn rows(&self) -> &[DerivedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Entity identifiers in sorted order
    pub fn entities(&self) -> impl Iterator<Item = &str> {
        self.spans.keys().map(String::as_str)
    }

    pub fn entity_count(&self) -> usize {
        self.spans.len()
    }

    /// All rows of one entity, in period order
    pub fn entity_rows(&self, entity: &str) -> Option<&[DerivedRow]> {
        self.spans.get(entity).map(|span| &self.rows[span.clone()])
    }

    /// Rows of one entity whose period lies in `range`
    pub fn entity_window(&self, entity: &str, range: YearRange) -> &[DerivedRow] {
        let rows = match self.entity_rows(entity) {
            Some(rows) => rows,
            None => return &[],
        };
        let lo = rows.partition_point(|row| row.period < range.start());
        let hi = rows.partition_point(|row| row.period <= range.end());
        &rows[lo..hi.max(lo)]
    }

    /// Smallest and largest period over all entities
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        let mut bounds: Option<(i32, i32)> = None;
        for span in self.spans.values() {
            let (first, last) = (self.rows[span.start].period, self.rows[span.end - 1].period);
            bounds = Some(match bounds {
                Some((lo, hi)) => (lo.min(first), hi.max(last)),
                None => (first, last),
            });
        }
        bounds
    }

    /// Rows turned back into raw observations
    pub fn to_observations(&self) -> Vec<Observation> {
        self.rows.iter().map(DerivedRow::to_observation).collect()
    }
}

/// Regularize, derive and query a dataset loaded once
#[derive(Debug, Clone)]
pub struct GrowthPipeline {
    table: DerivedTable,
    config: PipelineConfig,
}

impl GrowthPipeline {
    /// Build with the default configuration
    pub fn new<I>(observations: I) -> Self
    where
        I: IntoIterator<Item = Observation>,
    {
        Self::build(observations, PipelineConfig::default())
    }

    /// Build with a custom configuration, validated first
    pub fn with_config<I>(observations: I, config: PipelineConfig) -> Result<Self>
    where
        I: IntoIterator<Item = Observation>,
    {
        config.validate()?;
        Ok(Self::build(observations, config))
    }

    /// Read a long-format CSV using the configured column names and build
    pub fn from_csv<P: AsRef<Path>>(path: P, config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let observations = io::csv::read_observations(path, &config.columns)?;
        Ok(Self::build(observations, config))
    }

    fn build<I>(observations: I, config: PipelineConfig) -> Self
    where
        I: IntoIterator<Item = Observation>,
    {
        let regularizer = Regularizer::from_observations(observations);
        let per_entity: Vec<Vec<DerivedRow>> = regularizer
            .regularize()
            .iter()
            .map(|series| derive_series(series, config.near_zero_tolerance))
            .collect();
        let table = DerivedTable::from_entities(per_entity);

        log::info!(
            "growth pipeline built: {} entities, {} regularized rows",
            table.entity_count(),
            table.len()
        );

        GrowthPipeline { table, config }
    }

    pub fn table(&self) -> &DerivedTable {
        &self.table
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Entity identifiers in sorted order
    pub fn available_entities(&self) -> Vec<&str> {
        self.table.entities().collect()
    }

    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        self.table.year_bounds()
    }

    /// The most recent `default_lookback_years`, clipped to the data
    pub fn default_year_range(&self) -> Option<YearRange> {
        let (min, max) = self.year_bounds()?;
        let start = max.saturating_sub(self.config.default_lookback_years).max(min);
        YearRange::new(start, max).ok()
    }

    /// The first `default_selection_size` entities
    pub fn default_entities(&self) -> Vec<String> {
        self.table
            .entities()
            .take(self.config.default_selection_size)
            .map(str::to_string)
            .collect()
    }

    /// The initial view: default entities, range and smoothing window
    pub fn default_query(&self) -> Result<Option<ViewQuery>> {
        let range = match self.default_year_range() {
            Some(range) => range,
            None => return Ok(None),
        };
        let window = self.config.default_smoothing_window as i64;
        let query = ViewQuery::new(self.default_entities(), range).with_smoothing(window)?;
        Ok(Some(query))
    }

    /// Query by entities, inclusive year range and optional smoothing width
    ///
    /// Fails only on an inverted year range or a non-positive window; an
    /// empty selection is `ViewResult::Empty`.
    pub fn query<I, S>(
        &self,
        entities: I,
        year_range: (i32, i32),
        smoothing_window: Option<i64>,
    ) -> Result<ViewResult>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let range = YearRange::new(year_range.0, year_range.1)?;
        let mut query = ViewQuery::new(entities, range);
        if let Some(width) = smoothing_window {
            query = query.with_smoothing(width)?;
        }
        Ok(self.execute(&query))
    }

    /// Run a prepared query against the derived table
    pub fn execute(&self, query: &ViewQuery) -> ViewResult {
        query::execute(&self.table, query, self.config.outlier_threshold)
    }
}
