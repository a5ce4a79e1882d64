use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::config::validate_threshold;
use crate::error::{Error, Result};
use crate::na::NA;
use crate::stats::is_outlier;
use crate::temporal::{centered_mean, SmoothingWindow};

use super::{DerivedRow, DerivedTable};

/// Inclusive range of years; `start <= end` always holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearRange {
    start: i32,
    end: i32,
}

impl YearRange {
    /// Create a range; an inverted range is rejected rather than swapped
    pub fn new(start: i32, end: i32) -> Result<Self> {
        if start > end {
            return Err(Error::InvertedYearRange { start, end });
        }
        Ok(YearRange { start, end })
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn end(&self) -> i32 {
        self.end
    }

    pub fn contains(&self, period: i32) -> bool {
        self.start <= period && period <= self.end
    }
}

/// Parameters of one view: selection, year window, smoothing and threshold
#[derive(Debug, Clone, PartialEq)]
pub struct ViewQuery {
    entities: BTreeSet<String>,
    year_range: YearRange,
    smoothing: Option<SmoothingWindow>,
    outlier_threshold: Option<f64>,
}

impl ViewQuery {
    /// Select entities over a year range, without smoothing
    pub fn new<I, S>(entities: I, year_range: YearRange) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ViewQuery {
            entities: entities.into_iter().map(Into::into).collect(),
            year_range,
            smoothing: None,
            outlier_threshold: None,
        }
    }

    /// Smooth growth with a centered window of `width` years
    pub fn with_smoothing(mut self, width: i64) -> Result<Self> {
        self.smoothing = Some(SmoothingWindow::new(width)?);
        Ok(self)
    }

    /// Override the pipeline's outlier threshold for this view
    pub fn with_outlier_threshold(mut self, threshold: f64) -> Result<Self> {
        validate_threshold(threshold)?;
        self.outlier_threshold = Some(threshold);
        Ok(self)
    }

    pub fn entities(&self) -> &BTreeSet<String> {
        &self.entities
    }

    pub fn year_range(&self) -> YearRange {
        self.year_range
    }

    pub fn smoothing(&self) -> Option<SmoothingWindow> {
        self.smoothing
    }

    pub fn outlier_threshold(&self) -> Option<f64> {
        self.outlier_threshold
    }
}

/// One row of a view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewRow {
    pub entity: String,
    pub period: i32,
    pub value: NA<f64>,
    pub growth: NA<f64>,
    pub z_score: NA<f64>,
    /// Present only when the view was smoothed
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub smoothed_growth: Option<NA<f64>>,
    pub is_outlier: bool,
}

impl ViewRow {
    /// The series to plot: smoothed growth when smoothing was requested
    pub fn display_value(&self) -> NA<f64> {
        self.smoothed_growth.unwrap_or(self.growth)
    }
}

/// Why a view holds no rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmptyReason {
    /// The entity selection was empty
    NoEntitiesSelected,
    /// No selected entity has data inside the year range
    NoMatchingRows,
}

/// Rows of a non-empty view
#[derive(Debug, Clone, PartialEq)]
pub struct ViewFrame {
    rows: Vec<ViewRow>,
    year_range: YearRange,
    smoothing: Option<SmoothingWindow>,
    outlier_threshold: f64,
}

impl ViewFrame {
    pub fn rows(&self) -> &[ViewRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn year_range(&self) -> YearRange {
        self.year_range
    }

    pub fn smoothing(&self) -> Option<SmoothingWindow> {
        self.smoothing
    }

    pub fn outlier_threshold(&self) -> f64 {
        self.outlier_threshold
    }

    /// Entities present in the view, in order
    pub fn entities(&self) -> Vec<&str> {
        let mut entities: Vec<&str> = self.rows.iter().map(|row| row.entity.as_str()).collect();
        entities.dedup();
        entities
    }

    /// Rows of one entity
    pub fn rows_for<'a>(&'a self, entity: &'a str) -> impl Iterator<Item = &'a ViewRow> + 'a {
        self.rows.iter().filter(move |row| row.entity == entity)
    }

    /// Rows flagged as outliers
    pub fn outliers(&self) -> impl Iterator<Item = &ViewRow> {
        self.rows.iter().filter(|row| row.is_outlier)
    }

    /// Rows as a JSON array, NA as `null`
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.rows)?)
    }
}

/// Outcome of a query: rows, or an explicit empty state
#[derive(Debug, Clone, PartialEq)]
pub enum ViewResult {
    Rows(ViewFrame),
    Empty(EmptyReason),
}

impl ViewResult {
    pub fn is_empty(&self) -> bool {
        matches!(self, ViewResult::Empty(_))
    }

    pub fn frame(&self) -> Option<&ViewFrame> {
        match self {
            ViewResult::Rows(frame) => Some(frame),
            ViewResult::Empty(_) => None,
        }
    }

    /// Rows of the view; empty for `Empty`
    pub fn rows(&self) -> &[ViewRow] {
        match self {
            ViewResult::Rows(frame) => frame.rows(),
            ViewResult::Empty(_) => &[],
        }
    }

    pub fn empty_reason(&self) -> Option<EmptyReason> {
        match self {
            ViewResult::Rows(_) => None,
            ViewResult::Empty(reason) => Some(*reason),
        }
    }
}

/// Project the table onto a query
///
/// Smoothing runs per entity over the projected rows only, so the window is
/// truncated at the edges of the selected year range.
pub(super) fn execute(table: &DerivedTable, query: &ViewQuery, default_threshold: f64) -> ViewResult {
    if query.entities.is_empty() {
        log::debug!("query with no entities selected");
        return ViewResult::Empty(EmptyReason::NoEntitiesSelected);
    }

    let threshold = query.outlier_threshold.unwrap_or(default_threshold);
    let mut rows = Vec::new();

    for entity in &query.entities {
        let selected = table.entity_window(entity, query.year_range);
        if selected.is_empty() {
            continue;
        }

        let smoothed: Option<Vec<NA<f64>>> = query.smoothing.map(|window| {
            let growth: Vec<NA<f64>> = selected.iter().map(|row| row.growth).collect();
            centered_mean(&growth, window)
        });

        rows.extend(selected.iter().enumerate().map(|(i, row)| {
            view_row(row, smoothed.as_ref().map(|s| s[i]), threshold)
        }));
    }

    if rows.is_empty() {
        log::debug!(
            "no rows for {} selected entities in {}..={}",
            query.entities.len(),
            query.year_range.start,
            query.year_range.end
        );
        return ViewResult::Empty(EmptyReason::NoMatchingRows);
    }

    ViewResult::Rows(ViewFrame {
        rows,
        year_range: query.year_range,
        smoothing: query.smoothing,
        outlier_threshold: threshold,
    })
}

fn view_row(row: &DerivedRow, smoothed_growth: Option<NA<f64>>, threshold: f64) -> ViewRow {
    ViewRow {
        entity: row.entity.clone(),
        period: row.period,
        value: row.value,
        growth: row.growth,
        z_score: row.z_score,
        smoothed_growth,
        is_outlier: is_outlier(row.z_score, threshold),
    }
}
