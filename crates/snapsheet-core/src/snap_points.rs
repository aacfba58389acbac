//! Snap point resolution
//!
//! Turns the configured mix of absolute offsets and percentage strings into
//! an ascending table of offsets measured from the top of the container.

use crate::config::SnapPointSpec;
use crate::{Error, Result};

/// Tolerance used when matching a live offset against a table entry
pub const SNAP_EPSILON: f64 = 1e-6;

/// Resolved snap points, strictly ascending
///
/// Index 0 is the most open resting position, the last index the most closed.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapPointTable {
    points: Vec<f64>,
}

impl SnapPointTable {
    /// Resolve snap point specs against the measured container height
    ///
    /// A percentage `p%` resolves to `p / 100 * (container_height - top_inset)`.
    pub fn resolve(specs: &[SnapPointSpec], container_height: f64, top_inset: f64) -> Result<Self> {
        if specs.is_empty() {
            return Err(Error::Config("at least one snap point is required".to_string()));
        }

        let available = container_height - top_inset;
        let points = specs
            .iter()
            .map(|spec| resolve_one(spec, available))
            .collect::<Result<Vec<_>>>()?;

        if let Some(pair) = points.windows(2).find(|w| w[0] >= w[1]) {
            return Err(Error::Config(format!(
                "snap points must be strictly ascending, got {} followed by {}",
                pair[0], pair[1]
            )));
        }

        Ok(Self { points })
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.points.get(index).copied()
    }

    /// Most open resting offset
    pub fn top(&self) -> f64 {
        self.points[0]
    }

    /// Most closed resting offset
    pub fn bottom(&self) -> f64 {
        self.points[self.points.len() - 1]
    }

    /// Index of the entry equal to `offset`, if any
    pub fn index_of(&self, offset: f64) -> Option<usize> {
        self.points
            .iter()
            .position(|p| (p - offset).abs() <= SNAP_EPSILON)
    }

    pub fn contains(&self, offset: f64) -> bool {
        self.index_of(offset).is_some()
    }

    /// Map an offset to [0, 1], 1 being fully open and 0 fully closed
    pub fn normalize(&self, offset: f64) -> f64 {
        let range = self.bottom() - self.top();
        if range <= 0.0 {
            return 1.0;
        }
        ((self.bottom() - offset) / range).clamp(0.0, 1.0)
    }
}

fn resolve_one(spec: &SnapPointSpec, available: f64) -> Result<f64> {
    match spec {
        SnapPointSpec::Absolute(value) if value.is_finite() => Ok(*value),
        SnapPointSpec::Absolute(value) => Err(Error::Config(format!(
            "invalid snap point {}: absolute offsets must be finite",
            value
        ))),
        SnapPointSpec::Percent(text) => parse_percentage(text)
            .map(|pct| pct / 100.0 * available)
            .ok_or_else(|| {
                Error::Config(format!(
                    "invalid snap point {:?}: expected a number or a percentage string like \"50%\"",
                    text
                ))
            }),
    }
}

/// Parse "50%" or "12.5 %" into its numeric part
fn parse_percentage(text: &str) -> Option<f64> {
    let number = text.trim().strip_suffix('%')?.trim_end();
    if number.is_empty() || number.starts_with('+') {
        return None;
    }
    number.parse::<f64>().ok().filter(|v| v.is_finite())
}
