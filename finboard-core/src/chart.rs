//! Chart series shaped from view data. Drawing them is up to the host.

use serde::Serialize;

use crate::format::Formatter;
use crate::palette::{Color, Palette};
use crate::views::DistributionItem;

/// Labels and values of a pie chart, in table row order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PieChartData {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

/// One colored pie slice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
    pub color: Color,
    /// Fraction of the pie, `0.0..=1.0`.
    pub share: f64,
}

impl PieChartData {
    pub fn from_items(items: &[DistributionItem]) -> Self {
        Self {
            labels: items.iter().map(|item| item.kind.clone()).collect(),
            values: items.iter().map(|item| item.total).collect(),
        }
    }

    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    fn share(&self, value: f64) -> f64 {
        let total = self.total();
        if total == 0.0 {
            0.0
        } else {
            value / total
        }
    }

    /// Slices colored by position, matching the table's dot colors.
    pub fn slices(&self, palette: &Palette) -> Vec<PieSlice> {
        self.labels
            .iter()
            .zip(&self.values)
            .enumerate()
            .map(|(i, (label, &value))| PieSlice {
                label: label.clone(),
                value,
                color: palette.color_at(i),
                share: self.share(value),
            })
            .collect()
    }

    /// Hover text for slice `index`, e.g. `1000,00 zł (50.0%)`.
    pub fn tooltip_label(&self, index: usize, formatter: &Formatter) -> Option<String> {
        let value = *self.values.get(index)?;
        Some(format!(
            "{} ({:.1}%)",
            formatter.currency(value),
            self.share(value) * 100.0
        ))
    }
}

/// A single line series over categorical x labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub name: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub color: Color,
}

impl LineSeries {
    pub fn new<I, L>(name: impl Into<String>, points: I, palette: &Palette) -> Self
    where
        I: IntoIterator<Item = (L, f64)>,
        L: Into<String>,
    {
        let (labels, values) = points
            .into_iter()
            .map(|(label, value)| (label.into(), value))
            .unzip();
        Self {
            name: name.into(),
            labels,
            values,
            color: palette.color_at(0),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(min, max)` over finite values, `None` for an empty series.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}
