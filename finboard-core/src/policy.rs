//! Declarative render policy for a single table.

use serde::{Deserialize, Deserializer, Serialize};

/// Controls derived columns and row roles for one render call.
///
/// Deserializes from TOML policy files as well as from the camelCase JSON
/// the dashboard backend ships alongside table data. Column indices accept
/// `-1` as "none".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderPolicy {
    /// Row 0 is a header: no rank, no color dot.
    #[serde(alias = "hasHeader", alias = "hasHeaderRow")]
    pub has_header_row: bool,

    /// Final row is a total: no rank, no color dot, emphasized.
    #[serde(alias = "boldLastRow")]
    pub bold_last_row: bool,

    /// Prepend a rank column (`01`, `02`, ...).
    #[serde(alias = "hasRowNumber", alias = "rowNumberColumn")]
    pub row_number_column: bool,

    /// Column, in the augmented grid, formatted as currency.
    #[serde(
        alias = "currencyColumnIdx",
        deserialize_with = "index_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub currency_column_index: Option<usize>,

    /// Column, in the augmented grid, where color dots are inserted.
    #[serde(
        alias = "colorsColumnIdx",
        alias = "colorColumnIndex",
        deserialize_with = "index_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub color_column_index: Option<usize>,

    /// Entity ids for data rows (header excluded), in display order.
    #[serde(alias = "rowIds", skip_serializing_if = "Vec::is_empty")]
    pub row_ids: Vec<String>,

    /// Palette entries cycled before dot colors repeat. `None` or `0` uses
    /// the whole palette.
    #[serde(alias = "paletteSize", skip_serializing_if = "Option::is_none")]
    pub palette_size: Option<usize>,
}

impl Default for RenderPolicy {
    fn default() -> Self {
        Self {
            has_header_row: false,
            bold_last_row: false,
            row_number_column: true,
            currency_column_index: None,
            color_column_index: None,
            row_ids: Vec::new(),
            palette_size: None,
        }
    }
}

impl RenderPolicy {
    /// Number of leading rows that are not data rows.
    pub fn header_offset(&self) -> usize {
        usize::from(self.has_header_row)
    }

    /// Palette cycle length given a palette of `palette_len` colors.
    pub fn palette_cycle(&self, palette_len: usize) -> usize {
        match self.palette_size {
            Some(n) if n > 0 => n.min(palette_len),
            _ => palette_len,
        }
    }

    pub fn with_row_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.row_ids = ids.into_iter().map(Into::into).collect();
        self
    }
}

fn index_or_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<usize>, D::Error> {
    let raw = Option::<i64>::deserialize(deserializer)?;
    Ok(raw.and_then(|i| usize::try_from(i).ok()))
}
