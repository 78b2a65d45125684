//! Backend responses and their shaping into dashboard tables and indicators.
//!
//! Each shaper returns a [`TableData`]: a raw grid plus the policy that tells
//! the renderer which row is the header, which column holds amounts and where
//! the color dots go.

use serde::{Deserialize, Serialize};

use crate::format::Formatter;
use crate::grid::RawGrid;
use crate::palette::Color;
use crate::policy::RenderPolicy;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MainIndicatorsResponse {
    pub savings: f64,
    pub debt: f64,
    pub last_month_profit: f64,
    pub investments: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionItem {
    #[serde(rename = "type")]
    pub kind: String,
    pub total: f64,
    /// Share of the whole as a fraction (`0.85` is 85%).
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionResponse {
    pub data: Vec<DistributionItem>,
    #[serde(default)]
    pub view_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentsIndicatorsResponse {
    pub total_investments: f64,
    pub last_year_total_results_value: f64,
    pub last_year_total_results_percentage: f64,
    pub results_vs_inflation: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfoResponse {
    pub id: String,
    pub name: String,
    pub number: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub importer: String,
    pub active: bool,
    pub bank_name: String,
    pub bank_url: String,
    #[serde(default)]
    pub hidden: bool,
    pub opened_at: String,
}

impl AccountInfoResponse {
    /// `"<bank> - <alias or name>"`, as shown on account buttons.
    pub fn header(&self) -> String {
        let label = self.alias.as_deref().unwrap_or(&self.name);
        format!("{} - {}", self.bank_name, label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountTransactionResponse {
    pub id: String,
    pub date: String,
    pub title: String,
    #[serde(default)]
    pub details: Option<String>,
    pub operation: f64,
    pub balance: f64,
    pub currency: String,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamResponse {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamDetailsResponse {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub version: u64,
    #[serde(default)]
    pub metadata: std::collections::BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentStreamResponse {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub investment_type: Option<String>,
    #[serde(default)]
    pub wallet: Option<String>,
    pub balance: f64,
}

/// A grid ready for the renderer, with the policy that goes with it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableData {
    pub grid: RawGrid,
    pub policy: RenderPolicy,
}

/// Amount column text the renderer's currency formatting can parse back.
fn amount_text(value: f64) -> String {
    value.to_string()
}

/// `type | total | percentage` per item plus a trailing `Total` row.
///
/// Colors land in column 1 and amounts in column 3 of the augmented grid.
pub fn distribution_table(items: &[DistributionItem], formatter: &Formatter) -> TableData {
    let mut rows: Vec<Vec<String>> = items
        .iter()
        .map(|item| {
            vec![
                item.kind.clone(),
                amount_text(item.total),
                formatter.percentage(item.percentage),
            ]
        })
        .collect();
    let total: f64 = items.iter().map(|item| item.total).sum();
    rows.push(vec!["Total".to_string(), amount_text(total), String::new()]);

    TableData {
        grid: RawGrid::new(rows),
        policy: RenderPolicy {
            bold_last_row: true,
            color_column_index: Some(1),
            currency_column_index: Some(3),
            ..RenderPolicy::default()
        },
    }
}

/// Account history table; activating a row yields the transaction id.
pub fn transactions_table(
    transactions: &[AccountTransactionResponse],
    formatter: &Formatter,
) -> TableData {
    let header = ["Date", "Title", "Operation", "Balance"].map(String::from).to_vec();
    let rows = std::iter::once(header)
        .chain(transactions.iter().map(|t| {
            vec![
                t.date.clone(),
                t.title.clone(),
                amount_text(t.operation),
                formatter.currency(t.balance),
            ]
        }))
        .collect();

    TableData {
        grid: RawGrid::new(rows),
        policy: RenderPolicy {
            has_header_row: true,
            currency_column_index: Some(3),
            ..RenderPolicy::default()
        }
        .with_row_ids(transactions.iter().map(|t| t.id.clone())),
    }
}

pub fn streams_table(streams: &[StreamResponse]) -> TableData {
    let header = vec!["Name".to_string(), "Type".to_string()];
    let rows = std::iter::once(header)
        .chain(streams.iter().map(|s| vec![s.name.clone(), s.kind.clone()]))
        .collect();

    TableData {
        grid: RawGrid::new(rows),
        policy: RenderPolicy {
            has_header_row: true,
            ..RenderPolicy::default()
        }
        .with_row_ids(streams.iter().map(|s| s.id.clone())),
    }
}

/// Active investments of one wallet, colored per investment.
pub fn investments_table(investments: &[InvestmentStreamResponse]) -> TableData {
    let header = ["Name", "Type", "Balance"].map(String::from).to_vec();
    let rows = std::iter::once(header)
        .chain(investments.iter().map(|inv| {
            vec![
                inv.name.clone(),
                inv.investment_type.clone().unwrap_or_default(),
                amount_text(inv.balance),
            ]
        }))
        .collect();

    TableData {
        grid: RawGrid::new(rows),
        policy: RenderPolicy {
            has_header_row: true,
            color_column_index: Some(1),
            currency_column_index: Some(4),
            ..RenderPolicy::default()
        }
        .with_row_ids(investments.iter().map(|inv| inv.id.clone())),
    }
}

/// Text color hint for an indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Neutral,
    Positive,
    Negative,
}

impl Tone {
    pub fn of(value: f64) -> Self {
        if value > 0.0 {
            Tone::Positive
        } else if value < 0.0 {
            Tone::Negative
        } else {
            Tone::Neutral
        }
    }

    pub fn color(self) -> Option<Color> {
        match self {
            Tone::Neutral => None,
            Tone::Positive => Some(Color::rgb(0x65, 0x9B, 0x5E)),
            Tone::Negative => Some(Color::rgb(0xED, 0x6B, 0x53)),
        }
    }
}

/// A headline number tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Indicator {
    pub headline: String,
    pub text: String,
    pub tone: Tone,
}

impl Indicator {
    fn new(headline: &str, text: String, tone: Tone) -> Self {
        Self {
            headline: headline.to_string(),
            text,
            tone,
        }
    }
}

pub fn main_indicators(resp: &MainIndicatorsResponse, formatter: &Formatter) -> Vec<Indicator> {
    vec![
        Indicator::new("Savings", formatter.currency(resp.savings), Tone::Neutral),
        Indicator::new("Investments", formatter.currency(resp.investments), Tone::Neutral),
        Indicator::new(
            "Last Month Profit",
            formatter.currency(resp.last_month_profit),
            Tone::of(resp.last_month_profit),
        ),
        // debt is reported as a positive amount owed
        Indicator::new("Debt", formatter.currency(resp.debt), Tone::of(-resp.debt)),
    ]
}

pub fn investment_indicators(
    resp: &InvestmentsIndicatorsResponse,
    formatter: &Formatter,
) -> Vec<Indicator> {
    vec![
        Indicator::new(
            "Total Investments",
            formatter.currency(resp.total_investments),
            Tone::Neutral,
        ),
        Indicator::new(
            "Last Year Results",
            formatter.currency(resp.last_year_total_results_value),
            Tone::of(resp.last_year_total_results_value),
        ),
        Indicator::new(
            "Last Year Results (%)",
            formatter.percentage(resp.last_year_total_results_percentage),
            Tone::of(resp.last_year_total_results_percentage),
        ),
        Indicator::new(
            "Results vs Inflation",
            formatter.percentage(resp.results_vs_inflation),
            Tone::of(resp.results_vs_inflation),
        ),
    ]
}
