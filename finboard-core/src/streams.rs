//! Stream and event catalog, plus the forms that create them.
//!
//! A stream is a financial account or investment tracked by the backend as an
//! append-only sequence of events. Which metadata a new stream needs and which
//! fields an event carries depend on the stream category; both are fixed here
//! as closed enums mapped to static field lists.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::format::parse_lenient;

/// Validation failures for stream and event forms.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("unknown stream category '{0}'")]
    UnknownCategory(String),

    #[error("unknown stream subtype '{0}'")]
    UnknownSubtype(String),

    #[error("unknown event kind '{0}'")]
    UnknownEventKind(String),

    #[error("subtype '{subtype}' does not belong to category '{category}'")]
    SubtypeMismatch {
        category: StreamCategory,
        subtype: StreamSubtype,
    },

    #[error("category '{0}' requires a subtype")]
    MissingSubtype(StreamCategory),

    #[error("event '{kind}' cannot be added to a '{category}' stream")]
    EventNotAllowed {
        category: StreamCategory,
        kind: EventKind,
    },

    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("field '{field}' must be a number, got '{value}'")]
    NotANumber { field: &'static str, value: String },

    #[error("field '{field}' must be true or false, got '{value}'")]
    NotAFlag { field: &'static str, value: String },

    #[error("field '{field}' must be an http(s) URL, got '{value}'")]
    NotAUrl { field: &'static str, value: String },

    #[error("unexpected field '{0}'")]
    UnexpectedField(String),

    #[error("stream name must not be blank")]
    BlankName,

    #[error("please select a stream")]
    MissingStream,

    #[error("{0} must be greater than 0")]
    NotPositive(&'static str),
}

/// Value type of a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Number,
    Flag,
    Url,
}

impl FieldKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Number => "number",
            FieldKind::Flag => "flag",
            FieldKind::Url => "url",
        }
    }
}

/// One field a form must (or may) provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub kind: FieldKind,
    pub optional: bool,
}

const fn required(name: &'static str, kind: FieldKind) -> FieldDescriptor {
    FieldDescriptor {
        name,
        kind,
        optional: false,
    }
}

const fn optional(name: &'static str, kind: FieldKind) -> FieldDescriptor {
    FieldDescriptor {
        name,
        kind,
        optional: true,
    }
}

impl FieldDescriptor {
    /// Check a raw form value against this field's kind.
    pub fn check(&self, value: &str) -> Result<(), ValidationError> {
        let value = value.trim();
        match self.kind {
            FieldKind::Text => Ok(()),
            FieldKind::Number => {
                if value.parse::<f64>().map(f64::is_finite).unwrap_or(false) {
                    Ok(())
                } else {
                    Err(ValidationError::NotANumber {
                        field: self.name,
                        value: value.to_string(),
                    })
                }
            }
            FieldKind::Flag => match value {
                "true" | "false" => Ok(()),
                _ => Err(ValidationError::NotAFlag {
                    field: self.name,
                    value: value.to_string(),
                }),
            },
            FieldKind::Url => {
                if value.starts_with("http://") || value.starts_with("https://") {
                    Ok(())
                } else {
                    Err(ValidationError::NotAUrl {
                        field: self.name,
                        value: value.to_string(),
                    })
                }
            }
        }
    }
}

/// Check `fields` against `descriptors`: required present and well-typed,
/// nothing unknown.
fn check_fields(
    descriptors: &[FieldDescriptor],
    fields: &BTreeMap<String, String>,
) -> Result<(), ValidationError> {
    for descriptor in descriptors {
        match fields.get(descriptor.name).map(|v| v.trim()) {
            Some(value) if !value.is_empty() => descriptor.check(value)?,
            _ if descriptor.optional => {}
            _ => return Err(ValidationError::MissingField(descriptor.name)),
        }
    }
    if let Some(unknown) = fields
        .keys()
        .find(|key| !descriptors.iter().any(|d| d.name == key.as_str()))
    {
        return Err(ValidationError::UnexpectedField(unknown.clone()));
    }
    Ok(())
}

macro_rules! wire_names {
    ($ty:ident { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// Kind of stream tracked by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StreamCategory {
    #[serde(rename = "account")]
    Account,
    #[serde(rename = "investment")]
    Investment,
    #[serde(rename = "stocks")]
    Stocks,
    #[serde(rename = "retirement")]
    Retirement,
    #[serde(rename = "real-estate")]
    RealEstate,
}

wire_names!(StreamCategory {
    Account => "account",
    Investment => "investment",
    Stocks => "stocks",
    Retirement => "retirement",
    RealEstate => "real-estate",
});

impl FromStr for StreamCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownCategory(s.to_string()))
    }
}

const ACCOUNT_METADATA: &[FieldDescriptor] = &[
    required("alias", FieldKind::Text),
    required("bankUrl", FieldKind::Url),
    required("importer", FieldKind::Text),
    required("accountNumber", FieldKind::Text),
];

const INVESTMENT_METADATA: &[FieldDescriptor] = &[required("details", FieldKind::Text)];

const STOCKS_METADATA: &[FieldDescriptor] = &[
    required("etfUrl", FieldKind::Url),
    required("ike", FieldKind::Flag),
    required("ikze", FieldKind::Flag),
];

impl StreamCategory {
    pub fn subtypes(self) -> &'static [StreamSubtype] {
        use StreamSubtype::*;
        match self {
            StreamCategory::Account => &[Checking, Savings, Cash],
            StreamCategory::Investment => &[TreasuryBonds, Deposit, Gold],
            StreamCategory::Stocks => &[Etf],
            StreamCategory::Retirement => &[Retirement],
            StreamCategory::RealEstate => &[],
        }
    }

    /// Metadata a new stream of this category must carry.
    pub fn required_metadata(self) -> &'static [FieldDescriptor] {
        match self {
            StreamCategory::Account | StreamCategory::Retirement => ACCOUNT_METADATA,
            StreamCategory::Investment => INVESTMENT_METADATA,
            StreamCategory::Stocks => STOCKS_METADATA,
            StreamCategory::RealEstate => &[],
        }
    }

    /// Events that may be appended to a stream of this category.
    pub fn event_kinds(self) -> &'static [EventKind] {
        use EventKind::*;
        match self {
            StreamCategory::Account | StreamCategory::Retirement => {
                &[MoneyWithdrawn, MoneyDeposited]
            }
            StreamCategory::Investment => &[
                TreasuryBondsBought,
                TreasuryBondsMatured,
                TreasuryBondsPriced,
                TermDepositOpened,
                TermDepositFinished,
                InvestmentFundBought,
                InvestmentFundSold,
                GoldBought,
                GoldSold,
                GoldPriced,
            ],
            StreamCategory::Stocks => &[EtfBought, EtfSold, EtfPriced],
            StreamCategory::RealEstate => &[],
        }
    }
}

/// Finer classification within a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StreamSubtype {
    #[serde(rename = "checking")]
    Checking,
    #[serde(rename = "savings")]
    Savings,
    #[serde(rename = "cash")]
    Cash,
    #[serde(rename = "treasury_bonds")]
    TreasuryBonds,
    #[serde(rename = "deposit")]
    Deposit,
    #[serde(rename = "gold")]
    Gold,
    #[serde(rename = "ETF")]
    Etf,
    #[serde(rename = "retirement")]
    Retirement,
}

wire_names!(StreamSubtype {
    Checking => "checking",
    Savings => "savings",
    Cash => "cash",
    TreasuryBonds => "treasury_bonds",
    Deposit => "deposit",
    Gold => "gold",
    Etf => "ETF",
    Retirement => "retirement",
});

impl StreamSubtype {
    pub fn category(self) -> StreamCategory {
        match self {
            StreamSubtype::Checking | StreamSubtype::Savings | StreamSubtype::Cash => {
                StreamCategory::Account
            }
            StreamSubtype::TreasuryBonds | StreamSubtype::Deposit | StreamSubtype::Gold => {
                StreamCategory::Investment
            }
            StreamSubtype::Etf => StreamCategory::Stocks,
            StreamSubtype::Retirement => StreamCategory::Retirement,
        }
    }
}

impl FromStr for StreamSubtype {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ValidationError::UnknownSubtype(s.to_string()))
    }
}

/// Domain event appended to a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    MoneyWithdrawn,
    MoneyDeposited,
    TreasuryBondsBought,
    TreasuryBondsMatured,
    TreasuryBondsPriced,
    TermDepositOpened,
    TermDepositFinished,
    InvestmentFundBought,
    InvestmentFundSold,
    GoldBought,
    GoldSold,
    GoldPriced,
    #[serde(rename = "ETFBought")]
    EtfBought,
    #[serde(rename = "ETFSold")]
    EtfSold,
    #[serde(rename = "ETFPriced")]
    EtfPriced,
}

wire_names!(EventKind {
    MoneyWithdrawn => "MoneyWithdrawn",
    MoneyDeposited => "MoneyDeposited",
    TreasuryBondsBought => "TreasuryBondsBought",
    TreasuryBondsMatured => "TreasuryBondsMatured",
    TreasuryBondsPriced => "TreasuryBondsPriced",
    TermDepositOpened => "TermDepositOpened",
    TermDepositFinished => "TermDepositFinished",
    InvestmentFundBought => "InvestmentFundBought",
    InvestmentFundSold => "InvestmentFundSold",
    GoldBought => "GoldBought",
    GoldSold => "GoldSold",
    GoldPriced => "GoldPriced",
    EtfBought => "ETFBought",
    EtfSold => "ETFSold",
    EtfPriced => "ETFPriced",
});

impl FromStr for EventKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownEventKind(s.to_string()))
    }
}

const CASH_FLOW: &[FieldDescriptor] = &[
    required("amount", FieldKind::Number),
    required("currency", FieldKind::Text),
    required("title", FieldKind::Text),
];

const BONDS_TRADE: &[FieldDescriptor] = &[
    required("balance", FieldKind::Number),
    required("totalValue", FieldKind::Number),
    required("currency", FieldKind::Text),
    required("units", FieldKind::Number),
    required("pricePerUnit", FieldKind::Number),
];

const BONDS_PRICED: &[FieldDescriptor] = &[
    required("balance", FieldKind::Number),
    required("currency", FieldKind::Text),
    required("units", FieldKind::Number),
    required("pricePerUnit", FieldKind::Number),
];

const TERM_DEPOSIT: &[FieldDescriptor] = &[
    required("balance", FieldKind::Number),
    required("amount", FieldKind::Number),
    required("currency", FieldKind::Text),
];

const FUND_TRADE: &[FieldDescriptor] = &[
    required("balance", FieldKind::Number),
    required("totalValue", FieldKind::Number),
    required("currency", FieldKind::Text),
];

const GOLD_BOUGHT: &[FieldDescriptor] = &[
    required("balance", FieldKind::Number),
    required("totalValue", FieldKind::Number),
    required("currency", FieldKind::Text),
    required("weight", FieldKind::Number),
    required("totalWeight", FieldKind::Number),
    required("unitPrice", FieldKind::Number),
    required("seller", FieldKind::Text),
    required("goldSource", FieldKind::Text),
];

const GOLD_SOLD: &[FieldDescriptor] = &[
    required("balance", FieldKind::Number),
    required("totalValue", FieldKind::Number),
    required("currency", FieldKind::Text),
    required("weight", FieldKind::Number),
    required("totalWeight", FieldKind::Number),
    required("unitPrice", FieldKind::Number),
    required("buyer", FieldKind::Text),
    required("goldSource", FieldKind::Text),
    optional("comment", FieldKind::Text),
];

const GOLD_PRICED: &[FieldDescriptor] = &[
    required("balance", FieldKind::Number),
    required("currency", FieldKind::Text),
    required("totalWeight", FieldKind::Number),
    required("unitPrice", FieldKind::Number),
];

const ETF_BOUGHT: &[FieldDescriptor] = &[
    required("averagePrice", FieldKind::Number),
    required("balance", FieldKind::Number),
    required("currency", FieldKind::Text),
    required("totalValue", FieldKind::Number),
    required("units", FieldKind::Number),
];

const ETF_SOLD: &[FieldDescriptor] = &[
    required("averagePrice", FieldKind::Number),
    required("balance", FieldKind::Number),
    optional("comment", FieldKind::Text),
    required("currency", FieldKind::Text),
    required("totalValue", FieldKind::Number),
    required("units", FieldKind::Number),
];

const ETF_PRICED: &[FieldDescriptor] = &[
    required("averagePrice", FieldKind::Number),
    required("balance", FieldKind::Number),
    required("currency", FieldKind::Text),
    required("units", FieldKind::Number),
];

impl EventKind {
    pub fn required_fields(self) -> &'static [FieldDescriptor] {
        use EventKind::*;
        match self {
            MoneyWithdrawn | MoneyDeposited => CASH_FLOW,
            TreasuryBondsBought | TreasuryBondsMatured => BONDS_TRADE,
            TreasuryBondsPriced => BONDS_PRICED,
            TermDepositOpened | TermDepositFinished => TERM_DEPOSIT,
            InvestmentFundBought | InvestmentFundSold => FUND_TRADE,
            GoldBought => GOLD_BOUGHT,
            GoldSold => GOLD_SOLD,
            GoldPriced => GOLD_PRICED,
            EtfBought => ETF_BOUGHT,
            EtfSold => ETF_SOLD,
            EtfPriced => ETF_PRICED,
        }
    }

    pub fn allowed_for(self, category: StreamCategory) -> bool {
        category.event_kinds().contains(&self)
    }
}

/// Body of a create-stream request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStreamRequest {
    #[serde(rename = "type")]
    pub stream_type: StreamCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtype: Option<StreamSubtype>,
    pub name: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl NewStreamRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::BlankName);
        }
        match self.subtype {
            Some(subtype) if subtype.category() != self.stream_type => {
                return Err(ValidationError::SubtypeMismatch {
                    category: self.stream_type,
                    subtype,
                });
            }
            None if !self.stream_type.subtypes().is_empty() => {
                return Err(ValidationError::MissingSubtype(self.stream_type));
            }
            _ => {}
        }
        check_fields(self.stream_type.required_metadata(), &self.metadata)
    }
}

/// An event being filled in for an existing stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub stream_id: String,
    pub category: StreamCategory,
    pub kind: EventKind,
    pub occured_at: NaiveDate,
    pub fields: BTreeMap<String, String>,
}

/// Body of an append-event request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEventRequest {
    pub stream_id: String,
    pub event_type: EventKind,
    pub occured_at: NaiveDate,
    pub data: BTreeMap<String, serde_json::Value>,
}

impl EventDraft {
    /// Validate and convert into a request body; numbers become JSON numbers.
    pub fn validate(&self) -> Result<NewEventRequest, ValidationError> {
        if self.stream_id.trim().is_empty() {
            return Err(ValidationError::MissingStream);
        }
        if !self.kind.allowed_for(self.category) {
            return Err(ValidationError::EventNotAllowed {
                category: self.category,
                kind: self.kind,
            });
        }
        let descriptors = self.kind.required_fields();
        check_fields(descriptors, &self.fields)?;

        let mut data = BTreeMap::new();
        for descriptor in descriptors {
            let Some(raw) = self.fields.get(descriptor.name).map(|v| v.trim()) else {
                continue;
            };
            if raw.is_empty() {
                continue;
            }
            let value = match descriptor.kind {
                FieldKind::Number => raw
                    .parse::<f64>()
                    .ok()
                    .and_then(serde_json::Number::from_f64)
                    .map(serde_json::Value::Number)
                    .ok_or_else(|| ValidationError::NotANumber {
                        field: descriptor.name,
                        value: raw.to_string(),
                    })?,
                FieldKind::Flag => serde_json::Value::Bool(raw == "true"),
                FieldKind::Text | FieldKind::Url => serde_json::Value::String(raw.to_string()),
            };
            data.insert(descriptor.name.to_string(), value);
        }

        Ok(NewEventRequest {
            stream_id: self.stream_id.trim().to_string(),
            event_type: self.kind,
            occured_at: self.occured_at,
            data,
        })
    }
}

/// Quick investment event type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentEventType {
    #[default]
    Buy,
    Sell,
    PriceUpdate,
}

impl FromStr for InvestmentEventType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buy" => Ok(Self::Buy),
            "sell" => Ok(Self::Sell),
            "price_update" => Ok(Self::PriceUpdate),
            other => Err(ValidationError::UnknownEventKind(other.to_string())),
        }
    }
}

/// The buy / sell / price-update form for investment streams.
///
/// Amounts are kept as the raw text the user typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvestmentEventForm {
    pub stream_id: String,
    pub event_type: InvestmentEventType,
    pub occured_at: Option<NaiveDate>,
    pub units: String,
    pub total_value: String,
    pub price_per_unit: String,
    pub comment: String,
}

/// Body of the investment event request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvestmentEventRequest {
    pub stream_id: String,
    pub event_type: InvestmentEventType,
    pub occured_at: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_per_unit: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Backend reply to an investment event request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateInvestmentEventResponse {
    pub result: String,
    #[serde(default)]
    pub details: Option<String>,
}

impl CreateInvestmentEventResponse {
    pub fn is_success(&self) -> bool {
        self.result == "Success"
    }

    /// Message to show the user when the request did not succeed.
    pub fn failure_message(&self) -> Option<&str> {
        if self.is_success() {
            return None;
        }
        Some(
            self.details
                .as_deref()
                .filter(|d| !d.is_empty())
                .unwrap_or("Failed to create event"),
        )
    }
}

fn positive(raw: &str, label: &'static str) -> Result<f64, ValidationError> {
    let raw = raw.trim();
    match parse_lenient(raw) {
        Some(v) if !raw.is_empty() && v > 0.0 => Ok(v),
        _ => Err(ValidationError::NotPositive(label)),
    }
}

impl InvestmentEventForm {
    pub fn validate(&self) -> Result<CreateInvestmentEventRequest, ValidationError> {
        if self.stream_id.trim().is_empty() {
            return Err(ValidationError::MissingStream);
        }
        let occured_at = self
            .occured_at
            .ok_or(ValidationError::MissingField("occuredAt"))?;

        let (units, total_value, price_per_unit) = match self.event_type {
            InvestmentEventType::PriceUpdate => {
                (None, None, Some(positive(&self.price_per_unit, "Price per unit")?))
            }
            InvestmentEventType::Buy | InvestmentEventType::Sell => (
                Some(positive(&self.units, "Units")?),
                Some(positive(&self.total_value, "Total value")?),
                None,
            ),
        };

        let comment = self.comment.trim();
        Ok(CreateInvestmentEventRequest {
            stream_id: self.stream_id.clone(),
            event_type: self.event_type,
            occured_at,
            units,
            total_value,
            price_per_unit,
            comment: (!comment.is_empty()).then(|| comment.to_string()),
        })
    }
}
