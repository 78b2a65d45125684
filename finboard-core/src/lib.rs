//! Finboard Core — tabular rendering and data shaping for a personal-finance dashboard.
//!
//! This crate contains everything the dashboard hosts share:
//! - Render policy and the tabular renderer (rank column, color dots, row roles)
//! - Locale-aware currency and percentage formatting
//! - Injectable color palette
//! - Grid sources for CSV and JSON files
//! - Stream and event catalog with request validation
//! - View shaping of backend responses into tables, indicators and charts

pub mod chart;
pub mod config;
pub mod format;
pub mod grid;
pub mod palette;
pub mod policy;
pub mod renderer;
pub mod source;
pub mod streams;
pub mod views;

pub use format::{Formatter, Locale};
pub use grid::{AugmentedGrid, Cell, RawGrid};
pub use palette::{Color, Palette};
pub use policy::RenderPolicy;
pub use renderer::{DisplayValue, RenderedRow, RenderedTable, RowRole, TabularRenderer};
