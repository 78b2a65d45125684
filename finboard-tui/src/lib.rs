//! Finboard TUI - Terminal viewer for dashboard tables
//!
//! Provides interactive browsing of rendered tables with:
//! - One tab per loaded file, placeholder tab for missing data
//! - Rank column, color dots and bold header/summary rows
//! - Row activation resolving entity ids onto the status line

pub mod app;
pub mod input;
pub mod table_view;
pub mod theme;
pub mod ui;

pub use app::App;
pub use input::handle_key;
pub use theme::Theme;
