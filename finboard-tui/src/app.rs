//! Application state: one tab per table, a row cursor per tab, a status line.

use std::path::PathBuf;

use tracing::{debug, error, info};

use finboard_core::config::{ConfigError, DashboardConfig};
use finboard_core::grid::placeholder;
use finboard_core::source::{source_for_path, GridSource, LoadedGrid};
use finboard_core::{AugmentedGrid, RenderPolicy, RenderedTable, TabularRenderer};

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// A rendered table with its own cursor.
#[derive(Debug, Clone)]
pub struct TableTab {
    pub title: String,
    pub renderer: TabularRenderer,
    pub grid: AugmentedGrid,
    pub rendered: RenderedTable,
    pub cursor: usize,
    /// Showing stand-in data; rows resolve to nothing.
    pub is_placeholder: bool,
}

impl TableTab {
    pub fn new(title: impl Into<String>, renderer: TabularRenderer, grid: AugmentedGrid) -> Self {
        let rendered = renderer.render(&grid);
        Self {
            title: title.into(),
            renderer,
            grid,
            rendered,
            cursor: 0,
            is_placeholder: false,
        }
    }

    pub fn placeholder(
        title: impl Into<String>,
        config: &DashboardConfig,
    ) -> Result<Self, ConfigError> {
        let (grid, policy) = placeholder();
        let renderer = config.renderer(Some(policy))?;
        let augmented = renderer.augment(&grid);
        Ok(Self {
            is_placeholder: true,
            ..Self::new(title, renderer, augmented)
        })
    }

    /// Build a tab from loaded data; no rows yields the placeholder.
    pub fn from_loaded(
        title: impl Into<String>,
        loaded: LoadedGrid,
        policy: Option<&RenderPolicy>,
        config: &DashboardConfig,
    ) -> Result<Self, ConfigError> {
        if loaded.grid.is_empty() {
            return Self::placeholder(title, config);
        }
        let mut policy = policy.cloned().unwrap_or_else(|| config.table.clone());
        if !loaded.row_ids.is_empty() {
            policy.row_ids = loaded.row_ids;
        }
        let renderer = config.renderer(Some(policy))?;
        let augmented = renderer.augment(&loaded.grid);
        Ok(Self::new(title, renderer, augmented))
    }

    pub fn len(&self) -> usize {
        self.rendered.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rendered.rows.is_empty()
    }

    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.len() {
            self.cursor += 1;
        }
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_to_top(&mut self) {
        self.cursor = 0;
    }

    pub fn move_to_bottom(&mut self) {
        self.cursor = self.len().saturating_sub(1);
    }

    /// Entity id of the row under the cursor.
    pub fn activate(&self) -> Option<&str> {
        if self.is_placeholder {
            return None;
        }
        self.renderer.on_row_activated(self.cursor)
    }
}

/// Top-level application state.
#[derive(Debug)]
pub struct App {
    pub tabs: Vec<TableTab>,
    pub active_tab: usize,
    pub running: bool,
    pub status_message: Option<(String, StatusLevel)>,
}

impl App {
    /// An app over `tabs`; no tabs at all shows a single placeholder tab.
    pub fn new(mut tabs: Vec<TableTab>, config: &DashboardConfig) -> Result<Self, ConfigError> {
        if tabs.is_empty() {
            tabs.push(TableTab::placeholder("Overview", config)?);
        }
        Ok(Self {
            tabs,
            active_tab: 0,
            running: true,
            status_message: None,
        })
    }

    /// Load one tab per file. Unreadable files become placeholder tabs
    /// and leave an error on the status line.
    pub fn from_paths(
        paths: &[PathBuf],
        policy: Option<&RenderPolicy>,
        config: &DashboardConfig,
    ) -> Result<Self, ConfigError> {
        let mut tabs = Vec::with_capacity(paths.len());
        let mut failures = Vec::new();
        for path in paths {
            match source_for_path(path, None, false) {
                Ok(source) => {
                    tabs.push(Self::load_tab(source.as_ref(), policy, config, &mut failures)?)
                }
                Err(err) => {
                    error!(path = %path.display(), error = %err, "cannot open grid");
                    failures.push(err.to_string());
                    tabs.push(TableTab::placeholder(path.display().to_string(), config)?);
                }
            }
        }

        let mut app = Self::new(tabs, config)?;
        if let Some(first) = failures.first() {
            app.set_error(format!("{} file(s) failed to load: {first}", failures.len()));
        }
        Ok(app)
    }

    fn load_tab(
        source: &dyn GridSource,
        policy: Option<&RenderPolicy>,
        config: &DashboardConfig,
        failures: &mut Vec<String>,
    ) -> Result<TableTab, ConfigError> {
        match source.load() {
            Ok(loaded) => {
                info!(source = %source.name(), rows = loaded.grid.len(), "loaded table");
                TableTab::from_loaded(source.name(), loaded, policy, config)
            }
            Err(err) => {
                error!(source = %source.name(), error = %err, "cannot load grid");
                failures.push(err.to_string());
                TableTab::placeholder(source.name(), config)
            }
        }
    }

    pub fn active(&self) -> &TableTab {
        &self.tabs[self.active_tab]
    }

    pub fn active_mut(&mut self) -> &mut TableTab {
        &mut self.tabs[self.active_tab]
    }

    pub fn next_tab(&mut self) {
        self.active_tab = (self.active_tab + 1) % self.tabs.len();
    }

    pub fn prev_tab(&mut self) {
        self.active_tab = (self.active_tab + self.tabs.len() - 1) % self.tabs.len();
    }

    /// Resolve the row under the cursor and report it on the status line.
    pub fn activate_selected(&mut self) {
        let tab = self.active();
        let row = tab.cursor;
        let outcome = tab.activate().map(str::to_string);
        let title = tab.title.clone();
        let is_placeholder = tab.is_placeholder;

        match outcome {
            Some(id) => {
                info!(tab = %title, row, id = %id, "row activated");
                self.set_status(format!("Selected {id}"));
            }
            None if is_placeholder => {
                self.set_warning("Placeholder data, nothing to select");
            }
            None => {
                debug!(tab = %title, row, "row has no id");
                self.set_warning(format!("Row {} has no id", row + 1));
            }
        }
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Error));
    }
}
