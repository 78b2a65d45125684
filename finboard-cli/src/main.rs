//! Finboard CLI — render dashboard tables and build backend requests.
//!
//! Commands:
//! - `render` — render a CSV/JSON grid as aligned text or JSON
//! - `activate` — resolve a row of a grid to its entity id
//! - `catalog` — list stream categories, metadata and event fields
//! - `event` — validate an investment event and print its request body
//! - `stream` — validate a new stream and print its request body
//! - `format` — format a currency amount or a percentage

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use finboard_core::config::{load_config, load_policy, DashboardConfig};
use finboard_core::grid::placeholder;
use finboard_core::source::source_for_path;
use finboard_core::streams::{
    FieldDescriptor, InvestmentEventForm, NewStreamRequest, StreamCategory, StreamSubtype,
};
use finboard_core::{AugmentedGrid, RenderedTable, RowRole, TabularRenderer};

#[derive(Parser)]
#[command(
    name = "finboard",
    about = "Finboard CLI — personal finance dashboard tables and forms"
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, default_value_t = false, global = true)]
    quiet: bool,

    /// Dashboard config file (TOML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a grid file; empty files show the placeholder table.
    Render {
        /// CSV or JSON grid file.
        file: PathBuf,

        #[command(flatten)]
        table: TableArgs,

        /// Print the rendered table as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Resolve a row (zero-based, header included) to its entity id.
    Activate {
        file: PathBuf,

        #[arg(long)]
        row: usize,

        #[command(flatten)]
        table: TableArgs,
    },
    /// List stream categories with their metadata and event fields.
    Catalog {
        /// Only this category (account, investment, stocks, retirement, real-estate).
        category: Option<String>,
    },
    /// Validate an investment event and print the request body.
    Event {
        #[arg(long)]
        stream_id: String,

        /// buy, sell or price_update.
        #[arg(long = "type", default_value = "buy")]
        event_type: String,

        /// Date of the event (YYYY-MM-DD).
        #[arg(long)]
        date: String,

        #[arg(long)]
        units: Option<String>,

        #[arg(long)]
        total_value: Option<String>,

        #[arg(long)]
        price_per_unit: Option<String>,

        #[arg(long)]
        comment: Option<String>,
    },
    /// Validate a new stream and print the request body.
    Stream {
        #[arg(long)]
        category: String,

        #[arg(long)]
        subtype: Option<String>,

        #[arg(long)]
        name: String,

        /// Metadata entry, repeatable (e.g. --meta alias=main).
        #[arg(long = "meta")]
        meta: Vec<String>,
    },
    /// Format a value the way the dashboard shows it.
    Format {
        #[command(subcommand)]
        kind: FormatKind,
    },
}

#[derive(clap::Args)]
struct TableArgs {
    /// Render policy file (TOML). Defaults to the config's [table] section.
    #[arg(long)]
    policy: Option<PathBuf>,

    /// Column holding entity ids; removed from the displayed grid.
    #[arg(long)]
    id_column: Option<usize>,

    /// Drop the first CSV record.
    #[arg(long, default_value_t = false)]
    csv_headers: bool,
}

#[derive(Subcommand)]
enum FormatKind {
    /// Amount, parsed leniently ("1000 PLN" is 1000).
    Currency { value: String },
    /// Fraction, 0.5 is 50%.
    Percent { value: f64 },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Render { file, table, json } => run_render(&config, &file, &table, json),
        Commands::Activate { file, row, table } => run_activate(&config, &file, &table, row),
        Commands::Catalog { category } => run_catalog(category.as_deref()),
        Commands::Event {
            stream_id,
            event_type,
            date,
            units,
            total_value,
            price_per_unit,
            comment,
        } => {
            let form = InvestmentEventForm {
                stream_id,
                event_type: event_type.parse()?,
                occured_at: Some(parse_date(&date)?),
                units: units.unwrap_or_default(),
                total_value: total_value.unwrap_or_default(),
                price_per_unit: price_per_unit.unwrap_or_default(),
                comment: comment.unwrap_or_default(),
            };
            let request = form.validate()?;
            println!("{}", serde_json::to_string_pretty(&request)?);
            Ok(())
        }
        Commands::Stream {
            category,
            subtype,
            name,
            meta,
        } => {
            let request = NewStreamRequest {
                stream_type: category.parse()?,
                subtype: subtype
                    .as_deref()
                    .map(str::parse::<StreamSubtype>)
                    .transpose()?,
                name,
                metadata: parse_meta(&meta)?,
            };
            request.validate()?;
            println!("{}", serde_json::to_string_pretty(&request)?);
            Ok(())
        }
        Commands::Format { kind } => {
            let formatter = config.formatter();
            match kind {
                FormatKind::Currency { value } => println!("{}", formatter.currency_str(&value)),
                FormatKind::Percent { value } => println!("{}", formatter.percentage(value)),
            }
            Ok(())
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        LevelFilter::ERROR
    } else {
        match verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("invalid date '{s}'"))
}

fn parse_meta(entries: &[String]) -> Result<BTreeMap<String, String>> {
    let mut metadata = BTreeMap::new();
    for entry in entries {
        let Some((key, value)) = entry.split_once('=') else {
            bail!("metadata entry '{entry}' is not key=value");
        };
        metadata.insert(key.trim().to_string(), value.trim().to_string());
    }
    Ok(metadata)
}

/// Load a grid file and pick the renderer for it.
///
/// Empty files fall back to the placeholder table and its policy.
fn load_table(
    config: &DashboardConfig,
    file: &Path,
    args: &TableArgs,
) -> Result<(TabularRenderer, AugmentedGrid)> {
    let source = source_for_path(file, args.id_column, args.csv_headers)?;
    let loaded = source.load()?;

    if loaded.grid.is_empty() {
        info!(source = %source.name(), "no rows, showing placeholder");
        let (grid, policy) = placeholder();
        let renderer = config.renderer(Some(policy))?;
        let augmented = renderer.augment(&grid);
        return Ok((renderer, augmented));
    }

    let mut policy = match &args.policy {
        Some(path) => load_policy(path)?,
        None => config.table.clone(),
    };
    if !loaded.row_ids.is_empty() {
        policy.row_ids = loaded.row_ids;
    }
    debug!(source = %source.name(), rows = loaded.grid.len(), "rendering grid");
    let renderer = config.renderer(Some(policy))?;
    let augmented = renderer.augment(&loaded.grid);
    Ok((renderer, augmented))
}

fn run_render(config: &DashboardConfig, file: &Path, args: &TableArgs, json: bool) -> Result<()> {
    let (renderer, augmented) = load_table(config, file, args)?;
    let rendered = renderer.render(&augmented);
    if json {
        println!("{}", serde_json::to_string_pretty(&rendered)?);
    } else {
        print!("{}", format_text(&rendered));
    }
    Ok(())
}

fn run_activate(config: &DashboardConfig, file: &Path, args: &TableArgs, row: usize) -> Result<()> {
    let (renderer, _) = load_table(config, file, args)?;
    match renderer.on_row_activated(row) {
        Some(id) => println!("{id}"),
        None => warn!(row, "row does not resolve to an id"),
    }
    Ok(())
}

fn run_catalog(category: Option<&str>) -> Result<()> {
    let categories = match category {
        Some(name) => vec![name.parse::<StreamCategory>()?],
        None => StreamCategory::ALL.to_vec(),
    };
    for category in categories {
        print!("{}", describe_category(category));
    }
    Ok(())
}

fn describe_fields(fields: &[FieldDescriptor]) -> String {
    fields
        .iter()
        .map(|f| {
            let optional = if f.optional { "?" } else { "" };
            format!("{}{optional}:{}", f.name, f.kind.as_str())
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn describe_category(category: StreamCategory) -> String {
    let mut out = format!("{category}\n");
    let subtypes: Vec<&str> = category.subtypes().iter().map(|s| s.as_str()).collect();
    if !subtypes.is_empty() {
        out.push_str(&format!("  subtypes: {}\n", subtypes.join(", ")));
    }
    let metadata = category.required_metadata();
    if !metadata.is_empty() {
        out.push_str(&format!("  metadata: {}\n", describe_fields(metadata)));
    }
    for kind in category.event_kinds() {
        out.push_str(&format!(
            "  {kind}: {}\n",
            describe_fields(kind.required_fields())
        ));
    }
    out
}

/// Left-aligned columns separated by two spaces; summary rows get a rule above.
fn format_text(table: &RenderedTable) -> String {
    let width = table.width();
    let mut widths = vec![0usize; width];
    for row in &table.rows {
        for (i, cell) in row.cells.iter().enumerate() {
            widths[i] = widths[i].max(cell.as_plain().chars().count());
        }
    }
    let rule_len = widths.iter().sum::<usize>() + 2 * width.saturating_sub(1);

    let mut out = String::new();
    for row in &table.rows {
        if row.role == RowRole::Summary && table.rows.len() > 1 {
            out.push_str(&"-".repeat(rule_len));
            out.push('\n');
        }
        let line = row
            .cells
            .iter()
            .zip(&widths)
            .map(|(cell, w)| {
                let text = cell.as_plain();
                let pad = w - text.chars().count();
                format!("{text}{}", " ".repeat(pad))
            })
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(line.trim_end());
        out.push('\n');
        if row.role == RowRole::Header {
            out.push_str(&"-".repeat(rule_len));
            out.push('\n');
        }
    }
    out
}
