//! BDD tests for the tabular renderer
//!
//! These tests walk through the dashboard scenarios end to end:
//! - Summary table with a currency column
//! - Placeholder substitution for empty data
//! - Row activation resolving entity ids
//! - Tables loaded from files on disk

use std::io::Write;

use finboard_core::grid::{placeholder, RawGrid};
use finboard_core::source::{source_for_path, GridSource};
use finboard_core::{DisplayValue, Formatter, RenderPolicy, RowRole, TabularRenderer};

#[test]
fn bdd_scenario_summary_table_with_currency_column() {
    // GIVEN a grid with two accounts and a total row
    let grid = RawGrid::from_rows([
        ["Checking", "1000", "50%"],
        ["Savings", "1000", "50%"],
        ["Total", "2000", ""],
    ]);

    // AND a policy with a bold last row and amounts in column 2
    let policy = RenderPolicy {
        bold_last_row: true,
        currency_column_index: Some(2),
        ..RenderPolicy::default()
    };
    let renderer = TabularRenderer::with_policy(policy);

    // WHEN the grid is augmented
    let augmented = renderer.augment(&grid);

    // THEN data rows are ranked and the total row is not
    assert_eq!(
        augmented.to_text_rows(),
        vec![
            vec!["01", "Checking", "1000", "50%"],
            vec!["02", "Savings", "1000", "50%"],
            vec!["", "Total", "2000", ""],
        ]
    );

    // AND the last row is the summary
    assert_eq!(renderer.classify_row(&augmented, 2), RowRole::Summary);
    assert_eq!(renderer.classify_row(&augmented, 0), RowRole::Normal);

    // AND amounts render as złoty
    let rendered = renderer.render(&augmented);
    assert_eq!(
        rendered.rows[0].cells[2],
        DisplayValue::Text("1000,00\u{a0}zł".into())
    );
    assert_eq!(
        rendered.rows[2].cells[2],
        DisplayValue::Text("2000,00\u{a0}zł".into())
    );
    assert!(rendered.rows[2].role.is_emphasized());
}

#[test]
fn bdd_scenario_empty_data_shows_placeholder() {
    // GIVEN an empty grid
    let grid = RawGrid::default();

    // WHEN a host renders it
    let renderer = TabularRenderer::default();
    let augmented = renderer.augment(&grid);

    // THEN the renderer produces nothing and does not panic
    assert!(augmented.is_empty());
    assert!(renderer.render(&augmented).rows.is_empty());

    // AND the host substitutes the placeholder with its own policy
    let (grid, policy) = placeholder();
    let renderer = TabularRenderer::with_policy(policy);
    let rendered = renderer.render(&renderer.augment(&grid));
    assert_eq!(rendered.rows.len(), 5);
    assert_eq!(rendered.rows[0].cells[0].as_plain(), "01");
    assert!(matches!(rendered.rows[0].cells[2], DisplayValue::Dot(_)));
    assert_eq!(rendered.rows[4].role, RowRole::Summary);
    assert_eq!(rendered.rows[4].cells[2], DisplayValue::Empty);
}

#[test]
fn bdd_scenario_activation_past_known_ids() {
    // GIVEN a three-row table with ids for only two rows
    let grid = RawGrid::from_rows([["a"], ["b"], ["c"]]);
    let renderer =
        TabularRenderer::with_policy(RenderPolicy::default().with_row_ids(["a", "b"]));
    let augmented = renderer.augment(&grid);

    // WHEN the first and third rows are activated
    // THEN the first resolves and the third yields nothing
    assert_eq!(renderer.on_row_activated(0), Some("a"));
    assert_eq!(renderer.on_row_activated(2), None);

    // AND the rendered rows carry the same ids
    let rendered = renderer.render(&augmented);
    assert_eq!(rendered.rows[1].id.as_deref(), Some("b"));
    assert_eq!(rendered.rows[2].id, None);
}

#[test]
fn bdd_scenario_header_row_is_never_activated() {
    // GIVEN a table with a header row and ids for the data rows
    let grid = RawGrid::from_rows([["Name", "Balance"], ["Main", "10"], ["Spare", "5"]]);
    let policy = RenderPolicy {
        has_header_row: true,
        currency_column_index: Some(2),
        ..RenderPolicy::default()
    }
    .with_row_ids(["main", "spare"]);
    let renderer = TabularRenderer::with_policy(policy);

    // WHEN the header and data rows are activated
    // THEN the header yields nothing and data rows map past the header
    assert_eq!(renderer.on_row_activated(0), None);
    assert_eq!(renderer.on_row_activated(1), Some("main"));
    assert_eq!(renderer.on_row_activated(2), Some("spare"));

    // AND the header label is shown verbatim in the currency column
    let rendered = renderer.render(&renderer.augment(&grid));
    assert_eq!(rendered.rows[0].cells[2], DisplayValue::Text("Balance".into()));
    assert_eq!(rendered.rows[0].cells[0], DisplayValue::Empty);
}

#[test]
fn bdd_scenario_render_csv_file_from_disk() {
    // GIVEN a CSV file with an id column and a header record
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("accounts.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "id,name,total").unwrap();
    writeln!(file, "a1,Checking,12345.678").unwrap();
    drop(file);

    // WHEN it is loaded with the id column split off
    let source = source_for_path(&path, Some(0), true).unwrap();
    let loaded = source.load().unwrap();
    assert_eq!(source.name(), "accounts");

    // THEN the ids drive activation and amounts are formatted
    let policy = RenderPolicy {
        currency_column_index: Some(2),
        ..RenderPolicy::default()
    }
    .with_row_ids(loaded.row_ids.clone());
    let renderer = TabularRenderer::new(policy, Default::default(), Formatter::default());
    let rendered = renderer.render(&renderer.augment(&loaded.grid));
    assert_eq!(rendered.rows[0].id.as_deref(), Some("a1"));
    assert_eq!(
        rendered.rows[0].cells[2],
        DisplayValue::Text("12\u{a0}345,68\u{a0}zł".into())
    );
}
