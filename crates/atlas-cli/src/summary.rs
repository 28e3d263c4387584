//! Terminal rendering of command results.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use atlas_analytics::{ColumnProfile, Distribution, Performance, PerformancePoint};
use atlas_model::format_numeric;

use crate::commands::{BuildResult, ResolveRow};

/// Value counts shown per categorical column.
const MAX_VALUE_COUNTS: usize = 5;

pub fn print_build_summary(result: &BuildResult) {
    let snapshot = &result.snapshot;
    let report = snapshot.report();
    println!("Registry: {}", snapshot.registry_version());
    if let Some(path) = &result.output {
        println!("Output: {}", path.display());
    }

    let mut table = Table::new();
    table.set_header(vec![header_cell("Metric"), header_cell("Value")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("Countries"), Cell::new(snapshot.height())]);
    table.add_row(vec![
        Cell::new("Columns"),
        Cell::new(snapshot.columns().len()),
    ]);
    for (method, count) in &report.counts {
        table.add_row(vec![Cell::new(format!("Names resolved: {method}")), Cell::new(count)]);
    }
    table.add_row(vec![
        Cell::new("Countries without data"),
        count_cell(result.empty.len(), Color::Yellow),
    ]);
    println!("{table}");

    if !report.fuzzy.is_empty() {
        let mut fuzzy = Table::new();
        fuzzy.set_header(vec![
            header_cell("Source name"),
            header_cell("Matched"),
            header_cell("Score"),
        ]);
        apply_table_style(&mut fuzzy);
        align_column(&mut fuzzy, 2, CellAlignment::Right);
        for (raw, matched) in &report.fuzzy {
            fuzzy.add_row(vec![
                Cell::new(raw),
                Cell::new(&matched.canonical),
                Cell::new(format!("{:.1}", matched.score)),
            ]);
        }
        println!();
        println!("Fuzzy matches:");
        println!("{fuzzy}");
    }

    if !report.misses.is_empty() {
        let mut misses = Table::new();
        misses.set_header(vec![header_cell("Unresolved name"), header_cell("Best score")]);
        apply_table_style(&mut misses);
        align_column(&mut misses, 1, CellAlignment::Right);
        for (raw, best) in &report.misses {
            misses.add_row(vec![
                Cell::new(raw).fg(Color::Yellow),
                dim_cell(format!("{best:.1}")),
            ]);
        }
        println!();
        println!("Unresolved (kept without ISO3):");
        println!("{misses}");
    }
}

pub fn resolution_table(rows: &[ResolveRow]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Input"),
        header_cell("Canonical"),
        header_cell("ISO3"),
        header_cell("Method"),
        header_cell("Score"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 4, CellAlignment::Right);
    for row in rows {
        let method = match row.method {
            "miss" => Cell::new(row.method).fg(Color::Yellow),
            "fuzzy" => Cell::new(row.method).fg(Color::Cyan),
            "excluded" => dim_cell(row.method),
            _ => Cell::new(row.method),
        };
        table.add_row(vec![
            Cell::new(&row.input),
            Cell::new(&row.canonical),
            optional_cell(row.iso3.as_deref()),
            method,
            optional_cell(row.score.map(|s| format!("{s:.1}")).as_deref()),
        ]);
    }
    table
}

pub fn profile_table(profiles: &[ColumnProfile]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Count"),
        header_cell("Missing"),
        header_cell("Mean"),
        header_cell("Std"),
        header_cell("Min"),
        header_cell("Median"),
        header_cell("Max"),
        header_cell("Top values"),
    ]);
    apply_table_style(&mut table);
    for index in 1..8 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for column in profiles {
        let row = match &column.distribution {
            Distribution::Numeric(summary) => vec![
                Cell::new(&column.column),
                Cell::new(summary.count),
                Cell::new(summary.missing),
                number_cell(summary.mean),
                number_cell(summary.std),
                number_cell(summary.min),
                number_cell(summary.median),
                number_cell(summary.max),
                dim_cell("-"),
            ],
            Distribution::Categorical { value_counts } => {
                let missing = value_counts
                    .iter()
                    .find(|v| v.value.is_none())
                    .map_or(0, |v| v.count);
                let present: usize = value_counts
                    .iter()
                    .filter(|v| v.value.is_some())
                    .map(|v| v.count)
                    .sum();
                let top = value_counts
                    .iter()
                    .filter_map(|v| v.value.as_ref().map(|value| format!("{value} ({})", v.count)))
                    .take(MAX_VALUE_COUNTS)
                    .collect::<Vec<_>>()
                    .join(", ");
                vec![
                    Cell::new(&column.column),
                    Cell::new(present),
                    Cell::new(missing),
                    dim_cell("-"),
                    dim_cell("-"),
                    dim_cell("-"),
                    dim_cell("-"),
                    dim_cell("-"),
                    Cell::new(top),
                ]
            }
        };
        table.add_row(row);
    }
    table
}

pub fn print_performance(result: &Performance) {
    let transform = if result.log_x { "ln " } else { "" };
    println!(
        "Fit: {y} = {a} + {b} * {transform}{x}",
        y = result.y,
        x = result.x,
        a = format_numeric(round(result.intercept)),
        b = format_numeric(round(result.slope)),
    );
    println!("Countries in fit: {}", result.points.len());
    println!();
    println!("Over-performers:");
    println!("{}", performer_table(&result.over, Color::Green));
    println!();
    println!("Under-performers:");
    println!("{}", performer_table(&result.under, Color::Red));
}

fn performer_table(points: &[PerformancePoint], color: Color) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Country"),
        header_cell("ISO3"),
        header_cell("Actual"),
        header_cell("Expected"),
        header_cell("Residual"),
    ]);
    apply_table_style(&mut table);
    for index in 2..5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for point in points {
        table.add_row(vec![
            Cell::new(&point.country),
            optional_cell(point.iso3.as_deref()),
            number_cell(Some(point.y)),
            number_cell(Some(point.expected)),
            Cell::new(format_numeric(round(point.residual)))
                .fg(color)
                .add_attribute(Attribute::Bold),
        ]);
    }
    table
}

fn round(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

fn number_cell(value: Option<f64>) -> Cell {
    match value {
        Some(v) => Cell::new(format_numeric(round(v))),
        None => dim_cell("-"),
    }
}

fn optional_cell(value: Option<&str>) -> Cell {
    match value {
        Some(v) => Cell::new(v),
        None => dim_cell("-"),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value.to_string()).fg(Color::DarkGrey)
}
