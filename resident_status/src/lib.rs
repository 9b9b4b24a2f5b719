mod model;
use log::{debug, info};

use snafu::ensure;

pub mod builder;
pub mod manual;

pub use crate::model::*;

/// The minimum number of columns for a table to be processed.
pub const MIN_COLUMNS: usize = 3;

/// Checks that the table has enough columns to hold the three categories.
pub fn validate(table: &InputTable) -> Result<(), ShapeError> {
    debug!("validate: width: {:?}", table.width());
    ensure!(
        table.width() >= MIN_COLUMNS,
        TooFewColumnsSnafu {
            columns: table.width()
        }
    );
    Ok(())
}

/// Extracts the names in each category, with the default rules for missing cells.
///
/// The first three columns are taken by position: Affected, Isolated, Fine. Header
/// labels are ignored.
pub fn extract_status_lists(table: &InputTable) -> StatusLists {
    extract_status_lists_with(table, &ExtractOptions::default())
}

pub fn extract_status_lists_with(table: &InputTable, options: &ExtractOptions) -> StatusLists {
    let extract = |category: Category| -> StatusList {
        let names: Vec<String> = table
            .column(category.column())
            .filter_map(|cell| cell.as_name(options))
            .collect();
        debug!(
            "extract_status_lists: {}: {:?} names out of {:?} rows",
            category,
            names.len(),
            table.rows().len()
        );
        StatusList { category, names }
    };
    StatusLists {
        affected: extract(Category::Affected),
        isolated: extract(Category::Isolated),
        fine: extract(Category::Fine),
    }
}

pub fn summarize(lists: &StatusLists) -> Summary {
    Summary {
        counts: lists
            .iter()
            .map(|l| (l.category, l.len() as u64))
            .collect(),
    }
}

/// Renders the plain text report.
///
/// Each category starts with a header line, the categories after the first one are
/// preceded by a blank line. There is no newline at the end.
///
/// ```
/// use resident_status::builder::TableBuilder;
///
/// let mut builder = TableBuilder::new();
/// builder.add_row_simple(&["Alice", "Carol", "Dan"]);
/// let lists = resident_status::extract_status_lists(&builder.build());
///
/// let report = resident_status::render_text_report(&lists);
/// assert_eq!(
///     String::from_utf8(report).unwrap(),
///     "Residents who are Affected\nAlice\n\nResidents who are Isolated\nCarol\n\nResidents who are Fine\nDan"
/// );
/// ```
pub fn render_text_report(lists: &StatusLists) -> Vec<u8> {
    let mut lines: Vec<String> = Vec::new();
    for (idx, list) in lists.iter().enumerate() {
        if idx == 0 {
            lines.push(list.category.report_header());
        } else {
            lines.push(format!("\n{}", list.category.report_header()));
        }
        lines.extend(list.names.iter().cloned());
    }
    lines.join("\n").into_bytes()
}

pub fn build_tidy_table(lists: &StatusLists) -> Vec<TidyRecord> {
    lists
        .iter()
        .flat_map(|l| {
            l.names.iter().map(move |name| TidyRecord {
                name: name.clone(),
                status: l.category,
            })
        })
        .collect()
}

/// Runs all the steps on a table, with the default rules for missing cells.
///
/// Nothing is produced if the table does not have the right shape.
pub fn process(table: &InputTable) -> Result<Processed, ShapeError> {
    process_with(table, &ExtractOptions::default())
}

pub fn process_with(
    table: &InputTable,
    options: &ExtractOptions,
) -> Result<Processed, ShapeError> {
    info!(
        "Processing table: {:?} columns, {:?} rows",
        table.width(),
        table.rows().len()
    );
    validate(table)?;
    let lists = extract_status_lists_with(table, options);
    let summary = summarize(&lists);
    for (category, count) in summary.counts.iter() {
        info!("{}: {}", category.summary_label(), count);
    }
    let report = render_text_report(&lists);
    let tidy = build_tidy_table(&lists);
    debug!("process: tidy table: {:?} records", tidy.len());
    Ok(Processed {
        lists,
        summary,
        report,
        tidy,
    })
}
