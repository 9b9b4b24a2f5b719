// ********* Input data structures ***********

use std::fmt::Display;

use chrono::{Duration, NaiveDate};
use snafu::Snafu;

/// The content of one cell of the input spreadsheet.
///
/// The variants follow what spreadsheet readers report, so that the input can be
/// written back without losing its types.
#[derive(PartialEq, Debug, Clone)]
pub enum Cell {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// A date-time, as a serial number of days in the 1900 date system.
    DateTime(f64),
    /// An error value such as `#N/A` or `#DIV/0!`.
    Error(String),
}

impl Cell {
    /// The string form of the cell, or None when the cell counts as missing.
    pub fn as_name(&self, options: &ExtractOptions) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) if s.trim().is_empty() => None,
            // Error cells read as their text, so only `#N/A` and the like are missing.
            Cell::Text(s) | Cell::Error(s) if options.missing_markers.iter().any(|m| m == s) => {
                None
            }
            Cell::Text(s) | Cell::Error(s) => Some(s.clone()),
            Cell::Int(i) => Some(i.to_string()),
            Cell::Float(f) if f.is_nan() => None,
            Cell::Float(f) => Some(f.to_string()),
            Cell::Bool(true) => Some("True".to_string()),
            Cell::Bool(false) => Some("False".to_string()),
            Cell::DateTime(serial) => Some(format_serial_date_time(*serial)),
        }
    }
}

// Day 0 of the 1900 date system, accounting for the 1900 leap year bug.
fn format_serial_date_time(serial: f64) -> String {
    let millis = (serial * 86_400_000.0).round() as i64;
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .and_then(|base| {
            Duration::try_milliseconds(millis).and_then(|d| base.checked_add_signed(d))
        })
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| serial.to_string())
}

static EMPTY_CELL: Cell = Cell::Empty;

/// A table as read from the input file.
///
/// The header row, if any, only carries labels. It is never part of the data and
/// columns are always matched by position.
#[derive(PartialEq, Debug, Clone)]
pub struct InputTable {
    pub(crate) header: Option<Vec<Cell>>,
    pub(crate) rows: Vec<Vec<Cell>>,
    pub(crate) width: usize,
}

impl InputTable {
    pub fn header(&self) -> Option<&[Cell]> {
        self.header.as_deref()
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// The number of columns: the widest of the header and all the rows.
    pub fn width(&self) -> usize {
        self.width
    }

    /// The cell at the given position. Rows shorter than the table read as empty past their end.
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    /// The cells of one column, in row order.
    pub fn column(&self, col: usize) -> impl Iterator<Item = &Cell> + '_ {
        (0..self.rows.len()).map(move |row| self.cell(row, col))
    }
}

/// The text values that count as a missing cell.
pub const DEFAULT_MISSING_MARKERS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Options for turning cells into names.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ExtractOptions {
    /// Text values treated as missing cells. Matched exactly.
    pub missing_markers: Vec<String>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        ExtractOptions {
            missing_markers: DEFAULT_MISSING_MARKERS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

// ******** Output data structures *********

/// The status of a resident. The order of the variants is the order of the columns
/// in the input, and the order used in every output.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum Category {
    Affected,
    Isolated,
    Fine,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Affected, Category::Isolated, Category::Fine];

    /// The position of the input column holding this category.
    pub fn column(self) -> usize {
        match self {
            Category::Affected => 0,
            Category::Isolated => 1,
            Category::Fine => 2,
        }
    }

    /// The label in the status column of the tidy table.
    pub fn label(self) -> &'static str {
        match self {
            Category::Affected => "affected",
            Category::Isolated => "isolated",
            Category::Fine => "fine",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Category::Affected => "Affected",
            Category::Isolated => "Isolated",
            Category::Fine => "Fine",
        }
    }

    pub fn report_header(self) -> String {
        format!("Residents who are {}", self.title())
    }

    pub fn summary_label(self) -> &'static str {
        match self {
            Category::Affected => "Number of residents affected",
            Category::Isolated => "Number of residents isolated",
            Category::Fine => "Number of residents who are fine",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// The names of the residents in one category, in row order. Never contains an empty name.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct StatusList {
    pub category: Category,
    pub names: Vec<String>,
}

impl StatusList {
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct StatusLists {
    pub affected: StatusList,
    pub isolated: StatusList,
    pub fine: StatusList,
}

impl StatusLists {
    /// The three lists, in category order.
    pub fn iter(&self) -> impl Iterator<Item = &StatusList> {
        [&self.affected, &self.isolated, &self.fine].into_iter()
    }

    pub fn get(&self, category: Category) -> &StatusList {
        match category {
            Category::Affected => &self.affected,
            Category::Isolated => &self.isolated,
            Category::Fine => &self.fine,
        }
    }
}

/// The number of residents in each category, in category order.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Summary {
    pub counts: Vec<(Category, u64)>,
}

impl Summary {
    pub fn count(&self, category: Category) -> u64 {
        self.counts
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|(_, n)| n).sum()
    }
}

/// One row of the tidy table.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TidyRecord {
    pub name: String,
    pub status: Category,
}

impl TidyRecord {
    pub fn status_label(&self) -> &'static str {
        self.status.label()
    }
}

/// Everything produced from one input table.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Processed {
    pub lists: StatusLists,
    pub summary: Summary,
    pub report: Vec<u8>,
    pub tidy: Vec<TidyRecord>,
}

/// Errors that prevent a table from being processed.
#[derive(Eq, PartialEq, Debug, Clone, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ShapeError {
    #[snafu(display(
        "Your Excel needs at least three columns (Affected, Isolated, Fine), found {columns}"
    ))]
    TooFewColumns { columns: usize },
}
