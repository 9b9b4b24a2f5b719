pub use crate::model::*;

/// A builder for assembling an input table row by row.
///
/// This is what the file readers use; it keeps track of the width of the table.
///
/// ```
/// use resident_status::builder::TableBuilder;
/// use resident_status::Cell;
///
/// let mut builder = TableBuilder::new().header(vec![
///     Cell::Text("Affected".to_string()),
///     Cell::Text("Isolated".to_string()),
///     Cell::Text("Fine".to_string()),
/// ]);
/// builder.add_row_simple(&["Alice", "Carol", "Dan"]);
/// builder.add_row_simple(&["Bob", "", "Eve"]);
///
/// let table = builder.build();
/// assert_eq!(table.width(), 3);
/// assert_eq!(table.rows().len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct TableBuilder {
    _header: Option<Vec<Cell>>,
    _rows: Vec<Vec<Cell>>,
    _width: usize,
}

impl TableBuilder {
    pub fn new() -> TableBuilder {
        TableBuilder::default()
    }

    /// Sets the header row. The header only contributes to the width of the table.
    pub fn header(self, cells: Vec<Cell>) -> TableBuilder {
        TableBuilder {
            _width: self._width.max(cells.len()),
            _header: Some(cells),
            _rows: self._rows,
        }
    }

    pub fn add_row(&mut self, cells: Vec<Cell>) {
        self._width = self._width.max(cells.len());
        self._rows.push(cells);
    }

    /// Adds a row of text cells. Empty strings become empty cells.
    pub fn add_row_simple(&mut self, values: &[&str]) {
        let cells = values
            .iter()
            .map(|s| {
                if s.is_empty() {
                    Cell::Empty
                } else {
                    Cell::Text(s.to_string())
                }
            })
            .collect();
        self.add_row(cells);
    }

    pub fn build(self) -> InputTable {
        InputTable {
            header: self._header,
            rows: self._rows,
            width: self._width,
        }
    }
}
