// Primitives for reading CSV files.

use std::io;

use resident_status::builder::TableBuilder;

use crate::report::*;

pub fn read_csv_table(path: &str, has_header: bool) -> ReportResult<InputTable> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(CsvParseSnafu { path })?;
    read_csv_records(rdr, has_header, path)
}

/// Reads all the records. Rows may have different lengths.
fn read_csv_records<R: io::Read>(
    rdr: csv::Reader<R>,
    has_header: bool,
    path: &str,
) -> ReportResult<InputTable> {
    let mut builder = TableBuilder::new();
    for (idx, line_r) in rdr.into_records().enumerate() {
        let line = line_r.context(CsvParseSnafu { path })?;
        debug!("read_csv_records: lineno: {:?} row: {:?}", idx + 1, line);
        let cells: Vec<Cell> = line.iter().map(read_field).collect();
        if idx == 0 && has_header {
            builder = builder.header(cells);
        } else {
            builder.add_row(cells);
        }
    }
    Ok(builder.build())
}

fn read_field(s: &str) -> Cell {
    if s.is_empty() {
        Cell::Empty
    } else {
        Cell::Text(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_str(content: &str, has_header: bool) -> ReportResult<InputTable> {
        let rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(content.as_bytes());
        read_csv_records(rdr, has_header, "memory.csv")
    }

    #[test]
    fn ragged_rows() {
        let table = read_str("Affected,Isolated,Fine\nAlice\nBob,Carol\n,,Dan,notes\n", true)
            .unwrap();
        assert_eq!(table.width(), 4);
        assert_eq!(table.rows().len(), 3);
        let lists = extract_status_lists(&table);
        assert_eq!(lists.affected.names, vec!["Alice", "Bob"]);
        assert_eq!(lists.isolated.names, vec!["Carol"]);
        assert_eq!(lists.fine.names, vec!["Dan"]);
    }

    #[test]
    fn quoted_fields() {
        let table = read_str("A,I,F\n\"Smith, Ann\",\"\",\"O'Neil\"\n", true).unwrap();
        let lists = extract_status_lists(&table);
        assert_eq!(lists.affected.names, vec!["Smith, Ann"]);
        assert!(lists.isolated.is_empty());
        assert_eq!(lists.fine.names, vec!["O'Neil"]);
    }

    #[test]
    fn header_only() {
        let table = read_str("Affected,Isolated,Fine\n", true).unwrap();
        assert_eq!(table.width(), 3);
        assert!(table.rows().is_empty());
        assert!(validate(&table).is_ok());
    }

    #[test]
    fn empty_file_has_no_columns() {
        let table = read_str("", true).unwrap();
        assert_eq!(table.width(), 0);
        assert!(validate(&table).is_err());
    }

    #[test]
    fn invalid_utf8_is_a_parse_error() {
        let rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(&b"A,I,F\n\xff\xfe,x,y\n"[..]);
        let err = read_csv_records(rdr, true, "memory.csv").unwrap_err();
        assert!(matches!(err, ReportError::CsvParse { .. }));
        assert!(err.is_parse_error());
    }
}
