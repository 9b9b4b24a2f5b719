// Reading workbooks (Excel, OpenDocument) with calamine.

use calamine::{open_workbook_auto, CellErrorType, DataType, Range, Reader};

use resident_status::builder::TableBuilder;

use crate::report::*;

/// Reads one worksheet of a workbook into a table.
///
/// Without a worksheet name, the first worksheet is used. The columns are counted from
/// column A, even when the used area of the sheet starts further right.
pub fn read_excel_table(
    path: &str,
    worksheet_name: Option<&str>,
    has_header: bool,
) -> ReportResult<InputTable> {
    let wrange = get_range(path, worksheet_name)?;
    debug!(
        "read_excel_table: path: {:?} start: {:?} size: {:?}",
        path,
        wrange.start(),
        wrange.get_size()
    );
    Ok(range_to_table(&wrange, has_header))
}

fn get_range(path: &str, worksheet_name: Option<&str>) -> ReportResult<Range<DataType>> {
    let mut workbook = open_workbook_auto(path).context(OpeningWorkbookSnafu { path })?;
    debug!(
        "get_range: path: {:?} worksheets: {:?}",
        path,
        workbook.sheet_names()
    );

    // A worksheet name was provided, use it.
    if let Some(name) = worksheet_name {
        workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { path, name })?
            .context(OpeningWorkbookSnafu { path })
    } else {
        workbook
            .worksheet_range_at(0)
            .context(EmptyWorkbookSnafu { path })?
            .context(OpeningWorkbookSnafu { path })
    }
}

fn range_to_table(wrange: &Range<DataType>, has_header: bool) -> InputTable {
    // Leading empty columns are not part of the range.
    let col_offset = wrange.start().map(|(_, col)| col as usize).unwrap_or(0);
    let to_cells = |row: &[DataType]| -> Vec<Cell> {
        std::iter::repeat(Cell::Empty)
            .take(col_offset)
            .chain(row.iter().map(read_cell))
            .collect()
    };

    let mut iter = wrange.rows();
    let mut builder = TableBuilder::new();
    if has_header {
        if let Some(header) = iter.next() {
            debug!("range_to_table: header: {:?}", header);
            builder = builder.header(to_cells(header));
        }
    }
    for (idx, row) in iter.enumerate() {
        debug!("range_to_table: idx: {:?} row: {:?}", idx, row);
        builder.add_row(to_cells(row));
    }
    builder.build()
}

fn read_cell(cell: &DataType) -> Cell {
    match cell {
        DataType::Empty => Cell::Empty,
        DataType::String(s) => Cell::Text(s.clone()),
        DataType::Int(i) => Cell::Int(*i),
        DataType::Float(f) => Cell::Float(*f),
        DataType::Bool(b) => Cell::Bool(*b),
        DataType::DateTime(serial) => Cell::DateTime(*serial),
        DataType::Error(e) => Cell::Error(error_text(e)),
        // Variants added by later versions of calamine.
        #[allow(unreachable_patterns)]
        other => Cell::Text(format!("{:?}", other)),
    }
}

fn error_text(e: &CellErrorType) -> String {
    match e {
        CellErrorType::Div0 => "#DIV/0!",
        CellErrorType::NA => "#N/A",
        CellErrorType::Name => "#NAME?",
        CellErrorType::Null => "#NULL!",
        CellErrorType::Num => "#NUM!",
        CellErrorType::Ref => "#REF!",
        CellErrorType::Value => "#VALUE!",
        CellErrorType::GettingData => "#DATA!",
        #[allow(unreachable_patterns)]
        _ => "#ERROR!",
    }
    .to_string()
}
