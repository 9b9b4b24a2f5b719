// Encoding of the outputs: text report, processed workbook and summary.

use rust_xlsxwriter::{
    ColNum, Format, FormatAlign, FormatBorder, RowNum, Workbook, Worksheet, XlsxError,
};
use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use std::io::Write;
use tempfile::NamedTempFile;

use crate::report::io_common::simplify_file_name;
use crate::report::*;

pub const REPORT_FILE_NAME: &str = "report.txt";
pub const REPORT_MIME: &str = "text/plain";
pub const WORKBOOK_FILE_NAME: &str = "processed.xlsx";
pub const WORKBOOK_MIME: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const ORIGINAL_SHEET: &str = "Original";
pub const TIDY_SHEET: &str = "Processed_Tidy";

/// An output file, fully encoded in memory.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Artifact {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

pub fn text_report_artifact(processed: &Processed) -> Artifact {
    Artifact {
        file_name: REPORT_FILE_NAME.to_string(),
        mime: REPORT_MIME,
        bytes: processed.report.clone(),
    }
}

pub fn workbook_artifact(table: &InputTable, processed: &Processed) -> ReportResult<Artifact> {
    let bytes = encode_workbook(table, &processed.tidy).context(EncodingWorkbookSnafu {})?;
    debug!("workbook_artifact: {:?} bytes", bytes.len());
    Ok(Artifact {
        file_name: WORKBOOK_FILE_NAME.to_string(),
        mime: WORKBOOK_MIME,
        bytes,
    })
}

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center)
}

fn encode_workbook(table: &InputTable, tidy: &[TidyRecord]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    write_original_sheet(workbook.add_worksheet(), table)?;
    write_tidy_sheet(workbook.add_worksheet(), tidy)?;
    workbook.save_to_buffer()
}

/// Copies the input table: header row first, then the data, without an index column.
fn write_original_sheet(sheet: &mut Worksheet, table: &InputTable) -> Result<(), XlsxError> {
    sheet.set_name(ORIGINAL_SHEET)?;
    let bold = header_format();
    let date_time = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");

    for col in 0..table.width() {
        let col_num = column_number(col)?;
        match table.header().map(|h| h.get(col)) {
            // No header row: the columns are named by their position.
            None => {
                sheet.write_number_with_format(0, col_num, col as f64, &bold)?;
            }
            Some(None) | Some(Some(Cell::Empty)) => {
                sheet.write_string_with_format(0, col_num, format!("Unnamed: {}", col), &bold)?;
            }
            Some(Some(cell)) => write_cell(sheet, 0, col_num, cell, Some(&bold), &date_time)?,
        }
    }

    for (idx, row) in table.rows().iter().enumerate() {
        let row_num = row_number(idx + 1)?;
        for (col, cell) in row.iter().enumerate() {
            write_cell(sheet, row_num, column_number(col)?, cell, None, &date_time)?;
        }
    }
    Ok(())
}

fn column_number(col: usize) -> Result<ColNum, XlsxError> {
    ColNum::try_from(col).map_err(|_| XlsxError::RowColumnLimitError)
}

fn row_number(row: usize) -> Result<RowNum, XlsxError> {
    RowNum::try_from(row).map_err(|_| XlsxError::RowColumnLimitError)
}

fn write_cell(
    sheet: &mut Worksheet,
    row: RowNum,
    col: ColNum,
    cell: &Cell,
    format: Option<&Format>,
    date_time: &Format,
) -> Result<(), XlsxError> {
    let default_format = Format::new();
    let format = format.unwrap_or(&default_format);
    match cell {
        Cell::Empty => {}
        Cell::Text(s) => {
            sheet.write_string_with_format(row, col, s, format)?;
        }
        Cell::Int(i) => {
            sheet.write_number_with_format(row, col, *i as f64, format)?;
        }
        Cell::Float(f) => {
            sheet.write_number_with_format(row, col, *f, format)?;
        }
        Cell::Bool(b) => {
            sheet.write_boolean_with_format(row, col, *b, format)?;
        }
        Cell::DateTime(serial) => {
            sheet.write_number_with_format(row, col, *serial, date_time)?;
        }
        Cell::Error(e) => {
            sheet.write_string_with_format(row, col, e, format)?;
        }
    }
    Ok(())
}

fn write_tidy_sheet(sheet: &mut Worksheet, tidy: &[TidyRecord]) -> Result<(), XlsxError> {
    sheet.set_name(TIDY_SHEET)?;
    let bold = header_format();
    sheet.write_string_with_format(0, 0, "name", &bold)?;
    sheet.write_string_with_format(0, 1, "status", &bold)?;
    for (idx, record) in tidy.iter().enumerate() {
        let row_num = row_number(idx + 1)?;
        sheet.write_string(row_num, 0, &record.name)?;
        sheet.write_string(row_num, 1, record.status_label())?;
    }
    Ok(())
}

/// The summary of a run, with the counts in category order.
pub fn summary_to_json(input: &str, summary: &Summary, artifacts: &[Artifact]) -> JSValue {
    let mut counts: JSMap<String, JSValue> = JSMap::new();
    for (category, count) in summary.counts.iter() {
        counts.insert(category.summary_label().to_string(), json!(count));
    }
    let artifacts_js: Vec<JSValue> = artifacts
        .iter()
        .map(|a| json!({"fileName": a.file_name, "mime": a.mime}))
        .collect();
    json!({
        "input": simplify_file_name(input),
        "summary": counts,
        "total": summary.total(),
        "artifacts": artifacts_js
    })
}

/// A file written under a temporary name in the directory of its destination.
///
/// The temporary file is removed when the value is dropped without being committed.
#[derive(Debug)]
pub struct StagedFile {
    temp: NamedTempFile,
    dest: PathBuf,
}

pub fn stage_file(dest: &Path, bytes: &[u8]) -> ReportResult<StagedFile> {
    let dir = match dest.parent() {
        Some(d) if !d.as_os_str().is_empty() => d.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).context(WritingArtifactSnafu {
        path: dir.display().to_string(),
    })?;
    let path = dest.display().to_string();
    let mut temp = NamedTempFile::new_in(&dir).context(WritingArtifactSnafu { path: &path })?;
    temp.write_all(bytes)
        .and_then(|_| temp.flush())
        .context(WritingArtifactSnafu { path: &path })?;
    debug!(
        "stage_file: {:?} bytes for {} in {}",
        bytes.len(),
        path,
        temp.path().display()
    );
    Ok(StagedFile {
        temp,
        dest: dest.to_path_buf(),
    })
}

/// Stages every artifact in the given directory, which is created if needed.
pub fn stage_artifacts(dir: &Path, artifacts: &[Artifact]) -> ReportResult<Vec<StagedFile>> {
    artifacts
        .iter()
        .map(|a| stage_file(&dir.join(&a.file_name), &a.bytes))
        .collect()
}

/// Moves the staged files to their destinations.
///
/// If one of them cannot be moved, the files already moved are removed again and the
/// remaining temporary files are dropped.
pub fn commit_files(staged: Vec<StagedFile>) -> ReportResult<Vec<PathBuf>> {
    let mut written: Vec<PathBuf> = Vec::new();
    for StagedFile { temp, dest } in staged {
        if let Err(e) = temp.persist(&dest) {
            for p in written.iter() {
                if let Err(remove_err) = fs::remove_file(p) {
                    warn!("Could not remove {}: {}", p.display(), remove_err);
                }
            }
            return Err(e.error).context(WritingArtifactSnafu {
                path: dest.display().to_string(),
            });
        }
        info!("Wrote {}", dest.display());
        written.push(dest);
    }
    Ok(written)
}
