use log::{debug, info, warn};

use resident_status::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use text_diff::print_diff;

pub mod config_reader;
pub mod export;
pub mod io_common;
pub mod io_csv;
pub mod io_excel;

use crate::report::config_reader::*;
use crate::report::export::Artifact;
use crate::report::io_common::InputType;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ReportError {
    #[snafu(display("Error opening spreadsheet {path}: {source}"))]
    OpeningWorkbook {
        source: calamine::Error,
        path: String,
    },
    #[snafu(display("The spreadsheet {path} does not contain any worksheet"))]
    EmptyWorkbook { path: String },
    #[snafu(display("The spreadsheet {path} does not contain a worksheet named {name:?}"))]
    MissingWorksheet { path: String, name: String },
    #[snafu(display("Error reading CSV file {path}: {source}"))]
    CsvParse { source: csv::Error, path: String },
    #[snafu(display(
        "Cannot tell how to read {path}: unknown input type {input_type:?} (supported: excel, csv)"
    ))]
    UnsupportedInput { path: String, input_type: String },

    #[snafu(display("{source}"))]
    Shape { source: ShapeError },

    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing configuration {path}: {source}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("No input file: pass --input or set inputFile in the configuration"))]
    MissingInput {},

    #[snafu(display("Error writing {path}: {source}"))]
    WritingArtifact {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error encoding the processed workbook: {source}"))]
    EncodingWorkbook { source: rust_xlsxwriter::XlsxError },
    #[snafu(display("Error encoding the summary: {source}"))]
    EncodingSummary { source: serde_json::Error },

    #[snafu(display("Error opening reference report {path}"))]
    OpeningReference {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("The report differs from the reference report {path}"))]
    ReferenceMismatch { path: String },
}

impl ReportError {
    /// True when the input could not be read as a spreadsheet at all.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            ReportError::OpeningWorkbook { .. }
                | ReportError::EmptyWorkbook { .. }
                | ReportError::MissingWorksheet { .. }
                | ReportError::CsvParse { .. }
                | ReportError::UnsupportedInput { .. }
        )
    }
}

pub type ReportResult<T> = Result<T, ReportError>;

/// What a successful run produced.
#[derive(Debug)]
pub struct ReportOutcome {
    pub summary: Summary,
    pub written: Vec<PathBuf>,
}

fn read_input(settings: &Settings) -> ReportResult<InputTable> {
    let path = settings.input.as_path().display().to_string();
    info!("Attempting to read input file {:?}", path);
    let input_type = match &settings.input_type {
        Some(name) => InputType::from_name(name, &path)?,
        None => InputType::from_path(&path)?,
    };
    debug!("read_input: input type: {:?}", input_type);
    match input_type {
        InputType::Excel => io_excel::read_excel_table(
            &path,
            settings.excel_worksheet_name.as_deref(),
            settings.has_header,
        ),
        InputType::Csv => io_csv::read_csv_table(&path, settings.has_header),
    }
}

fn check_reference(reference_path: &Path, report: &[u8]) -> ReportResult<()> {
    let path = reference_path.display().to_string();
    let reference = fs::read_to_string(reference_path).context(OpeningReferenceSnafu {
        path: path.clone(),
    })?;
    let produced = String::from_utf8_lossy(report);
    if reference != produced {
        warn!("Found differences with the reference report {}", path);
        print_diff(reference.as_str(), produced.as_ref(), "\n");
        return ReferenceMismatchSnafu { path }.fail();
    }
    info!("The report matches the reference report {}", path);
    Ok(())
}

/// Reads the input, processes it and writes the artifacts and the summary.
///
/// All the outputs are assembled in memory and staged under temporary names first: if any
/// step fails, nothing is written.
pub fn run_report(settings: &Settings) -> ReportResult<ReportOutcome> {
    debug!("run_report: settings: {:?}", settings);
    let table = read_input(settings)?;

    let options = settings.extract_options();
    let processed = process_with(&table, &options).context(ShapeSnafu {})?;

    let artifacts: Vec<Artifact> = vec![
        export::text_report_artifact(&processed),
        export::workbook_artifact(&table, &processed)?,
    ];

    if let Some(reference) = &settings.reference {
        check_reference(reference, &processed.report)?;
    }

    let input_name = settings.input.as_path().display().to_string();
    let summary_js = export::summary_to_json(&input_name, &processed.summary, &artifacts);
    let pretty_summary =
        serde_json::to_string_pretty(&summary_js).context(EncodingSummarySnafu {})?;

    let mut staged = export::stage_artifacts(&settings.output_directory, &artifacts)?;
    if let SummaryOutput::File(p) = &settings.summary_output {
        staged.push(export::stage_file(p, pretty_summary.as_bytes())?);
    }
    let written = export::commit_files(staged)?;
    if settings.summary_output == SummaryOutput::Stdout {
        println!("{}", pretty_summary);
    }

    Ok(ReportOutcome {
        summary: processed.summary,
        written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn write_csv(dir: &Path, name: &str, content: &str) -> PathBuf {
        let p = dir.join(name);
        let mut f = fs::File::create(&p).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        p
    }

    fn settings_for(input: PathBuf, out: &Path) -> Settings {
        Settings {
            input,
            input_type: None,
            excel_worksheet_name: None,
            has_header: true,
            output_directory: out.to_path_buf(),
            summary_output: SummaryOutput::File(out.join("summary.json")),
            missing_values: None,
            reference: None,
        }
    }

    const SCENARIO_CSV: &str = "Affected,Isolated,Fine\nAlice,Carol,Dan\nBob,,Eve\n,,Fay\n";
    const SCENARIO_REPORT: &str = "Residents who are Affected\nAlice\nBob\n\nResidents who are Isolated\nCarol\n\nResidents who are Fine\nDan\nEve\nFay";

    #[test]
    fn csv_scenario_writes_all_artifacts() {
        init();
        let dir = tempfile::tempdir().unwrap();
        let input = write_csv(dir.path(), "residents.csv", SCENARIO_CSV);
        let out = dir.path().join("out");
        let outcome = run_report(&settings_for(input, &out)).unwrap();

        assert_eq!(outcome.summary.count(Category::Affected), 2);
        assert_eq!(outcome.summary.count(Category::Isolated), 1);
        assert_eq!(outcome.summary.count(Category::Fine), 3);
        assert_eq!(outcome.written.len(), 3);

        let report = fs::read_to_string(out.join("report.txt")).unwrap();
        assert_eq!(report, SCENARIO_REPORT);
        assert!(out.join("processed.xlsx").exists());

        let summary: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.join("summary.json")).unwrap()).unwrap();
        assert_eq!(summary["summary"]["Number of residents affected"], 2);
        assert_eq!(summary["summary"]["Number of residents isolated"], 1);
        assert_eq!(summary["summary"]["Number of residents who are fine"], 3);
        assert_eq!(summary["total"], 6);
    }

    #[test]
    fn two_columns_write_nothing() {
        init();
        let dir = tempfile::tempdir().unwrap();
        let input = write_csv(dir.path(), "narrow.csv", "Affected,Isolated\nAlice,Bob\n");
        let out = dir.path().join("out");
        let err = run_report(&settings_for(input, &out)).unwrap_err();

        assert!(matches!(
            err,
            ReportError::Shape {
                source: ShapeError::TooFewColumns { columns: 2 }
            }
        ));
        assert!(!err.is_parse_error());
        assert!(!out.exists());
    }

    #[test]
    fn unknown_extension_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_csv(dir.path(), "residents.txt", SCENARIO_CSV);
        let out = dir.path().join("out");
        let err = run_report(&settings_for(input, &out)).unwrap_err();
        assert!(err.is_parse_error());
        assert!(!out.exists());
    }

    #[test]
    fn corrupt_workbook_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_csv(dir.path(), "broken.xlsx", "this is not a zip archive");
        let out = dir.path().join("out");
        let err = run_report(&settings_for(input, &out)).unwrap_err();
        assert!(err.is_parse_error());
        assert!(!out.exists());
    }

    #[test]
    fn explicit_input_type_overrides_extension() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_csv(dir.path(), "residents.txt", SCENARIO_CSV);
        let out = dir.path().join("out");
        let mut settings = settings_for(input, &out);
        settings.input_type = Some("csv".to_string());
        let outcome = run_report(&settings).unwrap();
        assert_eq!(outcome.summary.total(), 6);
    }

    #[test]
    fn matching_reference_passes() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_csv(dir.path(), "residents.csv", SCENARIO_CSV);
        let reference = write_csv(dir.path(), "expected.txt", SCENARIO_REPORT);
        let out = dir.path().join("out");
        let mut settings = settings_for(input, &out);
        settings.reference = Some(reference);
        run_report(&settings).unwrap();
        assert!(out.join("report.txt").exists());
    }

    #[test]
    fn reference_mismatch_writes_nothing() {
        init();
        let dir = tempfile::tempdir().unwrap();
        let input = write_csv(dir.path(), "residents.csv", SCENARIO_CSV);
        let reference = write_csv(
            dir.path(),
            "expected.txt",
            "Residents who are Affected\nAlice\n",
        );
        let out = dir.path().join("out");
        let mut settings = settings_for(input, &out);
        settings.reference = Some(reference);
        let err = run_report(&settings).unwrap_err();
        assert!(matches!(err, ReportError::ReferenceMismatch { .. }));
        assert!(!out.exists());
    }

    #[test]
    fn failed_workbook_write_leaves_nothing() {
        init();
        let dir = tempfile::tempdir().unwrap();
        let input = write_csv(dir.path(), "residents.csv", SCENARIO_CSV);
        let out = dir.path().join("out");
        fs::create_dir_all(out.join("processed.xlsx")).unwrap();
        let err = run_report(&settings_for(input, &out)).unwrap_err();

        assert!(matches!(err, ReportError::WritingArtifact { .. }));
        assert!(!out.join("report.txt").exists());
        assert!(!out.join("summary.json").exists());
        assert_eq!(fs::read_dir(&out).unwrap().count(), 1);
    }

    #[test]
    fn failed_summary_write_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_csv(dir.path(), "residents.csv", SCENARIO_CSV);
        let out = dir.path().join("out");
        fs::create_dir_all(out.join("summary.json")).unwrap();
        let err = run_report(&settings_for(input, &out)).unwrap_err();

        assert!(matches!(err, ReportError::WritingArtifact { .. }));
        assert!(!out.join("report.txt").exists());
        assert!(!out.join("processed.xlsx").exists());
        assert_eq!(fs::read_dir(&out).unwrap().count(), 1);
    }

    #[test]
    fn no_header_reads_first_row_as_data() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_csv(dir.path(), "residents.csv", "Alice,Carol,Dan\nBob,,\n");
        let out = dir.path().join("out");
        let mut settings = settings_for(input, &out);
        settings.has_header = false;
        let outcome = run_report(&settings).unwrap();
        assert_eq!(outcome.summary.count(Category::Affected), 2);
        assert_eq!(outcome.summary.total(), 4);
    }

    #[test]
    fn configured_missing_values_replace_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_csv(
            dir.path(),
            "residents.csv",
            "Affected,Isolated,Fine\nNA,-,Dan\n",
        );
        let out = dir.path().join("out");
        let mut settings = settings_for(input, &out);
        settings.missing_values = Some(vec!["-".to_string()]);
        run_report(&settings).unwrap();
        let report = fs::read_to_string(out.join("report.txt")).unwrap();
        assert_eq!(
            report,
            "Residents who are Affected\nNA\n\nResidents who are Isolated\n\nResidents who are Fine\nDan"
        );
    }
}
