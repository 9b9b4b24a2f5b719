use crate::args::Args;
use crate::report::*;

use serde::{Deserialize, Serialize};

pub const STDOUT: &str = "stdout";

/// The JSON configuration file. Every field is optional: the command line fills in the rest.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(rename = "inputFile")]
    pub input_file: Option<String>,
    #[serde(rename = "inputType")]
    pub input_type: Option<String>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
    #[serde(rename = "hasHeader")]
    pub has_header: Option<bool>,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    #[serde(rename = "summaryOutput")]
    pub summary_output: Option<String>,
    #[serde(rename = "missingValues")]
    pub missing_values: Option<Vec<String>>,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum SummaryOutput {
    Stdout,
    File(PathBuf),
}

/// The settings of one run, after merging the configuration file and the command line.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Settings {
    pub input: PathBuf,
    pub input_type: Option<String>,
    pub excel_worksheet_name: Option<String>,
    pub has_header: bool,
    pub output_directory: PathBuf,
    pub summary_output: SummaryOutput,
    pub missing_values: Option<Vec<String>>,
    pub reference: Option<PathBuf>,
}

impl Settings {
    pub fn extract_options(&self) -> ExtractOptions {
        match &self.missing_values {
            Some(markers) => ExtractOptions {
                missing_markers: markers.clone(),
            },
            None => ExtractOptions::default(),
        }
    }
}

pub fn read_config(path: &str) -> ReportResult<ReportConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    debug!("read_config: content: {:?}", contents);
    let config: ReportConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    Ok(config)
}

// Paths in the configuration file are relative to the directory of that file.
fn resolve(root: &Path, p: &str) -> PathBuf {
    let pb = PathBuf::from(p);
    if pb.is_absolute() {
        pb
    } else {
        root.join(pb)
    }
}

fn summary_output(s: &str, resolve_path: impl Fn(&str) -> PathBuf) -> SummaryOutput {
    if s.is_empty() || s == STDOUT {
        SummaryOutput::Stdout
    } else {
        SummaryOutput::File(resolve_path(s))
    }
}

/// Merges the command line with the configuration file, if any.
///
/// Command line values take precedence. Paths from the command line are used as given.
pub fn resolve_settings(args: &Args) -> ReportResult<Settings> {
    let (config, root) = match &args.config {
        Some(config_path) => {
            let config = read_config(config_path)?;
            info!("config: {:?}", config);
            let root = Path::new(config_path)
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_default();
            (config, root)
        }
        None => (ReportConfig::default(), PathBuf::new()),
    };
    let from_config = |p: &str| resolve(&root, p);

    let input = match (&args.input, &config.input_file) {
        (Some(p), _) => PathBuf::from(p),
        (None, Some(p)) => from_config(p.as_str()),
        (None, None) => return MissingInputSnafu {}.fail(),
    };

    let output_directory = match (&args.out_dir, &config.output_directory) {
        (Some(p), _) => PathBuf::from(p),
        (None, Some(p)) => from_config(p.as_str()),
        (None, None) => PathBuf::from("."),
    };

    let summary_output = match (&args.summary, &config.summary_output) {
        (Some(s), _) => summary_output(s, |p: &str| PathBuf::from(p)),
        (None, Some(s)) => summary_output(s, from_config),
        (None, None) => SummaryOutput::Stdout,
    };

    Ok(Settings {
        input,
        input_type: args.input_type.clone().or(config.input_type),
        excel_worksheet_name: args
            .excel_worksheet_name
            .clone()
            .or(config.excel_worksheet_name),
        has_header: !args.no_header && config.has_header.unwrap_or(true),
        output_directory,
        summary_output,
        missing_values: config.missing_values,
        reference: args.reference.as_ref().map(PathBuf::from),
    })
}
