use clap::Parser;

/// This program reads a spreadsheet of resident statuses (Affected, Isolated, Fine) and writes
/// a text report and a tidy spreadsheet.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON configuration file. The options passed on the command line
    /// take precedence over the ones in the file.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) The spreadsheet to process. The first three columns are read as the
    /// Affected, Isolated and Fine residents, in that order.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (excel or csv, default: guessed from the file extension) The type of the input.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (default: the first worksheet) When using an Excel file, the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// If passed as an argument, the first row of the input is read as data instead of a header.
    #[clap(long, takes_value = false)]
    pub no_header: bool,

    /// (directory, default: current directory) Where report.txt and processed.xlsx are written.
    #[clap(short, long, value_parser)]
    pub out_dir: Option<String>,

    /// (file path, 'stdout' or empty) Where the summary is written in JSON format.
    #[clap(short, long, value_parser)]
    pub summary: Option<String>,

    /// (file path) A reference text report. If provided, resreport checks that the produced
    /// report matches it before writing anything.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
