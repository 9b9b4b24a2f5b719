use clap::Parser;
use log::{debug, info};

mod args;
mod report;

use crate::args::Args;
use crate::report::config_reader::resolve_settings;
use crate::report::{run_report, ReportResult};

fn run(args: &Args) -> ReportResult<()> {
    let settings = resolve_settings(args)?;
    let outcome = run_report(&settings)?;
    info!("Processed {} residents", outcome.summary.total());
    for p in outcome.written.iter() {
        info!("Output: {}", p.display());
    }
    Ok(())
}

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if let Err(e) = run(&args) {
        debug!("{:?}", e);
        if e.is_parse_error() {
            eprintln!("Failed to read/process the input spreadsheet: {}", e);
        } else {
            eprintln!("{}", e);
        }
        std::process::exit(1);
    }
}
