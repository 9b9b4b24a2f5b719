use std::path::Path;

use crate::report::*;

/// The ways an input file can be read.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum InputType {
    /// Excel and OpenDocument workbooks, read with calamine.
    Excel,
    Csv,
}

impl InputType {
    pub fn from_name(name: &str, path: &str) -> ReportResult<InputType> {
        match name {
            "excel" | "xlsx" | "xls" | "ods" => Ok(InputType::Excel),
            "csv" => Ok(InputType::Csv),
            x => UnsupportedInputSnafu {
                path,
                input_type: x,
            }
            .fail(),
        }
    }

    /// Guesses the input type from the extension of the file.
    pub fn from_path(path: &str) -> ReportResult<InputType> {
        let ext = Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "xla" | "ods" => Ok(InputType::Excel),
            "csv" => Ok(InputType::Csv),
            _ => UnsupportedInputSnafu {
                path,
                input_type: ext.clone(),
            }
            .fail(),
        }
    }
}

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}
