mod decode;
mod error;
mod model;
mod table_parse;
mod warning;

use std::path::Path;

use crate::warning::WarningCode;

pub use decode::decode_document;
pub use error::ExtractError;
pub use model::{Record, TableSet, table_key};
pub use table_parse::BASE_TABLE_MARKER;
pub use warning::{ExtractWarning, WarningCode as ExtractWarningCode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionReport {
    pub table_count: usize,
    pub row_count: usize,
    pub warnings: Vec<ExtractWarning>,
}

/// Extracts every `.tb_base` table of `html` into keyed records.
///
/// Never fails: malformed markup is recovered the way browsers do, and a
/// document without marker tables yields an empty set.
#[must_use]
pub fn extract_tables(html: &str) -> TableSet {
    let (tables, _) = extract_tables_with_report(html);
    tables
}

#[must_use]
pub fn extract_tables_with_report(html: &str) -> (TableSet, ExtractionReport) {
    let mut warnings = Vec::new();
    let tables = table_parse::parse_document(html, &mut warnings);

    if tables.is_empty() {
        warnings.push(ExtractWarning::new(
            WarningCode::NoTablesDetected,
            format!("no elements matching '{BASE_TABLE_MARKER}' were found"),
        ));
    }

    let report = ExtractionReport {
        table_count: tables.len(),
        row_count: tables.row_count(),
        warnings,
    };
    (tables, report)
}

pub fn extract_tables_from_bytes(
    input: &[u8],
    charset: Option<&str>,
) -> Result<(TableSet, ExtractionReport), ExtractError> {
    let html = decode_document(input, charset)?;
    Ok(extract_tables_with_report(&html))
}

pub fn extract_tables_to_json(
    input: &[u8],
    charset: Option<&str>,
    pretty: bool,
) -> Result<(String, ExtractionReport), ExtractError> {
    let (tables, report) = extract_tables_from_bytes(input, charset)?;
    let json = if pretty {
        serde_json::to_string_pretty(&tables)?
    } else {
        serde_json::to_string(&tables)?
    };
    Ok((json, report))
}

pub fn extract_file_to_json(
    input_html: &Path,
    output_json: &Path,
    charset: Option<&str>,
    pretty: bool,
) -> Result<ExtractionReport, ExtractError> {
    let input = std::fs::read(input_html)?;
    let (json, report) = extract_tables_to_json(&input, charset, pretty)?;
    std::fs::write(output_json, json)?;
    Ok(report)
}
