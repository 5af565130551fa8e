use std::fmt::Display;

use html_table_extract::{ExtractionReport, TableSet, extract_tables_from_bytes};
use regex::Regex;
use worker::Fetch;

use crate::error::ApiError;
use crate::models::Report;

pub async fn fetch_report_tables(report: Report, base_url: &str) -> Result<TableSet, ApiError> {
    let source = report.source_url(base_url)?;
    let mut response = Fetch::Url(source.clone())
        .send()
        .await
        .map_err(|error| fetch_failed(report, error))?;
    let status = response.status_code();
    if status >= 400 {
        return Err(fetch_failed(report, format!("status {status}")));
    }

    let content_type = response.headers().get("Content-Type")?;
    let body = response.bytes().await?;
    let charset = content_type.as_deref().and_then(charset_from_content_type);

    let (tables, extraction) = extract_tables_from_bytes(&body, charset.as_deref())?;
    log_extraction(report, source.as_str(), &extraction);

    ensure_tables(report, tables)
}

pub fn fetch_failed(report: Report, reason: impl Display) -> ApiError {
    ApiError::Upstream(format!("failed to fetch {} page: {reason}", report.label()))
}

/// An empty table set is reported as a failure to obtain the data set.
pub fn ensure_tables(report: Report, tables: TableSet) -> Result<TableSet, ApiError> {
    if tables.is_empty() {
        return Err(ApiError::NoData(format!(
            "failed to obtain {} data from source page",
            report.label()
        )));
    }
    Ok(tables)
}

pub fn charset_from_content_type(content_type: &str) -> Option<String> {
    let charset_re = Regex::new(r#"(?i)charset\s*=\s*"?([^";\s]+)"#).ok()?;
    charset_re
        .captures(content_type)
        .and_then(|capture| capture.get(1))
        .map(|value| value.as_str().to_string())
}

fn log_extraction(report: Report, source_url: &str, extraction: &ExtractionReport) {
    worker::console_log!(
        "{} extraction completed: tables={}, rows={}, source={}",
        report.label(),
        extraction.table_count,
        extraction.row_count,
        source_url
    );

    for warning in &extraction.warnings {
        worker::console_warn!(
            "{} extraction warning {:?} (table={:?}, row={:?}): {}",
            report.label(),
            warning.code,
            warning.table,
            warning.row,
            warning.message
        );
    }
}
