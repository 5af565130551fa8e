use std::fmt::Write as _;
use std::path::Path;

/// Renders one `.tb_base` table with a `thead` header row and `tbody` rows.
pub fn base_table(headers: &[&str], rows: &[Vec<&str>]) -> String {
    let mut html = String::from("<table class=\"tb_base\"><thead><tr>");
    for header in headers {
        let _ = write!(html, "<th>{header}</th>");
    }
    html.push_str("</tr></thead><tbody>");
    for row in rows {
        html.push_str("<tr>");
        for cell in row {
            let _ = write!(html, "<td>{cell}</td>");
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");
    html
}

pub fn page(body: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>VitiBrasil</title></head>\
         <body><div class=\"content_center\">{body}</div></body></html>"
    )
}

pub fn write_page(path: &Path, body: &str) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::write(path, page(body))?;
    Ok(())
}
