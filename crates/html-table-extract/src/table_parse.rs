use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::model::{Record, TableSet};
use crate::warning::{ExtractWarning, WarningCode};

pub const BASE_TABLE_MARKER: &str = ".tb_base";

static BASE_TABLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(BASE_TABLE_MARKER).expect("hardcoded base table selector is valid")
});

static HEADER_CELL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("th").expect("hardcoded header cell selector is valid"));

static BODY_ROW_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tbody tr").expect("hardcoded body row selector is valid"));

static DATA_CELL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td").expect("hardcoded data cell selector is valid"));

pub(crate) fn parse_document(html: &str, warnings: &mut Vec<ExtractWarning>) -> TableSet {
    let document = Html::parse_document(html);
    let mut tables = TableSet::default();

    for (index, table) in document.select(&BASE_TABLE_SELECTOR).enumerate() {
        let position = index + 1;
        let records = parse_table(table, position, warnings);
        tracing::debug!(table = position, rows = records.len(), "parsed base table");
        tables.push(records);
    }

    tables
}

fn parse_table(
    table: ElementRef<'_>,
    position: usize,
    warnings: &mut Vec<ExtractWarning>,
) -> Vec<Record> {
    let labels = table
        .select(&HEADER_CELL_SELECTOR)
        .map(element_text)
        .collect::<Vec<_>>();

    let mut records = Vec::new();
    for (row_index, row) in table.select(&BODY_ROW_SELECTOR).enumerate() {
        let cells = row
            .select(&DATA_CELL_SELECTOR)
            .map(element_text)
            .collect::<Vec<_>>();

        if !labels.is_empty() && cells.len() != labels.len() {
            tracing::warn!(
                table = position,
                row = row_index + 1,
                cells = cells.len(),
                labels = labels.len(),
                "row width differs from header width"
            );
            let dropped = if cells.len() > labels.len() {
                "extra cells dropped"
            } else {
                "trailing headers dropped"
            };
            warnings.push(
                ExtractWarning::new(
                    WarningCode::RowWidthMismatch,
                    format!(
                        "row has {} cell(s) but the table has {} header(s); {dropped}",
                        cells.len(),
                        labels.len()
                    ),
                )
                .with_table(position)
                .with_row(row_index + 1),
            );
        }

        records.push(Record::from_row(&labels, cells));
    }

    if labels.is_empty() && !records.is_empty() {
        warnings.push(
            ExtractWarning::new(
                WarningCode::MissingHeaders,
                "table has body rows but no header cells; records are empty",
            )
            .with_table(position),
        );
    }

    records
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::parse_document;
    use crate::warning::WarningCode;

    #[test]
    fn trims_newlines_and_indentation() {
        let html = r#"
            <table class="tb_base">
              <thead><tr><th>
                Produto
              </th><th> Quantidade (L.) </th></tr></thead>
              <tbody><tr>
                <td class="tb_item">
                  VINHO DE MESA
                </td>
                <td>	217.208.604 </td>
              </tr></tbody>
            </table>
        "#;

        let mut warnings = Vec::new();
        let tables = parse_document(html, &mut warnings);
        let record = &tables.table(1).expect("table_1")[0];

        assert_eq!(record.get("Produto"), Some("VINHO DE MESA"));
        assert_eq!(record.get("Quantidade (L.)"), Some("217.208.604"));
        assert!(warnings.is_empty());
    }

    #[test]
    fn collects_header_cells_from_any_row() {
        let html = r#"
            <table class="tb_base">
              <thead>
                <tr><th>Ano</th></tr>
                <tr><th>Valor</th></tr>
              </thead>
              <tbody><tr><td>2023</td><td>10</td></tr></tbody>
            </table>
        "#;

        let tables = parse_document(html, &mut Vec::new());
        let record = &tables.table(1).expect("table_1")[0];
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["Ano", "Valor"]);
    }

    #[test]
    fn footer_rows_are_not_records() {
        let html = r#"
            <table class="tb_base">
              <thead><tr><th>Produto</th><th>Quantidade</th></tr></thead>
              <tbody><tr><td>Tinto</td><td>5</td></tr></tbody>
              <tfoot><tr><td>Total</td><td>5</td></tr></tfoot>
            </table>
        "#;

        let tables = parse_document(html, &mut Vec::new());
        assert_eq!(tables.row_count(), 1);
    }

    #[test]
    fn browser_recovery_supplies_missing_tbody_and_closing_tags() {
        let html = r#"<table class="tb_base"><thead><tr><th>A<th>B</thead>
            <tr><td>1<td>2
            <tr><td>3<td>4
        </table>"#;

        let tables = parse_document(html, &mut Vec::new());
        let records = tables.table(1).expect("table_1");

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].get("A"), Some("3"));
        assert_eq!(records[1].get("B"), Some("4"));
    }

    #[test]
    fn marker_class_is_matched_among_other_classes() {
        let html = r#"
            <table class="table"><tbody><tr><td>ignored</td></tr></tbody></table>
            <table class="tb_base tb_dados"><thead><tr><th>A</th></tr></thead>
              <tbody><tr><td>kept</td></tr></tbody></table>
        "#;

        let tables = parse_document(html, &mut Vec::new());
        assert_eq!(tables.len(), 1);
        assert_eq!(tables.table(1).expect("table_1")[0].get("A"), Some("kept"));
    }

    #[test]
    fn reports_width_mismatch_with_position() {
        let html = r#"
            <table class="tb_base"><thead><tr><th>A</th><th>B</th></tr></thead>
              <tbody><tr><td>1</td><td>2</td></tr><tr><td>3</td></tr></tbody></table>
        "#;

        let mut warnings = Vec::new();
        parse_document(html, &mut warnings);

        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, WarningCode::RowWidthMismatch);
        assert_eq!(warnings[0].table, Some(1));
        assert_eq!(warnings[0].row, Some(2));
    }

    #[test]
    fn width_mismatch_message_names_the_dropped_side() {
        let html = r#"
            <table class="tb_base"><thead><tr><th>A</th><th>B</th></tr></thead>
              <tbody><tr><td>1</td></tr><tr><td>2</td><td>3</td><td>4</td></tr></tbody></table>
        "#;

        let mut warnings = Vec::new();
        parse_document(html, &mut warnings);

        assert_eq!(warnings.len(), 2);
        assert!(
            warnings[0].message.ends_with("trailing headers dropped"),
            "short row: {}",
            warnings[0].message
        );
        assert!(
            warnings[1].message.ends_with("extra cells dropped"),
            "long row: {}",
            warnings[1].message
        );
    }

    #[test]
    fn headerless_table_yields_empty_records_and_a_warning() {
        let html = r#"
            <table class="tb_base"><tbody><tr><td>1</td></tr></tbody></table>
        "#;

        let mut warnings = Vec::new();
        let tables = parse_document(html, &mut warnings);

        assert!(tables.table(1).expect("table_1")[0].is_empty());
        assert_eq!(warnings[0].code, WarningCode::MissingHeaders);
    }
}
