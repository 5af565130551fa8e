use chrono::Duration;
use html_table_extract::{ExtractError, extract_tables, extract_tables_from_bytes};
use pretty_assertions::assert_eq;
use serde_json::json;

use vitibrasil_worker::error::ApiError;
use vitibrasil_worker::models::Report;
use vitibrasil_worker::routes::parse_token_ttl;
use vitibrasil_worker::source_scraper::{charset_from_content_type, ensure_tables, fetch_failed};

const PRODUCAO_PAGE: &str = r#"
<html><body>
  <div class="content_center">
    <p class="text_center">Produção de vinhos, sucos e derivados do Rio Grande do Sul - [2023]</p>
    <table class="tb_base tb_dados">
      <thead>
        <tr><th>Produto</th><th>Quantidade (L.)</th></tr>
      </thead>
      <tbody>
        <tr><td class="tb_item">VINHO DE MESA</td><td class="tb_item">169.762.429</td></tr>
        <tr><td class="tb_subitem">Tinto</td><td class="tb_subitem">139.320.884</td></tr>
      </tbody>
      <tfoot class="tb_total">
        <tr><td>Total</td><td>457.792.870</td></tr>
      </tfoot>
    </table>
  </div>
</body></html>
"#;

#[test]
fn report_source_urls_use_option_codes() {
    let base = "http://vitibrasil.cnpuv.embrapa.br/index.php";
    let urls = Report::ALL
        .iter()
        .map(|report| report.source_url(base).expect("valid base url").to_string())
        .collect::<Vec<_>>();

    assert_eq!(
        urls,
        vec![
            "http://vitibrasil.cnpuv.embrapa.br/index.php?opcao=opt_02",
            "http://vitibrasil.cnpuv.embrapa.br/index.php?opcao=opt_03",
            "http://vitibrasil.cnpuv.embrapa.br/index.php?opcao=opt_04",
            "http://vitibrasil.cnpuv.embrapa.br/index.php?opcao=opt_05",
            "http://vitibrasil.cnpuv.embrapa.br/index.php?opcao=opt_06",
        ]
    );
}

#[test]
fn source_url_keeps_existing_query() {
    let url = Report::Exportacao
        .source_url("https://mirror.example/index.php?ano=2022")
        .expect("valid base url");
    assert_eq!(url.as_str(), "https://mirror.example/index.php?ano=2022&opcao=opt_06");
}

#[test]
fn invalid_source_base_url_is_internal_error() {
    let error: ApiError = Report::Producao
        .source_url("not a url")
        .expect_err("relative url")
        .into();
    assert_eq!(error.status_code(), 500);
}

#[test]
fn producao_page_extracts_body_rows_only() {
    let tables = ensure_tables(Report::Producao, extract_tables(PRODUCAO_PAGE))
        .expect("tables present");

    assert_eq!(
        serde_json::to_value(&tables).expect("serialize tables"),
        json!({
            "table_1": [
                {"Produto": "VINHO DE MESA", "Quantidade (L.)": "169.762.429"},
                {"Produto": "Tinto", "Quantidade (L.)": "139.320.884"},
            ]
        })
    );
}

#[test]
fn latin1_page_decodes_with_header_charset() {
    let (bytes, _, had_errors) = encoding_rs::WINDOWS_1252.encode(PRODUCAO_PAGE);
    assert!(!had_errors);

    let charset = charset_from_content_type("text/html; charset=ISO-8859-1");
    let (tables, report) =
        extract_tables_from_bytes(&bytes, charset.as_deref()).expect("decode latin1 page");

    assert_eq!(report.table_count, 1);
    assert_eq!(report.row_count, 2);
    assert!(tables.get("table_1").is_some());
}

#[test]
fn charset_parsing_handles_quotes_and_case() {
    assert_eq!(
        charset_from_content_type("text/html; Charset=\"utf-8\"").as_deref(),
        Some("utf-8")
    );
    assert_eq!(
        charset_from_content_type("text/html;charset=windows-1252;q=1").as_deref(),
        Some("windows-1252")
    );
    assert_eq!(charset_from_content_type("text/html"), None);
}

#[test]
fn empty_table_set_is_no_data_error() {
    let error = ensure_tables(Report::Processamento, extract_tables("<p>manutenção</p>"))
        .expect_err("no tables");

    assert_eq!(error.status_code(), 500);
    assert_eq!(error.to_error_response().code, "no_data");
    assert!(error.message().contains("processing"));
}

#[test]
fn decode_failures_surface_as_upstream_errors() {
    let error: ApiError = ExtractError::Decode { encoding: "UTF-8" }.into();
    assert_eq!(error.status_code(), 502);
    assert_eq!(error.code(), "upstream_error");

    let error: ApiError = ExtractError::UnknownEncoding("x-unknown".to_string()).into();
    assert_eq!(error.status_code(), 502);
}

#[test]
fn fetch_failures_are_upstream_errors() {
    let network: ApiError = fetch_failed(
        Report::Importacao,
        worker::Error::RustError("connection reset".to_string()),
    );
    assert_eq!(network.status_code(), 502);
    assert_eq!(network.code(), "upstream_error");
    assert!(network.message().starts_with("failed to fetch import page: "));
    assert!(network.message().contains("connection reset"));

    let status = fetch_failed(Report::Importacao, "status 503");
    assert_eq!(status.status_code(), network.status_code());
}

#[test]
fn token_ttl_configuration() {
    assert_eq!(parse_token_ttl(None), Some(Duration::minutes(15)));
    assert_eq!(parse_token_ttl(Some(" 3600 ")), Some(Duration::hours(1)));
    assert_eq!(parse_token_ttl(Some("0")), None);
    assert_eq!(parse_token_ttl(Some("-5")), None);
    assert_eq!(parse_token_ttl(Some("soon")), None);
}
