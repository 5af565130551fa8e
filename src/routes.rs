use std::collections::HashMap;

use chrono::{Duration, Utc};
use html_table_extract::TableSet;
use serde::Serialize;
use worker::{Context, Env, Request, Response, Result, RouteContext, Router};

use crate::apispec::{self, APISPEC_PATH};
use crate::auth;
use crate::error::ApiError;
use crate::models::{
    AccessTokenResponse, DEFAULT_ACCESS_TOKEN_TTL_SECONDS, DEFAULT_SOURCE_BASE_URL, Report,
};
use crate::source_scraper;

#[derive(Debug, Clone)]
pub struct AppState {
    pub source_base_url: String,
    pub jwt_secret: Option<String>,
    pub access_token_ttl: Duration,
}

impl AppState {
    pub fn from_env(env: &Env) -> Self {
        let source_base_url = env
            .var("SOURCE_BASE_URL")
            .map(|value| value.to_string())
            .unwrap_or_else(|_| DEFAULT_SOURCE_BASE_URL.to_string());

        let jwt_secret = env
            .secret("JWT_SECRET_KEY")
            .map(|value| value.to_string())
            .or_else(|_| env.var("JWT_SECRET_KEY").map(|value| value.to_string()))
            .ok();

        let raw_ttl = env
            .var("ACCESS_TOKEN_TTL_SECONDS")
            .map(|value| value.to_string())
            .ok();
        let access_token_ttl = parse_token_ttl(raw_ttl.as_deref()).unwrap_or_else(|| {
            worker::console_warn!(
                "invalid ACCESS_TOKEN_TTL_SECONDS {raw_ttl:?}; using {DEFAULT_ACCESS_TOKEN_TTL_SECONDS}s"
            );
            Duration::seconds(DEFAULT_ACCESS_TOKEN_TTL_SECONDS)
        });

        Self {
            source_base_url,
            jwt_secret,
            access_token_ttl,
        }
    }
}

pub async fn handle(req: Request, env: Env, _ctx: Context) -> Result<Response> {
    let state = AppState::from_env(&env);

    Router::with_data(state)
        .get("/", docs_route)
        .get(APISPEC_PATH, apispec_route)
        .post("/login", login_route)
        .get_async(Report::Producao.path(), producao_route)
        .get_async(Report::Processamento.path(), processamento_route)
        .get_async(Report::Comercializacao.path(), comercializacao_route)
        .get_async(Report::Importacao.path(), importacao_route)
        .get_async(Report::Exportacao.path(), exportacao_route)
        .run(req, env)
        .await
}

fn docs_route(_req: Request, _ctx: RouteContext<AppState>) -> Result<Response> {
    Response::from_html(apispec::ui_page())
}

fn apispec_route(_req: Request, _ctx: RouteContext<AppState>) -> Result<Response> {
    json_response(&apispec::document())
}

fn login_route(req: Request, ctx: RouteContext<AppState>) -> Result<Response> {
    match login_response(&req, &ctx.data) {
        Ok(response) => json_response(&response),
        Err(error) => error.into_response(),
    }
}

async fn producao_route(req: Request, ctx: RouteContext<AppState>) -> Result<Response> {
    report_route(&req, &ctx.data, Report::Producao).await
}

async fn processamento_route(req: Request, ctx: RouteContext<AppState>) -> Result<Response> {
    report_route(&req, &ctx.data, Report::Processamento).await
}

async fn comercializacao_route(req: Request, ctx: RouteContext<AppState>) -> Result<Response> {
    report_route(&req, &ctx.data, Report::Comercializacao).await
}

async fn importacao_route(req: Request, ctx: RouteContext<AppState>) -> Result<Response> {
    report_route(&req, &ctx.data, Report::Importacao).await
}

async fn exportacao_route(req: Request, ctx: RouteContext<AppState>) -> Result<Response> {
    report_route(&req, &ctx.data, Report::Exportacao).await
}

async fn report_route(req: &Request, state: &AppState, report: Report) -> Result<Response> {
    match report_response(req, state, report).await {
        Ok(tables) => json_response(&tables),
        Err(error) => {
            if error.status_code() >= 500 {
                worker::console_error!("{} request failed: {error}", report.label());
            }
            error.into_response()
        }
    }
}

async fn report_response(
    req: &Request,
    state: &AppState,
    report: Report,
) -> Result<TableSet, ApiError> {
    let authorization = req.headers().get("Authorization")?;
    auth::bearer_token(authorization.as_deref())?;

    source_scraper::fetch_report_tables(report, &state.source_base_url).await
}

fn login_response(req: &Request, state: &AppState) -> Result<AccessTokenResponse, ApiError> {
    let query = parse_query(req)?;
    let access_token = auth::issue_access_token(
        state.jwt_secret.as_deref(),
        query.get("username").map(String::as_str),
        query.get("password").map(String::as_str),
        Utc::now(),
        state.access_token_ttl,
    )?;

    Ok(AccessTokenResponse { access_token })
}

fn json_response<T>(payload: &T) -> Result<Response>
where
    T: Serialize,
{
    let mut response = Response::from_json(payload)?;
    response.headers_mut().set("Cache-Control", "no-store")?;
    Ok(response)
}

fn parse_query(req: &Request) -> Result<HashMap<String, String>, ApiError> {
    let url = req.url()?;
    let query = url
        .query_pairs()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect::<HashMap<_, _>>();
    Ok(query)
}

/// Parses a positive token lifetime in seconds; `None` input means the default.
pub fn parse_token_ttl(raw: Option<&str>) -> Option<Duration> {
    let Some(raw) = raw else {
        return Some(Duration::seconds(DEFAULT_ACCESS_TOKEN_TTL_SECONDS));
    };

    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|seconds| (1..=i64::from(u32::MAX)).contains(seconds))
        .map(Duration::seconds)
}
