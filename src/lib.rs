pub mod apispec;
pub mod auth;
pub mod error;
pub mod models;
pub mod routes;
pub mod source_scraper;

use worker::{Context, Env, Request, Response, Result, event};

#[event(fetch)]
async fn fetch(req: Request, env: Env, ctx: Context) -> Result<Response> {
    routes::handle(req, env, ctx).await
}
