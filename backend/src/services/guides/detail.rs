use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::config::Config;
use crate::db::Db;
use crate::error::ApiError;
use crate::guides::query;

#[derive(Debug, Deserialize)]
pub struct GuideDetailQuery {
    pub lang: Option<String>,
}

/// Absolute URL prefix for rewriting in-content media references: the
/// configured public base URL when set, otherwise whatever origin this
/// request came in on.
fn base_url(config: &Config, req: &HttpRequest) -> String {
    match &config.public_base_url {
        Some(configured) => configured.clone(),
        None => {
            let info = req.connection_info();
            format!("{}://{}", info.scheme(), info.host())
        }
    }
}

pub(crate) async fn process(
    db: web::Data<Db>,
    config: web::Data<Config>,
    slug: web::Path<String>,
    query: web::Query<GuideDetailQuery>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let conn = db.open()?;
    let base = base_url(&config, &req);
    let detail = query::get_detail(
        &conn,
        &slug,
        query.lang.as_deref(),
        &config.default_lang,
        Some(&base),
    )?;
    Ok(HttpResponse::Ok().json(detail))
}
