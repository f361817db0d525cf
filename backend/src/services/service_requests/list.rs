use actix_web::{web, HttpResponse};
use common::model::page::Page;
use common::model::service_request::{RequestStatus, ServiceRequest, ServiceRequestSummary};
use rusqlite::{params_from_iter, Connection, ToSql};
use serde::Deserialize;
use serde_json::Value;

use crate::db::Db;
use crate::error::ApiError;
use crate::pagination::PageWindow;
use crate::services::service_requests::{request_from_row, REQUEST_COLUMNS};

#[derive(Debug, Deserialize)]
pub struct RequestListQuery {
    pub status: Option<String>,
    pub search: Option<String>,
    pub ordering: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

fn price_of(service: &Value) -> f64 {
    match service.get("price") {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn summarize(request: ServiceRequest) -> ServiceRequestSummary {
    let (services_count, total_estimated_cost) = match request.services_needed.as_array() {
        Some(items) => (items.len(), items.iter().map(price_of).sum()),
        None => (0, 0.0),
    };
    ServiceRequestSummary {
        id: request.id,
        full_name: request.full_name,
        email_address: request.email_address,
        services_count,
        total_estimated_cost,
        status: request.status,
        created_at: request.created_at,
    }
}

fn list_requests(
    conn: &Connection,
    query: &RequestListQuery,
    window: &PageWindow,
) -> Result<(i64, Vec<ServiceRequest>), ApiError> {
    let mut conditions: Vec<&str> = Vec::new();
    let mut bound: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(raw) = query.status.as_deref() {
        let status = RequestStatus::parse(raw)
            .ok_or_else(|| ApiError::validation("status", "unknown status"))?;
        conditions.push("status = ?");
        bound.push(Box::new(status.as_str().to_string()));
    }
    if let Some(search) = query.search.as_deref().filter(|s| !s.trim().is_empty()) {
        conditions.push("(full_name LIKE ? OR email_address LIKE ?)");
        let pattern = format!("%{}%", search.trim());
        bound.push(Box::new(pattern.clone()));
        bound.push(Box::new(pattern));
    }
    let where_sql = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };

    let count: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM service_requests{}", where_sql),
        params_from_iter(bound.iter().map(|p| p.as_ref())),
        |row| row.get(0),
    )?;

    let order_sql = match query.ordering.as_deref() {
        Some("full_name") => "full_name ASC, id DESC",
        Some("-full_name") => "full_name DESC, id DESC",
        Some("created_at") => "created_at ASC, id ASC",
        _ => "created_at DESC, id DESC",
    };
    bound.push(Box::new(window.limit()));
    bound.push(Box::new(window.offset()));

    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM service_requests{} ORDER BY {} LIMIT ? OFFSET ?",
        REQUEST_COLUMNS, where_sql, order_sql
    ))?;
    let rows = stmt.query_map(
        params_from_iter(bound.iter().map(|p| p.as_ref())),
        request_from_row,
    )?;
    let mut requests = Vec::new();
    for row in rows {
        requests.push(row?);
    }
    Ok((count, requests))
}

pub(crate) async fn process(
    db: web::Data<Db>,
    query: web::Query<RequestListQuery>,
) -> Result<HttpResponse, ApiError> {
    let conn = db.open()?;
    let window = PageWindow::new(query.page, query.page_size);
    let (count, requests) = list_requests(&conn, &query, &window)?;
    let page = Page {
        count,
        page: window.page,
        page_size: window.page_size,
        results: requests.into_iter().map(summarize).collect::<Vec<_>>(),
    };
    Ok(HttpResponse::Ok().json(page))
}
