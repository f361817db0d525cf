//! Service-request intake and processing endpoints under
//! `/api/service-requests`.
//!
//! - `POST /api/service-requests`: public intake form submission. Validates
//!   the submission (notably that `services_needed` is a list of objects
//!   each carrying `name` and `price`), persists it, and fires the
//!   post-commit notification hook.
//! - `GET /api/service-requests`: paginated listing for the operations side
//!   with status filter, name/e-mail search and ordering.
//! - `PATCH /api/service-requests/{id}/status`: moves a request along
//!   pending -> in_progress -> completed, or to cancelled from any
//!   non-terminal state.

mod create;
mod list;
mod update_status;

use actix_web::web::{get, patch, post, scope};
use actix_web::Scope;
use chrono::{DateTime, Utc};
use common::model::service_request::{RequestStatus, ServiceRequest};
use rusqlite::types::Type;
use rusqlite::Row;

const API_PATH: &str = "/api/service-requests";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", post().to(create::process))
        .route("", get().to(list::process))
        .route("/{id}/status", patch().to(update_status::process))
}

pub(crate) const REQUEST_COLUMNS: &str = "id, full_name, email_address, phone_number, \
    country_code, services_needed, location, estimated_budget, detailed_requirements, \
    additional_information, business_type, business_requirements, is_processed, status, \
    created_at, updated_at";

pub(crate) fn request_from_row(row: &Row) -> rusqlite::Result<ServiceRequest> {
    let services_raw: String = row.get(5)?;
    let services_needed = serde_json::from_str(&services_raw).map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(err))
    })?;
    let status_raw: String = row.get(13)?;
    let status = RequestStatus::parse(&status_raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            13,
            Type::Text,
            format!("unknown request status '{}'", status_raw).into(),
        )
    })?;
    let created_at: DateTime<Utc> = row.get(14)?;
    let updated_at: DateTime<Utc> = row.get(15)?;
    Ok(ServiceRequest {
        id: row.get(0)?,
        full_name: row.get(1)?,
        email_address: row.get(2)?,
        phone_number: row.get(3)?,
        country_code: row.get(4)?,
        services_needed,
        location: row.get(6)?,
        estimated_budget: row.get(7)?,
        detailed_requirements: row.get(8)?,
        additional_information: row.get(9)?,
        business_type: row.get(10)?,
        business_requirements: row.get(11)?,
        is_processed: row.get(12)?,
        status,
        created_at,
        updated_at,
    })
}
