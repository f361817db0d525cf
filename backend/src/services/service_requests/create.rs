//! # Service Request Intake
//!
//! Backend logic for `POST /api/service-requests`, the public intake form.
//!
//! ## Workflow
//!
//! 1.  **HTTP Request**: `process` receives the submission as JSON.
//! 2.  **Validation**: `validate` checks the personal fields and, most
//!     importantly, that `services_needed` is a JSON list whose entries are
//!     objects carrying both `name` and `price`. Failures answer `400` with
//!     the offending field.
//! 3.  **Persistence**: the submission is stored with status `pending`;
//!     the stored row is read back and returned as `201 Created`.
//! 4.  **Notification**: after the row is durable, the fire-and-forget hook
//!     in `crate::notify` is invoked. Whatever happens there can no longer
//!     affect the response.

use actix_web::{web, HttpResponse};
use chrono::Utc;
use common::model::service_request::ServiceRequest;
use common::requests::NewServiceRequest;
use regex::Regex;
use rusqlite::{params, Connection};
use serde_json::Value;

use crate::db::Db;
use crate::error::ApiError;
use crate::notify;
use crate::services::service_requests::{request_from_row, REQUEST_COLUMNS};

const FULL_NAME_MAX: usize = 100;
const PHONE_MAX: usize = 20;

/// `services_needed` must be a list of objects each carrying `name` and
/// `price`. Values are kept as submitted.
pub(crate) fn validate_services_needed(value: &Value) -> Result<(), ApiError> {
    let Some(items) = value.as_array() else {
        return Err(ApiError::validation(
            "services_needed",
            "services must be provided as a list",
        ));
    };
    for item in items {
        let valid = item
            .as_object()
            .is_some_and(|obj| obj.contains_key("name") && obj.contains_key("price"));
        if !valid {
            return Err(ApiError::validation(
                "services_needed",
                "each service must have 'name' and 'price' fields",
            ));
        }
    }
    Ok(())
}

pub(crate) fn validate(request: &NewServiceRequest) -> Result<(), ApiError> {
    if request.full_name.trim().is_empty() || request.full_name.chars().count() > FULL_NAME_MAX {
        return Err(ApiError::validation(
            "full_name",
            format!("full_name must be 1-{} characters", FULL_NAME_MAX),
        ));
    }
    if !(request.email_address.contains('@') && request.email_address.contains('.')) {
        return Err(ApiError::validation(
            "email_address",
            "a valid e-mail address is required",
        ));
    }
    let phone_re = Regex::new(r"^\+?[0-9][0-9 ()\-]{3,}$")
        .map_err(|e| ApiError::validation("phone_number", format!("regex error: {}", e)))?;
    if request.phone_number.chars().count() > PHONE_MAX
        || !phone_re.is_match(request.phone_number.trim())
    {
        return Err(ApiError::validation(
            "phone_number",
            "a valid phone number is required",
        ));
    }
    let country_re = Regex::new(r"^\+[0-9]{1,4}$")
        .map_err(|e| ApiError::validation("country_code", format!("regex error: {}", e)))?;
    if !country_re.is_match(&request.country_code) {
        return Err(ApiError::validation(
            "country_code",
            "country_code must look like +998",
        ));
    }
    if request.detailed_requirements.trim().is_empty() {
        return Err(ApiError::validation(
            "detailed_requirements",
            "detailed_requirements must not be empty",
        ));
    }
    validate_services_needed(&request.services_needed)
}

pub(crate) fn insert_request(
    conn: &Connection,
    request: &NewServiceRequest,
) -> Result<ServiceRequest, ApiError> {
    let now = Utc::now();
    let services = serde_json::to_string(&request.services_needed)
        .map_err(|e| ApiError::validation("services_needed", e.to_string()))?;
    conn.execute(
        "INSERT INTO service_requests (full_name, email_address, phone_number, country_code, \
         services_needed, location, estimated_budget, detailed_requirements, \
         additional_information, business_type, business_requirements, is_processed, status, \
         created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, 0, 'pending', ?12, ?12)",
        params![
            request.full_name.trim(),
            request.email_address.trim(),
            request.phone_number.trim(),
            request.country_code,
            services,
            request.location,
            request.estimated_budget,
            request.detailed_requirements,
            request.additional_information,
            request.business_type,
            request.business_requirements,
            now,
        ],
    )?;
    let id = conn.last_insert_rowid();
    let stored = conn.query_row(
        &format!(
            "SELECT {} FROM service_requests WHERE id = ?1",
            REQUEST_COLUMNS
        ),
        params![id],
        request_from_row,
    )?;
    Ok(stored)
}

pub(crate) async fn process(
    db: web::Data<Db>,
    payload: web::Json<NewServiceRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = payload.into_inner();
    validate(&request)?;
    let conn = db.open()?;
    let stored = insert_request(&conn, &request)?;
    notify::service_request_created(&stored);
    Ok(HttpResponse::Created().json(stored))
}
