use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::model::guide::{GuideCategory, TranslationFields};
use crate::model::service_request::{RequestStatus, ServiceKind};

fn default_country_code() -> String {
    // +998 por defecto
    "+998".to_string()
}

/// Request payload for the intake endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct NewServiceRequest {
    pub full_name: String,
    pub email_address: String,
    pub phone_number: String,
    #[serde(default = "default_country_code")]
    pub country_code: String,
    pub services_needed: serde_json::Value,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub estimated_budget: Option<String>,
    pub detailed_requirements: String,
    #[serde(default)]
    pub additional_information: Option<String>,
    #[serde(default)]
    pub business_type: Option<String>,
    #[serde(default)]
    pub business_requirements: Option<String>,
}

/// Request payload for a service-request status transition.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: RequestStatus,
}

/// Request payload for guide creation. The slug is allocated from the title
/// unless given explicitly; `translations` maps language codes to field sets
/// and must contain at least one entry.
#[derive(Debug, Clone, Deserialize)]
pub struct NewGuideRequest {
    #[serde(default)]
    pub slug: Option<String>,
    pub category: GuideCategory,
    #[serde(default)]
    pub featured_image: Option<String>,
    #[serde(default)]
    pub is_published: Option<bool>,
    #[serde(default)]
    pub is_featured: Option<bool>,
    #[serde(default)]
    pub publication_date: Option<DateTime<Utc>>,
    pub translations: BTreeMap<String, TranslationFields>,
}

/// Request payload for submitting a review. Moderation flags are not
/// accepted from the submitter.
#[derive(Debug, Clone, Deserialize)]
pub struct NewReviewRequest {
    pub reviewer_name: String,
    #[serde(default)]
    pub reviewer_email: Option<String>,
    #[serde(default)]
    pub reviewer_country: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    pub content: String,
    pub rating: i32,
    #[serde(default)]
    pub service_used: Option<ServiceKind>,
}
