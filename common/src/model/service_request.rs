use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of a service request. Only `status` (and the derived
/// `is_processed` flag) ever changes after submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::InProgress => "in_progress",
            RequestStatus::Completed => "completed",
            RequestStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<RequestStatus> {
        match value {
            "pending" => Some(RequestStatus::Pending),
            "in_progress" => Some(RequestStatus::InProgress),
            "completed" => Some(RequestStatus::Completed),
            "cancelled" => Some(RequestStatus::Cancelled),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestStatus::Completed | RequestStatus::Cancelled)
    }

    /// Allowed transitions: pending -> in_progress -> completed, and
    /// cancelled from any non-terminal state.
    pub fn can_transition_to(self, next: RequestStatus) -> bool {
        match (self, next) {
            (RequestStatus::Pending, RequestStatus::InProgress) => true,
            (RequestStatus::InProgress, RequestStatus::Completed) => true,
            (from, RequestStatus::Cancelled) => !from.is_terminal(),
            _ => false,
        }
    }
}

/// The services a client can request help with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
    WiFiSimSetup,
    ApartmentFinding,
    GroceryHelp,
    TranslationServices,
    BillPayments,
    TransportationHelp,
    DocumentAssistance,
    SocialIntegration,
    BusinessSupport,
    HealthcareNavigation,
    FoodDining,
    CustomsRequest,
}

impl ServiceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::WiFiSimSetup => "wi_fi_sim_setup",
            ServiceKind::ApartmentFinding => "apartment_finding",
            ServiceKind::GroceryHelp => "grocery_help",
            ServiceKind::TranslationServices => "translation_services",
            ServiceKind::BillPayments => "bill_payments",
            ServiceKind::TransportationHelp => "transportation_help",
            ServiceKind::DocumentAssistance => "document_assistance",
            ServiceKind::SocialIntegration => "social_integration",
            ServiceKind::BusinessSupport => "business_support",
            ServiceKind::HealthcareNavigation => "healthcare_navigation",
            ServiceKind::FoodDining => "food_dining",
            ServiceKind::CustomsRequest => "customs_request",
        }
    }

    pub fn parse(value: &str) -> Option<ServiceKind> {
        match value {
            "wi_fi_sim_setup" => Some(ServiceKind::WiFiSimSetup),
            "apartment_finding" => Some(ServiceKind::ApartmentFinding),
            "grocery_help" => Some(ServiceKind::GroceryHelp),
            "translation_services" => Some(ServiceKind::TranslationServices),
            "bill_payments" => Some(ServiceKind::BillPayments),
            "transportation_help" => Some(ServiceKind::TransportationHelp),
            "document_assistance" => Some(ServiceKind::DocumentAssistance),
            "social_integration" => Some(ServiceKind::SocialIntegration),
            "business_support" => Some(ServiceKind::BusinessSupport),
            "healthcare_navigation" => Some(ServiceKind::HealthcareNavigation),
            "food_dining" => Some(ServiceKind::FoodDining),
            "customs_request" => Some(ServiceKind::CustomsRequest),
            _ => None,
        }
    }
}

/// A stored intake submission.
///
/// `services_needed` keeps the JSON exactly as submitted: a list of objects
/// each carrying `name` and `price` (validated on the way in).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRequest {
    pub id: i64,
    pub full_name: String,
    pub email_address: String,
    pub phone_number: String,
    pub country_code: String,
    pub services_needed: serde_json::Value,
    pub location: Option<String>,
    pub estimated_budget: Option<String>,
    pub detailed_requirements: String,
    pub additional_information: Option<String>,
    pub business_type: Option<String>,
    pub business_requirements: Option<String>,
    pub is_processed: bool,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Condensed row for the admin listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRequestSummary {
    pub id: i64,
    pub full_name: String,
    pub email_address: String,
    pub services_count: usize,
    pub total_estimated_cost: f64,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_follow_the_chain() {
        assert!(RequestStatus::Pending.can_transition_to(RequestStatus::InProgress));
        assert!(RequestStatus::InProgress.can_transition_to(RequestStatus::Completed));
        assert!(RequestStatus::Pending.can_transition_to(RequestStatus::Cancelled));
        assert!(RequestStatus::InProgress.can_transition_to(RequestStatus::Cancelled));

        assert!(!RequestStatus::Pending.can_transition_to(RequestStatus::Completed));
        assert!(!RequestStatus::Completed.can_transition_to(RequestStatus::InProgress));
        assert!(!RequestStatus::Completed.can_transition_to(RequestStatus::Cancelled));
        assert!(!RequestStatus::Cancelled.can_transition_to(RequestStatus::Cancelled));
    }

    #[test]
    fn service_kind_round_trips() {
        let json = serde_json::to_string(&ServiceKind::WiFiSimSetup).unwrap();
        assert_eq!(json, "\"wi_fi_sim_setup\"");
        assert_eq!(
            ServiceKind::parse("healthcare_navigation"),
            Some(ServiceKind::HealthcareNavigation)
        );
    }
}
