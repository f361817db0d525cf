use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The fixed set of guide categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuideCategory {
    BankingFinance,
    Transportation,
    Documentation,
    Housing,
    Healthcare,
    Business,
    Cultural,
    Emergency,
}

impl GuideCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            GuideCategory::BankingFinance => "banking_finance",
            GuideCategory::Transportation => "transportation",
            GuideCategory::Documentation => "documentation",
            GuideCategory::Housing => "housing",
            GuideCategory::Healthcare => "healthcare",
            GuideCategory::Business => "business",
            GuideCategory::Cultural => "cultural",
            GuideCategory::Emergency => "emergency",
        }
    }

    pub fn parse(value: &str) -> Option<GuideCategory> {
        match value {
            "banking_finance" => Some(GuideCategory::BankingFinance),
            "transportation" => Some(GuideCategory::Transportation),
            "documentation" => Some(GuideCategory::Documentation),
            "housing" => Some(GuideCategory::Housing),
            "healthcare" => Some(GuideCategory::Healthcare),
            "business" => Some(GuideCategory::Business),
            "cultural" => Some(GuideCategory::Cultural),
            "emergency" => Some(GuideCategory::Emergency),
            _ => None,
        }
    }
}

/// Language-invariant guide record as persisted.
///
/// The textual fields live in per-language `TranslationFields` sets keyed by
/// (guide id, language code); a guide always has at least one of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guide {
    pub id: i64,
    pub slug: String,
    pub category: GuideCategory,
    pub featured_image: Option<String>,
    pub is_published: bool,
    pub is_featured: bool,
    pub publication_date: DateTime<Utc>,
    pub view_count: i64,
    pub likes: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One language's textual field set for a guide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationFields {
    pub title: String,
    pub short_description: String,
    pub content: String,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub keywords: Option<String>,
}

/// Listing payload: guide metadata plus the resolved language's display
/// fields and the derived reading time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuideSummary {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub category: GuideCategory,
    pub short_description: String,
    pub featured_image: Option<String>,
    pub is_featured: bool,
    pub publication_date: DateTime<Utc>,
    pub view_count: i64,
    pub likes: i64,
    pub reading_time: u32,
    pub language: String,
}

/// Detail payload: everything in the summary plus the rendered content, SEO
/// fields and related guides from the same category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuideDetail {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub category: GuideCategory,
    pub short_description: String,
    pub content: String,
    pub meta_description: Option<String>,
    pub keywords: Option<String>,
    pub featured_image: Option<String>,
    pub is_featured: bool,
    pub publication_date: DateTime<Utc>,
    pub view_count: i64,
    pub likes: i64,
    pub reading_time: u32,
    pub language: String,
    pub related: Vec<GuideSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
