//! Guide catalog core.
//!
//! Everything the HTTP layer needs to publish localized guides lives here,
//! split by concern:
//!
//! - `slug`: derives a unique URL-safe identifier from a title at creation.
//! - `translations`: per-language field sets with fallback resolution.
//! - `repository`: guide rows, filtered/ordered listing, atomic counters.
//! - `render`: rewrites root-relative media references in stored content to
//!   absolute URLs for the client.
//! - `related`: bounded, deterministic same-category suggestions.
//! - `query`: the façade the endpoints call — language-aware summaries and
//!   detail payloads with reading-time estimates.

pub mod query;
pub mod related;
pub mod render;
pub mod repository;
pub mod slug;
pub mod translations;
