//! # Guide Catalog Service Module
//!
//! This module aggregates all API endpoints related to the guide catalog.
//! It acts as a router, directing incoming HTTP requests under the
//! `/api/guides` path to the appropriate handler logic defined in its
//! sub-modules.
//!
//! ## Registered Routes:
//!
//! *   **`GET /api/guides`**:
//!     - **Handler**: `list::process`
//!     - **Description**: Paginated listing of published guides. Supports
//!       `category`, `is_featured` and `search` filters, `ordering` by
//!       publication date, view count or title (prefix `-` for descending),
//!       and a `lang` parameter selecting the language of the returned
//!       fields (with fallback when the translation is missing).
//!
//! *   **`GET /api/guides/featured`** / **`GET /api/guides/popular`**:
//!     - **Handlers**: `featured::process`, `popular::process`
//!     - **Description**: Short unpaginated selections for the landing page:
//!       the most recent featured guides and the most viewed guides.
//!
//! *   **`POST /api/guides`**:
//!     - **Handler**: `create::process`
//!     - **Description**: Creates a guide with at least one translation. A
//!       slug is derived from the title unless supplied explicitly; the
//!       allocator guarantees uniqueness even for duplicate titles.
//!
//! *   **`POST /api/guides/{id}/like`**:
//!     - **Handler**: `like::process`
//!     - **Description**: Atomically increments the like counter of a
//!       published guide and returns the new total.
//!
//! *   **`GET /api/guides/{slug}`**:
//!     - **Handler**: `detail::process`
//!     - **Description**: Full guide payload: resolved language fields,
//!       content with media references rewritten to absolute URLs, reading
//!       time, and up to three related guides. Counts the view. Unknown and
//!       unpublished slugs both answer 404.

mod create;
mod detail;
mod featured;
mod like;
mod list;
mod popular;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

/// The base path for all guide-related API endpoints.
const API_PATH: &str = "/api/guides";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("", post().to(create::process))
        .route("/featured", get().to(featured::process))
        .route("/popular", get().to(popular::process))
        .route("/{id}/like", post().to(like::process))
        .route("/{slug}", get().to(detail::process))
}
