//! # appdeck
//!
//! The data-model layer of a cluster application dashboard: a sortable,
//! paginated, client-side collection of app records fetched from
//! `GET /v2/apps`.
//!
//! ## Features
//!
//! - **Uniquely keyed**: inserting a record whose id is already present
//!   replaces it in place
//! - **Comparator-driven order**: stable sort by any (dotted) field,
//!   ascending or descending, parsed once from `"-id"`-style strings
//! - **Paging**: slice the ordered contents into `[page*size, page*size+size)`
//! - **Fetch generations**: responses to superseded fetches are ignored
//! - **Explicit subscriptions**: views observe changes through an event bus
//!   and unsubscribe when they go away
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use appdeck::prelude::*;
//!
//! let mut apps = AppCollection::new();
//! let source = HttpAppsSource::new("http://localhost:8080", RESOURCE_PATH)?;
//! apps.refresh(&source).await?;
//!
//! let page = apps.page(PageRequest::new(0, 20));
//! for app in page.items {
//!     println!("{} ({} instances)", app.id(), app.instances().unwrap_or(0));
//! }
//! ```

pub mod apps;
pub mod config;
pub mod core;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        CollectionError, CollectionEvent, ConfigError, Direction, EventBus, FieldRef, FieldValue,
        Model, Page, PageRequest, PaginationMeta, Record, RecordId, SortDirective, Subscription,
    };

    // === Storage ===
    pub use crate::storage::{SortPolicy, SortableCollection};

    // === Apps ===
    #[cfg(feature = "http")]
    pub use crate::apps::HttpAppsSource;
    pub use crate::apps::{
        App, AppCollection, AppsSource, CollectionState, FetchOutcome, FetchTicket,
        RESOURCE_PATH, StaticAppsSource,
    };

    // === Config ===
    pub use crate::config::CollectionConfig;
}
