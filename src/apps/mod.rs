//! Application records fetched from `/v2/apps`

pub mod collection;
pub mod model;
pub mod source;

pub use collection::{
    AppCollection, CollectionState, ENVELOPE_FIELD, FetchOutcome, FetchTicket, RESOURCE_PATH,
};
pub use model::App;
#[cfg(feature = "http")]
pub use source::HttpAppsSource;
pub use source::{AppsSource, StaticAppsSource};
