//! Core module containing the fundamental types of the collection layer

pub mod entity;
pub mod error;
pub mod events;
pub mod field;
pub mod query;
pub mod sort;

pub use entity::{Model, Record, RecordId};
pub use error::{CollectionError, ConfigError, Result};
pub use events::{CollectionEvent, EventBus, EventEnvelope, Subscription};
pub use field::FieldValue;
pub use query::{Page, PageRequest, PaginationMeta};
pub use sort::{Direction, FieldRef, SortDirective};
