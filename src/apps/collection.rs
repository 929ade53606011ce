//! The app collection: a sortable collection bound to `/v2/apps`

use crate::apps::model::App;
use crate::apps::source::AppsSource;
use crate::config::CollectionConfig;
use crate::core::entity::Model;
use crate::core::error::{CollectionError, Result};
use crate::core::events::Subscription;
use crate::core::query::{Page, PageRequest};
use crate::core::sort::{FieldRef, SortDirective};
use crate::storage::{SortPolicy, SortableCollection};
use serde_json::Value;
use uuid::Uuid;

/// Remote resource the collection is fetched from
pub const RESOURCE_PATH: &str = "/v2/apps";

/// Envelope field holding the array of app payloads
pub const ENVELOPE_FIELD: &str = "apps";

/// Observable lifecycle of an [`AppCollection`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionState {
    /// No fetch has been applied yet
    Empty,
    /// At least one fetch has been applied (possibly with zero apps)
    Populated,
}

/// Identifies one issued fetch
///
/// Only the ticket from the most recent [`AppCollection::begin_fetch`] of the
/// same collection may replace the contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    collection: Uuid,
    generation: u64,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Id of the collection that issued this ticket
    pub fn collection(&self) -> Uuid {
        self.collection
    }
}

/// Result of applying a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The contents were replaced with `count` apps
    Applied { count: usize },
    /// A newer fetch was issued meanwhile; the response was ignored
    Stale { generation: u64, latest: u64 },
    /// The ticket was issued by another collection; the response was ignored
    Foreign { issuer: Uuid },
}

/// Collection of apps, newest id first by default
///
/// # Example
/// ```rust,ignore
/// let mut apps = AppCollection::new();
/// let ticket = apps.begin_fetch();
/// let envelope = source.fetch_envelope().await?;
/// apps.apply_response(ticket, envelope)?;
/// for app in apps.page(PageRequest::new(0, 20)).items {
///     render(app);
/// }
/// ```
#[derive(Debug)]
pub struct AppCollection {
    id: Uuid,
    apps: SortableCollection<App>,
    resource_path: String,
    envelope_field: String,
    state: CollectionState,
    issued: u64,
}

impl AppCollection {
    /// Create an empty collection ordered by `-id`
    pub fn new() -> Self {
        Self::build(
            SortableCollection::with_comparator(SortDirective::descending(FieldRef::id())),
            RESOURCE_PATH.to_string(),
            ENVELOPE_FIELD.to_string(),
        )
    }

    /// Create an empty collection from configuration
    pub fn from_config(config: &CollectionConfig) -> Result<Self> {
        config.validate()?;
        let comparator: SortDirective = config.default_sort.parse()?;

        Ok(Self::build(
            SortableCollection::with_comparator(comparator).with_policy(config.sort_policy),
            config.resource_path.clone(),
            config.envelope_field.clone(),
        ))
    }

    fn build(apps: SortableCollection<App>, resource_path: String, envelope_field: String) -> Self {
        let mut collection = Self {
            id: Uuid::new_v4(),
            apps,
            resource_path,
            envelope_field,
            state: CollectionState::Empty,
            issued: 0,
        };
        collection.apps.sort();
        collection
    }

    /// Unique id stamped on every ticket this collection issues
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn resource_path(&self) -> &str {
        &self.resource_path
    }

    pub fn state(&self) -> CollectionState {
        self.state
    }

    pub fn is_populated(&self) -> bool {
        self.state == CollectionState::Populated
    }

    /// Unwrap the raw app payloads from a response envelope
    pub fn parse(&self, envelope: Value) -> Result<Vec<Value>> {
        let Value::Object(mut fields) = envelope else {
            return Err(CollectionError::malformed("response envelope is not an object"));
        };

        match fields.remove(&self.envelope_field) {
            Some(Value::Array(raw)) => Ok(raw),
            Some(other) => Err(CollectionError::malformed(format!(
                "field '{}' is not an array: {}",
                self.envelope_field, other
            ))),
            None => Err(CollectionError::malformed(format!(
                "field '{}' is missing",
                self.envelope_field
            ))),
        }
    }

    /// Issue a ticket for a new fetch, superseding all earlier tickets
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued += 1;
        tracing::debug!(generation = self.issued, path = %self.resource_path, "fetch started");
        FetchTicket {
            collection: self.id,
            generation: self.issued,
        }
    }

    /// Replace the contents with the apps in `envelope`, then sort
    ///
    /// The whole envelope is rejected if any payload fails to instantiate.
    /// A response for a superseded ticket, or for a ticket issued by another
    /// collection, is ignored.
    pub fn apply_response(&mut self, ticket: FetchTicket, envelope: Value) -> Result<FetchOutcome> {
        if ticket.collection != self.id {
            tracing::warn!(
                issuer = %ticket.collection,
                collection = %self.id,
                "ignoring apps response for a foreign ticket"
            );
            return Ok(FetchOutcome::Foreign {
                issuer: ticket.collection,
            });
        }

        if ticket.generation < self.issued {
            tracing::warn!(
                generation = ticket.generation,
                latest = self.issued,
                "ignoring stale apps response"
            );
            return Ok(FetchOutcome::Stale {
                generation: ticket.generation,
                latest: self.issued,
            });
        }

        let apps = self
            .parse(envelope)
            .and_then(|raw| raw.into_iter().map(App::from_raw).collect::<Result<Vec<_>>>())
            .inspect_err(|e| tracing::warn!(error = %e, "rejecting apps response"))?;

        self.apps.reset(apps);
        // `reset` already sorted under OnMutation
        if self.apps.policy() != SortPolicy::OnMutation {
            self.apps.sort();
        }
        let count = self.apps.len();
        self.state = CollectionState::Populated;

        tracing::info!(count, generation = ticket.generation, "apps response applied");
        Ok(FetchOutcome::Applied { count })
    }

    /// Fetch from `source` and apply the result
    pub async fn refresh<S>(&mut self, source: &S) -> Result<FetchOutcome>
    where
        S: AppsSource + ?Sized,
    {
        let ticket = self.begin_fetch();
        let envelope = source.fetch_envelope().await?;
        self.apply_response(ticket, envelope)
    }

    /// The underlying sortable collection
    pub fn collection(&self) -> &SortableCollection<App> {
        &self.apps
    }

    /// Mutable access for explicit `add`/`remove`/comparator changes
    pub fn collection_mut(&mut self) -> &mut SortableCollection<App> {
        &mut self.apps
    }

    pub fn to_ordered_sequence(&self) -> Vec<&App> {
        self.apps.to_ordered_sequence()
    }

    pub fn page(&self, request: PageRequest) -> Page<&App> {
        self.apps.page(request)
    }

    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    pub fn subscribe(&self) -> Subscription {
        self.apps.subscribe()
    }
}

impl Default for AppCollection {
    fn default() -> Self {
        Self::new()
    }
}
