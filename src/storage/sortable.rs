//! In-memory, uniquely keyed, comparator-ordered collection

use crate::core::entity::{Model, RecordId};
use crate::core::events::{CollectionEvent, EventBus, Subscription};
use crate::core::query::{Page, PageRequest};
use crate::core::sort::SortDirective;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// When a collection re-sorts itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortPolicy {
    /// Only an explicit [`SortableCollection::sort`] reorders the contents
    #[default]
    Explicit,
    /// Every insert, reset, and comparator change is followed by a sort
    OnMutation,
}

/// Ordered container of models, keyed by id
///
/// Models are stored in an `IndexMap`, which gives the two properties this
/// type needs: an explicit sequence order, and replace-in-place on key
/// collision. No two models ever share an id.
///
/// # Example
/// ```rust,ignore
/// let mut apps = SortableCollection::<Record>::new();
/// apps.set_comparator("-id".parse()?);
/// apps.reset(records);
/// apps.sort();
/// let first_page = apps.page(PageRequest::new(0, 20));
/// ```
#[derive(Debug)]
pub struct SortableCollection<M: Model> {
    models: IndexMap<RecordId, M>,
    comparator: SortDirective,
    policy: SortPolicy,
    events: EventBus,
}

impl<M: Model> SortableCollection<M> {
    /// Create an empty collection sorted ascending by id
    pub fn new() -> Self {
        Self::with_comparator(SortDirective::default())
    }

    pub fn with_comparator(comparator: SortDirective) -> Self {
        Self {
            models: IndexMap::new(),
            comparator,
            policy: SortPolicy::default(),
            events: EventBus::default(),
        }
    }

    /// Set when the collection re-sorts itself
    pub fn with_policy(mut self, policy: SortPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> SortPolicy {
        self.policy
    }

    pub fn comparator(&self) -> &SortDirective {
        &self.comparator
    }

    /// Replace the comparator used by subsequent sorts
    ///
    /// Under [`SortPolicy::Explicit`] this does not reorder anything.
    pub fn set_comparator(&mut self, comparator: SortDirective) {
        tracing::debug!(comparator = %comparator, "comparator set");
        self.comparator = comparator;
        self.sort_if_auto();
    }

    /// Stable in-place sort by the current comparator
    pub fn sort(&mut self) {
        if self.models.is_empty() {
            return;
        }

        let comparator = &self.comparator;
        self.models.sort_by(|_, a, _, b| comparator.compare(a, b));

        tracing::debug!(comparator = %self.comparator, count = self.models.len(), "sorted");
        self.events.publish(CollectionEvent::Sorted {
            directive: self.comparator.to_string(),
        });
    }

    /// Whether the current order is consistent with the comparator
    pub fn is_sorted(&self) -> bool {
        let models: Vec<&M> = self.models.values().collect();
        models
            .windows(2)
            .all(|pair| self.comparator.compare(pair[0], pair[1]).is_le())
    }

    /// Insert models, replacing any stored model with the same id in place
    ///
    /// Returns the ids touched, in input order.
    pub fn add(&mut self, models: impl IntoIterator<Item = M>) -> Vec<RecordId> {
        let ids: Vec<RecordId> = models
            .into_iter()
            .map(|model| {
                let id = model.id().clone();
                self.models.insert(id.clone(), model);
                id
            })
            .collect();

        tracing::debug!(count = ids.len(), total = self.models.len(), "models added");
        self.events
            .publish(CollectionEvent::Added { ids: ids.clone() });
        self.sort_if_auto();
        ids
    }

    /// Replace the entire contents
    pub fn reset(&mut self, models: impl IntoIterator<Item = M>) {
        self.models.clear();
        for model in models {
            self.models.insert(model.id().clone(), model);
        }

        tracing::debug!(count = self.models.len(), "collection reset");
        self.events.publish(CollectionEvent::Reset {
            count: self.models.len(),
        });
        self.sort_if_auto();
    }

    /// Remove the model with this id; absent ids are a no-op
    pub fn remove(&mut self, id: &RecordId) -> Option<M> {
        let removed = self.models.shift_remove(id);
        if removed.is_some() {
            tracing::debug!(%id, "model removed");
            self.events
                .publish(CollectionEvent::Removed { id: id.clone() });
        }
        removed
    }

    pub fn get(&self, id: &RecordId) -> Option<&M> {
        self.models.get(id)
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.models.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Iterate models in the last established order
    pub fn iter(&self) -> impl Iterator<Item = &M> {
        self.models.values()
    }

    /// Ids in the last established order
    pub fn ids(&self) -> impl Iterator<Item = &RecordId> {
        self.models.keys()
    }

    /// The current sequence, without re-sorting
    pub fn to_ordered_sequence(&self) -> Vec<&M> {
        self.models.values().collect()
    }

    /// One page of the current sequence
    pub fn page(&self, request: PageRequest) -> Page<&M> {
        request.collect(self.models.values(), self.models.len())
    }

    /// Register a view for change notifications
    pub fn subscribe(&self) -> Subscription {
        self.events.subscribe()
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    fn sort_if_auto(&mut self) {
        if self.policy == SortPolicy::OnMutation {
            self.sort();
        }
    }
}

impl<M: Model> Default for SortableCollection<M> {
    fn default() -> Self {
        Self::new()
    }
}
