//! End-to-end tests for the app collection
//!
//! These tests verify that:
//! - Sorting by id produces a monotone sequence in both directions
//! - Sorting is idempotent
//! - Inserting a duplicate id replaces without growing the collection
//! - Removing an absent id is a no-op
//! - parse + reset + sort + paging yields the expected windows
//! - Views observe changes through explicit subscriptions

use appdeck::prelude::*;
use serde_json::{Value, json};

fn ids(apps: &[&App]) -> Vec<Value> {
    apps.iter()
        .map(|app| serde_json::to_value(app.id()).unwrap())
        .collect()
}

fn populated(envelope: Value) -> AppCollection {
    let mut apps = AppCollection::new();
    let ticket = apps.begin_fetch();
    apps.apply_response(ticket, envelope).unwrap();
    apps
}

fn shuffled_ids() -> Vec<i64> {
    vec![42, 7, 19, 3, 88, 1, 56, 23, 11, 64]
}

// =============================================================================
// Ordering
// =============================================================================

mod ordering_tests {
    use super::*;

    fn collection_of(values: &[i64]) -> SortableCollection<Record> {
        let mut collection = SortableCollection::new();
        collection.reset(
            values
                .iter()
                .map(|id| Record::from_raw(json!({ "id": id })).unwrap()),
        );
        collection
    }

    fn numeric_ids(collection: &SortableCollection<Record>) -> Vec<i64> {
        collection
            .ids()
            .map(|id| match id {
                RecordId::Integer(i) => *i,
                other => panic!("unexpected id {}", other),
            })
            .collect()
    }

    #[test]
    fn test_descending_is_non_increasing() {
        let mut collection = collection_of(&shuffled_ids());
        collection.set_comparator("-id".parse().unwrap());
        collection.sort();

        let sorted = numeric_ids(&collection);
        assert!(sorted.windows(2).all(|w| w[0] >= w[1]), "{:?}", sorted);
    }

    #[test]
    fn test_ascending_is_non_decreasing() {
        let mut collection = collection_of(&shuffled_ids());
        collection.set_comparator("id".parse().unwrap());
        collection.sort();

        let sorted = numeric_ids(&collection);
        assert!(sorted.windows(2).all(|w| w[0] <= w[1]), "{:?}", sorted);
    }

    #[test]
    fn test_sort_twice_equals_sort_once() {
        let mut collection = collection_of(&shuffled_ids());
        collection.set_comparator("-id".parse().unwrap());
        collection.sort();
        let once = numeric_ids(&collection);

        collection.sort();
        assert_eq!(numeric_ids(&collection), once);
    }

    #[test]
    fn test_string_ids_sort_lexicographically() {
        let mut apps = populated(json!({
            "apps": [{"id": "/web"}, {"id": "/api"}, {"id": "/db"}]
        }));
        assert_eq!(
            ids(&apps.to_ordered_sequence()),
            vec![json!("/web"), json!("/db"), json!("/api")]
        );

        apps.collection_mut().set_comparator("id".parse().unwrap());
        apps.collection_mut().sort();
        assert_eq!(
            ids(&apps.to_ordered_sequence()),
            vec![json!("/api"), json!("/db"), json!("/web")]
        );
    }

    #[test]
    fn test_sort_by_attribute() {
        let mut apps = populated(json!({
            "apps": [
                {"id": "/a", "instances": 1},
                {"id": "/b", "instances": 5},
                {"id": "/c", "instances": 3}
            ]
        }));
        apps.collection_mut()
            .set_comparator("instances:desc".parse().unwrap());
        apps.collection_mut().sort();

        assert_eq!(
            ids(&apps.to_ordered_sequence()),
            vec![json!("/b"), json!("/c"), json!("/a")]
        );
    }
}

// =============================================================================
// Keying
// =============================================================================

mod keying_tests {
    use super::*;

    #[test]
    fn test_duplicate_insert_replaces() {
        let mut apps = populated(json!({"apps": [{"id": 1}, {"id": 2}, {"id": 3}]}));
        let before: Vec<RecordId> = apps.collection().ids().cloned().collect();

        let replacement = App::from_raw(json!({"id": 2, "instances": 9})).unwrap();
        apps.collection_mut().add([replacement]);

        let after: Vec<RecordId> = apps.collection().ids().cloned().collect();
        assert_eq!(apps.len(), 3);
        assert_eq!(before, after);

        let app = apps.collection().get(&RecordId::Integer(2)).unwrap();
        assert_eq!(app.instances(), Some(9));
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut apps = populated(json!({"apps": [{"id": 1}, {"id": 2}]}));
        assert!(apps.collection_mut().remove(&RecordId::Integer(77)).is_none());
        assert_eq!(apps.len(), 2);
    }

    #[test]
    fn test_add_requires_explicit_sort_by_default() {
        let mut apps = populated(json!({"apps": [{"id": 1}, {"id": 2}]}));
        apps.collection_mut()
            .add([App::from_raw(json!({"id": 3})).unwrap()]);
        assert_eq!(
            ids(&apps.to_ordered_sequence()),
            vec![json!(2), json!(1), json!(3)]
        );

        apps.collection_mut().sort();
        assert_eq!(
            ids(&apps.to_ordered_sequence()),
            vec![json!(3), json!(2), json!(1)]
        );
    }

    #[test]
    fn test_add_resorts_under_on_mutation_policy() {
        let config = CollectionConfig {
            sort_policy: SortPolicy::OnMutation,
            ..CollectionConfig::default()
        };
        let mut apps = AppCollection::from_config(&config).unwrap();
        let ticket = apps.begin_fetch();
        apps.apply_response(ticket, json!({"apps": [{"id": 1}, {"id": 2}]}))
            .unwrap();

        apps.collection_mut()
            .add([App::from_raw(json!({"id": 3})).unwrap()]);
        assert_eq!(
            ids(&apps.to_ordered_sequence()),
            vec![json!(3), json!(2), json!(1)]
        );
    }
}

// =============================================================================
// Parse, reset, page
// =============================================================================

mod end_to_end_tests {
    use super::*;

    #[test]
    fn test_parse_reset_sort() {
        let apps = AppCollection::new();
        let raw = apps
            .parse(json!({"apps": [{"id": 3}, {"id": 1}, {"id": 2}]}))
            .unwrap();

        let mut collection =
            SortableCollection::with_comparator("-id".parse::<SortDirective>().unwrap());
        collection.reset(raw.into_iter().map(|r| App::from_raw(r).unwrap()));
        collection.sort();

        let ordered: Vec<Value> = collection
            .to_ordered_sequence()
            .into_iter()
            .map(|app| serde_json::to_value(app).unwrap())
            .collect();
        assert_eq!(ordered, vec![json!({"id": 3}), json!({"id": 2}), json!({"id": 1})]);
    }

    #[test]
    fn test_paging_windows() {
        let apps = populated(json!({"apps": [{"id": 3}, {"id": 1}, {"id": 2}]}));

        let page0 = apps.page(PageRequest::new(0, 2));
        assert_eq!(ids(&page0.items), vec![json!(3), json!(2)]);

        let page1 = apps.page(PageRequest::new(1, 2));
        assert_eq!(ids(&page1.items), vec![json!(1)]);

        let page2 = apps.page(PageRequest::new(2, 2));
        assert!(page2.items.is_empty());
        assert_eq!(page2.meta.total, 3);
        assert_eq!(page2.meta.total_pages, 2);
    }

    #[test]
    fn test_parse_without_apps_field() {
        let apps = AppCollection::new();
        let err = apps.parse(json!({})).unwrap_err();
        assert!(matches!(err, CollectionError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn test_refresh_from_static_source() {
        let mut apps = AppCollection::new();
        let source = StaticAppsSource::new(json!({"apps": [{"id": 10}, {"id": 20}]}));

        let outcome = apps.refresh(&source).await.unwrap();
        assert_eq!(outcome, FetchOutcome::Applied { count: 2 });
        assert_eq!(apps.state(), CollectionState::Populated);
        assert_eq!(ids(&apps.to_ordered_sequence()), vec![json!(20), json!(10)]);
    }

    #[tokio::test]
    async fn test_refresh_propagates_malformed_response() {
        let mut apps = AppCollection::new();
        let source = StaticAppsSource::new(json!({"applications": []}));

        let err = apps.refresh(&source).await.unwrap_err();
        assert_eq!(err.error_code(), "MALFORMED_RESPONSE");
        assert_eq!(apps.state(), CollectionState::Empty);
    }
}

// =============================================================================
// Subscriptions
// =============================================================================

mod subscription_tests {
    use super::*;

    #[test]
    fn test_view_sees_reset_and_sort() {
        let mut apps = AppCollection::new();
        let mut view = apps.subscribe();

        let ticket = apps.begin_fetch();
        apps.apply_response(ticket, json!({"apps": [{"id": 1}, {"id": 2}]}))
            .unwrap();

        assert_eq!(
            view.drain(),
            vec![
                CollectionEvent::Reset { count: 2 },
                CollectionEvent::Sorted {
                    directive: "-id".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_stale_response_publishes_nothing() {
        let mut apps = AppCollection::new();
        let mut view = apps.subscribe();

        let stale = apps.begin_fetch();
        let _latest = apps.begin_fetch();
        apps.apply_response(stale, json!({"apps": [{"id": 1}]}))
            .unwrap();

        assert!(view.drain().is_empty());
    }

    #[test]
    fn test_unsubscribe_on_teardown() {
        let apps = AppCollection::new();
        let view = apps.subscribe();
        assert_eq!(apps.collection().events().subscriber_count(), 1);

        view.unsubscribe();
        assert_eq!(apps.collection().events().subscriber_count(), 0);
    }
}
