// ═══════════════════════════════════════════════════════════════════
// Reducer Tests — CrudReducer transitions, overrides, root reducer
// ═══════════════════════════════════════════════════════════════════

use serde_json::{json, Value};
use std::sync::Arc;

use wallet_core::actions::{router, Action, ResourceActions, Transition};
use wallet_core::models::collection::CollectionState;
use wallet_core::models::kind::ResourceKind;
use wallet_core::models::resource::Resource;
use wallet_core::models::status::Status;
use wallet_core::reducers::{AppState, CrudReducer, PayloadKeys, RootReducer};

// ── Helpers ─────────────────────────────────────────────────────────

fn accounts() -> (CrudReducer, ResourceActions) {
    (
        CrudReducer::for_kind(ResourceKind::Accounts),
        ResourceActions::for_kind(ResourceKind::Accounts),
    )
}

fn record(value: Value) -> Resource {
    Resource::from_value(value).unwrap()
}

fn state_with(items: Vec<Value>) -> Arc<CollectionState> {
    Arc::new(CollectionState {
        status: Status::FetchDone,
        items: items.into_iter().map(record).collect(),
        errors: Default::default(),
    })
}

// ── Initialization and identity ─────────────────────────────────────

mod identity {
    use super::*;

    #[test]
    fn empty_action_on_uninitialized_state_yields_initial() {
        let (reducer, _) = accounts();
        let state = reducer.reduce(None, &Action::empty());
        assert_eq!(*state, CollectionState::initial());
        assert_eq!(state.status, Status::Initial);
        assert!(state.items.is_empty());
        assert!(state.errors.is_empty());
    }

    #[test]
    fn unknown_action_returns_same_arc() {
        let (reducer, _) = accounts();
        let state = state_with(vec![json!({ "id": 1 })]);
        let next = reducer.reduce(Some(&state), &Action::new("SOMETHING_ELSE"));
        assert!(Arc::ptr_eq(&state, &next));
    }

    #[test]
    fn other_kinds_actions_are_ignored() {
        let (reducer, _) = accounts();
        let categories = ResourceActions::for_kind(ResourceKind::Categories);
        let state = state_with(vec![json!({ "id": 1 })]);
        let next = reducer.reduce(
            Some(&state),
            &categories.create(Transition::GetCollectionRequest, []),
        );
        assert!(Arc::ptr_eq(&state, &next));
    }

    #[test]
    fn recognized_action_does_not_mutate_input() {
        let (reducer, actions) = accounts();
        let state = state_with(vec![json!({ "id": 1 })]);
        let before = (*state).clone();
        let next = reducer.reduce(
            Some(&state),
            &actions.create(Transition::GetCollectionRequest, []),
        );
        assert_eq!(*state, before);
        assert_eq!(next.status, Status::Fetching);
    }
}

// ── Request transitions ─────────────────────────────────────────────

mod requests {
    use super::*;

    #[test]
    fn set_in_flight_status_and_keep_items() {
        let (reducer, actions) = accounts();
        let state = state_with(vec![json!({ "id": 1 }), json!({ "id": 2 })]);
        let cases = [
            (Transition::GetCollectionRequest, Status::Fetching),
            (Transition::GetResourceRequest, Status::Fetching),
            (Transition::CreateResourceRequest, Status::Creating),
            (Transition::EditResourceRequest, Status::Editing),
            (Transition::RemoveResourceRequest, Status::Removing),
        ];
        for (transition, status) in cases {
            let next = reducer.reduce(Some(&state), &actions.create(transition, []));
            assert_eq!(next.status, status, "{transition}");
            assert_eq!(next.items, state.items, "{transition}");
        }
    }

    #[test]
    fn request_keeps_previous_errors() {
        let (reducer, actions) = accounts();
        let failed = reducer.reduce(
            None,
            &actions.create(
                Transition::GetCollectionFailed,
                [json!({ "server": "down" })],
            ),
        );
        let next = reducer.reduce(
            Some(&failed),
            &actions.create(Transition::GetCollectionRequest, []),
        );
        assert_eq!(next.status, Status::Fetching);
        assert_eq!(next.errors.get("server").map(String::as_str), Some("down"));
    }
}

// ── Response transitions ────────────────────────────────────────────

mod responses {
    use super::*;

    #[test]
    fn get_accounts_scenario() {
        let (reducer, actions) = accounts();
        let state = reducer.reduce(None, &Action::empty());
        let state = reducer.reduce(
            Some(&state),
            &actions.create(Transition::GetCollectionRequest, []),
        );
        assert_eq!(state.status, Status::Fetching);
        assert!(state.items.is_empty());

        let state = reducer.reduce(
            Some(&state),
            &actions.create(
                Transition::GetCollectionResponse,
                [json!({ "accounts": [{ "id": 1, "name": "A" }] })],
            ),
        );
        assert_eq!(state.status, Status::FetchDone);
        assert_eq!(state.items, vec![record(json!({ "id": 1, "name": "A" }))]);
        assert!(state.errors.is_empty());
    }

    #[test]
    fn collection_response_replaces_items_and_clears_errors() {
        let (reducer, actions) = accounts();
        let mut state = (*state_with(vec![json!({ "id": 9 })])).clone();
        state.errors.insert("x".into(), "y".into());
        let state = Arc::new(state);
        let next = reducer.reduce(
            Some(&state),
            &actions.create(
                Transition::GetCollectionResponse,
                [json!({ "accounts": [{ "id": 1 }, { "id": 2 }] })],
            ),
        );
        let ids: Vec<_> = next.items.iter().filter_map(Resource::id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert!(next.errors.is_empty());
    }

    #[test]
    fn fetched_collection_round_trips() {
        let (reducer, actions) = accounts();
        let records = vec![
            json!({ "id": 3, "name": "Cash" }),
            json!({ "id": 1, "name": "Bank" }),
        ];
        let next = reducer.reduce(
            None,
            &actions.create(
                Transition::GetCollectionResponse,
                [json!({ "accounts": records.clone() })],
            ),
        );
        let items: Vec<Value> = next.items.iter().map(Resource::to_value).collect();
        assert_eq!(items, records);
    }

    #[test]
    fn resource_response_inserts_missing_record() {
        let (reducer, actions) = accounts();
        let state = state_with(vec![json!({ "id": 1 })]);
        let next = reducer.reduce(
            Some(&state),
            &actions.create(
                Transition::GetResourceResponse,
                [json!({ "id": 2 }), json!({ "account": { "id": 2, "name": "B" } })],
            ),
        );
        assert_eq!(next.status, Status::FetchDone);
        assert_eq!(next.len(), 2);
        assert_eq!(next.find(2).unwrap().get("name"), Some(&json!("B")));
    }

    #[test]
    fn resource_response_replaces_stale_copy_in_place() {
        let (reducer, actions) = accounts();
        let state = state_with(vec![
            json!({ "id": 1, "name": "old", "note": "x" }),
            json!({ "id": 2 }),
        ]);
        let next = reducer.reduce(
            Some(&state),
            &actions.create(
                Transition::GetResourceResponse,
                [json!({ "id": 1 }), json!({ "account": { "id": 1, "name": "new" } })],
            ),
        );
        assert_eq!(next.len(), 2);
        assert_eq!(next.items[0], record(json!({ "id": 1, "name": "new" })));
    }

    #[test]
    fn create_response_appends() {
        let (reducer, actions) = accounts();
        let state = state_with(vec![json!({ "id": 1 })]);
        let next = reducer.reduce(
            Some(&state),
            &actions.create(
                Transition::CreateResourceResponse,
                [json!({ "account": { "id": 5, "name": "New" } })],
            ),
        );
        assert_eq!(next.status, Status::CreateDone);
        let ids: Vec<_> = next.items.iter().filter_map(Resource::id).collect();
        assert_eq!(ids, vec![1, 5]);
    }

    #[test]
    fn edit_response_merges_shallowly() {
        let (reducer, actions) = accounts();
        let state = state_with(vec![
            json!({ "id": 1, "name": "A", "original_amount": 100 }),
            json!({ "id": 2, "name": "Other" }),
        ]);
        let next = reducer.reduce(
            Some(&state),
            &actions.create(
                Transition::EditResourceResponse,
                [json!({ "id": 1 }), json!({ "account": { "id": 1, "name": "B" } })],
            ),
        );
        assert_eq!(next.status, Status::EditDone);
        assert_eq!(
            next.items[0],
            record(json!({ "id": 1, "name": "B", "original_amount": 100 }))
        );
        assert_eq!(next.items[1], state.items[1]);
    }

    #[test]
    fn edit_of_missing_id_changes_only_status() {
        let (reducer, actions) = accounts();
        let state = state_with(vec![json!({ "id": 1, "name": "A" })]);
        let next = reducer.reduce(
            Some(&state),
            &actions.create(
                Transition::EditResourceResponse,
                [json!({ "id": 9 }), json!({ "account": { "id": 9, "name": "Z" } })],
            ),
        );
        assert_eq!(next.status, Status::EditDone);
        assert_eq!(next.items, state.items);
    }

    #[test]
    fn remove_response_filters_by_id() {
        let (reducer, actions) = accounts();
        let state = state_with(vec![json!({ "id": 1 }), json!({ "id": 2 }), json!({ "id": 3 })]);
        let next = reducer.reduce(
            Some(&state),
            &actions.create(Transition::RemoveResourceResponse, [json!({ "id": 2 })]),
        );
        assert_eq!(next.status, Status::RemoveDone);
        let ids: Vec<_> = next.items.iter().filter_map(Resource::id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn remove_is_idempotent() {
        let (reducer, actions) = accounts();
        let state = state_with(vec![json!({ "id": 1 }), json!({ "id": 2 })]);
        let remove = actions.create(Transition::RemoveResourceResponse, [json!({ "id": 2 })]);
        let once = reducer.reduce(Some(&state), &remove);
        let twice = reducer.reduce(Some(&once), &remove);
        assert_eq!(once.items, twice.items);
        assert_eq!(twice.status, Status::RemoveDone);
    }

    #[test]
    fn remove_of_missing_id_changes_only_status() {
        let (reducer, actions) = accounts();
        let state = state_with(vec![json!({ "id": 1 })]);
        let next = reducer.reduce(
            Some(&state),
            &actions.create(Transition::RemoveResourceResponse, [json!({ "id": 42 })]),
        );
        assert_eq!(next.status, Status::RemoveDone);
        assert_eq!(next.items, state.items);
    }
}

// ── Failure transitions ─────────────────────────────────────────────

mod failures {
    use super::*;

    #[test]
    fn already_exist_scenario() {
        let (reducer, actions) = accounts();
        let state = state_with(vec![json!({ "id": 1, "name": "A" })]);
        let next = reducer.reduce(
            Some(&state),
            &actions.create(
                Transition::CreateResourceFailed,
                [json!({ "name": "A" }), json!({ "name": "Already exist" })],
            ),
        );
        assert_eq!(next.status, Status::Failed);
        assert_eq!(next.items, state.items);
        assert_eq!(
            next.errors.get("name").map(String::as_str),
            Some("Already exist")
        );
    }

    #[test]
    fn every_failed_transition_sets_failed() {
        let (reducer, actions) = accounts();
        let state = state_with(vec![json!({ "id": 1 })]);
        let failures = [
            actions.create(Transition::GetCollectionFailed, [json!({ "e": "1" })]),
            actions.create(Transition::GetResourceFailed, [json!({ "id": 1 }), json!({ "e": "2" })]),
            actions.create(Transition::CreateResourceFailed, [json!({}), json!({ "e": "3" })]),
            actions.create(
                Transition::EditResourceFailed,
                [json!({ "id": 1 }), json!({}), json!({ "e": "4" })],
            ),
            actions.create(Transition::RemoveResourceFailed, [json!({ "id": 1 }), json!({ "e": "5" })]),
        ];
        for (n, action) in failures.iter().enumerate() {
            let next = reducer.reduce(Some(&state), action);
            assert_eq!(next.status, Status::Failed, "{}", action.action_type());
            assert_eq!(next.items, state.items);
            assert_eq!(next.errors.get("e"), Some(&(n + 1).to_string()));
        }
    }

    #[test]
    fn failure_without_errors_yields_empty_map() {
        let (reducer, actions) = accounts();
        let next = reducer.reduce(None, &actions.create(Transition::GetCollectionFailed, []));
        assert_eq!(next.status, Status::Failed);
        assert!(next.errors.is_empty());
    }

    #[test]
    fn failure_then_success_clears_errors() {
        let (reducer, actions) = accounts();
        let failed = reducer.reduce(
            None,
            &actions.create(Transition::GetCollectionFailed, [json!({ "x": "y" })]),
        );
        let next = reducer.reduce(
            Some(&failed),
            &actions.create(Transition::GetCollectionResponse, [json!({ "accounts": [] })]),
        );
        assert_eq!(next.status, Status::FetchDone);
        assert!(next.errors.is_empty());
    }
}

// ── Malformed payloads ──────────────────────────────────────────────

mod malformed {
    use super::*;

    #[test]
    fn collection_response_without_array_leaves_state() {
        let (reducer, actions) = accounts();
        let state = state_with(vec![json!({ "id": 1 })]);
        for json in [json!({}), json!({ "accounts": "nope" }), json!({ "accounts": [1, 2] })] {
            let next = reducer.reduce(
                Some(&state),
                &actions.create(Transition::GetCollectionResponse, [json]),
            );
            assert!(Arc::ptr_eq(&state, &next));
        }
    }

    #[test]
    fn resource_response_without_record_leaves_state() {
        let (reducer, actions) = accounts();
        let state = state_with(vec![json!({ "id": 1 })]);
        let next = reducer.reduce(
            Some(&state),
            &actions.create(Transition::CreateResourceResponse, [json!({ "category": {} })]),
        );
        assert!(Arc::ptr_eq(&state, &next));
    }

    #[test]
    fn remove_without_id_leaves_state() {
        let (reducer, actions) = accounts();
        let state = state_with(vec![json!({ "id": 1 })]);
        let next = reducer.reduce(
            Some(&state),
            &actions.create(Transition::RemoveResourceResponse, [json!({ "name": "x" })]),
        );
        assert!(Arc::ptr_eq(&state, &next));
    }
}

// ── Overrides and payload keys ──────────────────────────────────────

mod customization {
    use super::*;

    #[test]
    fn override_replaces_built_in_transition() {
        let actions = ResourceActions::for_kind(ResourceKind::Categories);
        let reducer = CrudReducer::for_kind(ResourceKind::Categories).with_override(
            Transition::CreateResourceResponse,
            |state, _action| {
                Some(CollectionState {
                    status: Status::CreateDone,
                    items: Vec::new(),
                    errors: state.errors.clone(),
                })
            },
        );
        let state = state_with(vec![json!({ "id": 1 })]);
        let next = reducer.reduce(
            Some(&state),
            &actions.create(
                Transition::CreateResourceResponse,
                [json!({ "category": { "id": 2 } })],
            ),
        );
        assert_eq!(next.status, Status::CreateDone);
        assert!(next.items.is_empty());
    }

    #[test]
    fn override_returning_none_keeps_state() {
        let actions = ResourceActions::for_kind(ResourceKind::Accounts);
        let reducer = CrudReducer::for_kind(ResourceKind::Accounts)
            .with_override(Transition::GetCollectionRequest, |_, _| None);
        let state = state_with(vec![]);
        let next = reducer.reduce(
            Some(&state),
            &actions.create(Transition::GetCollectionRequest, []),
        );
        assert!(Arc::ptr_eq(&state, &next));
    }

    #[test]
    fn other_transitions_keep_default_behavior() {
        let actions = ResourceActions::for_kind(ResourceKind::Accounts);
        let reducer = CrudReducer::for_kind(ResourceKind::Accounts)
            .with_override(Transition::GetCollectionRequest, |_, _| None);
        let next = reducer.reduce(
            None,
            &actions.create(Transition::CreateResourceRequest, [json!({})]),
        );
        assert_eq!(next.status, Status::Creating);
    }

    #[test]
    fn generic_payload_keys_by_default() {
        let actions = ResourceActions::for_kind(ResourceKind::Accounts);
        let reducer = CrudReducer::new(CollectionState::initial(), actions.transition_map());
        let next = reducer.reduce(
            None,
            &actions.create(
                Transition::GetCollectionResponse,
                [json!({ "collection": [{ "id": 4 }] })],
            ),
        );
        assert_eq!(next.len(), 1);

        let next = reducer.reduce(
            Some(&next),
            &Action::new("REMOVE_ACCOUNT_RESPONSE").with("resource", json!({ "id": 4 })),
        );
        assert!(next.is_empty());
    }

    #[test]
    fn custom_initial_state_and_keys() {
        let actions = ResourceActions::for_kind(ResourceKind::Accounts);
        let initial = CollectionState {
            status: Status::FetchDone,
            items: vec![record(json!({ "id": 1 }))],
            errors: Default::default(),
        };
        let reducer = CrudReducer::new(initial.clone(), actions.transition_map())
            .with_payload_keys(PayloadKeys {
                collection: "rows".into(),
                resource: "row".into(),
            });
        assert_eq!(*reducer.reduce(None, &Action::empty()), initial);

        let next = reducer.reduce(
            None,
            &actions.create(
                Transition::CreateResourceResponse,
                [json!({ "row": { "id": 2 } })],
            ),
        );
        assert_eq!(next.len(), 2);
    }

    #[test]
    fn transition_for_uses_action_table() {
        let reducer = CrudReducer::for_kind(ResourceKind::Details);
        assert_eq!(
            reducer.transition_for(&Action::new("EDIT_DETAIL_FAILED")),
            Some(Transition::EditResourceFailed)
        );
        assert_eq!(reducer.transition_for(&Action::new("EDIT_ACCOUNT_FAILED")), None);
    }
}

// ── Root reducer ────────────────────────────────────────────────────

mod root {
    use super::*;

    #[test]
    fn only_targeted_slice_changes() {
        let reducer = RootReducer::new();
        let state = AppState::default();
        let actions = ResourceActions::for_kind(ResourceKind::Transactions);
        let next = reducer.reduce(&state, &actions.create(Transition::GetCollectionRequest, []));

        assert_eq!(next.transactions.status, Status::Fetching);
        assert!(Arc::ptr_eq(&state.accounts, &next.accounts));
        assert!(Arc::ptr_eq(&state.categories, &next.categories));
        assert!(Arc::ptr_eq(&state.details, &next.details));
        assert!(Arc::ptr_eq(&state.session, &next.session));
        assert!(Arc::ptr_eq(&state.router, &next.router));
    }

    #[test]
    fn route_push_updates_location() {
        let reducer = RootReducer::new();
        let next = reducer.reduce(&AppState::default(), &router::to_login("/accounts"));
        assert_eq!(next.router.location.pathname, "/login");
        assert_eq!(next.router.location.next.as_deref(), Some("/accounts"));

        let next = reducer.reduce(&next, &router::push("/", None));
        assert_eq!(next.router.location.pathname, "/");
        assert!(next.router.location.next.is_none());
    }

    #[test]
    fn swapped_collection_reducer_is_used() {
        let custom = CrudReducer::for_kind(ResourceKind::Accounts)
            .with_override(Transition::GetCollectionRequest, |_, _| None);
        let reducer = RootReducer::new().with_collection_reducer(ResourceKind::Accounts, custom);
        let actions = ResourceActions::for_kind(ResourceKind::Accounts);
        let state = AppState::default();
        let next = reducer.reduce(&state, &actions.create(Transition::GetCollectionRequest, []));
        assert_eq!(next.accounts.status, Status::Initial);
        assert!(reducer
            .collection_reducer(ResourceKind::Accounts)
            .transition_for(&Action::new("GET_ACCOUNTS_REQUEST"))
            .is_some());
    }

    #[test]
    fn collection_accessor_matches_fields() {
        let state = AppState::default();
        for kind in ResourceKind::ALL {
            assert_eq!(state.collection(kind).status, Status::Initial);
        }
    }
}
