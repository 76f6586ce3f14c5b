mod common;

use common::{as_user, credentials, sign_up};
use tasklist_core::db::open_db_in_memory;
use tasklist_core::{
    AuthFailure, Collection, RequestContext, Resolver, ServiceError, SqliteStore, TaskListService,
    ToDoPatch, ToDoService,
};
use uuid::Uuid;

#[test]
fn shared_grocery_list_scenario() {
    let store = SqliteStore::try_new(open_db_in_memory().unwrap()).unwrap();
    let credentials = credentials();
    let alice = sign_up(&store, &credentials, "alice");
    let bob = sign_up(&store, &credentials, "bob");
    let lists = TaskListService::default();
    let todos = ToDoService::default();

    let as_alice = as_user(&store, &alice.user);
    let groceries = lists.create_task_list(&as_alice, "Groceries").unwrap();
    assert_eq!(groceries.title, "Groceries");
    assert_eq!(groceries.user_ids, vec![alice.user.id]);

    let milk = todos
        .create_todo(&as_alice, "milk", groceries.id)
        .unwrap();
    todos.create_todo(&as_alice, "eggs", groceries.id).unwrap();
    assert!(!milk.is_completed);

    let completed = todos
        .update_todo(
            &as_alice,
            milk.id,
            ToDoPatch {
                content: None,
                is_completed: Some(true),
            },
        )
        .unwrap();
    assert!(completed.is_completed);
    assert_eq!(completed.content, "milk");

    let shared = lists
        .add_user_to_task_list(&as_alice, groceries.id, bob.user.id)
        .unwrap()
        .unwrap();
    assert_eq!(shared.user_ids, vec![alice.user.id, bob.user.id]);

    let resolver = Resolver::new(&as_alice);
    assert_eq!(resolver.progress(&shared).unwrap(), 50.0);
    let members: Vec<_> = resolver
        .users(&shared)
        .unwrap()
        .into_iter()
        .map(|user| user.map(|user| user.name))
        .collect();
    assert_eq!(
        members,
        vec![Some("alice".to_string()), Some("bob".to_string())]
    );

    let as_bob = as_user(&store, &bob.user);
    let bobs_lists = lists.my_task_lists(&as_bob).unwrap();
    assert_eq!(bobs_lists.len(), 1);
    assert_eq!(bobs_lists[0].id, groceries.id);
}

#[test]
fn my_task_lists_only_returns_memberships() {
    let store = SqliteStore::try_new(open_db_in_memory().unwrap()).unwrap();
    let credentials = credentials();
    let alice = sign_up(&store, &credentials, "alice");
    let bob = sign_up(&store, &credentials, "bob");
    let lists = TaskListService::default();

    let as_alice = as_user(&store, &alice.user);
    let as_bob = as_user(&store, &bob.user);
    let first = lists.create_task_list(&as_alice, "Chores").unwrap();
    let second = lists.create_task_list(&as_alice, "Trip").unwrap();
    lists.create_task_list(&as_bob, "Bob only").unwrap();

    let ids: Vec<_> = lists
        .my_task_lists(&as_alice)
        .unwrap()
        .into_iter()
        .map(|list| list.id)
        .collect();
    assert_eq!(ids, vec![first.id, second.id]);
}

#[test]
fn add_user_is_idempotent_and_none_for_missing_list() {
    let store = SqliteStore::try_new(open_db_in_memory().unwrap()).unwrap();
    let credentials = credentials();
    let alice = sign_up(&store, &credentials, "alice");
    let bob = sign_up(&store, &credentials, "bob");
    let lists = TaskListService::default();
    let ctx = as_user(&store, &alice.user);

    let list = lists.create_task_list(&ctx, "Chores").unwrap();
    lists
        .add_user_to_task_list(&ctx, list.id, bob.user.id)
        .unwrap();
    let again = lists
        .add_user_to_task_list(&ctx, list.id, bob.user.id)
        .unwrap()
        .unwrap();
    assert_eq!(again.user_ids, vec![alice.user.id, bob.user.id]);

    let creator_again = lists
        .add_user_to_task_list(&ctx, list.id, alice.user.id)
        .unwrap()
        .unwrap();
    assert_eq!(creator_again.user_ids, vec![alice.user.id, bob.user.id]);

    assert_eq!(
        lists
            .add_user_to_task_list(&ctx, Uuid::new_v4(), bob.user.id)
            .unwrap(),
        None
    );
}

#[test]
fn unknown_member_resolves_to_none() {
    let store = SqliteStore::try_new(open_db_in_memory().unwrap()).unwrap();
    let credentials = credentials();
    let alice = sign_up(&store, &credentials, "alice");
    let lists = TaskListService::default();
    let ctx = as_user(&store, &alice.user);

    let ghost = Uuid::new_v4();
    let list = lists.create_task_list(&ctx, "Chores").unwrap();
    let list = lists
        .add_user_to_task_list(&ctx, list.id, ghost)
        .unwrap()
        .unwrap();
    assert_eq!(list.user_ids, vec![alice.user.id, ghost]);

    let users = Resolver::new(&ctx).users(&list).unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].as_ref().map(|user| user.id), Some(alice.user.id));
    assert!(users[1].is_none());
}

#[test]
fn update_returns_post_state_and_not_found_when_missing() {
    let store = SqliteStore::try_new(open_db_in_memory().unwrap()).unwrap();
    let credentials = credentials();
    let alice = sign_up(&store, &credentials, "alice");
    let lists = TaskListService::default();
    let ctx = as_user(&store, &alice.user);

    let list = lists.create_task_list(&ctx, "Chores").unwrap();
    let renamed = lists.update_task_list(&ctx, list.id, "House chores").unwrap();
    assert_eq!(renamed.title, "House chores");
    assert_eq!(renamed.id, list.id);
    assert_eq!(renamed.created_at, list.created_at);
    assert_eq!(renamed.user_ids, list.user_ids);

    let unchanged = lists.update_task_list(&ctx, list.id, "House chores").unwrap();
    assert_eq!(unchanged, renamed);

    let missing = Uuid::new_v4();
    assert_eq!(
        lists.update_task_list(&ctx, missing, "Nope").unwrap_err(),
        ServiceError::NotFound {
            collection: Collection::TaskLists,
            id: missing,
        }
    );
}

#[test]
fn delete_reports_whether_a_list_was_removed() {
    let store = SqliteStore::try_new(open_db_in_memory().unwrap()).unwrap();
    let credentials = credentials();
    let alice = sign_up(&store, &credentials, "alice");
    let lists = TaskListService::default();
    let ctx = as_user(&store, &alice.user);

    assert!(!lists.delete_task_list(&ctx, Uuid::new_v4()).unwrap());

    let list = lists.create_task_list(&ctx, "Chores").unwrap();
    assert!(lists.delete_task_list(&ctx, list.id).unwrap());
    assert_eq!(lists.get_task_list(&ctx, list.id).unwrap(), None);
    assert!(lists.my_task_lists(&ctx).unwrap().is_empty());
    assert!(!lists.delete_task_list(&ctx, list.id).unwrap());
}

#[test]
fn non_member_can_read_list_under_default_policy() {
    let store = SqliteStore::try_new(open_db_in_memory().unwrap()).unwrap();
    let credentials = credentials();
    let alice = sign_up(&store, &credentials, "alice");
    let mallory = sign_up(&store, &credentials, "mallory");
    let lists = TaskListService::default();

    let list = lists
        .create_task_list(&as_user(&store, &alice.user), "Private")
        .unwrap();
    let seen = lists
        .get_task_list(&as_user(&store, &mallory.user), list.id)
        .unwrap();
    assert_eq!(seen.map(|list| list.id), Some(list.id));
}

#[test]
fn anonymous_caller_is_rejected_everywhere() {
    let store = SqliteStore::try_new(open_db_in_memory().unwrap()).unwrap();
    let credentials = credentials();
    let alice = sign_up(&store, &credentials, "alice");
    let lists = TaskListService::default();
    let todos = ToDoService::default();
    let list = lists
        .create_task_list(&as_user(&store, &alice.user), "Chores")
        .unwrap();
    let item = todos
        .create_todo(&as_user(&store, &alice.user), "sweep", list.id)
        .unwrap();

    let anonymous = RequestContext::anonymous(&store);
    let expected = ServiceError::Authentication(AuthFailure::MissingIdentity);

    assert_eq!(lists.my_task_lists(&anonymous).unwrap_err(), expected);
    assert_eq!(
        lists.get_task_list(&anonymous, list.id).unwrap_err(),
        expected
    );
    assert_eq!(
        lists.create_task_list(&anonymous, "Nope").unwrap_err(),
        expected
    );
    assert_eq!(
        lists
            .update_task_list(&anonymous, list.id, "Nope")
            .unwrap_err(),
        expected
    );
    assert_eq!(
        lists.delete_task_list(&anonymous, list.id).unwrap_err(),
        expected
    );
    assert_eq!(
        lists
            .add_user_to_task_list(&anonymous, list.id, alice.user.id)
            .unwrap_err(),
        expected
    );
    assert_eq!(
        todos
            .create_todo(&anonymous, "milk", list.id)
            .unwrap_err(),
        expected
    );
    assert_eq!(
        todos
            .update_todo(
                &anonymous,
                item.id,
                ToDoPatch {
                    content: Some("hijacked".to_string()),
                    is_completed: Some(true),
                },
            )
            .unwrap_err(),
        expected
    );
    assert_eq!(
        todos.delete_todo(&anonymous, item.id).unwrap_err(),
        expected
    );
    assert_eq!(
        expected.to_string(),
        "Authentication Error. Please sign in"
    );

    // Nothing was written by the rejected calls.
    let still_there = lists
        .get_task_list(&as_user(&store, &alice.user), list.id)
        .unwrap()
        .unwrap();
    assert_eq!(still_there.title, "Chores");
    assert_eq!(still_there.user_ids, vec![alice.user.id]);
    let untouched = Resolver::new(&as_user(&store, &alice.user))
        .todos(&still_there)
        .unwrap();
    assert_eq!(untouched, vec![item]);
}
