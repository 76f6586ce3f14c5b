mod common;

use common::{as_user, credentials, sign_up};
use tasklist_core::db::open_db_in_memory;
use tasklist_core::{
    AccessPolicy, AuthorizationGuard, Collection, ServiceError, SqliteStore, TaskListFilter,
    TaskListRepository, TaskListService, ToDoFilter, ToDoPatch, ToDoRepository, ToDoService,
};

fn member_scoped() -> (TaskListService, ToDoService) {
    let guard = AuthorizationGuard::new(AccessPolicy::MemberScoped);
    (TaskListService::new(guard), ToDoService::new(guard))
}

#[test]
fn outsiders_are_forbidden_on_list_operations() {
    let store = SqliteStore::try_new(open_db_in_memory().unwrap()).unwrap();
    let credentials = credentials();
    let alice = sign_up(&store, &credentials, "alice");
    let mallory = sign_up(&store, &credentials, "mallory");
    let (lists, todos) = member_scoped();

    let list = lists
        .create_task_list(&as_user(&store, &alice.user), "Private")
        .unwrap();
    let outsider = as_user(&store, &mallory.user);
    let forbidden = ServiceError::Forbidden {
        collection: Collection::TaskLists,
        id: list.id,
    };

    assert_eq!(lists.get_task_list(&outsider, list.id).unwrap_err(), forbidden);
    assert_eq!(
        lists
            .update_task_list(&outsider, list.id, "Mine now")
            .unwrap_err(),
        forbidden
    );
    assert_eq!(
        lists.delete_task_list(&outsider, list.id).unwrap_err(),
        forbidden
    );
    assert_eq!(
        lists
            .add_user_to_task_list(&outsider, list.id, mallory.user.id)
            .unwrap_err(),
        forbidden
    );
    assert_eq!(
        todos
            .create_todo(&outsider, "sneaky", list.id)
            .unwrap_err(),
        forbidden
    );

    let stored = store
        .find_one_task_list(&TaskListFilter::Id(list.id))
        .unwrap()
        .unwrap();
    assert_eq!(stored.title, "Private");
    assert_eq!(stored.user_ids, vec![alice.user.id]);
    assert!(store
        .find_todos(&ToDoFilter::TaskList(list.id))
        .unwrap()
        .is_empty());
}

#[test]
fn outsiders_are_forbidden_on_todos_of_foreign_lists() {
    let store = SqliteStore::try_new(open_db_in_memory().unwrap()).unwrap();
    let credentials = credentials();
    let alice = sign_up(&store, &credentials, "alice");
    let mallory = sign_up(&store, &credentials, "mallory");
    let (lists, todos) = member_scoped();

    let owner = as_user(&store, &alice.user);
    let list = lists.create_task_list(&owner, "Private").unwrap();
    let item = todos.create_todo(&owner, "secret", list.id).unwrap();

    let outsider = as_user(&store, &mallory.user);
    let forbidden = ServiceError::Forbidden {
        collection: Collection::TaskLists,
        id: list.id,
    };
    assert_eq!(
        todos
            .update_todo(
                &outsider,
                item.id,
                ToDoPatch {
                    content: Some("leaked".to_string()),
                    is_completed: None,
                },
            )
            .unwrap_err(),
        forbidden
    );
    assert_eq!(todos.delete_todo(&outsider, item.id).unwrap_err(), forbidden);

    let stored = store.find_one_todo(&ToDoFilter::Id(item.id)).unwrap().unwrap();
    assert_eq!(stored.content, "secret");
}

#[test]
fn added_members_gain_access() {
    let store = SqliteStore::try_new(open_db_in_memory().unwrap()).unwrap();
    let credentials = credentials();
    let alice = sign_up(&store, &credentials, "alice");
    let bob = sign_up(&store, &credentials, "bob");
    let (lists, todos) = member_scoped();

    let owner = as_user(&store, &alice.user);
    let list = lists.create_task_list(&owner, "Shared").unwrap();
    lists
        .add_user_to_task_list(&owner, list.id, bob.user.id)
        .unwrap();

    let member = as_user(&store, &bob.user);
    assert!(lists.get_task_list(&member, list.id).unwrap().is_some());
    let item = todos.create_todo(&member, "bread", list.id).unwrap();
    assert!(todos.delete_todo(&member, item.id).unwrap());
}

#[test]
fn missing_targets_keep_their_not_found_semantics() {
    let store = SqliteStore::try_new(open_db_in_memory().unwrap()).unwrap();
    let credentials = credentials();
    let alice = sign_up(&store, &credentials, "alice");
    let (lists, todos) = member_scoped();
    let ctx = as_user(&store, &alice.user);

    let missing = uuid::Uuid::new_v4();
    assert_eq!(lists.get_task_list(&ctx, missing).unwrap(), None);
    assert!(!lists.delete_task_list(&ctx, missing).unwrap());
    assert!(todos.delete_todo(&ctx, missing).unwrap());
}

#[test]
fn orphaned_todos_are_forbidden_for_everyone() {
    let store = SqliteStore::try_new(open_db_in_memory().unwrap()).unwrap();
    let credentials = credentials();
    let alice = sign_up(&store, &credentials, "alice");
    let (lists, todos) = member_scoped();
    let ctx = as_user(&store, &alice.user);

    let list = lists.create_task_list(&ctx, "Temp").unwrap();
    let item = todos.create_todo(&ctx, "leftover", list.id).unwrap();
    assert!(lists.delete_task_list(&ctx, list.id).unwrap());

    assert_eq!(
        todos.delete_todo(&ctx, item.id).unwrap_err(),
        ServiceError::Forbidden {
            collection: Collection::ToDos,
            id: item.id,
        }
    );
}
