mod common;

use common::{as_user, credentials, sign_up};
use tasklist_core::db::open_db_in_memory;
use tasklist_core::{RequestContext, Resolver, SqliteStore, TaskListService};
use uuid::Uuid;

#[test]
fn cached_and_uncached_lookups_agree() {
    let store = SqliteStore::try_new(open_db_in_memory().unwrap()).unwrap();
    let credentials = credentials();
    let alice = sign_up(&store, &credentials, "alice");
    let bob = sign_up(&store, &credentials, "bob");
    let lists = TaskListService::default();

    let ctx = as_user(&store, &alice.user);
    let ghost = Uuid::new_v4();
    let first = lists.create_task_list(&ctx, "One").unwrap();
    lists.add_user_to_task_list(&ctx, first.id, bob.user.id).unwrap();
    let first = lists
        .add_user_to_task_list(&ctx, first.id, ghost)
        .unwrap()
        .unwrap();
    let second = lists.create_task_list(&ctx, "Two").unwrap();
    let second = lists
        .add_user_to_task_list(&ctx, second.id, bob.user.id)
        .unwrap()
        .unwrap();

    let uncached = Resolver::new(&ctx);
    let expected_first = uncached.users(&first).unwrap();
    let expected_second = uncached.users(&second).unwrap();
    assert!(ctx.lookup_cache().is_none());

    let cached_ctx =
        RequestContext::with_identity(&store, Some(alice.user.clone())).with_lookup_cache();
    let cached = Resolver::new(&cached_ctx);
    assert_eq!(cached.users(&first).unwrap(), expected_first);
    assert_eq!(cached.users(&second).unwrap(), expected_second);

    // alice, bob and the dangling id, each looked up once.
    assert_eq!(cached_ctx.lookup_cache().unwrap().cached_users(), 3);
}
