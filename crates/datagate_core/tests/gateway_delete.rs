mod common;

use common::{at, count_rows, open_with_schema, stored_millis, Post, UserAccount};
use datagate_core::{
    DeleteMode, FixedClock, Gateway, GatewayError, GatewayOptions, LifecycleState, Model,
    Predicate,
};

fn persisted_user(gateway: &Gateway<'_>, name: &str) -> UserAccount {
    let mut user = UserAccount::new(name, &format!("{name}@example.com"));
    user.id = gateway.persist(&mut user, &[]).unwrap();
    user
}

#[test]
fn soft_delete_stamps_deleted_and_keeps_the_row() {
    let conn = open_with_schema();
    let mut user = persisted_user(&Gateway::new(&conn).with_clock(FixedClock(at(0))), "alice");
    let id = user.id.unwrap();

    let result = Gateway::new(&conn)
        .with_clock(FixedClock(at(30)))
        .delete(&mut user, DeleteMode::Soft, &[Predicate::eq("id", id)])
        .unwrap();

    assert_eq!(result, None);
    assert_eq!(user.state(), LifecycleState::SoftDeleted);
    assert_eq!(user.lifecycle().deleted(), Some(at(30)));
    assert!(user.lifecycle().updated().is_none());
    assert_eq!(count_rows(&conn, "user_account"), 1);
    assert_eq!(
        stored_millis(&conn, "user_account", "deleted", id),
        Some(at(30).timestamp_millis())
    );
    assert_eq!(stored_millis(&conn, "user_account", "updated", id), None);
}

#[test]
fn soft_delete_is_the_default_mode() {
    assert_eq!(DeleteMode::default(), DeleteMode::Soft);
}

#[test]
fn persist_after_soft_delete_commits_deleted_not_updated() {
    let conn = open_with_schema();
    let mut user = persisted_user(&Gateway::new(&conn).with_clock(FixedClock(at(0))), "alice");
    let id = user.id.unwrap();
    let by_id = [Predicate::eq("id", id)];

    Gateway::new(&conn)
        .with_clock(FixedClock(at(10)))
        .soft_delete(&mut user, &by_id)
        .unwrap();

    user.name = "edited after delete".to_string();
    Gateway::new(&conn)
        .with_clock(FixedClock(at(20)))
        .persist(&mut user, &by_id)
        .unwrap();

    assert_eq!(user.lifecycle().deleted(), Some(at(10)));
    assert!(user.lifecycle().updated().is_none());
    assert_eq!(stored_millis(&conn, "user_account", "updated", id), None);
    assert_eq!(
        stored_millis(&conn, "user_account", "deleted", id),
        Some(at(10).timestamp_millis())
    );
    let name: String = conn
        .query_row("SELECT name FROM user_account WHERE id = ?1", [id], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(name, "edited after delete");
}

#[test]
fn soft_delete_keeps_an_earlier_updated_stamp() {
    let conn = open_with_schema();
    let mut user = persisted_user(&Gateway::new(&conn), "alice");
    let by_id = [Predicate::eq("id", user.id.unwrap())];

    Gateway::new(&conn)
        .with_clock(FixedClock(at(10)))
        .persist(&mut user, &by_id)
        .unwrap();
    Gateway::new(&conn)
        .with_clock(FixedClock(at(20)))
        .soft_delete(&mut user, &by_id)
        .unwrap();

    assert_eq!(user.lifecycle().updated(), Some(at(10)));
    assert_eq!(user.lifecycle().deleted(), Some(at(20)));
}

#[test]
fn soft_delete_of_unpersisted_model_is_rejected() {
    let conn = open_with_schema();
    let gateway = Gateway::new(&conn);

    let mut user = UserAccount::new("ghost", "ghost@example.com");
    let err = gateway
        .delete(&mut user, DeleteMode::Soft, &[Predicate::eq("id", 1_i64)])
        .unwrap_err();

    assert!(matches!(err, GatewayError::NotPersisted { ref table } if table == "user_account"));
    assert!(user.lifecycle().deleted().is_none());
    assert_eq!(count_rows(&conn, "user_account"), 0);
}

#[test]
fn failed_soft_delete_leaves_the_model_untouched() {
    let conn = open_with_schema();
    let mut user = persisted_user(&Gateway::new(&conn), "alice");
    conn.execute_batch("DROP TABLE post; DROP TABLE user_account;")
        .unwrap();

    let err = Gateway::new(&conn)
        .soft_delete(&mut user, &[Predicate::eq("id", 1_i64)])
        .unwrap_err();

    assert!(matches!(err, GatewayError::Sqlite(_)));
    assert!(user.lifecycle().deleted().is_none());
    assert_eq!(user.state(), LifecycleState::Persisted);
}

#[test]
fn hard_delete_removes_only_matching_rows() {
    let conn = open_with_schema();
    let gateway = Gateway::new(&conn);
    let author = persisted_user(&gateway, "alice");
    let author_id = author.id.unwrap();

    let mut keep = Post::new(author_id, "keep");
    let mut drop_me = Post::new(author_id, "drop");
    gateway.persist(&mut keep, &[]).unwrap();
    let drop_id = gateway.persist(&mut drop_me, &[]).unwrap().unwrap();
    drop_me.id = Some(drop_id);

    let result = gateway
        .delete(&mut drop_me, DeleteMode::Hard, &[Predicate::eq("id", drop_id)])
        .unwrap();

    assert_eq!(result, None);
    assert_eq!(count_rows(&conn, "post"), 1);
    // Hard deletes do not stamp the model.
    assert!(drop_me.lifecycle().deleted().is_none());
}

#[test]
fn hard_delete_on_a_misspelled_column_fails_and_keeps_every_row() {
    let conn = open_with_schema();
    let gateway = Gateway::new(&conn);
    for name in ["alice", "bob", "carol"] {
        persisted_user(&gateway, name);
    }
    let mut target = UserAccount::new("bob", "bob@example.com");

    let err = gateway
        .delete(&mut target, DeleteMode::Hard, &[Predicate::not_eq("nmae", "bob")])
        .unwrap_err();

    assert!(matches!(err, GatewayError::Sqlite(_)), "unexpected error: {err}");
    assert_eq!(count_rows(&conn, "user_account"), 3);
}

#[test]
fn hard_delete_without_predicates_is_rejected_by_default() {
    let conn = open_with_schema();
    let gateway = Gateway::new(&conn);
    let mut user = persisted_user(&gateway, "alice");
    persisted_user(&gateway, "bob");

    let err = gateway
        .delete(&mut user, DeleteMode::Hard, &[])
        .unwrap_err();

    assert!(matches!(
        err,
        GatewayError::UnfilteredWrite { operation: "delete", .. }
    ));
    assert_eq!(count_rows(&conn, "user_account"), 2);
}

#[test]
fn hard_delete_without_predicates_wipes_the_table_when_allowed() {
    let conn = open_with_schema();
    let gateway = Gateway::new(&conn).with_options(GatewayOptions {
        allow_unfiltered_writes: true,
    });
    let mut user = persisted_user(&gateway, "alice");
    persisted_user(&gateway, "bob");

    gateway.delete(&mut user, DeleteMode::Hard, &[]).unwrap();

    assert_eq!(count_rows(&conn, "user_account"), 0);
}

#[test]
fn hard_delete_surfaces_constraint_violations() {
    let conn = open_with_schema();
    let gateway = Gateway::new(&conn);
    let mut author = persisted_user(&gateway, "alice");
    let author_id = author.id.unwrap();
    let mut post = Post::new(author_id, "pinned");
    gateway.persist(&mut post, &[]).unwrap();

    let err = gateway
        .delete(&mut author, DeleteMode::Hard, &[Predicate::eq("id", author_id)])
        .unwrap_err();

    match err {
        GatewayError::Sqlite(rusqlite::Error::SqliteFailure(code, _)) => {
            assert_eq!(code.code, rusqlite::ErrorCode::ConstraintViolation);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(count_rows(&conn, "user_account"), 1);
}
