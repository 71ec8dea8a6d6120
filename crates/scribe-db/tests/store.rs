use scribe_db::queries::{self, delete_article, insert_article, insert_comment, insert_user};
use scribe_db::{Database, IdentityField, StoreError};
use scribe_types::{ArticleId, UserId};

fn db() -> Database {
    Database::open_in_memory().unwrap()
}

#[test]
fn duplicate_email_is_rejected_without_partial_write() {
    let db = db();
    db.with_tx(|tx| insert_user(tx, "a@x.com", "h", "alice")).unwrap();

    let err = db
        .with_tx(|tx| insert_user(tx, "a@x.com", "h", "someone-else"))
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateIdentity(IdentityField::Email)));

    let count: i64 = db
        .with_conn(|conn| {
            conn.query_row("SELECT COUNT(*) FROM users", [], |r| r.get(0))
                .map_err(StoreError::from)
        })
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn duplicate_username_is_rejected() {
    let db = db();
    db.with_tx(|tx| insert_user(tx, "a@x.com", "h", "alice")).unwrap();

    let err = db
        .with_tx(|tx| insert_user(tx, "b@x.com", "h", "alice"))
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateIdentity(IdentityField::Username)));
}

#[test]
fn article_requires_existing_owner() {
    let db = db();
    let err = db
        .with_tx(|tx| insert_article(tx, UserId::new_v4(), "t", "c"))
        .unwrap_err();
    assert!(matches!(err, StoreError::OwnerNotFound));
}

#[test]
fn comment_requires_existing_article_and_author() {
    let db = db();
    let user = db.with_tx(|tx| insert_user(tx, "a@x.com", "h", "alice")).unwrap();
    let article = db.with_tx(|tx| insert_article(tx, user, "t", "c")).unwrap();

    let err = db
        .with_tx(|tx| insert_comment(tx, ArticleId::new_v4(), user, "hi"))
        .unwrap_err();
    assert!(matches!(err, StoreError::ArticleNotFound));

    let err = db
        .with_tx(|tx| insert_comment(tx, article, UserId::new_v4(), "hi"))
        .unwrap_err();
    assert!(matches!(err, StoreError::AuthorNotFound));
}

#[test]
fn update_stamps_updated_at_and_keeps_created_at() {
    let db = db();
    let user = db.with_tx(|tx| insert_user(tx, "a@x.com", "h", "alice")).unwrap();
    let id = db.with_tx(|tx| insert_article(tx, user, "t", "c")).unwrap();

    let before = db.get_article(id).unwrap().unwrap();
    assert!(before.updated_at.is_none());

    db.with_tx(|tx| queries::update_article(tx, id, "t2", "c2")).unwrap();

    let after = db.get_article(id).unwrap().unwrap();
    assert_eq!(after.title, "t2");
    assert_eq!(after.content, "c2");
    assert_eq!(after.created_at, before.created_at);
    assert!(after.updated_at.unwrap() >= after.created_at);
}

#[test]
fn update_missing_article_is_not_found() {
    let db = db();
    let err = db
        .with_tx(|tx| queries::update_article(tx, ArticleId::new_v4(), "t", "c"))
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound));
}

#[test]
fn delete_article_removes_all_attached_comments() {
    let db = db();
    let a = db.with_tx(|tx| insert_user(tx, "a@x.com", "h", "alice")).unwrap();
    let b = db.with_tx(|tx| insert_user(tx, "b@x.com", "h", "bob")).unwrap();
    let article = db.with_tx(|tx| insert_article(tx, a, "t", "c")).unwrap();

    let c1 = db.with_tx(|tx| insert_comment(tx, article, a, "one")).unwrap();
    let c2 = db.with_tx(|tx| insert_comment(tx, article, b, "two")).unwrap();

    let removed = db.with_tx(|tx| delete_article(tx, article)).unwrap();
    assert_eq!(removed, 2);
    assert!(db.get_comment(c1).unwrap().is_none());
    assert!(db.get_comment(c2).unwrap().is_none());
    assert!(db.get_article(article).unwrap().is_none());

    let err = db.with_tx(|tx| delete_article(tx, article)).unwrap_err();
    assert!(matches!(err, StoreError::NotFound));
}

#[test]
fn failed_transaction_rolls_back_every_statement() {
    let db = db();
    let a = db.with_tx(|tx| insert_user(tx, "a@x.com", "h", "alice")).unwrap();
    let article = db.with_tx(|tx| insert_article(tx, a, "t", "c")).unwrap();
    let comment = db.with_tx(|tx| insert_comment(tx, article, a, "hi")).unwrap();

    let result: Result<(), StoreError> = db.with_tx(|tx| {
        queries::delete_comments_by_author(tx, a)?;
        Err(StoreError::NotFound)
    });
    assert!(result.is_err());

    assert!(db.get_comment(comment).unwrap().is_some());
}

#[test]
fn comments_list_in_creation_order() {
    let db = db();
    let a = db.with_tx(|tx| insert_user(tx, "a@x.com", "h", "alice")).unwrap();
    let article = db.with_tx(|tx| insert_article(tx, a, "t", "c")).unwrap();

    let ids: Vec<_> = (0..5)
        .map(|i| {
            db.with_tx(|tx| insert_comment(tx, article, a, &format!("c{i}")))
                .unwrap()
        })
        .collect();

    let listed: Vec<_> = db
        .get_comments_by_article(article)
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(listed, ids);
}

#[test]
fn file_database_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scribe.db");

    let user = {
        let db = Database::open(&path).unwrap();
        db.with_tx(|tx| insert_user(tx, "a@x.com", "h", "alice")).unwrap()
    };

    let db = Database::open(&path).unwrap();
    let loaded = db.get_user_by_email("a@x.com").unwrap().unwrap();
    assert_eq!(loaded.id, user);
    assert_eq!(loaded.username, "alice");
}
