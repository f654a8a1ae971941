use std::time::Duration;
use tablecast::{StoreError, TablecastError, service, sync::ObserverReceiver};
use tablecast_schema::{ColumnInfo, TableSnapshot, TypeTag, Value};
use tokio::time::timeout;

async fn next_cause(rx: &mut ObserverReceiver) -> String {
    let update = timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("no update within 2s")
        .expect("observer channel closed");
    update.cause.clone()
}

#[tokio::test]
async fn every_observer_sees_a_new_table() {
    let store = service::spawn(8).await;
    let (_a, mut rx_a) = store.register().await.expect("register a");
    let (_b, mut rx_b) = store.register().await.expect("register b");

    assert_eq!(next_cause(&mut rx_a).await, "Register");
    assert_eq!(next_cause(&mut rx_b).await, "Register");

    store
        .add_table("T".to_string(), Vec::new())
        .await
        .expect("add table");

    for rx in [&mut rx_a, &mut rx_b] {
        let update = rx.recv().await.expect("update");
        assert_eq!(update.cause, "AddTable");
        assert_eq!(update.database.table_names().collect::<Vec<_>>(), ["T"]);
    }
    store.stop();
}

#[tokio::test]
async fn replace_table_skips_the_originator() {
    let store = service::spawn(8).await;
    store
        .add_table("T".to_string(), vec![ColumnInfo::new("n", TypeTag::Integer)])
        .await
        .expect("add table");

    let (origin, mut rx_origin) = store.register().await.expect("register origin");
    let (_other, mut rx_other) = store.register().await.expect("register other");
    assert_eq!(next_cause(&mut rx_origin).await, "Register");
    assert_eq!(next_cause(&mut rx_other).await, "Register");

    let content = TableSnapshot {
        name: "T".to_string(),
        columns: vec![ColumnInfo::new("n", TypeTag::Integer)],
        rows: vec![vec![Value::Integer(7)]],
    };
    store
        .replace_table("T", content, Some(origin))
        .await
        .expect("replace table");

    assert_eq!(next_cause(&mut rx_other).await, "ReplaceTable");
    assert!(rx_origin.try_recv().is_err());

    // Later mutations reach the originator again.
    store.add_new_row("T").await.expect("add row");
    assert_eq!(next_cause(&mut rx_origin).await, "AddNewRow");
    store.stop();
}

#[tokio::test]
async fn failed_mutation_sends_nothing() {
    let store = service::spawn(8).await;
    let (_id, mut rx) = store.register().await.expect("register");
    assert_eq!(next_cause(&mut rx).await, "Register");

    let err = store.remove_table("ghost").await.unwrap_err();
    assert!(matches!(err, TablecastError::Store(_)));
    assert!(store.get_tables().await.expect("tables").is_empty());

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(rx.try_recv().is_err());
    store.stop();
}

#[tokio::test]
async fn unregister_closes_the_channel() {
    let store = service::spawn(8).await;
    let (id, mut rx) = store.register().await.expect("register");
    assert_eq!(next_cause(&mut rx).await, "Register");

    store.unregister(id).await.expect("unregister");
    assert!(rx.recv().await.is_none());

    let err = store.unregister(id).await.unwrap_err();
    assert!(matches!(err, TablecastError::UnknownObserver(gone) if gone == id));
    store.stop();
}

#[tokio::test]
async fn delete_row_takes_row_numbers() {
    let store = service::spawn(8).await;
    store
        .add_table("T".to_string(), vec![ColumnInfo::new("n", TypeTag::Integer)])
        .await
        .expect("add table");
    store
        .add_row("T", vec![Value::Integer(1)])
        .await
        .expect("add row");
    store
        .add_row("T", vec![Value::Integer(2)])
        .await
        .expect("add row");

    let err = store.delete_row("T", 0).await.unwrap_err();
    assert!(matches!(
        err,
        TablecastError::Store(StoreError::IndexOutOfRange { index: 0, len: 2 })
    ));

    store.delete_row("T", 1).await.expect("delete first row");
    let rows = store.display_table("T").await.expect("rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("n"), Some(&Value::Integer(2)));
    store.stop();
}
