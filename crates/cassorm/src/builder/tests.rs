use super::*;
use crate::mock::MockExecutor;
use crate::render::{AND, COMMA, is_uuid, render_conditions};
use crate::record;
use crate::statement::{Fields, Order};

const ID: &str = "test-string-id";
const TABLE_NAME: &str = "cass_test_table";

fn values() -> Record {
    record! {
        "name" => "test-name",
        "surname" => "test-surname",
    }
}

fn is_v4(id: &str) -> bool {
    uuid::Uuid::parse_str(id).is_ok_and(|u| u.get_version_num() == 4) && is_uuid(id)
}

// ==================== CRUD ====================

#[tokio::test]
async fn test_create_without_timestamps() {
    let mock = MockExecutor::new();
    let qb = QueryBuilder::new(&mock).table(TABLE_NAME);

    let id = qb.create(values(), false).await.unwrap();
    let cql = mock.last_statement().unwrap();

    for (key, value) in &values() {
        assert!(cql.contains(key.as_str()));
        assert!(cql.contains(&value.to_string()));
    }
    assert!(is_v4(&id));
    assert_eq!(mock.execution_count(), 1);
    assert!(cql.contains("INSERT INTO"));
    assert!(!cql.contains("created_at"));
    assert!(!cql.contains("updated_at"));
}

#[tokio::test]
async fn test_create_puts_generated_id_first() {
    let mock = MockExecutor::new();
    let qb = QueryBuilder::new(&mock).table(TABLE_NAME);

    let id = qb
        .create(record! { "name" => "n", "id" => "caller-id" }, false)
        .await
        .unwrap();

    assert_eq!(
        mock.last_statement().unwrap(),
        format!("INSERT INTO cass_test_table (id, name) VALUES ({id}, 'n')")
    );
}

#[tokio::test]
async fn test_create_with_timestamps() {
    let mock = MockExecutor::new();
    let qb = QueryBuilder::new(&mock).table(TABLE_NAME);

    qb.create(values(), true).await.unwrap();
    let cql = mock.last_statement().unwrap();

    assert_eq!(mock.execution_count(), 1);
    assert!(cql.contains("created_at"));
    assert!(cql.contains("updated_at"));
    assert!(cql.contains("INSERT INTO"));
    assert!(cql.contains("name, surname, updated_at, created_at)"));
}

#[tokio::test]
async fn test_create_requires_table() {
    let mock = MockExecutor::new();
    let err = QueryBuilder::new(&mock)
        .create(values(), false)
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(mock.execution_count(), 0);
}

#[tokio::test]
async fn test_insert_keeps_caller_keys() {
    let mock = MockExecutor::new();
    QueryBuilder::new(&mock)
        .table("media_tags")
        .insert(record! { "media_id" => 7, "tag" => "cat" }, false)
        .await
        .unwrap();
    assert_eq!(
        mock.last_statement().unwrap(),
        "INSERT INTO media_tags (media_id, tag) VALUES (7, 'cat')"
    );
}

#[tokio::test]
async fn test_find_one_by() {
    let mock = MockExecutor::new();
    let qb = QueryBuilder::new(&mock).table(TABLE_NAME);

    let row = qb.find_one_by(values(), "*").await.unwrap();
    let cql = mock.last_statement().unwrap();
    let criteria = render_conditions(&values(), AND);

    assert!(row.is_none());
    assert_eq!(mock.execution_count(), 1);
    assert!(cql.contains("SELECT * FROM"));
    assert!(cql.contains("WHERE"));
    assert!(cql.contains(&criteria));
    assert!(cql.contains("LIMIT 1"));
    // The builder itself keeps no limit.
    assert_eq!(qb.limit(), None);
}

#[tokio::test]
async fn test_find_one_by_returns_first_row() {
    let mock = MockExecutor::new();
    mock.push_rows(vec![record! { "id" => "a" }, record! { "id" => "b" }]);

    let row = QueryBuilder::new(&mock)
        .table(TABLE_NAME)
        .find_one_by(record! { "id" => "a" }, "*")
        .await
        .unwrap();
    assert_eq!(row, Some(record! { "id" => "a" }));
}

#[test]
fn test_take_sets_limit_only() {
    let mock = MockExecutor::new();
    let qb = QueryBuilder::new(&mock).table(TABLE_NAME).take(5);
    assert_eq!(qb.limit(), Some(5));
    assert_eq!(qb.table_name(), Some(TABLE_NAME));
    assert_eq!(qb.id(), None);
    assert_eq!(qb.ordering(), None);
    assert!(qb.pending().is_none());
}

#[tokio::test]
async fn test_find_by() {
    let mock = MockExecutor::new();
    let qb = QueryBuilder::new(&mock).table(TABLE_NAME);

    qb.find_by(values(), "*").await.unwrap();
    let cql = mock.last_statement().unwrap();
    let criteria = render_conditions(&values(), AND);

    assert_eq!(mock.execution_count(), 1);
    assert_eq!(qb.limit(), None);
    assert!(cql.contains("SELECT * FROM"));
    assert!(cql.contains("WHERE"));
    assert!(cql.contains(&criteria));
    assert!(cql.contains("ALLOW FILTERING"));
    assert!(!cql.contains("LIMIT"));
}

#[tokio::test]
async fn test_find_by_with_limit_and_order() {
    let mock = MockExecutor::new();
    QueryBuilder::new(&mock)
        .table(TABLE_NAME)
        .take(20)
        .order_by("created_at", Order::Desc)
        .find_by(record! { "owner" => "x" }, "*")
        .await
        .unwrap();
    assert_eq!(
        mock.last_statement().unwrap(),
        "SELECT * FROM cass_test_table WHERE owner='x'  LIMIT 20 ORDER BY created_at DESC"
    );
}

#[tokio::test]
async fn test_find_all() {
    let mock = MockExecutor::new();
    let qb = QueryBuilder::new(&mock).table(TABLE_NAME);

    qb.find_all("*").await.unwrap();
    let cql = mock.last_statement().unwrap();

    assert_eq!(mock.execution_count(), 1);
    assert_eq!(qb.limit(), None);
    assert!(cql.contains("SELECT * FROM"));
    assert!(!cql.contains("WHERE"));
}

#[tokio::test]
async fn test_find_only_selected_fields() {
    let mock = MockExecutor::new();
    QueryBuilder::new(&mock)
        .table(TABLE_NAME)
        .find_all(["name", "surname"])
        .await
        .unwrap();
    assert!(
        mock.last_statement()
            .unwrap()
            .contains("SELECT name, surname FROM")
    );
}

#[test]
fn test_generates_uuid() {
    let id = crud::generate_primary_key().to_string();
    assert!(is_v4(&id));
}

#[test]
fn test_accepts_record_id() {
    let mock = MockExecutor::new();
    let qb = QueryBuilder::new(&mock).with_id("new-string-id");
    assert_eq!(qb.id(), Some("new-string-id"));
}

#[tokio::test]
async fn test_update_row() {
    let mock = MockExecutor::new();
    QueryBuilder::new(&mock)
        .table(TABLE_NAME)
        .with_id(ID)
        .update(values(), false)
        .await
        .unwrap();
    let cql = mock.last_statement().unwrap();
    let assignments = render_conditions(&values(), COMMA);

    assert_eq!(
        cql,
        format!("UPDATE cass_test_table SET {assignments} WHERE id='{ID}'")
    );
    assert_eq!(
        cql,
        "UPDATE cass_test_table SET name='test-name' , surname='test-surname'  WHERE id='test-string-id'"
    );
}

#[tokio::test]
async fn test_update_stamps_updated_at() {
    let mock = MockExecutor::new();
    QueryBuilder::new(&mock)
        .table(TABLE_NAME)
        .with_id(ID)
        .update(values(), true)
        .await
        .unwrap();
    let cql = mock.last_statement().unwrap();
    assert!(cql.contains("updated_at='"));
    assert!(!cql.contains("created_at"));
}

#[tokio::test]
async fn test_update_without_id_is_rejected() {
    let mock = MockExecutor::new();
    let err = QueryBuilder::new(&mock)
        .table(TABLE_NAME)
        .update(values(), true)
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(mock.execution_count(), 0);
}

#[tokio::test]
async fn test_delete_field_from_row() {
    let mock = MockExecutor::new();
    let qb = QueryBuilder::new(&mock).table(TABLE_NAME);

    qb.delete_field_from_row(ID, "name").await.unwrap();
    let first = mock.last_statement().unwrap();
    assert!(first.contains("DELETE name FROM"));
    assert!(first.contains(&format!("WHERE id='{ID}'")));

    qb.delete(ID, "name").await.unwrap();
    assert_eq!(mock.last_statement().unwrap(), first);
}

#[tokio::test]
async fn test_delete_row() {
    let mock = MockExecutor::new();
    QueryBuilder::new(&mock)
        .table(TABLE_NAME)
        .delete(ID, "")
        .await
        .unwrap();
    let cql = mock.last_statement().unwrap();
    assert!(cql.contains("DELETE  FROM"));
    assert!(cql.contains(&format!("WHERE id='{ID}'")));
}

#[tokio::test]
async fn test_delete_row_with_no_fields() {
    let mock = MockExecutor::new();
    QueryBuilder::new(&mock)
        .table(TABLE_NAME)
        .delete(ID, Fields::none())
        .await
        .unwrap();
    assert_eq!(
        mock.last_statement().unwrap(),
        format!("DELETE  FROM {TABLE_NAME} WHERE id='{ID}'")
    );
}

#[tokio::test]
async fn test_delete_several_fields() {
    let mock = MockExecutor::new();
    QueryBuilder::new(&mock)
        .table(TABLE_NAME)
        .delete(ID, ["name", "surname"])
        .await
        .unwrap();
    assert_eq!(
        mock.last_statement().unwrap(),
        "DELETE name, surname FROM cass_test_table WHERE id='test-string-id'"
    );
}

#[tokio::test]
async fn test_executor_errors_propagate() {
    let mock = MockExecutor::new();
    mock.push_error(OrmError::query("unconfigured table cass_test_table"));
    let err = QueryBuilder::new(&mock)
        .table(TABLE_NAME)
        .find_all("*")
        .await
        .unwrap_err();
    assert!(matches!(err, OrmError::Query(ref m) if m.contains("unconfigured")));
}

// ==================== Schema ====================

#[test]
fn test_set_primary_key() {
    let mock = MockExecutor::new();
    let qb = QueryBuilder::new(&mock)
        .add_table(TABLE_NAME)
        .set_primary_key("my-id", "integer");
    assert!(qb.to_cql().contains("(my-id integer PRIMARY KEY,"));
}

#[tokio::test]
async fn test_create_new_table() {
    let mock = MockExecutor::new();
    let qb = QueryBuilder::new(&mock)
        .add_table(TABLE_NAME)
        .set_primary_key("id", None)
        .with_fields([("field", "field_type")]);

    assert_eq!(
        qb.to_cql(),
        "CREATE TABLE cass_test_table(id varchar PRIMARY KEY,  field field_type)"
    );
    // Finishing the chain does not execute anything.
    assert_eq!(mock.execution_count(), 0);

    qb.persist().await.unwrap();
    assert_eq!(mock.statements(), vec![qb.to_cql()]);
}

#[test]
fn test_composite_primary_key() {
    let mock = MockExecutor::new();
    let qb = QueryBuilder::new(&mock)
        .add_table("media_by_owner")
        .add_primary_key(["owner_id", "id"])
        .with_fields([("owner_id", "uuid"), ("id", "uuid"), ("name", "text")]);
    assert_eq!(
        qb.to_cql(),
        "CREATE TABLE media_by_owner( owner_id uuid,  id uuid,  name text, PRIMARY KEY(owner_id, id))"
    );
}

#[tokio::test]
async fn test_empty_composite_key_is_rejected() {
    let mock = MockExecutor::new();
    let qb = QueryBuilder::new(&mock)
        .add_table("media_by_owner")
        .add_primary_key(Fields::none())
        .with_fields([("owner_id", "uuid")]);
    assert!(qb.persist().await.unwrap_err().is_validation());

    let qb = QueryBuilder::new(&mock)
        .add_table("media_by_owner")
        .add_primary_key("")
        .with_fields([("owner_id", "uuid")]);
    assert!(qb.pending_statement().is_err());
    assert_eq!(mock.execution_count(), 0);
}

#[tokio::test]
async fn test_unfinished_table_is_not_persisted() {
    let mock = MockExecutor::new();
    let qb = QueryBuilder::new(&mock)
        .add_table(TABLE_NAME)
        .set_primary_key("id", "uuid");
    assert!(qb.persist().await.unwrap_err().is_validation());
    assert_eq!(mock.execution_count(), 0);
}

#[tokio::test]
async fn test_out_of_order_chain_is_rejected() {
    let mock = MockExecutor::new();
    let qb = QueryBuilder::new(&mock)
        .set_primary_key("id", "uuid")
        .add_table(TABLE_NAME)
        .with_fields([("a", "int")]);
    // add_table starts a fresh chain
    qb.persist().await.unwrap();

    let qb = QueryBuilder::new(&mock).with_fields([("a", "int")]);
    assert!(qb.persist().await.unwrap_err().is_validation());

    let qb = QueryBuilder::new(&mock)
        .add_table("t")
        .with_fields([("a", "int")])
        .set_primary_key("id", None);
    assert!(qb.persist().await.unwrap_err().is_validation());
}

#[tokio::test]
async fn test_alter_table_adds_columns() {
    let mock = MockExecutor::new();
    let qb = QueryBuilder::new(&mock)
        .alter_table(TABLE_NAME)
        .with_fields([("size", "int")]);
    qb.persist().await.unwrap();
    assert_eq!(
        mock.last_statement().unwrap(),
        "ALTER TABLE cass_test_table ADD size int"
    );
}

#[tokio::test]
async fn test_create_index() {
    let mock = MockExecutor::new();
    let qb = QueryBuilder::new(&mock).table(TABLE_NAME);

    qb.create_index("field", "").await.unwrap();
    assert_eq!(
        mock.last_statement().unwrap(),
        "CREATE INDEX field ON cass_test_table (field)"
    );

    qb.create_index("field", "field_idx").await.unwrap();
    assert_eq!(
        mock.last_statement().unwrap(),
        "CREATE INDEX field_idx ON cass_test_table (field)"
    );
}

#[tokio::test]
async fn test_drop_table() {
    let mock = MockExecutor::new();
    QueryBuilder::new(&mock).drop_table(TABLE_NAME).await.unwrap();
    assert_eq!(mock.last_statement().unwrap(), "DROP TABLE cass_test_table");
}

#[tokio::test]
async fn test_truncate_table() {
    let mock = MockExecutor::new();
    QueryBuilder::new(&mock)
        .truncate_table(TABLE_NAME)
        .await
        .unwrap();
    assert_eq!(mock.last_statement().unwrap(), "TRUNCATE cass_test_table");
}

#[tokio::test]
async fn test_table_rebinds_on_shared_template() {
    let mock = MockExecutor::new();
    let base = QueryBuilder::new(&mock);

    base.by_ref().table("a").find_all("*").await.unwrap();
    base.by_ref().table("b").find_all("*").await.unwrap();

    assert_eq!(
        mock.statements(),
        vec!["SELECT * FROM a  ".to_string(), "SELECT * FROM b  ".to_string()]
    );
    assert_eq!(base.table_name(), None);
}
