use async_trait::async_trait;
use deadpool_postgres::Pool;
use log::{debug, info};
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

use super::{RecordStore, StoreError};
use crate::dtos::{Record, RecordInput};
use crate::models::Resource;

/// Postgres-backed store. Holds the process-wide pool built at startup.
#[derive(Clone)]
pub struct PgStore {
    pool: Pool,
}

impl PgStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Creates each resource's table if it does not exist yet.
    pub async fn ensure_tables(&self, resources: &[&Resource]) -> Result<(), StoreError> {
        let client = self.pool.get().await?;
        for resource in resources {
            client.batch_execute(&create_table_sql(resource)).await?;
            info!("table {} ready", resource.table);
        }
        Ok(())
    }
}

fn columns(resource: &Resource) -> String {
    std::iter::once("id")
        .chain(resource.fields.iter().copied())
        .collect::<Vec<_>>()
        .join(", ")
}

fn create_table_sql(resource: &Resource) -> String {
    let fields: String = resource
        .fields
        .iter()
        .map(|field| format!(", {} TEXT NOT NULL", field))
        .collect();
    format!(
        "CREATE TABLE IF NOT EXISTS {} (id SERIAL PRIMARY KEY{})",
        resource.table, fields
    )
}

fn select_all_sql(resource: &Resource) -> String {
    format!("SELECT {} FROM {} ORDER BY id", columns(resource), resource.table)
}

fn select_by_id_sql(resource: &Resource) -> String {
    format!("SELECT {} FROM {} WHERE id = $1", columns(resource), resource.table)
}

fn insert_sql(resource: &Resource) -> String {
    let placeholders = (1..=resource.fields.len())
        .map(|n| format!("${}", n))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING id",
        resource.table,
        resource.fields.join(", "),
        placeholders
    )
}

/// Field values bind to `$1..$n`, the id binds last.
fn update_sql(resource: &Resource) -> String {
    let assignments = resource
        .fields
        .iter()
        .enumerate()
        .map(|(n, field)| format!("{} = ${}", field, n + 1))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "UPDATE {} SET {} WHERE id = ${}",
        resource.table,
        assignments,
        resource.fields.len() + 1
    )
}

fn delete_sql(resource: &Resource) -> String {
    format!("DELETE FROM {} WHERE id = $1", resource.table)
}

fn row_to_record(resource: &Resource, row: &Row) -> Result<Record, StoreError> {
    let id: i32 = row.try_get("id")?;
    let values = resource
        .fields
        .iter()
        .map(|field| row.try_get::<_, String>(*field))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Record::new(resource, id, values))
}

fn input_params(input: &RecordInput) -> Vec<&(dyn ToSql + Sync)> {
    input
        .values()
        .iter()
        .map(|value| value as &(dyn ToSql + Sync))
        .collect()
}

#[async_trait]
impl RecordStore for PgStore {
    async fn find_all(&self, resource: &Resource) -> Result<Vec<Record>, StoreError> {
        let client = self.pool.get().await?;
        let stmt = client.prepare_cached(&select_all_sql(resource)).await?;
        let rows = client.query(&stmt, &[]).await?;
        rows.iter().map(|row| row_to_record(resource, row)).collect()
    }

    async fn find_by_id(
        &self,
        resource: &Resource,
        id: i32,
    ) -> Result<Option<Record>, StoreError> {
        let client = self.pool.get().await?;
        let stmt = client.prepare_cached(&select_by_id_sql(resource)).await?;
        let row = client.query_opt(&stmt, &[&id]).await?;
        row.map(|row| row_to_record(resource, &row)).transpose()
    }

    async fn insert(&self, resource: &Resource, input: &RecordInput) -> Result<i32, StoreError> {
        let client = self.pool.get().await?;
        let stmt = client.prepare_cached(&insert_sql(resource)).await?;
        let row = client.query_one(&stmt, &input_params(input)).await?;
        let id: i32 = row.try_get("id")?;
        debug!("insert into {}: id={}", resource.table, id);
        Ok(id)
    }

    async fn update(
        &self,
        resource: &Resource,
        id: i32,
        input: &RecordInput,
    ) -> Result<u64, StoreError> {
        let client = self.pool.get().await?;
        let stmt = client.prepare_cached(&update_sql(resource)).await?;
        let mut params = input_params(input);
        params.push(&id);
        Ok(client.execute(&stmt, &params).await?)
    }

    async fn remove(&self, resource: &Resource, id: i32) -> Result<u64, StoreError> {
        let client = self.pool.get().await?;
        let stmt = client.prepare_cached(&delete_sql(resource)).await?;
        Ok(client.execute(&stmt, &[&id]).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::models::{POSTS, USERS};

    #[test]
    fn builds_parameterized_statements() {
        assert_eq!(
            create_table_sql(&POSTS),
            "CREATE TABLE IF NOT EXISTS posts (id SERIAL PRIMARY KEY, title TEXT NOT NULL, contents TEXT NOT NULL)"
        );
        assert_eq!(select_all_sql(&POSTS), "SELECT id, title, contents FROM posts ORDER BY id");
        assert_eq!(select_by_id_sql(&USERS), "SELECT id, name, bio FROM users WHERE id = $1");
        assert_eq!(
            insert_sql(&POSTS),
            "INSERT INTO posts (title, contents) VALUES ($1, $2) RETURNING id"
        );
        assert_eq!(update_sql(&USERS), "UPDATE users SET name = $1, bio = $2 WHERE id = $3");
        assert_eq!(delete_sql(&POSTS), "DELETE FROM posts WHERE id = $1");
    }

    // Run with PG_HOST/PG_USER/PG_DB set: cargo test -- --ignored
    #[tokio::test]
    #[ignore = "requires database"]
    async fn postgres_round_trip() {
        let settings = Settings::from_env().expect("settings");
        let pg = settings.postgres.expect("PG_* variables required");
        let pool = crate::config::get_pg_pool(&pg).expect("pool");
        let store = PgStore::new(pool);
        store.ensure_tables(&[&POSTS]).await.expect("tables");

        let input = RecordInput::from_body(&POSTS, br#"{"title":"A","contents":"B"}"#).unwrap();
        let id = store.insert(&POSTS, &input).await.expect("insert");

        let record = store.find_by_id(&POSTS, id).await.expect("find").expect("row");
        assert_eq!(record.get("title"), Some("A"));

        let changed = RecordInput::from_body(&POSTS, br#"{"title":"X","contents":"Y"}"#).unwrap();
        assert_eq!(store.update(&POSTS, id, &changed).await.expect("update"), 1);
        assert_eq!(store.remove(&POSTS, id).await.expect("remove"), 1);
        assert_eq!(store.remove(&POSTS, id).await.expect("remove"), 0);
        assert!(store.find_by_id(&POSTS, id).await.expect("find").is_none());
    }
}
