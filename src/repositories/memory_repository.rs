use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use log::debug;
use tokio::sync::RwLock;

use super::{RecordStore, StoreError};
use crate::dtos::{Record, RecordInput};
use crate::models::Resource;

#[derive(Debug, Default)]
struct Table {
    last_id: i32,
    rows: BTreeMap<i32, Vec<String>>,
}

/// In-process store used with `STORE_BACKEND=memory` and by the tests.
///
/// Each table keeps its own auto-increment counter starting at 1. Ids are
/// never reused after a delete, matching a `SERIAL` column.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<&'static str, Table>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn find_all(&self, resource: &Resource) -> Result<Vec<Record>, StoreError> {
        let tables = self.tables.read().await;
        let records = tables
            .get(resource.table)
            .map(|table| {
                table
                    .rows
                    .iter()
                    .map(|(id, values)| Record::new(resource, *id, values.clone()))
                    .collect()
            })
            .unwrap_or_default();
        Ok(records)
    }

    async fn find_by_id(
        &self,
        resource: &Resource,
        id: i32,
    ) -> Result<Option<Record>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .get(resource.table)
            .and_then(|table| table.rows.get(&id))
            .map(|values| Record::new(resource, id, values.clone())))
    }

    async fn insert(&self, resource: &Resource, input: &RecordInput) -> Result<i32, StoreError> {
        let mut tables = self.tables.write().await;
        let table = tables.entry(resource.table).or_default();
        let id = table.last_id.checked_add(1).ok_or_else(|| {
            StoreError::Other(format!("id sequence for {} exhausted", resource.table))
        })?;
        table.last_id = id;
        table.rows.insert(id, input.values().to_vec());
        debug!("memory insert into {}: id={}", resource.table, id);
        Ok(id)
    }

    async fn update(
        &self,
        resource: &Resource,
        id: i32,
        input: &RecordInput,
    ) -> Result<u64, StoreError> {
        let mut tables = self.tables.write().await;
        let row = tables
            .get_mut(resource.table)
            .and_then(|table| table.rows.get_mut(&id));
        match row {
            Some(values) => {
                *values = input.values().to_vec();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn remove(&self, resource: &Resource, id: i32) -> Result<u64, StoreError> {
        let mut tables = self.tables.write().await;
        let removed = tables
            .get_mut(resource.table)
            .and_then(|table| table.rows.remove(&id));
        Ok(u64::from(removed.is_some()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{POSTS, USERS};

    fn post(title: &str, contents: &str) -> RecordInput {
        let body = serde_json::json!({ "title": title, "contents": contents }).to_string();
        RecordInput::from_body(&POSTS, body.as_bytes()).unwrap()
    }

    #[tokio::test]
    async fn insert_assigns_increasing_ids() {
        let store = MemoryStore::new();
        assert_eq!(store.insert(&POSTS, &post("A", "B")).await.unwrap(), 1);
        assert_eq!(store.insert(&POSTS, &post("C", "D")).await.unwrap(), 2);

        let all = store.find_all(&POSTS).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].get("title"), Some("A"));
        assert_eq!(all[1].id, 2);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_remove() {
        let store = MemoryStore::new();
        let id = store.insert(&POSTS, &post("A", "B")).await.unwrap();
        assert_eq!(store.remove(&POSTS, id).await.unwrap(), 1);
        assert_eq!(store.remove(&POSTS, id).await.unwrap(), 0);
        assert_eq!(store.insert(&POSTS, &post("C", "D")).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn insert_fails_once_ids_run_out() {
        let store = MemoryStore::new();
        store.tables.write().await.insert(
            POSTS.table,
            Table {
                last_id: i32::MAX,
                rows: BTreeMap::new(),
            },
        );

        let err = store.insert(&POSTS, &post("A", "B")).await.unwrap_err();
        assert!(matches!(err, StoreError::Other(_)));
        assert!(store.find_all(&POSTS).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_reports_affected_rows() {
        let store = MemoryStore::new();
        let id = store.insert(&POSTS, &post("A", "B")).await.unwrap();

        assert_eq!(store.update(&POSTS, id, &post("X", "Y")).await.unwrap(), 1);
        assert_eq!(store.update(&POSTS, 99, &post("X", "Y")).await.unwrap(), 0);

        let record = store.find_by_id(&POSTS, id).await.unwrap().unwrap();
        assert_eq!(record.get("title"), Some("X"));
        assert_eq!(record.get("contents"), Some("Y"));
    }

    #[tokio::test]
    async fn tables_are_independent() {
        let store = MemoryStore::new();
        store.insert(&POSTS, &post("A", "B")).await.unwrap();

        assert!(store.find_all(&USERS).await.unwrap().is_empty());
        assert_eq!(store.find_by_id(&USERS, 1).await.unwrap(), None);
        assert_eq!(store.remove(&USERS, 1).await.unwrap(), 0);
    }
}
