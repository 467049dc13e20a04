//! In-process list store for tests.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, AtomicUsize};

use async_trait::async_trait;
use serde_json::Value;

use super::{ListQuery, ListStore, Row, StoreError, StoreResult};

#[derive(Default)]
pub struct MemoryStore {
    lists: Mutex<HashMap<String, Vec<Row>>>,
    /// Known columns per list; lists without an entry accept any field
    columns: Mutex<HashMap<String, Vec<String>>>,
    next_id: AtomicU64,
    /// Number of `create` calls, for asserting write counts
    pub creates: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            next_id: AtomicU64::new(1),
            ..Default::default()
        }
    }

    /// Insert a row as if it already existed upstream; returns its id.
    pub fn seed(&self, list: &str, value: Value) -> u64 {
        let mut row = value.as_object().cloned().unwrap_or_default();
        let id = self.allocate_id();
        row.insert("Id".into(), Value::from(id));
        self.lists
            .lock()
            .unwrap()
            .entry(list.to_string())
            .or_default()
            .push(row);
        id
    }

    /// Restrict a list to these columns. Reads selecting and writes setting
    /// anything else fail with 400, like SharePoint.
    pub fn define_columns(&self, list: &str, columns: &str) {
        let columns = columns.split(',').map(|c| c.trim().to_string()).collect();
        self.columns.lock().unwrap().insert(list.to_string(), columns);
    }

    fn check_columns<'a>(
        &self,
        method: &'static str,
        list: &str,
        fields: impl IntoIterator<Item = &'a str>,
    ) -> StoreResult<()> {
        let columns = self.columns.lock().unwrap();
        let Some(known) = columns.get(list) else {
            return Ok(());
        };
        for field in fields {
            if field != "Id" && !known.iter().any(|c| c == field) {
                return Err(StoreError::Upstream {
                    method,
                    path: format!("web/lists/getbytitle('{}')/items", list),
                    status: 400,
                    body: format!("Column '{}' does not exist", field),
                });
            }
        }
        Ok(())
    }

    pub fn rows(&self, list: &str) -> Vec<Row> {
        self.lists
            .lock()
            .unwrap()
            .get(list)
            .cloned()
            .unwrap_or_default()
    }

    fn allocate_id(&self) -> u64 {
        self.next_id.fetch_add(1, std::sync::atomic::Ordering::SeqCst)
    }

    fn not_found(method: &'static str, list: &str, id: u64) -> StoreError {
        StoreError::Upstream {
            method,
            path: format!("web/lists/getbytitle('{}')/items({})", list, id),
            status: 404,
            body: "Item does not exist".into(),
        }
    }
}

fn id_of(row: &Row) -> Option<u64> {
    row.get("Id").and_then(Value::as_u64)
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

#[async_trait]
impl ListStore for MemoryStore {
    async fn get_all(&self, list: &str, query: &ListQuery) -> StoreResult<Vec<Row>> {
        if let Some(select) = query.select {
            self.check_columns("GET", list, select.split(',').map(str::trim))?;
        }

        let mut rows: Vec<Row> = self
            .rows(list)
            .into_iter()
            .filter(|row| query.filter.as_ref().is_none_or(|f| f.matches(row)))
            .collect();

        if let Some(order_by) = query.order_by {
            let fields: Vec<&str> = order_by.split(',').map(str::trim).collect();
            rows.sort_by(|a, b| {
                fields
                    .iter()
                    .map(|f| compare_values(a.get(*f), b.get(*f)))
                    .find(|o| *o != Ordering::Equal)
                    .unwrap_or(Ordering::Equal)
            });
        }

        if let Some(select) = query.select {
            let fields: Vec<&str> = select.split(',').map(str::trim).collect();
            for row in &mut rows {
                row.retain(|k, _| fields.contains(&k.as_str()));
            }
        }

        Ok(rows)
    }

    async fn create(&self, list: &str, mut row: Row) -> StoreResult<Row> {
        self.check_columns("POST", list, row.keys().map(String::as_str))?;
        self.creates.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        row.insert("Id".into(), Value::from(self.allocate_id()));
        self.lists
            .lock()
            .unwrap()
            .entry(list.to_string())
            .or_default()
            .push(row.clone());
        Ok(row)
    }

    async fn merge(&self, list: &str, id: u64, patch: Row) -> StoreResult<()> {
        self.check_columns("MERGE", list, patch.keys().map(String::as_str))?;
        let mut lists = self.lists.lock().unwrap();
        let row = lists
            .get_mut(list)
            .and_then(|rows| rows.iter_mut().find(|r| id_of(r) == Some(id)))
            .ok_or_else(|| Self::not_found("MERGE", list, id))?;

        for (key, value) in patch {
            row.insert(key, value);
        }
        Ok(())
    }

    async fn delete(&self, list: &str, id: u64) -> StoreResult<()> {
        let mut lists = self.lists.lock().unwrap();
        let rows = lists
            .get_mut(list)
            .ok_or_else(|| Self::not_found("DELETE", list, id))?;

        let before = rows.len();
        rows.retain(|r| id_of(r) != Some(id));
        if rows.len() == before {
            return Err(Self::not_found("DELETE", list, id));
        }
        Ok(())
    }

    async fn list_titles(&self) -> StoreResult<Vec<String>> {
        let mut titles: Vec<String> = self.lists.lock().unwrap().keys().cloned().collect();
        titles.sort();
        Ok(titles)
    }
}

/// A store whose every call fails, for error paths.
pub struct BrokenStore;

#[async_trait]
impl ListStore for BrokenStore {
    async fn get_all(&self, _list: &str, _query: &ListQuery) -> StoreResult<Vec<Row>> {
        Err(StoreError::Token("401".into()))
    }

    async fn create(&self, _list: &str, _row: Row) -> StoreResult<Row> {
        Err(StoreError::Token("401".into()))
    }

    async fn merge(&self, _list: &str, _id: u64, _patch: Row) -> StoreResult<()> {
        Err(StoreError::Token("401".into()))
    }

    async fn delete(&self, _list: &str, _id: u64) -> StoreResult<()> {
        Err(StoreError::Token("401".into()))
    }

    async fn list_titles(&self) -> StoreResult<Vec<String>> {
        Err(StoreError::Token("401".into()))
    }
}
