//! In-memory provider over JSON records.
//!
//! Serves the same contract a remote endpoint would: criteria filtering,
//! `skip`/`take` windows and an `x-total-count` header. Used for tests, demos
//! and offline hydration.

use super::{CountResponse, ListResponse, Resource, ResourceProvider};
use crate::core::{CollectionError, QueryParams, Result, Value};
use async_trait::async_trait;
use futures::future::BoxFuture;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use std::fmt;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{Level, event};

type Row = Map<String, JsonValue>;

/// Shared record store backing a [`MemoryProvider`] and its records.
type Store = Arc<RwLock<Vec<Row>>>;

#[derive(Clone, Default)]
pub struct MemoryProvider {
    store: Store,
    /// Params of every `list` call, oldest first
    requests: Arc<Mutex<Vec<QueryParams>>>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider from JSON objects; any other JSON shape is rejected.
    pub fn from_records(records: Vec<JsonValue>) -> Result<Self> {
        let rows = records
            .into_iter()
            .map(into_row)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            store: Arc::new(RwLock::new(rows)),
            requests: Arc::default(),
        })
    }

    /// Parse a JSON array of objects.
    pub fn from_json(text: &str) -> Result<Self> {
        let parsed: JsonValue = serde_json::from_str(text)?;
        match parsed {
            JsonValue::Array(records) => Self::from_records(records),
            other => Err(CollectionError::RecordError(format!(
                "expected a JSON array of records, got {}",
                json_kind(&other)
            ))),
        }
    }

    pub async fn insert(&self, record: JsonValue) -> Result<()> {
        let row = into_row(record)?;
        self.store.write().await.push(row);
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    /// Params received by `list`, in call order.
    pub async fn requests(&self) -> Vec<QueryParams> {
        self.requests.lock().await.clone()
    }

    fn record(&self, row: Row) -> Record {
        Record {
            fields: row,
            store: Arc::clone(&self.store),
        }
    }
}

impl fmt::Debug for MemoryProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryProvider").finish_non_exhaustive()
    }
}

#[async_trait]
impl ResourceProvider for MemoryProvider {
    type Item = Record;

    async fn list(&self, params: &QueryParams) -> Result<ListResponse<Record>> {
        self.requests.lock().await.push(params.clone());

        let rows = self.store.read().await;
        let matching: Vec<&Row> = rows.iter().filter(|row| matches(row, params)).collect();
        let total = matching.len();
        let skip = params.skip().unwrap_or(0);
        let take = params.take().unwrap_or(total);

        let items: Vec<Record> = matching
            .into_iter()
            .skip(skip)
            .take(take)
            .map(|row| self.record(row.clone()))
            .collect();

        event!(
            Level::DEBUG,
            skip,
            take,
            total,
            served = items.len(),
            "memory provider list served"
        );
        Ok(ListResponse::new(items).with_total(total))
    }

    async fn count(&self, params: &QueryParams) -> Result<CountResponse> {
        let rows = self.store.read().await;
        let count = rows.iter().filter(|row| matches(row, params)).count();
        Ok(CountResponse::new(count))
    }

    fn instantiate(&self, raw: JsonValue) -> Result<Record> {
        into_row(raw).map(|row| self.record(row))
    }
}

/// A JSON object served by a [`MemoryProvider`].
#[derive(Clone)]
pub struct Record {
    fields: Row,
    store: Store,
}

impl Record {
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.fields.get(key)
    }

    pub fn fields(&self) -> &Map<String, JsonValue> {
        &self.fields
    }

    pub fn to_json(&self) -> JsonValue {
        JsonValue::Object(self.fields.clone())
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Record").field(&self.fields).finish()
    }
}

impl Serialize for Record {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

impl Resource for Record {
    fn field(&self, key: &str) -> Option<Value> {
        self.fields.get(key).map(Value::from)
    }

    fn destroy(&self) -> BoxFuture<'static, Result<()>> {
        let store = Arc::clone(&self.store);
        let id = self.id();
        Box::pin(async move {
            let mut rows = store.write().await;
            let position = rows.iter().position(|row| {
                row.get("id")
                    .map(|candidate| Value::from(candidate).loosely_equals(&id))
                    .unwrap_or(false)
            });
            match position {
                Some(index) => {
                    rows.remove(index);
                    event!(Level::DEBUG, id = %id, "memory record destroyed");
                    Ok(())
                }
                None => Err(CollectionError::NotFound(id.to_string())),
            }
        })
    }
}

fn matches(row: &Row, params: &QueryParams) -> bool {
    params.criteria().all(|(key, expected)| {
        row.get(key)
            .map(|actual| Value::from(actual).loosely_equals(expected))
            .unwrap_or(false)
    })
}

fn into_row(record: JsonValue) -> Result<Row> {
    match record {
        JsonValue::Object(row) => Ok(row),
        other => Err(CollectionError::RecordError(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{SKIP, TAKE};
    use serde_json::json;

    fn provider() -> MemoryProvider {
        MemoryProvider::from_records(vec![
            json!({"id": 1, "status": "open"}),
            json!({"id": 2, "status": "closed"}),
            json!({"id": 3, "status": "open"}),
            json!({"id": 4, "status": "open"}),
        ])
        .unwrap()
    }

    #[tokio::test]
    async fn test_list_applies_window_and_total() {
        let provider = provider();
        let params = QueryParams::new().with(SKIP, 1).with(TAKE, 2);
        let response = provider.list(&params).await.unwrap();

        let ids: Vec<Value> = response.items.iter().map(Resource::id).collect();
        assert_eq!(ids, vec![Value::Integer(2), Value::Integer(3)]);
        assert_eq!(response.header("x-total-count"), Some("4"));
        assert_eq!(provider.requests().await, vec![params]);
    }

    #[tokio::test]
    async fn test_list_filters_loosely() {
        let provider = provider();
        let params = QueryParams::new().with("status", "open").with("id", "3");
        let response = provider.list(&params).await.unwrap();

        assert_eq!(response.len(), 1);
        assert_eq!(response.items[0].id(), Value::Integer(3));
        assert_eq!(response.header("x-total-count"), Some("1"));
    }

    #[tokio::test]
    async fn test_count_ignores_window() {
        let provider = provider();
        let params = QueryParams::new()
            .with("status", "open")
            .with(SKIP, 2)
            .with(TAKE, 1);
        assert_eq!(provider.count(&params).await.unwrap().count, 3);
    }

    #[tokio::test]
    async fn test_destroy_removes_from_store() {
        let provider = provider();
        let record = provider.instantiate(json!({"id": "2"})).unwrap();

        record.destroy().await.unwrap();
        assert_eq!(provider.len().await, 3);
        assert!(matches!(
            record.destroy().await,
            Err(CollectionError::NotFound(_))
        ));
    }

    #[test]
    fn test_rejects_non_object_records() {
        assert!(MemoryProvider::from_records(vec![json!(1)]).is_err());
        assert!(MemoryProvider::from_json("{\"id\": 1}").is_err());
        assert!(MemoryProvider::from_json("not json").is_err());
    }
}
