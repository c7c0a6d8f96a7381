//! In-process document store: the default adapter and the test double.

use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering;
use std::marker::PhantomData;
use std::sync::RwLock;
use uuid::Uuid;

use super::{Document, Query, Repository, SortDir};

pub struct MemoryRepository<T> {
    docs: RwLock<Vec<(Uuid, Value)>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> MemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(Vec::new()),
            _marker: PhantomData,
        }
    }
}

impl<T> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn matches(doc: &Value, query: &Query) -> bool {
    for (field, expected) in &query.fields {
        if doc.get(field) != Some(expected) {
            return false;
        }
    }
    if let Some((field, needle)) = &query.contains {
        let Some(actual) = doc.get(field).and_then(Value::as_str) else {
            return false;
        };
        if !actual.to_lowercase().contains(&needle.to_lowercase()) {
            return false;
        }
    }
    true
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

fn merge_patch(doc: &mut Value, patch: &Value) {
    if let (Some(target), Some(fields)) = (doc.as_object_mut(), patch.as_object()) {
        for (key, value) in fields {
            target.insert(key.clone(), value.clone());
        }
    }
}

#[async_trait]
impl<T: Document> Repository<T> for MemoryRepository<T> {
    async fn read(&self, query: Query) -> anyhow::Result<Vec<T>> {
        let docs = self.docs.read().expect("store lock poisoned");
        let mut hits: Vec<Value> = docs
            .iter()
            .filter(|(id, _)| query.id.map_or(true, |want| *id == want))
            .filter(|(_, doc)| matches(doc, &query))
            .map(|(_, doc)| doc.clone())
            .collect();

        for (field, dir) in query.sort.iter().rev() {
            hits.sort_by(|a, b| {
                let ord = compare_values(a.get(field), b.get(field));
                match dir {
                    SortDir::Asc => ord,
                    SortDir::Desc => ord.reverse(),
                }
            });
        }

        let skip = query.skip.unwrap_or(0).max(0) as usize;
        let limit = query.limit.map(|l| l.max(0) as usize).unwrap_or(usize::MAX);
        hits.into_iter()
            .skip(skip)
            .take(limit)
            .map(|doc| serde_json::from_value(doc).map_err(Into::into))
            .collect()
    }

    async fn create(&self, mut entity: T) -> anyhow::Result<T> {
        let id = Uuid::new_v4();
        entity.set_id(id);
        let doc = serde_json::to_value(&entity)?;
        self.docs
            .write()
            .expect("store lock poisoned")
            .push((id, doc));
        Ok(entity)
    }

    async fn update(&self, id: Uuid, patch: Value) -> anyhow::Result<()> {
        let mut docs = self.docs.write().expect("store lock poisoned");
        if let Some((_, doc)) = docs.iter_mut().find(|(doc_id, _)| *doc_id == id) {
            merge_patch(doc, &patch);
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<()> {
        self.docs
            .write()
            .expect("store lock poisoned")
            .retain(|(doc_id, _)| *doc_id != id);
        Ok(())
    }
}
