//! Postgres rendering of the document-store contract: one JSONB column
//! per collection table, equality filters via `@>` containment, partial
//! updates via the `||` merge operator.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::marker::PhantomData;
use uuid::Uuid;

use super::{Document, Query, Repository, SortDir};

pub struct PgRepository<T> {
    pool: PgPool,
    _marker: PhantomData<fn() -> T>,
}

impl<T> PgRepository<T> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _marker: PhantomData,
        }
    }
}

fn escape_like(needle: &str) -> String {
    needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[async_trait]
impl<T: Document> Repository<T> for PgRepository<T> {
    async fn read(&self, query: Query) -> anyhow::Result<Vec<T>> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT id, doc FROM {} WHERE TRUE", T::COLLECTION));

        if let Some(id) = query.id {
            qb.push(" AND id = ").push_bind(id);
        }
        if !query.fields.is_empty() {
            let filter: serde_json::Map<String, Value> = query
                .fields
                .iter()
                .map(|(field, value)| (field.to_string(), value.clone()))
                .collect();
            qb.push(" AND doc @> ").push_bind(Value::Object(filter));
        }
        if let Some((field, needle)) = &query.contains {
            qb.push(format!(" AND doc->>'{field}' ILIKE "))
                .push_bind(format!("%{}%", escape_like(needle)));
        }

        // Sort fields come from application code, never from callers.
        for (i, (field, dir)) in query.sort.iter().enumerate() {
            qb.push(if i == 0 { " ORDER BY " } else { ", " });
            qb.push(format!(
                "doc->>'{field}' {}",
                match dir {
                    SortDir::Asc => "ASC",
                    SortDir::Desc => "DESC",
                }
            ));
        }
        if let Some(limit) = query.limit {
            qb.push(" LIMIT ").push_bind(limit);
        }
        if let Some(skip) = query.skip {
            qb.push(" OFFSET ").push_bind(skip);
        }

        let rows: Vec<(Uuid, Value)> = qb.build_query_as().fetch_all(&self.pool).await?;
        rows.into_iter()
            .map(|(id, mut doc)| {
                if let Some(obj) = doc.as_object_mut() {
                    obj.insert("id".into(), Value::String(id.to_string()));
                }
                serde_json::from_value(doc).map_err(Into::into)
            })
            .collect()
    }

    async fn create(&self, mut entity: T) -> anyhow::Result<T> {
        let mut doc = serde_json::to_value(&entity)?;
        if let Some(obj) = doc.as_object_mut() {
            // The table's id column is the native identifier.
            obj.remove("id");
        }
        let (id,): (Uuid,) = sqlx::query_as(&format!(
            "INSERT INTO {} (doc) VALUES ($1) RETURNING id",
            T::COLLECTION
        ))
        .bind(doc)
        .fetch_one(&self.pool)
        .await?;
        entity.set_id(id);
        Ok(entity)
    }

    async fn update(&self, id: Uuid, patch: Value) -> anyhow::Result<()> {
        sqlx::query(&format!(
            "UPDATE {} SET doc = doc || $1 WHERE id = $2",
            T::COLLECTION
        ))
        .bind(patch)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<()> {
        sqlx::query(&format!("DELETE FROM {} WHERE id = $1", T::COLLECTION))
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
