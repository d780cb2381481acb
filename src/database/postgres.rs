use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgArguments, PgPoolOptions};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Row};
use tracing::info;

use super::store::{Collection, DocumentStore, StoreError};
use crate::config::DatabaseConfig;
use crate::filter::filter_where::{field_expression, validate_field_name};
use crate::filter::{Filter, FilterData};

const UNIQUE_VIOLATION: &str = "23505";

#[derive(FromRow)]
struct DocumentRow {
    data: Json<Value>,
}

/// Postgres backend: one JSONB table per collection with a unique
/// expression index on each natural key.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let url = config.url.as_deref().ok_or(StoreError::ConfigMissing("DATABASE_URL"))?;
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;
        info!("Created database pool (max {} connections)", config.max_connections);
        Ok(Self { pool })
    }

    /// Creates every collection table and unique index if missing.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        for collection in Collection::ALL {
            let table = collection.table_name();
            sqlx::query(&format!(
                "CREATE TABLE IF NOT EXISTS \"{}\" (\
                 pk BIGSERIAL PRIMARY KEY, \
                 data JSONB NOT NULL, \
                 created_at TIMESTAMPTZ NOT NULL DEFAULT now(), \
                 updated_at TIMESTAMPTZ NOT NULL DEFAULT now())",
                table
            ))
            .execute(&self.pool)
            .await?;

            for field in collection.unique_fields() {
                sqlx::query(&format!(
                    "CREATE UNIQUE INDEX IF NOT EXISTS \"{0}_{1}_key\" ON \"{0}\" (({2}))",
                    table,
                    field,
                    field_expression(field)
                ))
                .execute(&self.pool)
                .await?;
            }
        }
        info!("Ensured {} collection tables", Collection::ALL.len());
        Ok(())
    }

    fn filter(collection: Collection, data: FilterData) -> Result<Filter, StoreError> {
        let mut filter = Filter::new(collection.table_name())?;
        filter.assign(data)?;
        Ok(filter)
    }

    fn map_write_error(collection: Collection, err: sqlx::Error) -> StoreError {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
                let field = db_err
                    .constraint()
                    .and_then(|c| c.strip_prefix(collection.table_name()))
                    .map(|c| c.trim_start_matches('_').trim_end_matches("_key").to_string())
                    .unwrap_or_else(|| db_err.message().to_string());
                return StoreError::DuplicateKey { collection: collection.table_name(), field };
            }
        }
        StoreError::Sqlx(err)
    }
}

fn bind_params<'q>(
    mut q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    params: Vec<Value>,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    for p in params {
        q = q.bind(Json(p));
    }
    q
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn find(&self, collection: Collection, filter: FilterData) -> Result<Vec<Value>, StoreError> {
        let sql = Self::filter(collection, filter)?.to_sql()?;
        let mut q = sqlx::query_as::<_, DocumentRow>(&sql.query);
        for p in sql.params {
            q = q.bind(Json(p));
        }
        let rows = q.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(|row| row.data.0).collect())
    }

    async fn find_one(&self, collection: Collection, filter: FilterData) -> Result<Option<Value>, StoreError> {
        Ok(self.find(collection, filter).await?.into_iter().next())
    }

    async fn insert(&self, collection: Collection, document: Value) -> Result<(), StoreError> {
        let query = format!("INSERT INTO \"{}\" (data) VALUES ($1)", collection.table_name());
        sqlx::query(&query)
            .bind(Json(document))
            .execute(&self.pool)
            .await
            .map_err(|e| Self::map_write_error(collection, e))?;
        Ok(())
    }

    async fn replace_one(&self, collection: Collection, filter: FilterData, document: Value) -> Result<bool, StoreError> {
        // $1 is the new document; filter params follow.
        let target = Self::filter(collection, filter)?.to_first_pk_sql(1)?;
        let query = format!(
            "UPDATE \"{0}\" SET data = $1, updated_at = now() WHERE pk = ({1})",
            collection.table_name(),
            target.query
        );
        let q = sqlx::query(&query).bind(Json(document));
        let result = bind_params(q, target.params)
            .execute(&self.pool)
            .await
            .map_err(|e| Self::map_write_error(collection, e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_one(&self, collection: Collection, filter: FilterData) -> Result<bool, StoreError> {
        let target = Self::filter(collection, filter)?.to_first_pk_sql(0)?;
        let query = format!("DELETE FROM \"{}\" WHERE pk = ({})", collection.table_name(), target.query);
        let result = bind_params(sqlx::query(&query), target.params)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn max_i64(&self, collection: Collection, field: &str) -> Result<Option<i64>, StoreError> {
        validate_field_name(field)?;
        let query = format!(
            "SELECT MAX((data->>'{}')::bigint) AS max FROM \"{}\"",
            field,
            collection.table_name()
        );
        let row = sqlx::query(&query).fetch_one(&self.pool).await?;
        let max: Option<i64> = row.try_get("max")?;
        Ok(max)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
