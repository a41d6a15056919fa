//! Postgres connection and schema wiring shared by the persistent stores.
//!
//! ## Error Mapping
//!
//! SQLx errors are mapped to `StoreError` as follows:
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError | Scenario |
//! |------------|----------------------|------------|----------|
//! | Database (unique violation) | `23505` | `Conflict` | Duplicate product/order id |
//! | Database (check constraint violation) | `23514` | `Backend` | Negative stock or amount reached the table |
//! | Database (other) | Any other | `Backend` | Other database errors |
//! | PoolClosed | N/A | `Backend` | Connection pool was closed |
//! | ColumnDecode / Decode | N/A | `Serialization` | Row did not match the expected shape |
//! | Other | N/A | `Backend` | Network errors, connection failures, etc. |

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use freshcart_inventory::StoreError;

/// Schema applied by [`ensure_schema`]. Every statement is idempotent.
pub const SCHEMA: &str = include_str!("../migrations/0001_freshcart.sql");

/// Open a connection pool against `database_url`.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, StoreError> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .map_err(|e| map_sqlx_error("connect", e))
}

/// Create the `products` and `orders` tables if they do not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::raw_sql(SCHEMA)
        .execute(pool)
        .await
        .map_err(|e| map_sqlx_error("ensure_schema", e))?;
    Ok(())
}

pub(crate) fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some("23505") => StoreError::Conflict(msg),
                _ => StoreError::Backend(msg),
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::Backend(format!("connection pool closed in {}", operation))
        }
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            StoreError::Serialization(format!("failed to decode row in {}: {}", operation, err))
        }
        _ => StoreError::Backend(format!("sqlx error in {}: {}", operation, err)),
    }
}

/// Convert an unsigned domain quantity to the `BIGINT` the tables store.
pub(crate) fn to_db_i64(field: &str, value: u64) -> Result<i64, StoreError> {
    i64::try_from(value)
        .map_err(|_| StoreError::serialization(format!("{field} {value} does not fit in BIGINT")))
}

/// Convert a stored `BIGINT` back to an unsigned domain value.
pub(crate) fn from_db_i64<T: TryFrom<i64>>(field: &str, value: i64) -> Result<T, StoreError> {
    T::try_from(value)
        .map_err(|_| StoreError::serialization(format!("stored {field} {value} is out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_creates_both_tables_idempotently() {
        assert!(SCHEMA.contains("CREATE TABLE IF NOT EXISTS products"));
        assert!(SCHEMA.contains("CREATE TABLE IF NOT EXISTS orders"));
        assert!(!SCHEMA.contains("REFERENCES"));
    }

    #[test]
    fn pool_closed_maps_to_backend() {
        let err = map_sqlx_error("reserve", sqlx::Error::PoolClosed);
        assert_eq!(err, StoreError::backend("connection pool closed in reserve"));
    }

    #[test]
    fn bigint_conversions_reject_out_of_range_values() {
        assert_eq!(to_db_i64("stock", 42), Ok(42));
        assert!(to_db_i64("price", u64::MAX).is_err());
        assert_eq!(from_db_i64::<u32>("stock", 7), Ok(7u32));
        assert!(from_db_i64::<u32>("stock", -1).is_err());
        assert!(from_db_i64::<u64>("price", -5).is_err());
    }
}
