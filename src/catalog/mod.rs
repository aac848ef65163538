//! Database catalog access.
//!
//! Schema introspection differs per engine, so it sits behind a single
//! `SchemaCatalog` trait with one adapter per supported database. The rest
//! of the pipeline is engine-agnostic.

mod mysql;
mod postgres;
mod sqlite;

pub use mysql::MySqlCatalog;
pub use postgres::PostgresCatalog;
pub use sqlite::SqliteCatalog;

use crate::error::ErdError;
use crate::schema::TableDescriptor;
use async_trait::async_trait;

/// Read-only access to a database engine's metadata store.
#[async_trait]
pub trait SchemaCatalog: Send + Sync {
    /// Enumerate base table names, sorted for reproducible output.
    async fn list_tables(&self) -> Result<Vec<String>, ErdError>;

    /// Introspect one table: columns, primary key, indexes, foreign keys.
    ///
    /// The primary key is reported only via `primary_key`; it is not
    /// duplicated into `indexes`.
    async fn describe_table(&self, table: &str) -> Result<TableDescriptor, ErdError>;
}

/// Connect to the database named by `url` and return the matching catalog
/// adapter. The engine is selected from the URL scheme.
pub async fn connect(url: &str) -> Result<Box<dyn SchemaCatalog>, ErdError> {
    if url.starts_with("mysql://") {
        Ok(Box::new(MySqlCatalog::connect(url).await?))
    } else if url.starts_with("postgres://") || url.starts_with("postgresql://") {
        Ok(Box::new(PostgresCatalog::connect(url).await?))
    } else if url.starts_with("sqlite:") {
        Ok(Box::new(SqliteCatalog::connect(url).await?))
    } else {
        Err(ErdError::Config(format!(
            "unsupported database url: {} (expected mysql://, postgres:// or sqlite:)",
            url
        )))
    }
}
