//! SQLite catalog adapter backed by `sqlite_master` and the table pragmas.

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Row, SqlitePool};

use crate::error::ErdError;
use crate::schema::{
    ColumnDescriptor, ForeignKeyDescriptor, IndexDescriptor, TableDescriptor,
};

use super::SchemaCatalog;
use async_trait::async_trait;

pub struct SqliteCatalog {
    pool: SqlitePool,
}

impl SqliteCatalog {
    /// Connect to the database file named in the URL (e.g.
    /// `sqlite:database.sqlite`).
    pub async fn connect(url: &str) -> Result<Self, ErdError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(url)
            .await?;
        Ok(Self { pool })
    }

    /// Wrap an existing pool. Used by tests running against `sqlite::memory:`.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SchemaCatalog for SqliteCatalog {
    async fn list_tables(&self) -> Result<Vec<String>, ErdError> {
        let rows = sqlx::query(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' \
             ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut tables = Vec::with_capacity(rows.len());
        for row in rows {
            tables.push(row.try_get::<String, _>("name")?);
        }
        Ok(tables)
    }

    async fn describe_table(&self, table: &str) -> Result<TableDescriptor, ErdError> {
        let mut descriptor = TableDescriptor::new(table);

        // PRAGMA arguments cannot be bound; the table name comes from
        // sqlite_master, not user input.
        let rows = sqlx::query(&format!("PRAGMA table_info(\"{}\")", table))
            .fetch_all(&self.pool)
            .await?;

        let mut pk_columns: Vec<(i64, String)> = Vec::new();
        for row in rows {
            let name: String = row.try_get("name")?;
            let type_name: String = row.try_get("type")?;
            let notnull: i64 = row.try_get("notnull")?;
            let default: Option<String> = row.try_get("dflt_value")?;
            let pk: i64 = row.try_get("pk")?;

            if pk > 0 {
                pk_columns.push((pk, name.clone()));
            }

            descriptor.columns.push(ColumnDescriptor {
                name,
                type_name,
                nullable: notnull == 0,
                default,
                auto_increment: false,
            });
        }

        pk_columns.sort_by_key(|(pos, _)| *pos);
        descriptor.primary_key = pk_columns.into_iter().map(|(_, name)| name).collect();

        // A single-column INTEGER primary key is a rowid alias; that is the
        // shape migrations emit for auto-incrementing ids. SQLite exposes
        // no catalog flag for AUTOINCREMENT short of parsing the DDL.
        if descriptor.primary_key.len() == 1 {
            let pk_name = descriptor.primary_key[0].clone();
            if let Some(col) = descriptor.columns.iter_mut().find(|c| c.name == pk_name) {
                if col.type_name.eq_ignore_ascii_case("integer") {
                    col.auto_increment = true;
                }
            }
        }

        let index_rows = sqlx::query(&format!("PRAGMA index_list(\"{}\")", table))
            .fetch_all(&self.pool)
            .await?;

        for row in index_rows {
            let name: String = row.try_get("name")?;
            let unique: i64 = row.try_get("unique")?;
            let origin: String = row.try_get("origin")?;

            // The pk origin duplicates primary_key; skip it.
            if origin == "pk" {
                continue;
            }

            let column_rows = sqlx::query(&format!("PRAGMA index_info(\"{}\")", name))
                .fetch_all(&self.pool)
                .await?;

            let mut columns = Vec::with_capacity(column_rows.len());
            for col_row in column_rows {
                columns.push(col_row.try_get::<String, _>("name")?);
            }

            descriptor.indexes.push(IndexDescriptor {
                name,
                columns,
                unique: unique != 0,
            });
        }

        let fk_rows = sqlx::query(&format!("PRAGMA foreign_key_list(\"{}\")", table))
            .fetch_all(&self.pool)
            .await?;

        let mut current: Option<(i64, ForeignKeyDescriptor)> = None;
        for row in fk_rows {
            let id: i64 = row.try_get("id")?;
            let referenced_table: String = row.try_get("table")?;
            let column: String = row.try_get("from")?;
            // "to" is NULL when the FK targets the referenced table's
            // implicit primary key
            let referenced_column: String = row
                .try_get::<Option<String>, _>("to")?
                .unwrap_or_else(|| "id".to_string());

            match current.as_mut() {
                Some((fk_id, fk)) if *fk_id == id => {
                    fk.columns.push(column);
                    fk.referenced_columns.push(referenced_column);
                }
                _ => {
                    if let Some((_, fk)) = current.take() {
                        descriptor.foreign_keys.push(fk);
                    }
                    current = Some((
                        id,
                        ForeignKeyDescriptor {
                            columns: vec![column],
                            referenced_table,
                            referenced_columns: vec![referenced_column],
                        },
                    ));
                }
            }
        }
        if let Some((_, fk)) = current.take() {
            descriptor.foreign_keys.push(fk);
        }

        Ok(descriptor)
    }
}
