//! MySQL catalog adapter backed by `information_schema`.

use sqlx::mysql::MySqlPoolOptions;
use sqlx::{MySqlPool, Row};

use crate::error::ErdError;
use crate::schema::{
    ColumnDescriptor, ForeignKeyDescriptor, IndexDescriptor, TableDescriptor,
};

use super::SchemaCatalog;
use async_trait::async_trait;

pub struct MySqlCatalog {
    pool: MySqlPool,
}

impl MySqlCatalog {
    /// Connect to the schema named in the URL (e.g. `mysql://user@host/db`).
    pub async fn connect(url: &str) -> Result<Self, ErdError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl SchemaCatalog for MySqlCatalog {
    async fn list_tables(&self) -> Result<Vec<String>, ErdError> {
        // Aliases keep result column names lowercase across server versions.
        let rows = sqlx::query(
            "SELECT table_name AS table_name \
             FROM information_schema.tables \
             WHERE table_schema = DATABASE() AND table_type = 'BASE TABLE' \
             ORDER BY table_name",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut tables = Vec::with_capacity(rows.len());
        for row in rows {
            tables.push(row.try_get::<String, _>("table_name")?);
        }
        Ok(tables)
    }

    async fn describe_table(&self, table: &str) -> Result<TableDescriptor, ErdError> {
        let mut descriptor = TableDescriptor::new(table);

        let rows = sqlx::query(
            "SELECT column_name AS column_name, \
                    column_type AS column_type, \
                    is_nullable AS is_nullable, \
                    column_default AS column_default, \
                    extra AS extra \
             FROM information_schema.columns \
             WHERE table_schema = DATABASE() AND table_name = ? \
             ORDER BY ordinal_position",
        )
        .bind(table)
        .fetch_all(&self.pool)
        .await?;

        for row in rows {
            let extra: String = row.try_get("extra")?;
            descriptor.columns.push(ColumnDescriptor {
                name: row.try_get("column_name")?,
                type_name: row.try_get("column_type")?,
                nullable: row.try_get::<String, _>("is_nullable")? == "YES",
                default: row.try_get("column_default")?,
                auto_increment: extra.to_lowercase().contains("auto_increment"),
            });
        }

        let rows = sqlx::query(
            "SELECT index_name AS index_name, \
                    column_name AS column_name, \
                    CAST(non_unique AS SIGNED) AS non_unique \
             FROM information_schema.statistics \
             WHERE table_schema = DATABASE() AND table_name = ? \
             ORDER BY index_name, seq_in_index",
        )
        .bind(table)
        .fetch_all(&self.pool)
        .await?;

        for row in rows {
            let index_name: String = row.try_get("index_name")?;
            let column_name: String = row.try_get("column_name")?;
            let unique = row.try_get::<i64, _>("non_unique")? == 0;

            if index_name == "PRIMARY" {
                descriptor.primary_key.push(column_name);
                continue;
            }

            match descriptor.indexes.iter_mut().find(|ix| ix.name == index_name) {
                Some(ix) => ix.columns.push(column_name),
                None => descriptor.indexes.push(IndexDescriptor {
                    name: index_name,
                    columns: vec![column_name],
                    unique,
                }),
            }
        }

        let rows = sqlx::query(
            "SELECT constraint_name AS constraint_name, \
                    column_name AS column_name, \
                    referenced_table_name AS referenced_table_name, \
                    referenced_column_name AS referenced_column_name \
             FROM information_schema.key_column_usage \
             WHERE table_schema = DATABASE() AND table_name = ? \
               AND referenced_table_name IS NOT NULL \
             ORDER BY constraint_name, ordinal_position",
        )
        .bind(table)
        .fetch_all(&self.pool)
        .await?;

        let mut current: Option<(String, ForeignKeyDescriptor)> = None;
        for row in rows {
            let constraint: String = row.try_get("constraint_name")?;
            let column: String = row.try_get("column_name")?;
            let referenced_table: String = row.try_get("referenced_table_name")?;
            let referenced_column: String = row.try_get("referenced_column_name")?;

            match current.as_mut() {
                Some((name, fk)) if *name == constraint => {
                    fk.columns.push(column);
                    fk.referenced_columns.push(referenced_column);
                }
                _ => {
                    if let Some((_, fk)) = current.take() {
                        descriptor.foreign_keys.push(fk);
                    }
                    current = Some((
                        constraint,
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
