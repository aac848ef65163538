//! PostgreSQL catalog adapter backed by `information_schema` and
//! `pg_catalog` (for unique-index membership).

use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};

use crate::error::ErdError;
use crate::schema::{
    ColumnDescriptor, ForeignKeyDescriptor, IndexDescriptor, TableDescriptor,
};

use super::SchemaCatalog;
use async_trait::async_trait;

pub struct PostgresCatalog {
    pool: PgPool,
}

impl PostgresCatalog {
    /// Connect to the database named in the URL. Only the `public` schema
    /// is introspected.
    pub async fn connect(url: &str) -> Result<Self, ErdError> {
        let pool = PgPoolOptions::new().max_connections(5).connect(url).await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl SchemaCatalog for PostgresCatalog {
    async fn list_tables(&self) -> Result<Vec<String>, ErdError> {
        let rows = sqlx::query(
            "SELECT table_name \
             FROM information_schema.tables \
             WHERE table_schema = 'public' AND table_type = 'BASE TABLE' \
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
            "SELECT column_name, data_type, is_nullable, column_default, is_identity \
             FROM information_schema.columns \
             WHERE table_schema = 'public' AND table_name = $1 \
             ORDER BY ordinal_position",
        )
        .bind(table)
        .fetch_all(&self.pool)
        .await?;

        for row in rows {
            let default: Option<String> = row.try_get("column_default")?;
            let is_identity: String = row.try_get("is_identity")?;
            // serial columns carry a nextval() default instead of the
            // identity flag
            let auto_increment = is_identity == "YES"
                || default
                    .as_deref()
                    .map(|d| d.starts_with("nextval("))
                    .unwrap_or(false);

            descriptor.columns.push(ColumnDescriptor {
                name: row.try_get("column_name")?,
                type_name: row.try_get("data_type")?,
                nullable: row.try_get::<String, _>("is_nullable")? == "YES",
                default,
                auto_increment,
            });
        }

        let rows = sqlx::query(
            "SELECT kcu.column_name \
             FROM information_schema.table_constraints tc \
             JOIN information_schema.key_column_usage kcu \
               ON kcu.constraint_name = tc.constraint_name \
              AND kcu.table_schema = tc.table_schema \
             WHERE tc.table_schema = 'public' AND tc.table_name = $1 \
               AND tc.constraint_type = 'PRIMARY KEY' \
             ORDER BY kcu.ordinal_position",
        )
        .bind(table)
        .fetch_all(&self.pool)
        .await?;

        for row in rows {
            descriptor.primary_key.push(row.try_get("column_name")?);
        }

        let rows = sqlx::query(
            "SELECT ix.relname AS index_name, \
                    a.attname AS column_name, \
                    i.indisunique AS is_unique \
             FROM pg_index i \
             JOIN pg_class ix ON ix.oid = i.indexrelid \
             JOIN pg_class t ON t.oid = i.indrelid \
             JOIN pg_namespace n ON n.oid = t.relnamespace \
             CROSS JOIN LATERAL unnest(i.indkey) WITH ORDINALITY AS k(attnum, ord) \
             JOIN pg_attribute a ON a.attrelid = t.oid AND a.attnum = k.attnum \
             WHERE n.nspname = 'public' AND t.relname = $1 AND NOT i.indisprimary \
             ORDER BY ix.relname, k.ord",
        )
        .bind(table)
        .fetch_all(&self.pool)
        .await?;

        for row in rows {
            let index_name: String = row.try_get("index_name")?;
            let column_name: String = row.try_get("column_name")?;
            let unique: bool = row.try_get("is_unique")?;

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
            "SELECT tc.constraint_name, \
                    kcu.column_name, \
                    ccu.table_name AS referenced_table, \
                    ccu.column_name AS referenced_column \
             FROM information_schema.table_constraints tc \
             JOIN information_schema.key_column_usage kcu \
               ON kcu.constraint_name = tc.constraint_name \
              AND kcu.table_schema = tc.table_schema \
             JOIN information_schema.constraint_column_usage ccu \
               ON ccu.constraint_name = tc.constraint_name \
              AND ccu.table_schema = tc.table_schema \
             WHERE tc.table_schema = 'public' AND tc.table_name = $1 \
               AND tc.constraint_type = 'FOREIGN KEY' \
             ORDER BY tc.constraint_name, kcu.ordinal_position",
        )
        .bind(table)
        .fetch_all(&self.pool)
        .await?;

        let mut current: Option<(String, ForeignKeyDescriptor)> = None;
        for row in rows {
            let constraint: String = row.try_get("constraint_name")?;
            let column: String = row.try_get("column_name")?;
            let referenced_table: String = row.try_get("referenced_table")?;
            let referenced_column: String = row.try_get("referenced_column")?;

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
