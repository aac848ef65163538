//! Normalized in-memory representation of a database schema.
//!
//! This module provides:
//! - Data models for tables, columns, indexes, and foreign keys
//! - The `SchemaSnapshot` root value produced by extraction
//! - `RelationshipEdge` records for collapsed many-to-many junctions
//! - Logical column type classification for diagram output

use ahash::AHashSet;

/// Logical column type tag used in diagram output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Int,
    String,
    Decimal,
    Boolean,
    DateTime,
    Date,
    Time,
}

impl ColumnKind {
    /// Classify a catalog-reported type identifier.
    ///
    /// Case-insensitive substring match, evaluated top to bottom, first
    /// match wins. Unrecognized types fall back to `String`. Covers MySQL,
    /// PostgreSQL, and SQLite type names.
    pub fn from_catalog_type(type_name: &str) -> Self {
        let lower = type_name.to_lowercase();
        let families: &[(&[&str], ColumnKind)] = &[
            (
                &[
                    "integer",
                    "bigint",
                    "smallint",
                    "tinyint",
                    "mediumint",
                    "serial",
                    "int",
                ],
                ColumnKind::Int,
            ),
            (&["varchar", "char", "text", "string"], ColumnKind::String),
            (
                &["decimal", "numeric", "float", "double", "real"],
                ColumnKind::Decimal,
            ),
            (&["boolean", "bool"], ColumnKind::Boolean),
            (&["datetime", "timestamp"], ColumnKind::DateTime),
            (&["date"], ColumnKind::Date),
            (&["time"], ColumnKind::Time),
        ];

        for (needles, kind) in families {
            if needles.iter().any(|n| lower.contains(n)) {
                return *kind;
            }
        }

        ColumnKind::String
    }

    /// Mermaid attribute type token.
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnKind::Int => "int",
            ColumnKind::String => "string",
            ColumnKind::Decimal => "decimal",
            ColumnKind::Boolean => "boolean",
            ColumnKind::DateTime => "datetime",
            ColumnKind::Date => "date",
            ColumnKind::Time => "time",
        }
    }
}

/// Column definition within a table.
#[derive(Debug, Clone)]
pub struct ColumnDescriptor {
    /// Column name, unique within its table
    pub name: String,
    /// Raw type identifier as reported by the catalog (e.g. `bigint unsigned`)
    pub type_name: String,
    /// Whether this column allows NULL values
    pub nullable: bool,
    /// Default value expression, if any
    pub default: Option<String>,
    /// Whether the column auto-increments
    pub auto_increment: bool,
}

/// Index definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDescriptor {
    /// Index name
    pub name: String,
    /// Columns in the index, in index order
    pub columns: Vec<String>,
    /// Whether this is a unique index
    pub unique: bool,
}

/// Foreign key constraint definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyDescriptor {
    /// Local column names forming the FK (composite keys supported)
    pub columns: Vec<String>,
    /// Referenced table name
    pub referenced_table: String,
    /// Referenced column names
    pub referenced_columns: Vec<String>,
}

/// One physical table.
#[derive(Debug, Clone)]
pub struct TableDescriptor {
    /// Table name
    pub name: String,
    /// Column definitions in catalog order (minus ignored columns)
    pub columns: Vec<ColumnDescriptor>,
    /// Primary key column names (empty if the table has no PK)
    pub primary_key: Vec<String>,
    /// Index definitions
    pub indexes: Vec<IndexDescriptor>,
    /// Foreign key constraints
    pub foreign_keys: Vec<ForeignKeyDescriptor>,
}

impl TableDescriptor {
    /// Create a new empty table descriptor.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            primary_key: Vec::new(),
            indexes: Vec::new(),
            foreign_keys: Vec::new(),
        }
    }

    /// Check if a column is part of the primary key.
    pub fn is_pk_column(&self, name: &str) -> bool {
        self.primary_key.iter().any(|c| c == name)
    }

    /// Check if any foreign key covers the given column.
    pub fn is_fk_column(&self, name: &str) -> bool {
        self.foreign_keys
            .iter()
            .any(|fk| fk.columns.iter().any(|c| c == name))
    }

    /// Check if any unique index covers the given column.
    pub fn in_unique_index(&self, name: &str) -> bool {
        self.indexes
            .iter()
            .any(|ix| ix.unique && ix.columns.iter().any(|c| c == name))
    }

    /// All column names covered by any foreign key.
    pub fn fk_column_names(&self) -> AHashSet<&str> {
        self.foreign_keys
            .iter()
            .flat_map(|fk| fk.columns.iter().map(String::as_str))
            .collect()
    }
}

/// A many-to-many relationship recorded when a junction table is collapsed.
///
/// Endpoints are sorted so `table_a <= table_b` lexicographically, making
/// the edge order-independent and the rendered output diffable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipEdge {
    pub table_a: String,
    pub table_b: String,
    /// Name of the eliminated junction table
    pub via: String,
}

impl RelationshipEdge {
    /// Build an edge from the two referenced table names, sorting the
    /// endpoints lexicographically.
    pub fn new(first: String, second: String, via: String) -> Self {
        let (table_a, table_b) = if first <= second {
            (first, second)
        } else {
            (second, first)
        };
        Self {
            table_a,
            table_b,
            via,
        }
    }
}

/// Complete database schema at extraction time.
///
/// Tables keep their discovery order (catalog enumeration minus ignored
/// names). `many_to_many` stays empty until the simplifier runs.
#[derive(Debug, Clone, Default)]
pub struct SchemaSnapshot {
    tables: Vec<TableDescriptor>,
    many_to_many: Vec<RelationshipEdge>,
}

impl SchemaSnapshot {
    /// Create a new empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a table, preserving discovery order.
    pub fn add_table(&mut self, table: TableDescriptor) {
        self.tables.push(table);
    }

    /// Get a table by name.
    pub fn get_table(&self, name: &str) -> Option<&TableDescriptor> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Check if a table is present.
    pub fn contains_table(&self, name: &str) -> bool {
        self.tables.iter().any(|t| t.name == name)
    }

    /// Remove a table by name, returning it if present.
    pub fn remove_table(&mut self, name: &str) -> Option<TableDescriptor> {
        let pos = self.tables.iter().position(|t| t.name == name)?;
        Some(self.tables.remove(pos))
    }

    /// Record a collapsed many-to-many relationship.
    pub fn add_edge(&mut self, edge: RelationshipEdge) {
        self.many_to_many.push(edge);
    }

    /// Iterate over tables in discovery order.
    pub fn tables(&self) -> impl Iterator<Item = &TableDescriptor> {
        self.tables.iter()
    }

    /// Many-to-many edges in collection order.
    pub fn edges(&self) -> &[RelationshipEdge] {
        &self.many_to_many
    }

    /// Number of tables in the snapshot.
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Check if the snapshot has no tables.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_kind_int_family() {
        assert_eq!(ColumnKind::from_catalog_type("bigint"), ColumnKind::Int);
        assert_eq!(
            ColumnKind::from_catalog_type("BIGINT UNSIGNED"),
            ColumnKind::Int
        );
        assert_eq!(ColumnKind::from_catalog_type("smallint"), ColumnKind::Int);
        assert_eq!(ColumnKind::from_catalog_type("int(11)"), ColumnKind::Int);
        assert_eq!(ColumnKind::from_catalog_type("serial"), ColumnKind::Int);
    }

    #[test]
    fn test_column_kind_string_family() {
        assert_eq!(
            ColumnKind::from_catalog_type("varchar(255)"),
            ColumnKind::String
        );
        assert_eq!(ColumnKind::from_catalog_type("TEXT"), ColumnKind::String);
        assert_eq!(
            ColumnKind::from_catalog_type("character varying"),
            ColumnKind::String
        );
    }

    #[test]
    fn test_column_kind_temporal_priority() {
        // "timestamp" and "datetime" must win over the bare "date"/"time"
        // families even though they contain both substrings.
        assert_eq!(
            ColumnKind::from_catalog_type("timestamp without time zone"),
            ColumnKind::DateTime
        );
        assert_eq!(
            ColumnKind::from_catalog_type("datetime"),
            ColumnKind::DateTime
        );
        assert_eq!(ColumnKind::from_catalog_type("date"), ColumnKind::Date);
        assert_eq!(ColumnKind::from_catalog_type("time"), ColumnKind::Time);
    }

    #[test]
    fn test_column_kind_fallback() {
        assert_eq!(ColumnKind::from_catalog_type("blob"), ColumnKind::String);
        assert_eq!(ColumnKind::from_catalog_type("uuid"), ColumnKind::String);
        assert_eq!(ColumnKind::from_catalog_type(""), ColumnKind::String);
    }

    #[test]
    fn test_snapshot_table_lookup() {
        let mut snapshot = SchemaSnapshot::new();
        snapshot.add_table(TableDescriptor::new("users"));
        snapshot.add_table(TableDescriptor::new("roles"));

        assert!(snapshot.contains_table("users"));
        assert!(snapshot.get_table("roles").is_some());
        assert!(!snapshot.contains_table("missing"));
        assert_eq!(snapshot.table_count(), 2);
    }

    #[test]
    fn test_snapshot_preserves_order() {
        let mut snapshot = SchemaSnapshot::new();
        for name in ["zebra", "apple", "mango"] {
            snapshot.add_table(TableDescriptor::new(name));
        }

        let order: Vec<_> = snapshot.tables().map(|t| t.name.as_str()).collect();
        assert_eq!(order, vec!["zebra", "apple", "mango"]);
    }

    #[test]
    fn test_snapshot_remove_table() {
        let mut snapshot = SchemaSnapshot::new();
        snapshot.add_table(TableDescriptor::new("role_user"));

        let removed = snapshot.remove_table("role_user");
        assert!(removed.is_some());
        assert!(snapshot.is_empty());
        assert!(snapshot.remove_table("role_user").is_none());
    }

    #[test]
    fn test_edge_endpoints_sorted() {
        let edge = RelationshipEdge::new(
            "users".to_string(),
            "roles".to_string(),
            "role_user".to_string(),
        );
        assert_eq!(edge.table_a, "roles");
        assert_eq!(edge.table_b, "users");

        let edge = RelationshipEdge::new(
            "roles".to_string(),
            "users".to_string(),
            "role_user".to_string(),
        );
        assert_eq!(edge.table_a, "roles");
        assert_eq!(edge.table_b, "users");
    }

    #[test]
    fn test_table_column_helpers() {
        let mut table = TableDescriptor::new("posts");
        table.primary_key = vec!["id".to_string()];
        table.foreign_keys.push(ForeignKeyDescriptor {
            columns: vec!["user_id".to_string()],
            referenced_table: "users".to_string(),
            referenced_columns: vec!["id".to_string()],
        });
        table.indexes.push(IndexDescriptor {
            name: "posts_slug_unique".to_string(),
            columns: vec!["slug".to_string()],
            unique: true,
        });

        assert!(table.is_pk_column("id"));
        assert!(!table.is_pk_column("user_id"));
        assert!(table.is_fk_column("user_id"));
        assert!(table.in_unique_index("slug"));
        assert!(!table.in_unique_index("user_id"));
        assert!(table.fk_column_names().contains("user_id"));
    }
}
