//! Junction table simplification.
//!
//! Collapses pure many-to-many junction tables into direct relationship
//! edges. A table qualifies when it has exactly two foreign keys and every
//! column outside those keys is an incidental system column. Anything
//! richer (a `weight`, an `extra_data`) stays a full entity, since a plain
//! relationship line cannot express it.

use crate::schema::{RelationshipEdge, SchemaSnapshot, TableDescriptor};

/// Columns that do not disqualify a junction table.
const SYSTEM_COLUMNS: [&str; 4] = ["id", "created_at", "updated_at", "deleted_at"];

/// Collapse pure junction tables into `RelationshipEdge`s.
///
/// Single pass in snapshot order, each table judged independently; no
/// transitive detection. Tables with 0, 1, or 3+ foreign keys are never
/// candidates, so ternary junctions survive as entities. If both foreign
/// keys reference the same table the edge still forms with
/// `table_a == table_b`. Edges whose endpoints were already removed at
/// extraction time are recorded anyway; the renderer suppresses them.
pub fn simplify_schema(mut snapshot: SchemaSnapshot) -> SchemaSnapshot {
    let junctions: Vec<String> = snapshot
        .tables()
        .filter(|table| is_junction_table(table))
        .map(|table| table.name.clone())
        .collect();

    for name in junctions {
        if let Some(table) = snapshot.remove_table(&name) {
            snapshot.add_edge(RelationshipEdge::new(
                table.foreign_keys[0].referenced_table.clone(),
                table.foreign_keys[1].referenced_table.clone(),
                table.name,
            ));
        }
    }

    snapshot
}

fn is_junction_table(table: &TableDescriptor) -> bool {
    if table.foreign_keys.len() != 2 {
        return false;
    }

    let fk_columns = table.fk_column_names();

    table
        .columns
        .iter()
        .filter(|col| !fk_columns.contains(col.name.as_str()))
        .all(|col| SYSTEM_COLUMNS.contains(&col.name.as_str()))
}
