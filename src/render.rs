//! Mermaid erDiagram rendering.
//!
//! Serializes a `SchemaSnapshot` into a fenced Mermaid block. Output order
//! is fixed for diffability: init directive, diagram header, entity blocks
//! in snapshot order, one-to-many foreign key lines, many-to-many edge
//! lines. Relationship lines pointing at tables that are no longer in the
//! snapshot (ignored or collapsed) are dropped, never an error.

use crate::schema::{ColumnDescriptor, ColumnKind, SchemaSnapshot, TableDescriptor};

/// Render a snapshot as a fenced Mermaid erDiagram.
///
/// `font_size` emits the theme init directive when present (e.g. `24px`).
pub fn to_mermaid(snapshot: &SchemaSnapshot, font_size: Option<&str>) -> String {
    let mut output = String::new();

    output.push_str("```mermaid\n");

    if let Some(size) = font_size {
        // theme: base is required for themeVariables to reach relationship
        // labels, not just entity boxes
        output.push_str(&format!(
            "%%{{init: {{'theme': 'base', 'themeVariables': {{ 'fontSize': '{}'}}}}}}%%\n",
            size
        ));
    }

    output.push_str("erDiagram\n");

    for table in snapshot.tables() {
        output.push_str(&format!("    {}[\"**{}**\"] {{\n", table.name, table.name));

        for column in &table.columns {
            let kind = ColumnKind::from_catalog_type(&column.type_name);
            output.push_str(&format!(
                "        {} {}{}\n",
                kind.as_str(),
                column.name,
                constraint_annotation(column, table)
            ));
        }

        output.push_str("    }\n\n");
    }

    for table in snapshot.tables() {
        for fk in &table.foreign_keys {
            // Skip edges to tables removed by ignore filters or
            // simplification
            if snapshot.contains_table(&fk.referenced_table) {
                output.push_str(&format!(
                    "    {} ||--o{{ {} : \"has\"\n",
                    fk.referenced_table, table.name
                ));
            }
        }
    }

    for edge in snapshot.edges() {
        if snapshot.contains_table(&edge.table_a) && snapshot.contains_table(&edge.table_b) {
            output.push_str(&format!(
                "    {} }}o--o{{ {} : \"{}\"\n",
                edge.table_a, edge.table_b, edge.via
            ));
        }
    }

    output.push_str("```\n");

    output
}

/// Build the quoted constraint annotation for a column, or an empty string
/// when no constraint applies. Order is fixed: PK, AUTO_INCREMENT,
/// NOT_NULL, FK, UK.
fn constraint_annotation(column: &ColumnDescriptor, table: &TableDescriptor) -> String {
    let mut constraints = Vec::new();

    if table.is_pk_column(&column.name) {
        constraints.push("PK");
    }
    if column.auto_increment {
        constraints.push("AUTO_INCREMENT");
    }
    if !column.nullable {
        constraints.push("NOT_NULL");
    }
    if table.is_fk_column(&column.name) {
        constraints.push("FK");
    }
    if table.in_unique_index(&column.name) {
        constraints.push("UK");
    }

    if constraints.is_empty() {
        String::new()
    } else {
        format!(" \"{}\"", constraints.join(", "))
    }
}
