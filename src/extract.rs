//! Schema extraction: drives a catalog adapter and produces a
//! `SchemaSnapshot` with ignore filters applied.

use ahash::AHashSet;
use indicatif::{ProgressBar, ProgressStyle};

use crate::catalog::SchemaCatalog;
use crate::error::ErdError;
use crate::schema::SchemaSnapshot;

/// Filters applied during extraction.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Table names to skip entirely
    pub ignored_tables: AHashSet<String>,
    /// Column names to drop from every table
    pub ignored_columns: AHashSet<String>,
    /// Show a per-table progress bar on stderr
    pub progress: bool,
}

/// Introspect every non-ignored table and build a raw snapshot.
///
/// Ignored columns are removed from the column list only; primary key,
/// index, and foreign key records are left untouched. Foreign keys that
/// point at ignored tables are still recorded, the renderer suppresses
/// those edges.
pub async fn extract_schema(
    catalog: &dyn SchemaCatalog,
    options: &ExtractOptions,
) -> Result<SchemaSnapshot, ErdError> {
    let names = catalog.list_tables().await?;

    let bar = if options.progress {
        let bar = ProgressBar::new(names.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Some(bar)
    } else {
        None
    };

    let mut snapshot = SchemaSnapshot::new();

    for name in names {
        if let Some(ref bar) = bar {
            bar.set_message(name.clone());
            bar.inc(1);
        }

        if options.ignored_tables.contains(&name) {
            continue;
        }

        let mut table = catalog.describe_table(&name).await?;
        table
            .columns
            .retain(|col| !options.ignored_columns.contains(&col.name));

        snapshot.add_table(table);
    }

    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    Ok(snapshot)
}
