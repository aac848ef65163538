//! Generate command implementation: the full extraction → simplification →
//! rendering pipeline plus file output.

use anyhow::Result;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::catalog;
use crate::compare::{compare, ChangeReport};
use crate::config::{FileConfig, Settings};
use crate::error::ErdError;
use crate::extract::{extract_schema, ExtractOptions};
use crate::render::to_mermaid;
use crate::simplify::simplify_schema;

/// Run the generate command.
#[allow(clippy::too_many_arguments)]
pub fn run(
    database: Option<String>,
    output: Option<PathBuf>,
    compare_existing: bool,
    raw_relationships: bool,
    ignore: Vec<String>,
    ignore_column: Vec<String>,
    font_size: Option<String>,
    config: Option<PathBuf>,
    progress: bool,
) -> Result<()> {
    let file_config = FileConfig::discover(config.as_deref())?;
    let settings = Settings::resolve(
        database,
        output,
        raw_relationships,
        ignore,
        ignore_column,
        font_size,
        &file_config,
    )?;

    eprintln!("Generating ERD from database schema...");

    let options = ExtractOptions {
        ignored_tables: settings.ignored_tables.clone(),
        ignored_columns: settings.ignored_columns.clone(),
        progress,
    };

    // The catalog seam is async (sqlx); everything downstream is
    // synchronous and in-memory.
    let runtime = tokio::runtime::Runtime::new()?;
    let snapshot = runtime.block_on(async {
        let catalog = catalog::connect(&settings.database).await?;
        extract_schema(catalog.as_ref(), &options).await
    })?;

    if snapshot.is_empty() {
        return Err(ErdError::EmptySchema.into());
    }

    let snapshot = if settings.simplify {
        simplify_schema(snapshot)
    } else {
        snapshot
    };

    let diagram = to_mermaid(&snapshot, settings.font_size.as_deref());

    ensure_output_directory(&settings.output)?;

    if compare_existing && settings.output.exists() {
        let existing = std::fs::read_to_string(&settings.output).map_err(ErdError::Io)?;
        match compare(&existing, &diagram) {
            ChangeReport::Unchanged => {
                eprintln!("No changes detected in database schema.");
            }
            ChangeReport::Changed => {
                eprintln!("Database schema changes detected!");
                eprintln!("Review the changes in the generated file.");
            }
        }
    }

    write_atomically(&settings.output, &diagram)?;

    eprintln!("ERD generated successfully: {}", settings.output.display());
    eprintln!("Tables processed: {}", snapshot.table_count());

    Ok(())
}

fn ensure_output_directory(output: &Path) -> Result<(), ErdError> {
    if let Some(directory) = output.parent() {
        if !directory.as_os_str().is_empty() && !directory.exists() {
            std::fs::create_dir_all(directory)?;
            eprintln!("Created directory: {}", directory.display());
        }
    }
    Ok(())
}

/// Write via a temp file in the destination directory followed by a
/// rename, so an interrupted run never leaves a partial diagram behind.
fn write_atomically(output: &Path, contents: &str) -> Result<(), ErdError> {
    let directory = match output.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(directory)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.persist(output).map_err(|e| ErdError::Io(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_atomically_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("erd.md");

        write_atomically(&path, "first").unwrap();
        write_atomically(&path, "second").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn test_ensure_output_directory_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docs/nested/erd.md");

        ensure_output_directory(&path).unwrap();

        assert!(path.parent().unwrap().is_dir());
    }
}
