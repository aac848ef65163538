//! Configuration resolution for the generate command.
//!
//! Every tunable follows the same precedence chain: explicit CLI option >
//! config file value > built-in default. The config file is YAML,
//! discovered as `erd.yaml`/`erd.yml` in the working directory unless a
//! path is given explicitly.

use ahash::AHashSet;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::ErdError;

/// Default output path for the generated diagram.
pub const DEFAULT_OUTPUT_PATH: &str = "docs/database-erd.md";

/// Default font size for the init directive.
pub const DEFAULT_FONT_SIZE: &str = "24px";

/// Framework/system tables excluded by default.
pub const DEFAULT_IGNORED_TABLES: [&str; 8] = [
    "audit_logs",
    "media",
    "migrations",
    "password_resets",
    "permissions",
    "personal_access_tokens",
    "roles",
    "users",
];

/// Timestamp columns excluded by default.
pub const DEFAULT_IGNORED_COLUMNS: [&str; 2] = ["created_at", "updated_at"];

/// Config file names probed in the working directory.
const DISCOVERY_NAMES: [&str; 2] = ["erd.yaml", "erd.yml"];

/// Values read from the YAML config file. Every field is optional; absent
/// fields fall through to the built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Database connection URL
    pub database: Option<String>,
    /// Destination path for the rendered diagram
    pub output: Option<PathBuf>,
    /// Collapse junction tables into many-to-many edges
    pub simplify_relationships: Option<bool>,
    /// Font size for the init directive; empty string disables it
    pub font_size: Option<String>,
    /// Replaces the built-in ignored table list when present
    pub ignored_tables: Option<Vec<String>>,
    /// Replaces the built-in ignored column list when present
    pub ignored_columns: Option<Vec<String>>,
}

impl FileConfig {
    /// Load and parse a YAML config file.
    pub fn load(path: &Path) -> Result<Self, ErdError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ErdError::Config(format!("cannot read config file {}: {}", path.display(), e))
        })?;
        serde_yaml_ng::from_str(&contents).map_err(|e| {
            ErdError::Config(format!("invalid config file {}: {}", path.display(), e))
        })
    }

    /// Resolve the config file: an explicit path must exist; otherwise the
    /// working directory is probed for `erd.yaml`/`erd.yml`, and absence
    /// means defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ErdError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        for name in DISCOVERY_NAMES {
            let candidate = Path::new(name);
            if candidate.exists() {
                return Self::load(candidate);
            }
        }

        Ok(Self::default())
    }
}

/// Apply the precedence chain for a single tunable.
pub fn resolve<T>(explicit: Option<T>, configured: Option<T>, default: T) -> T {
    explicit.or(configured).unwrap_or(default)
}

/// Fully resolved settings for one generation run.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Database connection URL
    pub database: String,
    /// Destination file path
    pub output: PathBuf,
    /// Whether to collapse junction tables
    pub simplify: bool,
    /// Font size for the init directive, `None` to omit it
    pub font_size: Option<String>,
    /// Table names to skip during extraction
    pub ignored_tables: AHashSet<String>,
    /// Column names to drop from every table
    pub ignored_columns: AHashSet<String>,
}

impl Settings {
    /// Combine CLI options, file config, environment, and defaults.
    ///
    /// The ignore lists merge: the config value replaces the built-in base
    /// when present, and CLI occurrences always append. The
    /// `raw_relationships` flag force-disables simplification regardless
    /// of config.
    pub fn resolve(
        database: Option<String>,
        output: Option<PathBuf>,
        raw_relationships: bool,
        ignore: Vec<String>,
        ignore_column: Vec<String>,
        font_size: Option<String>,
        file: &FileConfig,
    ) -> Result<Self, ErdError> {
        let database = database
            .or_else(|| file.database.clone())
            .or_else(|| std::env::var("DATABASE_URL").ok())
            .ok_or_else(|| {
                ErdError::Config(
                    "no database connection configured (use --database, the config file, \
                     or DATABASE_URL)"
                        .to_string(),
                )
            })?;

        let output = resolve(
            output,
            file.output.clone(),
            PathBuf::from(DEFAULT_OUTPUT_PATH),
        );

        let simplify = if raw_relationships {
            false
        } else {
            file.simplify_relationships.unwrap_or(true)
        };

        let font_size = resolve(
            font_size,
            file.font_size.clone(),
            DEFAULT_FONT_SIZE.to_string(),
        );
        let font_size = if font_size.is_empty() {
            None
        } else {
            Some(font_size)
        };

        Ok(Self {
            database,
            output,
            simplify,
            font_size,
            ignored_tables: merge_ignores(&file.ignored_tables, &DEFAULT_IGNORED_TABLES, ignore),
            ignored_columns: merge_ignores(
                &file.ignored_columns,
                &DEFAULT_IGNORED_COLUMNS,
                ignore_column,
            ),
        })
    }
}

fn merge_ignores(
    configured: &Option<Vec<String>>,
    defaults: &[&str],
    additions: Vec<String>,
) -> AHashSet<String> {
    let mut set: AHashSet<String> = match configured {
        Some(base) => base.iter().cloned().collect(),
        None => defaults.iter().map(|s| s.to_string()).collect(),
    };
    set.extend(additions);
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve_settings(
        database: Option<&str>,
        raw: bool,
        ignore: Vec<String>,
        font_size: Option<&str>,
        file: &FileConfig,
    ) -> Settings {
        Settings::resolve(
            database.map(String::from).or(Some("sqlite:test.db".into())),
            None,
            raw,
            ignore,
            Vec::new(),
            font_size.map(String::from),
            file,
        )
        .unwrap()
    }

    #[test]
    fn test_resolve_precedence() {
        assert_eq!(resolve(Some(1), Some(2), 3), 1);
        assert_eq!(resolve(None, Some(2), 3), 2);
        assert_eq!(resolve::<i32>(None, None, 3), 3);
    }

    #[test]
    fn test_defaults_apply() {
        let settings = resolve_settings(None, false, Vec::new(), None, &FileConfig::default());

        assert_eq!(settings.output, PathBuf::from(DEFAULT_OUTPUT_PATH));
        assert!(settings.simplify);
        assert_eq!(settings.font_size.as_deref(), Some("24px"));
        assert!(settings.ignored_tables.contains("migrations"));
        assert!(settings.ignored_columns.contains("created_at"));
    }

    #[test]
    fn test_raw_flag_forces_no_simplify() {
        let file = FileConfig {
            simplify_relationships: Some(true),
            ..Default::default()
        };
        let settings = resolve_settings(None, true, Vec::new(), None, &file);
        assert!(!settings.simplify);
    }

    #[test]
    fn test_config_simplify_respected_without_flag() {
        let file = FileConfig {
            simplify_relationships: Some(false),
            ..Default::default()
        };
        let settings = resolve_settings(None, false, Vec::new(), None, &file);
        assert!(!settings.simplify);
    }

    #[test]
    fn test_config_ignores_replace_base_cli_appends() {
        let file = FileConfig {
            ignored_tables: Some(vec!["jobs".to_string()]),
            ..Default::default()
        };
        let settings =
            resolve_settings(None, false, vec!["cache".to_string()], None, &file);

        assert!(settings.ignored_tables.contains("jobs"));
        assert!(settings.ignored_tables.contains("cache"));
        // config base replaces the built-in list
        assert!(!settings.ignored_tables.contains("migrations"));
    }

    #[test]
    fn test_empty_font_size_disables_directive() {
        let settings = resolve_settings(None, false, Vec::new(), Some(""), &FileConfig::default());
        assert!(settings.font_size.is_none());
    }

    #[test]
    fn test_missing_database_is_config_error() {
        // Only runs meaningfully when DATABASE_URL is unset in the
        // environment
        if std::env::var("DATABASE_URL").is_ok() {
            return;
        }
        let err = Settings::resolve(
            None,
            None,
            false,
            Vec::new(),
            Vec::new(),
            None,
            &FileConfig::default(),
        )
        .err()
        .unwrap();
        assert!(matches!(err, ErdError::Config(_)));
    }

    #[test]
    fn test_yaml_parse() {
        let yaml = "\
database: sqlite:app.db
output: docs/schema.md
simplify_relationships: false
font_size: 20px
ignored_tables:
  - migrations
ignored_columns: []
";
        let file: FileConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(file.database.as_deref(), Some("sqlite:app.db"));
        assert_eq!(file.simplify_relationships, Some(false));
        assert_eq!(file.font_size.as_deref(), Some("20px"));
        assert_eq!(file.ignored_tables.as_deref(), Some(&["migrations".to_string()][..]));
        assert_eq!(file.ignored_columns.as_deref(), Some(&[][..]));
    }
}
