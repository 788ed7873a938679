//! Project configuration
//!
//! Detects the dialect and file locations of the target project once per
//! invocation. Sources, highest priority first:
//!
//! 1. an explicit override ([`ProjectConfig::with_dialect`])
//! 2. `scaffy.toml` at the project root
//! 3. `drizzle.config.{ts,js,mjs}` (`dialect:` and `schema:` keys)
//! 4. database driver dependencies in `package.json`
//! 5. sqlite
//!
//! There is no process-wide cache: the value returned by
//! [`ProjectConfig::load`] is passed down explicitly.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::dialect::Dialect;
use crate::error::ConfigError;

pub const CONFIG_FILE: &str = "scaffy.toml";
pub const DRIZZLE_CONFIG_FILES: [&str; 3] =
    ["drizzle.config.ts", "drizzle.config.js", "drizzle.config.mjs"];
pub const DEFAULT_SCHEMA_PATH: &str = "src/db/schema.ts";
pub const DEFAULT_DB_MODULE: &str = "@/db";
pub const DEFAULT_SCHEMA_MODULE: &str = "@/db/schema";

static DRIZZLE_DIALECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\bdialect\s*:\s*["'`]([A-Za-z0-9_-]+)["'`]"#).unwrap());
static DRIZZLE_DRIVER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\bdriver\s*:\s*["'`]([A-Za-z0-9_-]+)["'`]"#).unwrap());
static DRIZZLE_SCHEMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\bschema\s*:\s*["'`]([^"'`]+)["'`]"#).unwrap());

// ── scaffy.toml ──────────────────────────────────────────────────────────────

/// Contents of `scaffy.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScaffyToml {
    pub dialect: Option<String>,
    pub schema: Option<PathBuf>,
    pub app_dir: Option<PathBuf>,
    pub db_module: Option<String>,
    pub schema_module: Option<String>,
}

impl ScaffyToml {
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }
}

// ── Drizzle config ───────────────────────────────────────────────────────────

/// The keys read out of a `drizzle.config.*` file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrizzleConfig {
    pub dialect: Option<Dialect>,
    pub schema: Option<PathBuf>,
}

impl DrizzleConfig {
    /// Scan the source text of a drizzle config file.
    ///
    /// Unrecognised dialect values are ignored so detection can fall
    /// through to `package.json`.
    pub fn scan(source: &str) -> Self {
        let dialect = DRIZZLE_DIALECT
            .captures(source)
            .and_then(|c| c.get(1))
            .and_then(|m| match m.as_str().parse::<Dialect>() {
                Ok(d) => Some(d),
                Err(e) => {
                    warn!("ignoring drizzle config dialect: {}", e);
                    None
                }
            })
            .or_else(|| {
                DRIZZLE_DRIVER
                    .captures(source)
                    .and_then(|c| c.get(1))
                    .and_then(|m| dialect_for_driver(m.as_str()))
            });

        // globs and directories cannot be edited as a single file
        let schema = DRIZZLE_SCHEMA
            .captures(source)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim_start_matches("./"))
            .filter(|s| !s.contains('*') && (s.ends_with(".ts") || s.ends_with(".js")))
            .map(PathBuf::from);

        Self { dialect, schema }
    }
}

fn dialect_for_driver(driver: &str) -> Option<Dialect> {
    match driver {
        "pg" | "postgres" | "postgres-js" | "neon-http" | "pglite" => Some(Dialect::Postgres),
        "mysql2" | "planetscale" => Some(Dialect::Mysql),
        "better-sqlite" | "better-sqlite3" | "libsql" | "turso" | "d1" | "d1-http" => {
            Some(Dialect::Sqlite)
        }
        _ => None,
    }
}

// ── package.json ─────────────────────────────────────────────────────────────

/// Infer the dialect from the database driver a `package.json` depends on.
pub fn dialect_from_package_json(source: &str) -> Result<Option<Dialect>, serde_json::Error> {
    let json: serde_json::Value = serde_json::from_str(source)?;

    let has = |name: &str| {
        ["dependencies", "devDependencies"]
            .iter()
            .filter_map(|section| json.get(section).and_then(|s| s.as_object()))
            .any(|deps| deps.contains_key(name))
    };

    let dialect = if ["pg", "postgres", "@neondatabase/serverless", "@vercel/postgres"]
        .iter()
        .any(|d| has(*d))
    {
        Some(Dialect::Postgres)
    } else if ["mysql2", "@planetscale/database"].iter().any(|d| has(*d)) {
        Some(Dialect::Mysql)
    } else if ["better-sqlite3", "@libsql/client"].iter().any(|d| has(*d)) {
        Some(Dialect::Sqlite)
    } else {
        None
    };
    Ok(dialect)
}

// ── Project config ───────────────────────────────────────────────────────────

/// Where the dialect came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DialectSource {
    Override,
    ScaffyToml,
    DrizzleConfig,
    PackageJson,
    Default,
}

impl std::fmt::Display for DialectSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DialectSource::Override => "--dialect",
            DialectSource::ScaffyToml => CONFIG_FILE,
            DialectSource::DrizzleConfig => "drizzle config",
            DialectSource::PackageJson => "package.json",
            DialectSource::Default => "default",
        };
        f.write_str(s)
    }
}

/// Resolved settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectConfig {
    pub root: PathBuf,
    pub dialect: Dialect,
    pub dialect_source: DialectSource,
    /// Schema file, relative to `root`.
    pub schema_path: PathBuf,
    /// Route directory for scaffolded pages, relative to `root`.
    pub app_dir: PathBuf,
    /// Import specifier of the database client.
    pub db_module: String,
    /// Import specifier of the schema module.
    pub schema_module: String,
}

impl ProjectConfig {
    /// Defaults for `root` without reading anything.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            dialect: Dialect::default(),
            dialect_source: DialectSource::Default,
            schema_path: PathBuf::from(DEFAULT_SCHEMA_PATH),
            app_dir: PathBuf::from("app"),
            db_module: DEFAULT_DB_MODULE.to_string(),
            schema_module: DEFAULT_SCHEMA_MODULE.to_string(),
        }
    }

    /// Detect configuration for the project at `root`.
    pub fn load(root: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(ConfigError::MissingRoot(root.to_path_buf()));
        }
        let mut config = Self::new(root);
        if root.join("src").join("app").is_dir() {
            config.app_dir = PathBuf::from("src/app");
        }

        let scaffy = read_optional(&root.join(CONFIG_FILE))?
            .map(|(path, text)| {
                ScaffyToml::from_toml(&text).map_err(|source| ConfigError::Toml { path, source })
            })
            .transpose()?
            .unwrap_or_default();

        if let Some(d) = &scaffy.dialect {
            config.dialect = d.parse()?;
            config.dialect_source = DialectSource::ScaffyToml;
        }

        let mut drizzle = DrizzleConfig::default();
        for name in DRIZZLE_CONFIG_FILES {
            if let Some((path, text)) = read_optional(&root.join(name))? {
                debug!(path = %path.display(), "reading drizzle config");
                drizzle = DrizzleConfig::scan(&text);
                break;
            }
        }

        if config.dialect_source == DialectSource::Default {
            if let Some(d) = drizzle.dialect {
                config.dialect = d;
                config.dialect_source = DialectSource::DrizzleConfig;
            } else if let Some((path, text)) = read_optional(&root.join("package.json"))? {
                let detected = dialect_from_package_json(&text)
                    .map_err(|source| ConfigError::Json { path, source })?;
                if let Some(d) = detected {
                    config.dialect = d;
                    config.dialect_source = DialectSource::PackageJson;
                }
            }
        }

        if let Some(schema) = scaffy.schema.or(drizzle.schema) {
            config.schema_path = schema;
        }
        if let Some(app_dir) = scaffy.app_dir {
            config.app_dir = app_dir;
        }
        if let Some(m) = scaffy.db_module {
            config.db_module = m;
        }
        if let Some(m) = scaffy.schema_module {
            config.schema_module = m;
        }

        debug!(
            dialect = %config.dialect,
            source = %config.dialect_source,
            schema = %config.schema_path.display(),
            "project config resolved"
        );
        Ok(config)
    }

    /// Force the dialect, e.g. from a command-line flag.
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self.dialect_source = DialectSource::Override;
        self
    }

    /// Absolute path of the schema file.
    pub fn schema_file(&self) -> PathBuf {
        self.root.join(&self.schema_path)
    }

    /// Absolute route directory.
    pub fn app_path(&self) -> PathBuf {
        self.root.join(&self.app_dir)
    }
}

fn read_optional(path: &Path) -> Result<Option<(PathBuf, String)>, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some((path.to_path_buf(), text))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ConfigError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scans_drizzle_config() {
        let src = r#"
import { defineConfig } from "drizzle-kit";

export default defineConfig({
  schema: "./src/server/db/schema.ts",
  out: "./drizzle",
  dialect: "postgresql",
});
"#;
        let cfg = DrizzleConfig::scan(src);
        assert_eq!(cfg.dialect, Some(Dialect::Postgres));
        assert_eq!(cfg.schema, Some(PathBuf::from("src/server/db/schema.ts")));
    }

    #[test]
    fn legacy_driver_key() {
        let cfg = DrizzleConfig::scan("export default { driver: 'mysql2', schema: './db/*.ts' }");
        assert_eq!(cfg.dialect, Some(Dialect::Mysql));
        assert_eq!(cfg.schema, None);
    }

    #[test]
    fn unknown_drizzle_dialect_is_ignored() {
        let cfg = DrizzleConfig::scan("dialect: 'singlestore'");
        assert_eq!(cfg.dialect, None);
    }

    #[test]
    fn package_json_drivers() {
        let pg = r#"{ "dependencies": { "drizzle-orm": "^0.30", "postgres": "^3" } }"#;
        assert_eq!(dialect_from_package_json(pg).unwrap(), Some(Dialect::Postgres));
        let my = r#"{ "devDependencies": { "mysql2": "^3" } }"#;
        assert_eq!(dialect_from_package_json(my).unwrap(), Some(Dialect::Mysql));
        let lib = r#"{ "dependencies": { "@libsql/client": "^0.5" } }"#;
        assert_eq!(dialect_from_package_json(lib).unwrap(), Some(Dialect::Sqlite));
        assert_eq!(dialect_from_package_json("{}").unwrap(), None);
        assert!(dialect_from_package_json("{").is_err());
    }

    #[test]
    fn scaffy_toml_keys() {
        let cfg = ScaffyToml::from_toml(
            "dialect = \"mysql\"\nschema = \"db/schema.ts\"\napp_dir = \"src/app\"\n",
        )
        .unwrap();
        assert_eq!(cfg.dialect.as_deref(), Some("mysql"));
        assert_eq!(cfg.schema, Some(PathBuf::from("db/schema.ts")));
        assert!(ScaffyToml::from_toml("colour = \"blue\"").is_err());
    }

    #[test]
    fn override_wins() {
        let cfg = ProjectConfig::new("/tmp/project").with_dialect(Dialect::Mysql);
        assert_eq!(cfg.dialect, Dialect::Mysql);
        assert_eq!(cfg.dialect_source, DialectSource::Override);
        assert_eq!(
            cfg.schema_file(),
            PathBuf::from("/tmp/project/src/db/schema.ts")
        );
    }
}
