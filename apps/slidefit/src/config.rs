use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::deck::catalog_import::DEFAULT_STARTING_ID;
use crate::deck::planner::DEFAULT_YIELD_EVERY;

/// What the binary does, picked by the first command-line argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `slidefit` or `slidefit plan`: worklist + catalog to slide plan.
    Plan,
    /// `slidefit import-catalog`: raw songbook text to catalog JSON.
    ImportCatalog,
}

impl Command {
    pub fn parse(arg: Option<&str>) -> Result<Self> {
        match arg {
            None | Some("plan") => Ok(Command::Plan),
            Some("import-catalog") => Ok(Command::ImportCatalog),
            Some(other) => anyhow::bail!(
                "Unknown command '{other}' (expected 'plan' or 'import-catalog')"
            ),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub worklist_path: PathBuf,
    pub catalog_path: Option<PathBuf>,
    /// Plan is written to stdout when unset.
    pub output_path: Option<PathBuf>,
    pub font_family: String,
    pub deck_title: Option<String>,
    pub deck_subtitle: Option<String>,
    pub background_count: usize,
    pub yield_every: usize,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Config {
            worklist_path: PathBuf::from(require_env(&lookup, "WORKLIST_PATH")?),
            catalog_path: optional("CATALOG_PATH").map(PathBuf::from),
            output_path: optional("OUTPUT_PATH").map(PathBuf::from),
            font_family: optional("FONT_FAMILY").unwrap_or_else(|| "Calibri".to_string()),
            deck_title: optional("DECK_TITLE"),
            deck_subtitle: optional("DECK_SUBTITLE"),
            background_count: optional("BACKGROUND_COUNT")
                .unwrap_or_else(|| "0".to_string())
                .parse::<usize>()
                .context("BACKGROUND_COUNT must be a non-negative integer")?,
            yield_every: optional("YIELD_EVERY")
                .unwrap_or_else(|| DEFAULT_YIELD_EVERY.to_string())
                .parse::<usize>()
                .context("YIELD_EVERY must be a non-negative integer")?,
            rust_log: optional("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

/// Settings for `import-catalog`.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    pub raw_path: PathBuf,
    /// Catalog is written to stdout when unset.
    pub output_path: Option<PathBuf>,
    pub starting_id: u32,
    pub rust_log: String,
}

impl ImportConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(ImportConfig {
            raw_path: PathBuf::from(require_env(&lookup, "SONGBOOK_PATH")?),
            output_path: optional("OUTPUT_PATH").map(PathBuf::from),
            starting_id: optional("STARTING_ID")
                .unwrap_or_else(|| DEFAULT_STARTING_ID.to_string())
                .parse::<u32>()
                .context("STARTING_ID must be a non-negative integer")?,
            rust_log: optional("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn require_env(lookup: impl Fn(&str) -> Option<String>, key: &str) -> Result<String> {
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .with_context(|| format!("Required environment variable '{key}' is not set"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[("WORKLIST_PATH", "worklist.json")])).unwrap();
        assert_eq!(config.worklist_path, PathBuf::from("worklist.json"));
        assert_eq!(config.catalog_path, None);
        assert_eq!(config.output_path, None);
        assert_eq!(config.font_family, "Calibri");
        assert_eq!(config.background_count, 0);
        assert_eq!(config.yield_every, 8);
        assert_eq!(config.rust_log, "info");
    }

    #[test]
    fn test_missing_worklist_path() {
        let err = Config::from_lookup(lookup(&[("WORKLIST_PATH", " ")])).unwrap_err();
        assert!(err.to_string().contains("WORKLIST_PATH"));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("WORKLIST_PATH", "w.json"),
            ("CATALOG_PATH", "c.json"),
            ("OUTPUT_PATH", "deck.json"),
            ("FONT_FAMILY", "Arial"),
            ("DECK_TITLE", "Sai Centre"),
            ("BACKGROUND_COUNT", "5"),
            ("YIELD_EVERY", "0"),
        ]))
        .unwrap();
        assert_eq!(config.catalog_path, Some(PathBuf::from("c.json")));
        assert_eq!(config.output_path, Some(PathBuf::from("deck.json")));
        assert_eq!(config.font_family, "Arial");
        assert_eq!(config.deck_title.as_deref(), Some("Sai Centre"));
        assert_eq!(config.deck_subtitle, None);
        assert_eq!(config.background_count, 5);
        assert_eq!(config.yield_every, 0);
    }

    #[test]
    fn test_command_parse() {
        assert_eq!(Command::parse(None).unwrap(), Command::Plan);
        assert_eq!(Command::parse(Some("plan")).unwrap(), Command::Plan);
        assert_eq!(
            Command::parse(Some("import-catalog")).unwrap(),
            Command::ImportCatalog
        );
        assert!(Command::parse(Some("render")).is_err());
    }

    #[test]
    fn test_import_config() {
        let config = ImportConfig::from_lookup(lookup(&[
            ("SONGBOOK_PATH", "bhajans_raw.txt"),
            ("STARTING_ID", "100"),
        ]))
        .unwrap();
        assert_eq!(config.raw_path, PathBuf::from("bhajans_raw.txt"));
        assert_eq!(config.output_path, None);
        assert_eq!(config.starting_id, 100);

        let defaults =
            ImportConfig::from_lookup(lookup(&[("SONGBOOK_PATH", "raw.txt")])).unwrap();
        assert_eq!(defaults.starting_id, 1);
        assert!(ImportConfig::from_lookup(lookup(&[])).is_err());
    }

    #[test]
    fn test_bad_number_is_rejected() {
        let err = Config::from_lookup(lookup(&[
            ("WORKLIST_PATH", "w.json"),
            ("YIELD_EVERY", "often"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("YIELD_EVERY"));
    }
}
