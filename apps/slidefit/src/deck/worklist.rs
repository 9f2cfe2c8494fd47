//! Worklist and catalog input files.
//!
//! The worklist is the ordered running order for one session; the catalog is the
//! song/prayer library it refers to. Both are plain JSON.

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::AppError;

// ────────────────────────────────────────────────────────────────────────────
// Worklist
// ────────────────────────────────────────────────────────────────────────────

/// A bhajan row as the user left it in the workspace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BhajanRow {
    #[serde(default, deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Lead singer.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub gender: String,
    /// Musical key, e.g. "C#".
    #[serde(default)]
    pub key: String,
    /// Workspace lyrics; empty means "take them from the catalog".
    #[serde(default)]
    pub lyrics: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrayerRow {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Used only when the catalog has no prayer with this id.
    #[serde(default)]
    pub lyrics: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorklistEntry {
    Bhajan(BhajanRow),
    Prayer(PrayerRow),
    /// Background-only slide between items.
    Break,
}

impl WorklistEntry {
    /// Title shown in the previous slide's "Next" footer.
    pub fn next_title(&self) -> Option<&str> {
        match self {
            WorklistEntry::Bhajan(b) => Some(b.title.as_str()),
            WorklistEntry::Prayer(p) => Some(p.title.as_str()),
            WorklistEntry::Break => None,
        }
    }

    /// Singer shown in the "Next" footer; prayers have none.
    pub fn next_name(&self) -> &str {
        match self {
            WorklistEntry::Bhajan(b) => &b.name,
            _ => "",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Worklist {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub entries: Vec<WorklistEntry>,
}

impl Worklist {
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        let worklist: Worklist = serde_json::from_str(json)?;
        worklist.validate()?;
        Ok(worklist)
    }

    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Prayers are keyed by id (catalog lookup, segment cache), so the id is mandatory.
    pub fn validate(&self) -> Result<(), AppError> {
        for (idx, entry) in self.entries.iter().enumerate() {
            if let WorklistEntry::Prayer(p) = entry {
                if p.id.trim().is_empty() {
                    return Err(AppError::Validation(format!(
                        "worklist entry {idx}: prayer '{}' has an empty id",
                        p.title
                    )));
                }
            }
        }
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Catalog
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogBhajan {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    /// Songbook exports call the title "name".
    #[serde(default, alias = "name")]
    pub title: String,
    #[serde(default)]
    pub lyrics: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogPrayer {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub lyrics: String,
    #[serde(default)]
    pub translation: Option<String>,
    /// Older catalog files call the translation "meaning".
    #[serde(default)]
    pub meaning: Option<String>,
}

impl CatalogPrayer {
    pub fn translation(&self) -> &str {
        [&self.translation, &self.meaning]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|t| !t.is_empty())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub bhajans: Vec<CatalogBhajan>,
    #[serde(default)]
    pub prayers: Vec<CatalogPrayer>,
}

impl Catalog {
    /// Accepts a full catalog object or a bare array of bhajans.
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum CatalogFile {
            Full(Catalog),
            Bhajans(Vec<CatalogBhajan>),
        }
        Ok(match serde_json::from_str(json)? {
            CatalogFile::Full(catalog) => catalog,
            CatalogFile::Bhajans(bhajans) => Catalog {
                bhajans,
                prayers: Vec::new(),
            },
        })
    }

    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    pub fn find_bhajan(&self, id: &str) -> Option<&CatalogBhajan> {
        self.bhajans.iter().find(|b| b.id == id)
    }

    pub fn find_prayer(&self, id: &str) -> Option<&CatalogPrayer> {
        self.prayers.iter().find(|p| p.id == id)
    }
}

/// Accepts ids written as JSON strings or integers.
fn id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Int(i64),
    }
    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Int(n) => n.to_string(),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
