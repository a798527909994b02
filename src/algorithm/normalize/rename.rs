//! Versioned rename tables for health-region names
//!
//! Health units were merged and renamed over time, so the same region can
//! appear under different names in different source vintages. A
//! [`RenameTable`] maps historical names to the current canonical name.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::util::{safe_create_file, safe_open_file};
use crate::error::{Error, Result};

/// Version label of the built-in rename table
pub const DEFAULT_RENAME_VERSION: &str = "2020-phu-restructuring";

/// Lowercase and trim, the case/whitespace-insensitive form of a name
#[must_use]
pub fn fold_name(name: &str) -> String {
    name.to_lowercase().trim().to_string()
}

/// On-disk form of a rename table
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RenameTableDef {
    version: String,
    renames: BTreeMap<String, String>,
}

/// An explicit, versioned mapping of historical name → canonical name
///
/// Lookups are verbatim: only a name identical to a mapped name is renamed.
/// Case and whitespace variants are reconciled afterwards by the canonical
/// key, not by the rename step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RenameTableDef", into = "RenameTableDef")]
pub struct RenameTable {
    version: String,
    renames: BTreeMap<String, String>,
}

impl Default for RenameTable {
    fn default() -> Self {
        let mut renames = BTreeMap::new();
        renames.insert(
            "Huron County Health Unit".to_string(),
            "Huron Perth Public Health".to_string(),
        );
        renames.insert(
            "Perth District Health Unit".to_string(),
            "Huron Perth Public Health".to_string(),
        );
        Self {
            version: DEFAULT_RENAME_VERSION.to_string(),
            renames,
        }
    }
}

impl TryFrom<RenameTableDef> for RenameTable {
    type Error = Error;

    fn try_from(def: RenameTableDef) -> std::result::Result<Self, Self::Error> {
        if let Some((from, _)) = def.renames.iter().find(|(_, to)| to.trim().is_empty()) {
            return Err(Error::InvalidConfig(format!(
                "rename of '{from}' has an empty target name"
            )));
        }
        Ok(Self {
            version: def.version,
            renames: def.renames,
        })
    }
}

impl From<RenameTable> for RenameTableDef {
    fn from(table: RenameTable) -> Self {
        Self {
            version: table.version,
            renames: table.renames,
        }
    }
}

impl RenameTable {
    /// Create a rename table from (historical, canonical) pairs
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfig`] if a canonical name is empty
    pub fn new<I, K, V>(version: impl Into<String>, renames: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let def = RenameTableDef {
            version: version.into(),
            renames: renames
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        };
        Ok(Self::try_from(def)?)
    }

    /// Version label of this table
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Number of mapped names
    #[must_use]
    pub fn len(&self) -> usize {
        self.renames.len()
    }

    /// Whether the table maps no names
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.renames.is_empty()
    }

    /// Extend the table with another rename, returning a new version
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfig`] if `canonical` is empty
    pub fn with_rename(
        &self,
        version: impl Into<String>,
        historical: impl Into<String>,
        canonical: impl Into<String>,
    ) -> Result<Self> {
        let mut renames = self.renames.clone();
        renames.insert(historical.into(), canonical.into());
        Self::new(version, renames)
    }

    /// Apply the rename step only; unmapped names are returned unchanged
    #[must_use]
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.renames.get(name).map_or(name, String::as_str)
    }

    /// Canonical join key: rename, then lowercase, then trim
    #[must_use]
    pub fn canonical_key(&self, name: &str) -> String {
        fold_name(self.resolve(name))
    }

    /// Load a rename table from a JSON file
    ///
    /// The file holds `{"version": "...", "renames": {"old": "new", ...}}`.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = safe_open_file(path, "rename table")?;
        serde_json::from_reader(std::io::BufReader::new(file))
            .map_err(Error::Json)
            .with_context(|| format!("Failed to parse rename table {}", path.display()))
    }

    /// Save the rename table as pretty-printed JSON
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let file = safe_create_file(path, "rename table")?;
        serde_json::to_writer_pretty(file, self)
            .map_err(Error::Json)
            .with_context(|| format!("Failed to write rename table {}", path.display()))
    }
}
