//! Persistence for the two collections, the alias table and the pinned count
//!
//! [`JsonStorage`] writes pretty JSON documents (and a one-line text file for
//! the pinned count) into a data directory. Missing files load as empty.
//! [`MemoryStorage`] keeps everything in memory for tests and embedding.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::alias::AliasTable;
use crate::config::ImsourceConfig;
use crate::dual_list::ListKind;
use crate::error::{Result, StorageError};
use crate::source::Source;

/// Load/save contract used by [`crate::Logic`]
pub trait Storage {
    fn load_sources(&self, kind: ListKind) -> Result<Vec<Source>>;
    fn save_sources(&mut self, kind: ListKind, sources: &[Source]) -> Result<()>;

    /// Raw alias entries; validation happens when the table is rebuilt.
    fn load_aliases(&self) -> Result<BTreeMap<String, String>>;
    fn save_aliases(&mut self, aliases: &AliasTable) -> Result<()>;

    fn load_pinned_count(&self) -> Result<usize>;
    fn save_pinned_count(&mut self, count: usize) -> Result<()>;
}

/// File-backed storage
#[derive(Debug, Clone)]
pub struct JsonStorage {
    active_path: PathBuf,
    bin_path: PathBuf,
    aliases_path: PathBuf,
    pinned_path: PathBuf,
}

impl JsonStorage {
    pub fn new(config: &ImsourceConfig) -> Self {
        Self {
            active_path: config.active_path(),
            bin_path: config.bin_path(),
            aliases_path: config.aliases_path(),
            pinned_path: config.pinned_path(),
        }
    }

    fn sources_path(&self, kind: ListKind) -> &Path {
        match kind {
            ListKind::Active => &self.active_path,
            ListKind::Bin => &self.bin_path,
        }
    }
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        tracing::warn!(?path, "data file missing, starting empty");
        return Ok(None);
    }
    let text = fs::read_to_string(path).map_err(StorageError::from)?;
    Ok(Some(text))
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(StorageError::from)?;
    }
    fs::write(path, contents).map_err(StorageError::from)?;
    Ok(())
}

impl Storage for JsonStorage {
    fn load_sources(&self, kind: ListKind) -> Result<Vec<Source>> {
        match read_optional(self.sources_path(kind))? {
            Some(text) => Ok(serde_json::from_str(&text).map_err(StorageError::from)?),
            None => Ok(Vec::new()),
        }
    }

    fn save_sources(&mut self, kind: ListKind, sources: &[Source]) -> Result<()> {
        let json = serde_json::to_string_pretty(sources).map_err(StorageError::from)?;
        write_file(self.sources_path(kind), &json)
    }

    fn load_aliases(&self) -> Result<BTreeMap<String, String>> {
        match read_optional(&self.aliases_path)? {
            Some(text) => Ok(serde_json::from_str(&text).map_err(StorageError::from)?),
            None => Ok(BTreeMap::new()),
        }
    }

    fn save_aliases(&mut self, aliases: &AliasTable) -> Result<()> {
        let json = serde_json::to_string_pretty(aliases).map_err(StorageError::from)?;
        write_file(&self.aliases_path, &json)
    }

    fn load_pinned_count(&self) -> Result<usize> {
        match read_optional(&self.pinned_path)? {
            Some(text) => {
                let text = text.trim();
                Ok(text
                    .parse::<usize>()
                    .map_err(|_| StorageError::InvalidPinnedCount(text.to_string()))?)
            }
            None => Ok(0),
        }
    }

    fn save_pinned_count(&mut self, count: usize) -> Result<()> {
        write_file(&self.pinned_path, &format!("{count}\n"))
    }
}

/// In-memory storage
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    pub active: Vec<Source>,
    pub bin: Vec<Source>,
    pub aliases: BTreeMap<String, String>,
    pub pinned_count: usize,
}

impl Storage for MemoryStorage {
    fn load_sources(&self, kind: ListKind) -> Result<Vec<Source>> {
        Ok(match kind {
            ListKind::Active => self.active.clone(),
            ListKind::Bin => self.bin.clone(),
        })
    }

    fn save_sources(&mut self, kind: ListKind, sources: &[Source]) -> Result<()> {
        let target = match kind {
            ListKind::Active => &mut self.active,
            ListKind::Bin => &mut self.bin,
        };
        *target = sources.to_vec();
        Ok(())
    }

    fn load_aliases(&self) -> Result<BTreeMap<String, String>> {
        Ok(self.aliases.clone())
    }

    fn save_aliases(&mut self, aliases: &AliasTable) -> Result<()> {
        self.aliases = aliases
            .iter()
            .map(|(a, c)| (a.to_string(), c.to_string()))
            .collect();
        Ok(())
    }

    fn load_pinned_count(&self) -> Result<usize> {
        Ok(self.pinned_count)
    }

    fn save_pinned_count(&mut self, count: usize) -> Result<()> {
        self.pinned_count = count;
        Ok(())
    }
}
