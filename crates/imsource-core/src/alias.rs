//! Command aliases (shortcut → command word).

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::AliasError;
use crate::registry::CommandRegistry;

lazy_static! {
    static ref ALIAS_PATTERN: Regex = Regex::new(r"^[A-Za-z]+$").unwrap();
}

/// A one-to-one mapping from alias names to command words.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AliasTable {
    aliases: BTreeMap<String, String>,
}

impl AliasTable {
    /// Create an empty alias table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a table from persisted entries, validating each one.
    pub fn from_entries<I>(entries: I, registry: &CommandRegistry) -> Result<Self, AliasError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut table = Self::new();
        for (alias, command) in entries {
            table.register(&alias, &command, registry)?;
        }
        Ok(table)
    }

    /// Register `alias` for `command`, overwriting any previous target of `alias`.
    pub fn register(
        &mut self,
        alias: &str,
        command: &str,
        registry: &CommandRegistry,
    ) -> Result<(), AliasError> {
        if !ALIAS_PATTERN.is_match(alias) {
            return Err(AliasError::InvalidFormat(alias.to_string()));
        }
        match registry.lookup(command) {
            Some(word) if word.manages_aliases() => {
                return Err(AliasError::DisallowedTarget(command.to_string()));
            }
            Some(_) => {}
            None if self.aliases.contains_key(command) => {
                return Err(AliasError::AliasOfAlias(command.to_string()));
            }
            None => return Err(AliasError::UnknownTarget(command.to_string())),
        }
        if registry.is_command(alias) {
            return Err(AliasError::ShadowsCommand(alias.to_string()));
        }
        if let Some(existing) = self.alias_for(command) {
            if existing != alias {
                return Err(AliasError::CommandAlreadyAliased {
                    command: command.to_string(),
                    alias: existing.to_string(),
                });
            }
        }

        tracing::info!(alias, command, "alias registered");
        self.aliases.insert(alias.to_string(), command.to_string());
        Ok(())
    }

    /// Remove an alias, returning the command it pointed to.
    pub fn unregister(&mut self, alias: &str) -> Result<String, AliasError> {
        self.aliases
            .remove(alias)
            .ok_or_else(|| AliasError::NotFound(alias.to_string()))
    }

    /// Remove every alias, returning how many there were.
    pub fn clear(&mut self) -> usize {
        let count = self.aliases.len();
        self.aliases.clear();
        count
    }

    /// Resolve an alias to its command word.
    pub fn resolve(&self, alias: &str) -> Option<&str> {
        self.aliases.get(alias).map(|s| s.as_str())
    }

    /// The alias registered for `command`, if any.
    pub fn alias_for(&self, command: &str) -> Option<&str> {
        self.aliases
            .iter()
            .find(|(_, target)| target.as_str() == command)
            .map(|(alias, _)| alias.as_str())
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// List all aliases, sorted by alias.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases.iter().map(|(a, c)| (a.as_str(), c.as_str()))
    }
}
