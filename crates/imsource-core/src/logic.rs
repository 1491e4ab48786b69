//! Session entry point: text in, [`CommandResult`] out
//!
//! `Logic` loads state from a [`Storage`], runs each line through the
//! [`Dispatcher`] and the resulting [`Command`], and saves the collections and
//! aliases after every successful command. The pinned count is only written on
//! `exit` (or [`Logic::shutdown`]).

use crate::alias::AliasTable;
use crate::command::CommandResult;
use crate::dispatch::Dispatcher;
use crate::dual_list::ListKind;
use crate::error::Result;
use crate::list::UniqueList;
use crate::model::Model;
use crate::registry::CommandRegistry;
use crate::source::Source;
use crate::storage::Storage;

pub struct Logic<S: Storage> {
    model: Model,
    dispatcher: Dispatcher,
    storage: S,
}

impl<S: Storage> Logic<S> {
    /// Load a session from `storage`.
    ///
    /// Unreadable data files are logged and replaced by empty collections;
    /// the bad files are overwritten on the next save.
    pub fn new(storage: S) -> Self {
        let registry = CommandRegistry::builtin();
        let active = load_list(&storage, ListKind::Active);
        let bin = load_list(&storage, ListKind::Bin);

        let aliases = storage
            .load_aliases()
            .and_then(|entries| Ok(AliasTable::from_entries(entries, &registry)?))
            .unwrap_or_else(|err| {
                tracing::warn!("Failed to load aliases: {}, starting without aliases", err);
                AliasTable::new()
            });

        let pinned_count = storage.load_pinned_count().unwrap_or_else(|err| {
            tracing::warn!("Failed to load pinned count: {}, assuming none", err);
            0
        });

        tracing::info!(
            active = active.len(),
            bin = bin.len(),
            aliases = aliases.len(),
            pinned = pinned_count,
            "session loaded"
        );

        Self {
            model: Model::new(active, bin, aliases, pinned_count),
            dispatcher: Dispatcher::new(registry),
            storage,
        }
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn registry(&self) -> &CommandRegistry {
        self.dispatcher.registry()
    }

    /// Parse and execute one line of input.
    pub fn execute(&mut self, input: &str) -> Result<CommandResult> {
        let command = self
            .dispatcher
            .parse(input, self.model.mode(), self.model.aliases())?;
        tracing::debug!(?command, "executing");
        let result = command.execute(&mut self.model, self.dispatcher.registry())?;

        self.persist()?;
        if result.exit {
            self.shutdown()?;
        }
        Ok(result)
    }

    /// Write the pending pinned count.
    pub fn shutdown(&mut self) -> Result<()> {
        self.storage.save_pinned_count(self.model.pinned_count())?;
        tracing::info!(pinned = self.model.pinned_count(), "pinned count saved");
        Ok(())
    }

    fn persist(&mut self) -> Result<()> {
        self.storage
            .save_sources(ListKind::Active, self.model.active().live().as_slice())?;
        self.storage
            .save_sources(ListKind::Bin, self.model.bin().live().as_slice())?;
        self.storage.save_aliases(self.model.aliases())?;
        tracing::info!(
            active = self.model.active().len(),
            bin = self.model.bin().len(),
            aliases = self.model.aliases().len(),
            "state saved"
        );
        Ok(())
    }
}

fn load_list<S: Storage>(storage: &S, kind: ListKind) -> UniqueList<Source> {
    let loaded = storage
        .load_sources(kind)
        .and_then(|items| Ok(UniqueList::from_items(items)?));
    match loaded {
        Ok(list) => list,
        Err(err) => {
            tracing::warn!("Failed to load {}: {}, starting empty", kind, err);
            UniqueList::new()
        }
    }
}
