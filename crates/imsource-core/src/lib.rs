//! Imsource Core - Versioned source lists with a recycle bin
//!
//! This crate provides the core functionality for the imsource reference manager:
//!
//! - **Source**: Citation-like entities (title, type, author, detail, tags, bibliographic fields)
//! - **List**: Ordered collections that reject identity-equivalent duplicates
//! - **History**: Snapshot-based undo/redo for a single collection, with observers
//! - **DualList**: The active list and the recycle bin, undone and redone together
//! - **Pin**: A bounded pinned region at the front of the active list
//! - **Mode**: Parser modes (active list vs. recycle bin)
//! - **Registry / Alias / Dispatch**: Command words, user aliases and mode-aware parsing
//! - **Command / Model / Logic**: Executing commands against in-memory state and persisting it
//! - **Storage / Config**: JSON files in a data directory, configured via TOML
//!
//! # Architecture
//!
//! ```text
//! input ─▶ Dispatcher ─▶ Command ─▶ Model ─▶ Storage
//!            │ aliases      │         ├─ DualList (active + bin histories)
//!            │ mode         │         └─ PinCoordinator
//! ```

pub mod alias;
pub mod command;
pub mod config;
pub mod dispatch;
pub mod dual_list;
pub mod error;
pub mod history;
pub mod list;
pub mod logic;
pub mod mode;
pub mod model;
pub mod parse;
pub mod pin;
pub mod registry;
pub mod source;
pub mod storage;

pub use alias::AliasTable;
pub use command::{Command, CommandResult, EditDescriptor};
pub use config::{FileNames, ImsourceConfig};
pub use dispatch::{Dispatcher, MAX_ALIAS_DEPTH};
pub use dual_list::{DeleteOutcome, DualList, ListKind, RestoreOutcome};
pub use error::{
    AliasError, CollectionError, ConfigError, ImsourceError, ParseError, PinError, Result,
    StorageError,
};
pub use history::{History, HistoryEvent, Observer};
pub use list::{Entry, UniqueList};
pub use logic::Logic;
pub use mode::{ModeMachine, ParserMode};
pub use model::Model;
pub use pin::{PinCoordinator, MAX_PINNED};
pub use registry::{CommandRegistry, CommandWord};
pub use source::{BibField, Source, UnknownBibField};
pub use storage::{JsonStorage, MemoryStorage, Storage};
