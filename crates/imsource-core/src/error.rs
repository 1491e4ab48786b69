//! Error types for imsource-core

use thiserror::Error;

use crate::mode::ParserMode;

/// Result type alias for imsource operations
pub type Result<T> = std::result::Result<T, ImsourceError>;

/// Main error type for imsource operations
#[derive(Error, Debug)]
pub enum ImsourceError {
    /// Collection and history errors
    #[error("{0}")]
    Collection(#[from] CollectionError),

    /// Pinning errors
    #[error("{0}")]
    Pin(#[from] PinError),

    /// Alias registration errors
    #[error("{0}")]
    Alias(#[from] AliasError),

    /// Malformed or unknown command text
    #[error("{0}")]
    Parse(#[from] ParseError),

    /// Persistence errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl ImsourceError {
    /// Whether the error should be shown to the user and the session continued.
    ///
    /// `EntityNotFound` means a caller handed the collection a stale entity and
    /// storage/config failures leave the session unable to persist; both go to
    /// the host as fatal.
    pub fn is_recoverable(&self) -> bool {
        match self {
            ImsourceError::Collection(CollectionError::EntityNotFound) => false,
            ImsourceError::Storage(_) | ImsourceError::Config(_) => false,
            _ => true,
        }
    }
}

/// Errors raised by `UniqueList` and `History`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollectionError {
    /// An identity-equivalent entry already exists
    #[error("This source already exists in the list")]
    DuplicateEntity,

    /// The entry to remove or replace is not in the list
    #[error("Source not found in the list")]
    EntityNotFound,

    /// Nothing left to undo
    #[error("No more commands to undo")]
    NoUndoableState,

    /// Nothing left to redo
    #[error("No more commands to redo")]
    NoRedoableState,

    /// Index outside the displayed list
    #[error("The index {index} is invalid for a list of {len} sources")]
    InvalidIndex { index: usize, len: usize },
}

/// Errors raised by the pin coordinator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PinError {
    #[error("This source is already pinned")]
    AlreadyPinned,

    #[error("You can pin at most {limit} sources")]
    PinLimitExceeded { limit: usize },

    #[error("This source is not pinned")]
    NotPinned,

    #[error("Pinned sources cannot be moved; unpin them first")]
    PinnedPositionConflict,
}

/// Alias registration and removal errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AliasError {
    #[error("Alias '{0}' must consist of letters only")]
    InvalidFormat(String),

    #[error("Command '{0}' cannot be aliased")]
    DisallowedTarget(String),

    #[error("'{0}' is not a command")]
    UnknownTarget(String),

    #[error("'{0}' is itself an alias; aliases must point to a command")]
    AliasOfAlias(String),

    #[error("Alias '{0}' is already a command word")]
    ShadowsCommand(String),

    #[error("Command '{command}' already has the alias '{alias}'")]
    CommandAlreadyAliased { command: String, alias: String },

    #[error("No alias named '{0}'")]
    NotFound(String),
}

/// Command text errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Command '{word}' is not available in {mode} mode")]
    UnavailableInMode { word: String, mode: ParserMode },

    #[error("Invalid command format: {message}\n{usage}")]
    InvalidFormat { message: String, usage: &'static str },

    #[error("Alias '{0}' resolves to another alias")]
    AliasDepthExceeded(String),
}

/// Persistence-specific errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid pinned count: {0}")]
    InvalidPinnedCount(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("TOML parse error: {0}")]
    Parse(String),

    #[error("Value out of range: {0}")]
    OutOfRange(String),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for ImsourceError {
    fn from(err: serde_json::Error) -> Self {
        ImsourceError::Storage(StorageError::Serialization(err.to_string()))
    }
}

impl From<std::io::Error> for ImsourceError {
    fn from(err: std::io::Error) -> Self {
        ImsourceError::Storage(StorageError::Io(err.to_string()))
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

impl From<toml::de::Error> for ImsourceError {
    fn from(err: toml::de::Error) -> Self {
        ImsourceError::Config(ConfigError::Parse(err.to_string()))
    }
}
