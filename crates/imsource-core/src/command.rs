//! Parsed commands and their execution against the [`Model`]

use std::collections::BTreeSet;

use crate::dual_list::{DeleteOutcome, ListKind, RestoreOutcome};
use crate::error::Result;
use crate::mode::ParserMode;
use crate::model::Model;
use crate::registry::CommandRegistry;
use crate::source::{BibField, Source};

/// Fields to change in an `edit`. `None` leaves the field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditDescriptor {
    pub title: Option<String>,
    pub source_type: Option<String>,
    pub author: Option<String>,
    pub detail: Option<String>,
    /// Replaces all tags when present (an empty set clears them)
    pub tags: Option<BTreeSet<String>>,
}

impl EditDescriptor {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.source_type.is_none()
            && self.author.is_none()
            && self.detail.is_none()
            && self.tags.is_none()
    }

    pub fn apply(&self, source: &Source) -> Source {
        let mut edited = source.clone();
        if let Some(title) = &self.title {
            edited.title = title.clone();
        }
        if let Some(source_type) = &self.source_type {
            edited.source_type = source_type.clone();
        }
        if let Some(author) = &self.author {
            edited.author = author.clone();
        }
        if let Some(detail) = &self.detail {
            edited.detail = detail.clone();
        }
        if let Some(tags) = &self.tags {
            edited.tags = tags.clone();
        }
        edited
    }
}

/// Commands that can be executed on the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Append a source to the active list
    Add { source: Source },

    /// Edit the displayed source at `index`
    Edit { index: usize, edit: EditDescriptor },

    /// Replace one bibliography field
    Field {
        index: usize,
        field: BibField,
        value: String,
    },

    /// Delete: to the bin in ACTIVE mode, permanently in RECYCLE_BIN mode
    Delete { index: usize },

    /// Move a binned source back to the active list
    Restore { index: usize },

    /// Permanently delete everything in the bin
    EmptyBin,

    /// Filter the displayed list
    Find { keywords: Vec<String> },

    /// Clear the filter
    List,

    Pin { index: usize },

    Unpin { index: usize },

    /// Custom ordering
    Move { from: usize, to: usize },

    Select { index: usize },

    Count,

    Undo,

    Redo,

    Alias { alias: String, command: String },

    Unalias { alias: String },

    Aliases,

    ClearAliases,

    EnterBin,

    ExitBin,

    Help,

    Exit,
}

/// Outcome of a successful command, for the front-end
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResult {
    /// Message to show the user
    pub feedback: String,
    /// Collections committed by the command
    pub changed: Vec<ListKind>,
    /// The front-end should show the help overlay
    pub show_help: bool,
    /// The front-end should terminate
    pub exit: bool,
}

impl CommandResult {
    pub fn new(feedback: impl Into<String>) -> Self {
        Self {
            feedback: feedback.into(),
            ..Default::default()
        }
    }

    fn changed(mut self, kinds: &[ListKind]) -> Self {
        self.changed = kinds.to_vec();
        self
    }
}

impl Command {
    /// Execute the command on the given model
    pub fn execute(self, model: &mut Model, registry: &CommandRegistry) -> Result<CommandResult> {
        match self {
            Command::Add { source } => {
                let message = format!("New source added: {source}");
                model.add_source(source)?;
                Ok(CommandResult::new(message).changed(&[ListKind::Active]))
            }

            Command::Edit { index, edit } => {
                let edited = model.edit_source(index, |source| edit.apply(source))?;
                Ok(CommandResult::new(format!("Edited source: {edited}")).changed(&[ListKind::Active]))
            }

            Command::Field {
                index,
                field,
                value,
            } => {
                let edited =
                    model.edit_source(index, |source| source.clone().with_bib_field(field, value))?;
                Ok(CommandResult::new(format!(
                    "Set {field} of {} to '{}'",
                    edited.title,
                    edited.bib_field(field)
                ))
                .changed(&[ListKind::Active]))
            }

            Command::Delete { index } => match model.mode() {
                ParserMode::Active => {
                    let (source, outcome) = model.delete_active(index)?;
                    Ok(match outcome {
                        DeleteOutcome::MovedToBin => {
                            CommandResult::new(format!("Moved to recycle bin: {source}"))
                                .changed(&[ListKind::Bin, ListKind::Active])
                        }
                        DeleteOutcome::AlreadyInBin => CommandResult::new(format!(
                            "Deleted: {source} (an identical copy is already in the recycle bin)"
                        ))
                        .changed(&[ListKind::Active]),
                    })
                }
                ParserMode::RecycleBin => {
                    let source = model.purge_bin(index)?;
                    Ok(CommandResult::new(format!("Permanently deleted: {source}"))
                        .changed(&[ListKind::Bin]))
                }
            },

            Command::Restore { index } => {
                let (source, outcome) = model.restore(index)?;
                Ok(match outcome {
                    RestoreOutcome::Restored => {
                        CommandResult::new(format!("Restored: {source}"))
                            .changed(&[ListKind::Active, ListKind::Bin])
                    }
                    RestoreOutcome::AlreadyActive => CommandResult::new(format!(
                        "{source} is already in the active list; removed it from the recycle bin"
                    ))
                    .changed(&[ListKind::Bin]),
                })
            }

            Command::EmptyBin => {
                let count = model.empty_bin();
                if count == 0 {
                    return Ok(CommandResult::new("The recycle bin is already empty"));
                }
                Ok(CommandResult::new(format!("Permanently deleted {count} sources"))
                    .changed(&[ListKind::Bin]))
            }

            Command::Find { keywords } => {
                model.set_filter(keywords);
                Ok(CommandResult::new(format!(
                    "{} sources listed",
                    model.displayed().len()
                )))
            }

            Command::List => {
                model.clear_filter();
                Ok(CommandResult::new(format!(
                    "Listed all {} sources",
                    model.displayed().len()
                )))
            }

            Command::Pin { index } => {
                let source = model.pin(index)?;
                Ok(CommandResult::new(format!("Pinned: {}", source.title)))
            }

            Command::Unpin { index } => {
                let source = model.unpin(index)?;
                Ok(CommandResult::new(format!("Unpinned: {}", source.title)))
            }

            Command::Move { from, to } => {
                let source = model.move_source(from, to)?;
                Ok(
                    CommandResult::new(format!("Moved {} to position {}", source.title, to + 1))
                        .changed(&[ListKind::Active]),
                )
            }

            Command::Select { index } => {
                let source = model.select(index)?;
                Ok(CommandResult::new(format!("Selected: {}", source.title)))
            }

            Command::Count => {
                let count = model.displayed().len();
                Ok(CommandResult::new(match count {
                    1 => "1 source listed".to_string(),
                    n => format!("{n} sources listed"),
                }))
            }

            Command::Undo => {
                let kinds = model.undo()?;
                Ok(CommandResult::new("Undo success!").changed(&kinds))
            }

            Command::Redo => {
                let kinds = model.redo()?;
                Ok(CommandResult::new("Redo success!").changed(&kinds))
            }

            Command::Alias { alias, command } => {
                model.aliases_mut().register(&alias, &command, registry)?;
                Ok(CommandResult::new(format!("Alias added: {alias} -> {command}")))
            }

            Command::Unalias { alias } => {
                let command = model.aliases_mut().unregister(&alias)?;
                Ok(CommandResult::new(format!("Alias removed: {alias} -> {command}")))
            }

            Command::Aliases => {
                let aliases = model.aliases();
                if aliases.is_empty() {
                    return Ok(CommandResult::new("No aliases defined"));
                }
                let lines: Vec<String> = aliases
                    .iter()
                    .map(|(alias, command)| format!("{alias} -> {command}"))
                    .collect();
                Ok(CommandResult::new(lines.join("\n")))
            }

            Command::ClearAliases => {
                let count = model.aliases_mut().clear();
                Ok(CommandResult::new(format!("Removed {count} aliases")))
            }

            Command::EnterBin => {
                model.enter_bin();
                Ok(CommandResult::new(format!(
                    "Viewing the recycle bin ({} sources)",
                    model.displayed().len()
                )))
            }

            Command::ExitBin => {
                model.exit_bin();
                Ok(CommandResult::new("Back to the active list"))
            }

            Command::Help => Ok(CommandResult {
                show_help: true,
                ..CommandResult::new(registry.summary(model.mode()))
            }),

            Command::Exit => Ok(CommandResult {
                exit: true,
                ..CommandResult::new("Exiting imsource")
            }),
        }
    }
}
