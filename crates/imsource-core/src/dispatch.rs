//! Alias-resolving command dispatcher

use crate::alias::AliasTable;
use crate::command::Command;
use crate::error::ParseError;
use crate::mode::ParserMode;
use crate::parse::parse_command;
use crate::registry::{CommandRegistry, CommandWord};

/// Number of alias substitutions allowed per dispatch.
///
/// Alias targets are always command words, so one substitution resolves any
/// valid table.
pub const MAX_ALIAS_DEPTH: usize = 1;

/// Turns a line of input into a [`Command`] for the current mode.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    registry: CommandRegistry,
}

impl Dispatcher {
    pub fn new(registry: CommandRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Parse `input` under the grammar of `mode`, expanding aliases.
    pub fn parse(
        &self,
        input: &str,
        mode: ParserMode,
        aliases: &AliasTable,
    ) -> Result<Command, ParseError> {
        self.resolve(input, mode, aliases, 0)
    }

    fn resolve(
        &self,
        input: &str,
        mode: ParserMode,
        aliases: &AliasTable,
        depth: usize,
    ) -> Result<Command, ParseError> {
        let (word, args) = split_command(input);
        if word.is_empty() {
            return Err(ParseError::InvalidFormat {
                message: "no command given".to_string(),
                usage: CommandWord::Help.usage(),
            });
        }

        if let Some(command) = self.registry.lookup(word) {
            if !command.available_in(mode) {
                return Err(ParseError::UnavailableInMode {
                    word: word.to_string(),
                    mode,
                });
            }
            return parse_command(command, args);
        }

        let Some(target) = aliases.resolve(word) else {
            return Err(ParseError::UnknownCommand(word.to_string()));
        };
        if depth >= MAX_ALIAS_DEPTH {
            return Err(ParseError::AliasDepthExceeded(word.to_string()));
        }
        tracing::debug!(alias = word, command = target, "alias expanded");
        // Only the leading word is rewritten; the arguments are kept verbatim.
        let rewritten = format!("{target}{args}");
        self.resolve(&rewritten, mode, aliases, depth + 1)
    }
}

/// Split into the command word and the rest (leading whitespace kept).
fn split_command(input: &str) -> (&str, &str) {
    let input = input.trim();
    match input.find(char::is_whitespace) {
        Some(end) => (&input[..end], &input[end..]),
        None => (input, ""),
    }
}
