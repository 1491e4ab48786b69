//! Command words, their usage text and the modes they are valid in.

use std::fmt;

use crate::mode::ParserMode;

/// Every built-in command word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandWord {
    Add,
    Edit,
    Field,
    Delete,
    Restore,
    EmptyBin,
    Find,
    List,
    Pin,
    Unpin,
    Move,
    Select,
    Count,
    Undo,
    Redo,
    Alias,
    Unalias,
    Aliases,
    ClearAliases,
    Bin,
    Back,
    Help,
    Exit,
}

impl CommandWord {
    pub const ALL: [CommandWord; 23] = [
        CommandWord::Add,
        CommandWord::Edit,
        CommandWord::Field,
        CommandWord::Delete,
        CommandWord::Restore,
        CommandWord::EmptyBin,
        CommandWord::Find,
        CommandWord::List,
        CommandWord::Pin,
        CommandWord::Unpin,
        CommandWord::Move,
        CommandWord::Select,
        CommandWord::Count,
        CommandWord::Undo,
        CommandWord::Redo,
        CommandWord::Alias,
        CommandWord::Unalias,
        CommandWord::Aliases,
        CommandWord::ClearAliases,
        CommandWord::Bin,
        CommandWord::Back,
        CommandWord::Help,
        CommandWord::Exit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CommandWord::Add => "add",
            CommandWord::Edit => "edit",
            CommandWord::Field => "field",
            CommandWord::Delete => "delete",
            CommandWord::Restore => "restore",
            CommandWord::EmptyBin => "empty-bin",
            CommandWord::Find => "find",
            CommandWord::List => "list",
            CommandWord::Pin => "pin",
            CommandWord::Unpin => "unpin",
            CommandWord::Move => "move",
            CommandWord::Select => "select",
            CommandWord::Count => "count",
            CommandWord::Undo => "undo",
            CommandWord::Redo => "redo",
            CommandWord::Alias => "alias",
            CommandWord::Unalias => "unalias",
            CommandWord::Aliases => "aliases",
            CommandWord::ClearAliases => "clear-aliases",
            CommandWord::Bin => "bin",
            CommandWord::Back => "back",
            CommandWord::Help => "help",
            CommandWord::Exit => "exit",
        }
    }

    /// Usage line shown when the command text is malformed
    pub fn usage(&self) -> &'static str {
        match self {
            CommandWord::Add => {
                "add: Adds a source. Parameters: i/TITLE y/TYPE a/AUTHOR [d/DETAIL] [t/TAG]...\n\
                 Example: add i/Dune y/book a/Frank Herbert d/first edition t/scifi"
            }
            CommandWord::Edit => {
                "edit: Edits the source at INDEX. Parameters: INDEX [i/TITLE] [y/TYPE] [a/AUTHOR] \
                 [d/DETAIL] [t/TAG]...\nExample: edit 1 a/F. Herbert t/"
            }
            CommandWord::Field => {
                "field: Sets a bibliography field. Parameters: INDEX f/FIELD v/VALUE\n\
                 Fields: Journal, Publisher, City, Volume, Pages, Year\nExample: field 2 f/Year v/1965"
            }
            CommandWord::Delete => "delete: Deletes the source at INDEX.\nExample: delete 1",
            CommandWord::Restore => {
                "restore: Restores the source at INDEX to the active list.\nExample: restore 1"
            }
            CommandWord::EmptyBin => "empty-bin: Permanently deletes everything in the recycle bin.",
            CommandWord::Find => {
                "find: Lists sources matching any keyword. Parameters: KEYWORD [MORE_KEYWORDS]...\n\
                 Example: find herbert scifi"
            }
            CommandWord::List => "list: Lists all sources.",
            CommandWord::Pin => "pin: Pins the source at INDEX to the top.\nExample: pin 3",
            CommandWord::Unpin => "unpin: Unpins the source at INDEX.\nExample: unpin 1",
            CommandWord::Move => {
                "move: Moves the source at FROM to position TO. Parameters: FROM TO\nExample: move 4 2"
            }
            CommandWord::Select => "select: Shows the details of the source at INDEX.\nExample: select 2",
            CommandWord::Count => "count: Counts the listed sources.",
            CommandWord::Undo => "undo: Undoes the last change.",
            CommandWord::Redo => "redo: Redoes the last undone change.",
            CommandWord::Alias => {
                "alias: Adds an alias for a command. Parameters: al/ALIAS cm/COMMAND\n\
                 Example: alias al/c cm/count"
            }
            CommandWord::Unalias => "unalias: Removes an alias. Parameters: al/ALIAS\nExample: unalias al/c",
            CommandWord::Aliases => "aliases: Lists all aliases.",
            CommandWord::ClearAliases => "clear-aliases: Removes every alias.",
            CommandWord::Bin => "bin: Opens the recycle bin.",
            CommandWord::Back => "back: Leaves the recycle bin.",
            CommandWord::Help => "help: Shows the command summary.",
            CommandWord::Exit => "exit: Saves and exits.",
        }
    }

    /// Whether the word belongs to the grammar of `mode`.
    pub fn available_in(&self, mode: ParserMode) -> bool {
        use CommandWord::*;
        match self {
            Add | Edit | Field | Pin | Unpin | Move | Alias | Unalias | Aliases | ClearAliases
            | Bin => mode == ParserMode::Active,
            Restore | EmptyBin | Back => mode == ParserMode::RecycleBin,
            Delete | Find | List | Select | Count | Undo | Redo | Help | Exit => true,
        }
    }

    /// Alias-management commands cannot be aliased themselves.
    pub fn manages_aliases(&self) -> bool {
        matches!(
            self,
            CommandWord::Alias | CommandWord::Unalias | CommandWord::Aliases | CommandWord::ClearAliases
        )
    }
}

impl fmt::Display for CommandWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The set of command words recognized by a session.
///
/// Built once at startup and handed to the dispatcher and to alias
/// validation; nothing here is global.
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    words: Vec<CommandWord>,
}

impl CommandRegistry {
    /// Registry with every built-in command
    pub fn builtin() -> Self {
        Self {
            words: CommandWord::ALL.to_vec(),
        }
    }

    pub fn lookup(&self, word: &str) -> Option<CommandWord> {
        self.words.iter().copied().find(|w| w.as_str() == word)
    }

    pub fn is_command(&self, word: &str) -> bool {
        self.lookup(word).is_some()
    }

    /// Words valid in `mode`, in registry order
    pub fn words_in(&self, mode: ParserMode) -> impl Iterator<Item = CommandWord> + '_ {
        self.words.iter().copied().filter(move |w| w.available_in(mode))
    }

    /// One-line-per-command summary for `help`
    pub fn summary(&self, mode: ParserMode) -> String {
        let words: Vec<&str> = self.words_in(mode).map(|w| w.as_str()).collect();
        format!("{} commands: {}", mode, words.join(", "))
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
