//! Command argument parsing.
//!
//! Grammar: `<word> [<preamble>] [<prefix><value>]...` where a prefix is one
//! of the tokens in [`Prefix`] and must follow whitespace. Text before the
//! first prefix is the preamble (indices, keywords).

use std::collections::{BTreeSet, HashMap};

use lazy_static::lazy_static;
use regex::Regex;

use crate::command::{Command, EditDescriptor};
use crate::error::ParseError;
use crate::registry::CommandWord;
use crate::source::{BibField, Source};

lazy_static! {
    static ref PREFIX_PATTERN: Regex = Regex::new(r"(?:^|\s)(al|cm|i|y|a|d|t|f|v)/").unwrap();
    static ref INDEX_PATTERN: Regex = Regex::new(r"^[1-9][0-9]*$").unwrap();
}

/// Argument prefixes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prefix {
    Title,
    Type,
    Author,
    Detail,
    Tag,
    Field,
    Value,
    AliasName,
    CommandName,
}

impl Prefix {
    pub fn token(&self) -> &'static str {
        match self {
            Prefix::Title => "i/",
            Prefix::Type => "y/",
            Prefix::Author => "a/",
            Prefix::Detail => "d/",
            Prefix::Tag => "t/",
            Prefix::Field => "f/",
            Prefix::Value => "v/",
            Prefix::AliasName => "al/",
            Prefix::CommandName => "cm/",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "i" => Some(Prefix::Title),
            "y" => Some(Prefix::Type),
            "a" => Some(Prefix::Author),
            "d" => Some(Prefix::Detail),
            "t" => Some(Prefix::Tag),
            "f" => Some(Prefix::Field),
            "v" => Some(Prefix::Value),
            "al" => Some(Prefix::AliasName),
            "cm" => Some(Prefix::CommandName),
            _ => None,
        }
    }
}

const SOURCE_PREFIXES: [Prefix; 5] = [
    Prefix::Title,
    Prefix::Type,
    Prefix::Author,
    Prefix::Detail,
    Prefix::Tag,
];

/// Preamble plus prefixed values of one command's argument text.
#[derive(Debug, Clone, Default)]
pub struct ArgMap {
    preamble: String,
    values: HashMap<Prefix, Vec<String>>,
}

impl ArgMap {
    /// Split `args` on the `allowed` prefixes. Prefix-like text for any other
    /// prefix stays part of the surrounding value.
    pub fn tokenize(args: &str, allowed: &[Prefix]) -> Self {
        // (prefix, start of prefix token, start of value)
        let mut marks: Vec<(Prefix, usize, usize)> = Vec::new();
        for caps in PREFIX_PATTERN.captures_iter(args) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if let Some(prefix) = Prefix::from_name(name.as_str()) {
                if allowed.contains(&prefix) {
                    marks.push((prefix, name.start(), whole.end()));
                }
            }
        }

        let preamble_end = marks.first().map_or(args.len(), |m| m.1);
        let mut map = ArgMap {
            preamble: args[..preamble_end].trim().to_string(),
            values: HashMap::new(),
        };
        for (i, (prefix, _, value_start)) in marks.iter().enumerate() {
            let value_end = marks.get(i + 1).map_or(args.len(), |next| next.1);
            map.values
                .entry(*prefix)
                .or_default()
                .push(args[*value_start..value_end].trim().to_string());
        }
        map
    }

    pub fn preamble(&self) -> &str {
        &self.preamble
    }

    /// The last value given for `prefix`
    pub fn value(&self, prefix: Prefix) -> Option<&str> {
        self.values
            .get(&prefix)
            .and_then(|v| v.last())
            .map(String::as_str)
    }

    pub fn all_values(&self, prefix: Prefix) -> &[String] {
        self.values.get(&prefix).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has(&self, prefix: Prefix) -> bool {
        self.values.contains_key(&prefix)
    }
}

fn invalid(message: impl Into<String>, word: CommandWord) -> ParseError {
    ParseError::InvalidFormat {
        message: message.into(),
        usage: word.usage(),
    }
}

/// Parse a 1-based index into a 0-based one.
pub fn parse_index(text: &str, word: CommandWord) -> Result<usize, ParseError> {
    let text = text.trim();
    if !INDEX_PATTERN.is_match(text) {
        return Err(invalid(format!("'{text}' is not a positive index"), word));
    }
    text.parse::<usize>()
        .map(|n| n - 1)
        .map_err(|_| invalid(format!("'{text}' is too large"), word))
}

fn required<'a>(args: &'a ArgMap, prefix: Prefix, word: CommandWord) -> Result<&'a str, ParseError> {
    match args.value(prefix) {
        Some(value) if !value.is_empty() => Ok(value),
        Some(_) => Err(invalid(format!("{} cannot be blank", prefix.token()), word)),
        None => Err(invalid(format!("missing {}", prefix.token()), word)),
    }
}

fn non_blank(value: Option<&str>, prefix: Prefix, word: CommandWord) -> Result<Option<String>, ParseError> {
    match value {
        Some("") => Err(invalid(format!("{} cannot be blank", prefix.token()), word)),
        other => Ok(other.map(str::to_string)),
    }
}

fn parse_tags(values: &[String], word: CommandWord) -> Result<BTreeSet<String>, ParseError> {
    let mut tags = BTreeSet::new();
    for tag in values.iter().filter(|t| !t.is_empty()) {
        if tag.chars().any(char::is_whitespace) {
            return Err(invalid(format!("tag '{tag}' must be a single word"), word));
        }
        tags.insert(tag.clone());
    }
    Ok(tags)
}

/// Parse the argument text of `word` into a [`Command`].
pub fn parse_command(word: CommandWord, args: &str) -> Result<Command, ParseError> {
    use CommandWord as W;
    match word {
        W::Add => parse_add(args),
        W::Edit => parse_edit(args),
        W::Field => parse_field(args),
        W::Delete => Ok(Command::Delete {
            index: parse_index(args, word)?,
        }),
        W::Restore => Ok(Command::Restore {
            index: parse_index(args, word)?,
        }),
        W::Pin => Ok(Command::Pin {
            index: parse_index(args, word)?,
        }),
        W::Unpin => Ok(Command::Unpin {
            index: parse_index(args, word)?,
        }),
        W::Select => Ok(Command::Select {
            index: parse_index(args, word)?,
        }),
        W::Move => parse_move(args),
        W::Find => {
            let keywords: Vec<String> = args.split_whitespace().map(str::to_string).collect();
            if keywords.is_empty() {
                return Err(invalid("at least one keyword is required", word));
            }
            Ok(Command::Find { keywords })
        }
        W::Alias => {
            let map = ArgMap::tokenize(args, &[Prefix::AliasName, Prefix::CommandName]);
            Ok(Command::Alias {
                alias: required(&map, Prefix::AliasName, word)?.to_string(),
                command: required(&map, Prefix::CommandName, word)?.to_string(),
            })
        }
        W::Unalias => {
            let map = ArgMap::tokenize(args, &[Prefix::AliasName]);
            Ok(Command::Unalias {
                alias: required(&map, Prefix::AliasName, word)?.to_string(),
            })
        }
        W::EmptyBin => Ok(Command::EmptyBin),
        W::List => Ok(Command::List),
        W::Count => Ok(Command::Count),
        W::Undo => Ok(Command::Undo),
        W::Redo => Ok(Command::Redo),
        W::Aliases => Ok(Command::Aliases),
        W::ClearAliases => Ok(Command::ClearAliases),
        W::Bin => Ok(Command::EnterBin),
        W::Back => Ok(Command::ExitBin),
        W::Help => Ok(Command::Help),
        W::Exit => Ok(Command::Exit),
    }
}

fn parse_add(args: &str) -> Result<Command, ParseError> {
    let word = CommandWord::Add;
    let map = ArgMap::tokenize(args, &SOURCE_PREFIXES);
    if !map.preamble().is_empty() {
        return Err(invalid(format!("unexpected text '{}'", map.preamble()), word));
    }
    let source = Source::new(
        required(&map, Prefix::Title, word)?,
        required(&map, Prefix::Type, word)?,
        required(&map, Prefix::Author, word)?,
    )
    .with_detail(map.value(Prefix::Detail).unwrap_or(""))
    .with_tags(parse_tags(map.all_values(Prefix::Tag), word)?);
    Ok(Command::Add { source })
}

fn parse_edit(args: &str) -> Result<Command, ParseError> {
    let word = CommandWord::Edit;
    let map = ArgMap::tokenize(args, &SOURCE_PREFIXES);
    let index = parse_index(map.preamble(), word)?;
    let edit = EditDescriptor {
        title: non_blank(map.value(Prefix::Title), Prefix::Title, word)?,
        source_type: non_blank(map.value(Prefix::Type), Prefix::Type, word)?,
        author: non_blank(map.value(Prefix::Author), Prefix::Author, word)?,
        detail: map.value(Prefix::Detail).map(str::to_string),
        tags: if map.has(Prefix::Tag) {
            Some(parse_tags(map.all_values(Prefix::Tag), word)?)
        } else {
            None
        },
    };
    if edit.is_empty() {
        return Err(invalid("at least one field to edit must be provided", word));
    }
    Ok(Command::Edit { index, edit })
}

fn parse_field(args: &str) -> Result<Command, ParseError> {
    let word = CommandWord::Field;
    let map = ArgMap::tokenize(args, &[Prefix::Field, Prefix::Value]);
    let index = parse_index(map.preamble(), word)?;
    let field = required(&map, Prefix::Field, word)?
        .parse::<BibField>()
        .map_err(|err| invalid(err.to_string(), word))?;
    let value = map
        .value(Prefix::Value)
        .ok_or_else(|| invalid(format!("missing {}", Prefix::Value.token()), word))?;
    Ok(Command::Field {
        index,
        field,
        value: value.to_string(),
    })
}

fn parse_move(args: &str) -> Result<Command, ParseError> {
    let word = CommandWord::Move;
    let parts: Vec<&str> = args.split_whitespace().collect();
    let [from, to] = parts.as_slice() else {
        return Err(invalid("expected exactly two indices", word));
    };
    Ok(Command::Move {
        from: parse_index(from, word)?,
        to: parse_index(to, word)?,
    })
}
