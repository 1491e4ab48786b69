//! Parser modes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dual_list::ListKind;

/// Which grammar is in effect and which collection commands operate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ParserMode {
    /// Working on the active list (default).
    #[default]
    Active,
    /// Browsing the recycle bin.
    RecycleBin,
}

impl ParserMode {
    /// Returns the display name for this mode.
    pub fn display_name(&self) -> &'static str {
        match self {
            ParserMode::Active => "ACTIVE",
            ParserMode::RecycleBin => "RECYCLE BIN",
        }
    }

    /// Returns a short code for this mode (for compact display).
    pub fn short_code(&self) -> &'static str {
        match self {
            ParserMode::Active => "ACT",
            ParserMode::RecycleBin => "BIN",
        }
    }

    /// The collection list-display commands show in this mode.
    pub fn list(&self) -> ListKind {
        match self {
            ParserMode::Active => ListKind::Active,
            ParserMode::RecycleBin => ListKind::Bin,
        }
    }
}

impl fmt::Display for ParserMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Two-state machine: ACTIVE <-> RECYCLE_BIN, changed only by explicit commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModeMachine {
    mode: ParserMode,
}

impl ModeMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> ParserMode {
        self.mode
    }

    /// ACTIVE -> RECYCLE_BIN. Returns whether the mode changed.
    pub fn enter_recycle_bin(&mut self) -> bool {
        self.transition(ParserMode::RecycleBin)
    }

    /// RECYCLE_BIN -> ACTIVE. Returns whether the mode changed.
    pub fn exit_recycle_bin(&mut self) -> bool {
        self.transition(ParserMode::Active)
    }

    fn transition(&mut self, to: ParserMode) -> bool {
        if self.mode == to {
            return false;
        }
        tracing::info!(from = %self.mode, to = %to, "parser mode changed");
        self.mode = to;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mode() {
        assert_eq!(ModeMachine::new().mode(), ParserMode::Active);
    }

    #[test]
    fn test_transitions() {
        let mut machine = ModeMachine::new();
        assert!(machine.enter_recycle_bin());
        assert_eq!(machine.mode(), ParserMode::RecycleBin);
        assert!(!machine.enter_recycle_bin());
        assert!(machine.exit_recycle_bin());
        assert_eq!(machine.mode(), ParserMode::Active);
        assert!(!machine.exit_recycle_bin());
    }

    #[test]
    fn test_mode_selects_list() {
        assert_eq!(ParserMode::Active.list(), ListKind::Active);
        assert_eq!(ParserMode::RecycleBin.list(), ListKind::Bin);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(ParserMode::Active.to_string(), "ACTIVE");
        assert_eq!(ParserMode::RecycleBin.short_code(), "BIN");
    }
}
