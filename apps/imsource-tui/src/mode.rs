//! TUI interaction modes

/// Whether keys navigate the list or edit the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputMode {
    /// Navigation mode (default)
    #[default]
    Normal,
    /// Command entry mode (activated with :)
    Command,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputMode::Normal => write!(f, "NORMAL"),
            InputMode::Command => write!(f, "COMMAND"),
        }
    }
}

impl InputMode {
    /// Returns a short code for compact display.
    pub fn short_code(&self) -> &'static str {
        match self {
            InputMode::Normal => "NOR",
            InputMode::Command => "CMD",
        }
    }
}
