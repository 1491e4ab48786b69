//! Application state and main render loop

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use imsource_core::{BibField, Logic, ParserMode, Result, Source, Storage};

use crate::keybindings::{normal_mode_action, Action};
use crate::mode::InputMode;
use crate::widgets::ModeIndicator;

const KEY_HELP: &str = "\
Keys:
  j/k     - Move up/down
  Enter   - Show details
  p       - Pin / unpin
  u       - Undo
  Ctrl-r  - Redo
  b       - Recycle bin / back
  :       - Enter a command
  ?       - Toggle this help
  q       - Save and quit
";

/// Main application state
pub struct App<S: Storage> {
    /// Session state and persistence
    pub logic: Logic<S>,
    pub input_mode: InputMode,
    /// Command input buffer
    pub command_buffer: String,
    /// Feedback from the last command
    pub status_message: Option<String>,
    /// Whether to show the help overlay
    pub show_help: bool,
    /// Cursor position in the displayed list
    pub cursor: usize,
}

impl<S: Storage> App<S> {
    pub fn new(logic: Logic<S>) -> Self {
        Self {
            logic,
            input_mode: InputMode::Normal,
            command_buffer: String::new(),
            status_message: None,
            show_help: false,
            cursor: 0,
        }
    }

    /// Save what `exit` would save
    pub fn shutdown(&mut self) -> Result<()> {
        self.logic.shutdown()
    }

    /// Render the application
    pub fn render(&self, frame: &mut Frame) {
        let size = frame.area();

        // Status bar at top, content in middle, command line at bottom
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(size);

        self.render_status_bar(frame, chunks[0]);

        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[1]);

        self.render_source_list(frame, content_chunks[0]);
        self.render_detail(frame, content_chunks[1]);
        self.render_command_line(frame, chunks[2]);

        if self.show_help {
            self.render_help_overlay(frame, size);
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let model = self.logic.model();
        let input_color = match self.input_mode {
            InputMode::Normal => Color::Blue,
            InputMode::Command => Color::Magenta,
        };

        let mut spans = vec![
            Span::raw(" "),
            ModeIndicator::new(model.mode()).as_span(),
            Span::raw(" "),
            Span::styled(
                format!("[{}]", self.input_mode.short_code()),
                Style::default().fg(input_color).add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(
                " | {} active | {} in bin | {} pinned",
                model.active().len(),
                model.bin().len(),
                model.pinned_count()
            )),
        ];
        if let Some(keywords) = model.filter() {
            spans.push(Span::styled(
                format!(" | find: {}", keywords.join(" ")),
                Style::default().fg(Color::Cyan),
            ));
        }
        spans.push(Span::raw(" | Press ? for help"));

        let status_bar = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
        frame.render_widget(status_bar, area);
    }

    fn render_source_list(&self, frame: &mut Frame, area: Rect) {
        let model = self.logic.model();
        let items: Vec<ListItem> = model
            .displayed()
            .into_iter()
            .enumerate()
            .map(|(i, source)| {
                let style = if i == self.cursor {
                    Style::default().bg(Color::Blue).fg(Color::White)
                } else if source.pinned {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                };
                let marker = if source.pinned { "*" } else { " " };
                ListItem::new(format!(
                    "{:>3}. {} {} - {}",
                    i + 1,
                    marker,
                    source.title,
                    source.author
                ))
                .style(style)
            })
            .collect();

        let title = match model.mode() {
            ParserMode::Active => "Sources",
            ParserMode::RecycleBin => "Recycle Bin",
        };
        let list = List::new(items).block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(list, area);
    }

    fn render_detail(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().title("Details").borders(Borders::ALL);
        let lines = match self.logic.model().selected() {
            Some(source) => detail_lines(source),
            None => vec![Line::from("Press Enter to show a source")],
        };
        let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }

    fn render_command_line(&self, frame: &mut Frame, area: Rect) {
        let content = match self.input_mode {
            InputMode::Command => format!(":{}", self.command_buffer),
            InputMode::Normal => self
                .status_message
                .as_deref()
                .and_then(|message| message.lines().next())
                .unwrap_or("Press : for commands")
                .to_string(),
        };

        frame.render_widget(Paragraph::new(content), area);
    }

    fn render_help_overlay(&self, frame: &mut Frame, area: Rect) {
        let mode = self.logic.model().mode();
        let mut text = format!("Imsource - Help\n\n{KEY_HELP}\n{mode} commands:\n");
        for word in self.logic.registry().words_in(mode) {
            text.push_str("  ");
            text.push_str(word.usage().lines().next().unwrap_or_default());
            text.push('\n');
        }

        let block = Block::default()
            .title("Help")
            .borders(Borders::ALL)
            .style(Style::default().bg(Color::Black));

        let help_area = centered_rect(80, 90, area);
        frame.render_widget(Clear, help_area);
        let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: false });
        frame.render_widget(paragraph, help_area);
    }

    /// Handle a key press, returns true if app should quit
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> Result<bool> {
        match self.input_mode {
            InputMode::Normal => self.handle_normal_key(code, modifiers),
            InputMode::Command => self.handle_command_key(code),
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> Result<bool> {
        let Some(action) = normal_mode_action(code, modifiers) else {
            return Ok(false);
        };
        match action {
            Action::Quit => return self.run_command("exit"),
            Action::EnterCommandMode => {
                self.input_mode = InputMode::Command;
                self.command_buffer.clear();
            }
            Action::ToggleHelp => self.show_help = !self.show_help,
            Action::MoveDown => {
                let len = self.logic.model().displayed().len();
                if self.cursor + 1 < len {
                    self.cursor += 1;
                }
            }
            Action::MoveUp => self.cursor = self.cursor.saturating_sub(1),
            Action::Select => return self.run_command(&format!("select {}", self.cursor + 1)),
            Action::TogglePin => {
                let model = self.logic.model();
                if model.mode() != ParserMode::Active {
                    self.status_message = Some("Pins only apply to the active list".to_string());
                    return Ok(false);
                }
                let pinned = model
                    .displayed()
                    .get(self.cursor)
                    .is_some_and(|source| source.pinned);
                let word = if pinned { "unpin" } else { "pin" };
                return self.run_command(&format!("{word} {}", self.cursor + 1));
            }
            Action::Undo => return self.run_command("undo"),
            Action::Redo => return self.run_command("redo"),
            Action::ToggleBin => {
                let word = match self.logic.model().mode() {
                    ParserMode::Active => "bin",
                    ParserMode::RecycleBin => "back",
                };
                return self.run_command(word);
            }
            Action::Cancel => {
                self.show_help = false;
                self.status_message = None;
            }
        }
        Ok(false)
    }

    fn handle_command_key(&mut self, code: KeyCode) -> Result<bool> {
        match code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.command_buffer.clear();
            }
            KeyCode::Enter => {
                let input = std::mem::take(&mut self.command_buffer);
                self.input_mode = InputMode::Normal;
                if input.trim().is_empty() {
                    return Ok(false);
                }
                return self.run_command(&input);
            }
            KeyCode::Backspace => {
                self.command_buffer.pop();
            }
            KeyCode::Char(c) => {
                self.command_buffer.push(c);
            }
            _ => {}
        }
        Ok(false)
    }

    /// Execute one line through the session. User errors end up on the status
    /// line; anything that leaves the session unusable is returned.
    fn run_command(&mut self, input: &str) -> Result<bool> {
        let outcome = self.logic.execute(input);
        let quit = match outcome {
            Ok(result) => {
                self.show_help = result.show_help;
                self.status_message = Some(result.feedback);
                result.exit
            }
            Err(err) if err.is_recoverable() => {
                tracing::debug!(input, "command rejected: {}", err);
                self.status_message = Some(err.to_string());
                false
            }
            Err(err) => {
                tracing::error!(input, "command failed: {}", err);
                return Err(err);
            }
        };

        let len = self.logic.model().displayed().len();
        if self.cursor >= len {
            self.cursor = len.saturating_sub(1);
        }
        Ok(quit)
    }
}

fn detail_lines(source: &Source) -> Vec<Line<'static>> {
    let label = Style::default().fg(Color::Cyan);
    let field = |name: &str, value: &str| {
        Line::from(vec![
            Span::styled(format!("{name:<10}"), label),
            Span::raw(value.to_string()),
        ])
    };

    let mut lines = vec![
        Line::from(Span::styled(
            source.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        field("Type", &source.source_type),
        field("Author", &source.author),
    ];
    if !source.detail.is_empty() {
        lines.push(field("Detail", &source.detail));
    }
    if !source.tags.is_empty() {
        let tags: Vec<&str> = source.tags.iter().map(String::as_str).collect();
        lines.push(field("Tags", &tags.join(", ")));
    }
    for bib in BibField::ALL {
        let value = source.bib_field(bib);
        if !value.is_empty() {
            lines.push(field(bib.name(), value));
        }
    }
    if source.pinned {
        lines.push(Line::from(Span::styled("Pinned", Style::default().fg(Color::Yellow))));
    }
    lines
}

/// Helper function to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use imsource_core::MemoryStorage;
    use ratatui::{backend::TestBackend, Terminal};

    fn app_with(titles: &[&str]) -> App<MemoryStorage> {
        let storage = MemoryStorage {
            active: titles
                .iter()
                .map(|t| Source::new(*t, "book", "Anon"))
                .collect(),
            ..Default::default()
        };
        App::new(Logic::new(storage))
    }

    fn press(app: &mut App<MemoryStorage>, code: KeyCode) -> bool {
        app.handle_key(code, KeyModifiers::NONE).unwrap()
    }

    fn type_command(app: &mut App<MemoryStorage>, input: &str) -> bool {
        press(app, KeyCode::Char(':'));
        for c in input.chars() {
            press(app, KeyCode::Char(c));
        }
        press(app, KeyCode::Enter)
    }

    fn active_titles(app: &App<MemoryStorage>) -> Vec<String> {
        app.logic
            .model()
            .active()
            .live()
            .iter()
            .map(|s| s.title.clone())
            .collect()
    }

    #[test]
    fn test_command_line_executes() {
        let mut app = app_with(&[]);
        assert!(!type_command(&mut app, "add i/Dune y/book a/Frank Herbert"));
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(active_titles(&app), ["Dune"]);
        assert!(app
            .status_message
            .as_deref()
            .is_some_and(|m| m.starts_with("New source added")));
    }

    #[test]
    fn test_user_error_goes_to_status_line() {
        let mut app = app_with(&[]);
        assert!(!type_command(&mut app, "frobnicate"));
        assert!(app.status_message.is_some());
    }

    #[test]
    fn test_pin_key_toggles() {
        let mut app = app_with(&["A", "B"]);
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('p'));
        assert_eq!(active_titles(&app), ["B", "A"]);
        assert_eq!(app.logic.model().pinned_count(), 1);

        press(&mut app, KeyCode::Char('k'));
        press(&mut app, KeyCode::Char('p'));
        assert_eq!(app.logic.model().pinned_count(), 0);
    }

    #[test]
    fn test_bin_key_switches_mode() {
        let mut app = app_with(&["A"]);
        type_command(&mut app, "delete 1");
        press(&mut app, KeyCode::Char('b'));
        assert_eq!(app.logic.model().mode(), ParserMode::RecycleBin);
        press(&mut app, KeyCode::Char('b'));
        assert_eq!(app.logic.model().mode(), ParserMode::Active);
    }

    #[test]
    fn test_undo_redo_keys() {
        let mut app = app_with(&["A"]);
        type_command(&mut app, "delete 1");
        press(&mut app, KeyCode::Char('u'));
        assert_eq!(active_titles(&app), ["A"]);
        app.handle_key(KeyCode::Char('r'), KeyModifiers::CONTROL)
            .unwrap();
        assert!(active_titles(&app).is_empty());
    }

    #[test]
    fn test_quit_saves_pins() {
        let mut app = app_with(&["A", "B"]);
        type_command(&mut app, "pin 2");
        assert!(press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.logic.storage().pinned_count, 1);
    }

    #[test]
    fn test_escape_abandons_command() {
        let mut app = app_with(&["A"]);
        press(&mut app, KeyCode::Char(':'));
        press(&mut app, KeyCode::Char('x'));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.command_buffer.is_empty());
    }

    #[test]
    fn test_render_shows_sources_and_mode() {
        let mut app = app_with(&["Dune"]);
        press(&mut app, KeyCode::Enter);

        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        let screen: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(screen.contains("Dune"));
        assert!(screen.contains("[ACT]"));
        assert!(screen.contains("Details"));
    }
}
