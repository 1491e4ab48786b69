//! Parser mode indicator for the status bar.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::Widget,
};

use imsource_core::ParserMode;

/// Shows which collection commands currently apply to.
///
/// - Active list: Blue
/// - Recycle bin: Red
pub struct ModeIndicator {
    mode: ParserMode,
}

impl ModeIndicator {
    pub fn new(mode: ParserMode) -> Self {
        Self { mode }
    }

    pub fn mode_color(mode: ParserMode) -> Color {
        match mode {
            ParserMode::Active => Color::Blue,
            ParserMode::RecycleBin => Color::Red,
        }
    }

    fn style(&self) -> Style {
        Style::default()
            .fg(Color::White)
            .bg(Self::mode_color(self.mode))
            .add_modifier(Modifier::BOLD)
    }

    fn text(&self) -> String {
        format!("[{}]", self.mode.short_code())
    }

    /// Render as a styled span (for embedding in other widgets).
    pub fn as_span(&self) -> Span<'static> {
        Span::styled(self.text(), self.style())
    }
}

impl Widget for ModeIndicator {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text = self.text();
        if area.width >= text.len() as u16 && area.height >= 1 {
            buf.set_string(area.x, area.y, &text, self.style());
        }
    }
}
