use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Clear},
    Frame,
};

/// Creates a block with conditional focus styling (yellow border when focused)
pub fn focused_block(title: &str, is_focused: bool) -> Block<'_> {
    let block = Block::bordered().title(title);
    if is_focused {
        block.border_style(Style::new().yellow())
    } else {
        block
    }
}

/// A fixed-size rectangle centred in `area`, shrunk to fit if needed.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    cell
}

/// Clears `area` and draws a bordered modal frame, returning its inner area.
pub fn modal_frame(frame: &mut Frame, area: Rect, title: &str) -> Rect {
    let block = Block::bordered().title(title).border_style(Style::new().cyan());
    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);
    inner
}

/// Form field lines: a label, the value with a cursor when focused, and an
/// optional error message underneath.
pub fn field_lines<'a>(
    label: &'a str,
    value: &'a str,
    focused: bool,
    error: Option<&'a str>,
) -> Vec<Line<'a>> {
    let label_style = if focused {
        Style::new().yellow().bold()
    } else {
        Style::new().gray()
    };
    let mut value_spans = vec![Span::raw("> "), Span::raw(value)];
    if focused {
        value_spans.push(Span::styled("▏", Style::new().yellow()));
    }

    let mut lines = vec![
        Line::from(Span::styled(format!("{}:", label), label_style)),
        Line::from(value_spans),
    ];
    if let Some(msg) = error {
        lines.push(Line::from(Span::styled(msg, Style::new().red())));
    }
    lines
}

/// A `key  description` hint line in the help and footer style.
pub fn hint_line<'a>(key: &'a str, description: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(key, Style::new().bold().cyan()),
        Span::raw(format!("  {}", description)),
    ])
}

/// Shortens `text` to at most `max` characters, marking the cut with `…`.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}
