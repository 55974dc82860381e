use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use crate::{
    app::state::{AppState, Speaker},
    ui::theme::Theme,
};

use super::shared::panel_block;

pub fn render(frame: &mut Frame, area: Rect, state: &AppState, theme: Theme) {
    let chunks = Layout::vertical([Constraint::Min(3), Constraint::Length(3)]).split(area);

    let mut lines = Vec::new();
    for entry in &state.chat {
        let (label, color) = match entry.speaker {
            Speaker::User => ("You", theme.accent),
            Speaker::Assistant => ("Assistant", theme.success),
            Speaker::System => ("Notice", theme.warning),
        };
        lines.push(Line::from(Span::styled(
            format!("{label}:"),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));
        lines.extend(entry.text.lines().map(|line| Line::from(line.to_string())));
        lines.push(Line::default());
    }
    if state.assistant_pending {
        lines.push(Line::from(Span::styled(
            "Thinking...",
            Style::default().fg(theme.muted_text),
        )));
    }

    // Keep the newest lines in view.
    let visible = usize::from(chunks[0].height.saturating_sub(2));
    let scroll = lines.len().saturating_sub(visible);
    let transcript = Paragraph::new(lines)
        .block(panel_block("Clothing assistant".to_string(), theme))
        .wrap(Wrap { trim: false })
        .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0));
    frame.render_widget(transcript, chunks[0]);

    let input = Paragraph::new(Line::from(vec![
        Span::styled("> ", Style::default().fg(theme.accent)),
        Span::raw(format!("{}_", state.chat_input)),
    ]))
    .block(panel_block("Ask a question (Enter to send)".to_string(), theme));
    frame.render_widget(input, chunks[1]);
}
