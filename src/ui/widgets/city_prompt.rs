use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::{app::state::AppState, ui::theme::Theme};

use super::shared::panel_block;

pub fn render(frame: &mut Frame, area: Rect, state: &AppState, theme: Theme) {
    frame.render_widget(Clear, area);

    let block = panel_block("Choose a city".to_string(), theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(2),
        Constraint::Min(0),
    ])
    .split(inner);

    let query = if state.city_input.is_empty() {
        Span::styled(
            "Type a city name and press Enter",
            Style::default().fg(theme.muted_text),
        )
    } else {
        Span::styled(
            format!("{}_", state.city_input),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )
    };
    let input = Paragraph::new(Line::from(vec![
        Span::styled("City: ", Style::default().fg(theme.accent)),
        query,
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(theme.border)),
    );
    frame.render_widget(input, chunks[0]);

    if let Some(hint) = &state.city_hint {
        let hint = Paragraph::new(hint.as_str())
            .style(Style::default().fg(theme.warning))
            .wrap(Wrap { trim: true });
        frame.render_widget(hint, chunks[1]);
    }
}
