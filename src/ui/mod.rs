pub mod report;
pub mod theme;
pub mod widgets;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
};

use crate::{
    app::state::{AppMode, AppState, Panel},
    ui::theme::{Theme, detect_color_capability, theme_for},
};

const MIN_WIDTH: u16 = 40;
const MIN_HEIGHT: u16 = 12;

pub fn render(frame: &mut Frame, state: &AppState) {
    render_with_theme(frame, state, theme_for(detect_color_capability()));
}

pub fn render_with_theme(frame: &mut Frame, state: &AppState, theme: Theme) {
    let area = frame.area();

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let warning = Paragraph::new(format!(
            "Terminal too small. Resize to at least {MIN_WIDTH}x{MIN_HEIGHT}."
        ))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("weather-report"),
        );
        frame.render_widget(warning, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    render_tabs(frame, chunks[0], state, theme);
    render_body(frame, chunks[1], state, theme);
    render_status_bar(frame, chunks[2], state, theme);

    if state.mode == AppMode::CityPrompt {
        widgets::city_prompt::render(frame, centered_rect(60, 40, chunks[1]), state, theme);
    }
}

fn render_tabs(frame: &mut Frame, area: Rect, state: &AppState, theme: Theme) {
    let titles = Panel::ALL
        .iter()
        .enumerate()
        .map(|(idx, panel)| format!("{} {}", idx + 1, panel.title()))
        .collect::<Vec<_>>();
    let tabs = Tabs::new(titles)
        .select(state.panel.index())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border))
                .title("weather-report"),
        )
        .style(Style::default().fg(theme.muted_text))
        .highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

fn render_body(frame: &mut Frame, area: Rect, state: &AppState, theme: Theme) {
    match (state.mode, state.report.as_ref()) {
        (AppMode::Loading, _) => render_message(
            frame,
            area,
            theme,
            "Loading",
            vec![Line::from(format!(
                "Fetching weather for {}...",
                state.active_city.as_deref().unwrap_or_default()
            ))],
        ),
        (AppMode::Error, _) => {
            let message = state.last_error.as_deref().unwrap_or("Unknown error");
            render_message(
                frame,
                area,
                theme,
                "Error",
                vec![
                    Line::from(Span::styled(
                        message.to_string(),
                        Style::default().fg(theme.danger),
                    )),
                    Line::default(),
                    Line::from(Span::styled(
                        "Press r to retry or c to choose another city.",
                        Style::default().fg(theme.muted_text),
                    )),
                ],
            );
        }
        (_, Some(report)) => match state.panel {
            Panel::Current => {
                widgets::current::render(frame, area, report, &state.aggregator, theme);
            }
            Panel::Forecast => widgets::forecast::render(
                frame,
                area,
                report,
                &state.aggregator,
                state.forecast_scroll,
                theme,
            ),
            Panel::Assistant => widgets::assistant::render(frame, area, state, theme),
        },
        (_, None) => render_message(
            frame,
            area,
            theme,
            "Welcome",
            vec![Line::from("Enter a city to look up its weather.")],
        ),
    }
}

fn render_message(
    frame: &mut Frame,
    area: Rect,
    theme: Theme,
    title: &'static str,
    lines: Vec<Line<'static>>,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(theme.border));
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState, theme: Theme) {
    let hints = match state.mode {
        AppMode::CityPrompt if state.report.is_some() => "Enter search  Esc back  Ctrl-C quit",
        AppMode::CityPrompt => "Enter search  Esc quit",
        AppMode::Loading => "q quit",
        AppMode::Error => "r retry  c change city  q quit",
        AppMode::Ready if state.panel == Panel::Assistant => {
            "Enter send  Tab next panel  Esc quit"
        }
        AppMode::Ready => "Tab/1-3 panels  Up/Down scroll  r refresh  c change city  q quit",
        AppMode::Quit => "",
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            hints,
            Style::default().fg(theme.muted_text),
        ))),
        area,
    );
}

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
