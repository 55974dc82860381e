use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    data::openweather::WeatherReport,
    domain::aggregate::ForecastAggregator,
    ui::{
        report::current_rows,
        theme::{Theme, temp_color},
    },
};

use super::shared::panel_block;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    report: &WeatherReport,
    aggregator: &ForecastAggregator,
    theme: Theme,
) {
    let current = &report.current;
    let rows = current_rows(current, aggregator.offset(), aggregator.labels().unknown);
    let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);

    let lines = rows
        .into_iter()
        .map(|(label, value)| {
            let value_style = match label {
                "Temperature" => Style::default()
                    .fg(temp_color(&theme, current.temperature_c))
                    .add_modifier(Modifier::BOLD),
                "Feels like" => Style::default().fg(temp_color(&theme, current.feels_like_c)),
                _ => Style::default().fg(theme.text),
            };
            Line::from(vec![
                Span::styled(
                    format!("{label:<width$}  "),
                    Style::default().fg(theme.muted_text),
                ),
                Span::styled(value, value_style),
            ])
        })
        .collect::<Vec<_>>();

    let title = format!("Current weather: {}", current.city);
    frame.render_widget(
        Paragraph::new(lines).block(panel_block(title, theme)),
        area,
    );
}
