use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use crate::{
    data::openweather::WeatherReport,
    domain::aggregate::ForecastAggregator,
    ui::{
        report::{FORECAST_TITLE, FORECAST_UNAVAILABLE, forecast_unavailable_reason, summary_lines},
        theme::{Theme, temp_color},
    },
};

use super::shared::panel_block;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    report: &WeatherReport,
    aggregator: &ForecastAggregator,
    scroll: usize,
    theme: Theme,
) {
    let days = report
        .forecast
        .as_ref()
        .map(|samples| aggregator.aggregate(samples))
        .unwrap_or_default();

    let mut lines = vec![
        Line::from(Span::styled(
            format!("City: {}", report.current.city),
            Style::default().fg(theme.muted_text),
        )),
        Line::default(),
    ];

    if let Some(reason) = forecast_unavailable_reason(report, &days) {
        lines.push(Line::from(Span::styled(
            FORECAST_UNAVAILABLE,
            Style::default().fg(theme.danger).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            reason,
            Style::default().fg(theme.muted_text),
        )));
    } else {
        for day in days.iter().skip(scroll) {
            lines.push(Line::from(vec![
                Span::styled(
                    day.heading(),
                    Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled(
                    format!("{:.0}°", day.temp_max_c),
                    Style::default().fg(temp_color(&theme, day.temp_max_c)),
                ),
                Span::styled(" / ", Style::default().fg(theme.muted_text)),
                Span::styled(
                    format!("{:.0}°", day.temp_min_c),
                    Style::default().fg(temp_color(&theme, day.temp_min_c)),
                ),
            ]));
            lines.extend(
                summary_lines(day)
                    .into_iter()
                    .map(|line| Line::from(format!("  {line}"))),
            );
            lines.push(Line::default());
        }
    }

    let title = format!("{FORECAST_TITLE} ({} days)", days.len());
    frame.render_widget(
        Paragraph::new(lines)
            .block(panel_block(title, theme))
            .wrap(Wrap { trim: false }),
        area,
    );
}
