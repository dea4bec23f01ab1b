//! Panel 3 — Input Comparison: risk-free rate, market return and the
//! expected return side by side.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Bar, BarChart, BarGroup, Paragraph};
use ratatui::Frame;

use capmlab_core::{FormatPolicy, InputComparison};

use crate::app::AppState;
use crate::theme;

/// Bars are integer-valued; percentages are scaled to basis points.
const BAR_SCALE: f64 = 100.0;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    match &app.calc.report {
        Some(report) => render_bars(f, area, &report.comparison, app.settings.format),
        None => {
            let lines = vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Calculate first to compare inputs with the expected return.",
                    theme::muted(),
                )),
            ];
            f.render_widget(Paragraph::new(lines), area);
        }
    }
}

/// Integer bar height for a percentage. Negative values draw as empty bars;
/// the text label still shows the real number.
pub fn bar_height(value_pct: f64) -> u64 {
    if !value_pct.is_finite() || value_pct <= 0.0 {
        0
    } else {
        (value_pct * BAR_SCALE).round() as u64
    }
}

fn render_bars(f: &mut Frame, area: Rect, comparison: &InputComparison, policy: FormatPolicy) {
    let colors = [theme::muted(), theme::neutral(), theme::positive()];

    let bars: Vec<Bar> = comparison
        .bars()
        .iter()
        .zip(colors)
        .map(|((label, value), style)| {
            Bar::default()
                .label(Line::from(*label))
                .value(bar_height(*value))
                .text_value(policy.format_percent(*value))
                .style(style)
                .value_style(Style::default().fg(theme::TEXT).bg(style.fg.unwrap_or(theme::ACCENT)))
        })
        .collect();

    // Three bars sharing the width, with gaps.
    let bar_width = (area.width.saturating_sub(8) / 3).clamp(3, 30);

    let chart = BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(2)
        .max(bar_height(comparison.max()).max(1));

    f.render_widget(chart, area);
}
