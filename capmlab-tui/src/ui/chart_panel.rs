//! Panel 2 — Security Market Line chart with the user's asset overlaid.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::Style;
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Chart, Dataset, GraphType, LegendPosition, Paragraph};
use ratatui::Frame;

use capmlab_core::CapmReport;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    match &app.calc.report {
        Some(report) if !report.curve.is_empty() => render_chart(f, area, report),
        _ => render_empty(f, area),
    }
}

fn render_empty(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            "No calculation yet.",
            theme::muted(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Enter inputs on the Calculator panel (press 1) and press Enter.",
            theme::muted(),
        )),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

/// Axis bounds covering the sampled line and the highlight, with 5% padding
/// on y. Returns `([x_min, x_max], [y_min, y_max])`.
pub fn chart_bounds(report: &CapmReport) -> ([f64; 2], [f64; 2]) {
    let domain = report.curve.domain;
    let h = report.highlight;

    let x_min = domain.start.min(h.beta);
    let x_max = domain.end.max(h.beta);

    let (lo, hi) = report
        .curve
        .y_bounds()
        .unwrap_or((h.expected_return, h.expected_return));
    let lo = lo.min(h.expected_return);
    let hi = hi.max(h.expected_return);

    // A flat line (rm == rf) still needs a visible band.
    let padding = ((hi - lo).abs() * 0.05).max(0.5);
    ([x_min, x_max], [lo - padding, hi + padding])
}

fn render_chart(f: &mut Frame, area: Rect, report: &CapmReport) {
    let line_data = report.curve.to_tuples();
    let point_data = [report.highlight.as_tuple()];
    let ([x_min, x_max], [y_min, y_max]) = chart_bounds(report);

    let sml = Dataset::default()
        .name("Security Market Line (SML)")
        .marker(symbols::Marker::Braille)
        .style(Style::default().fg(theme::ACCENT))
        .graph_type(GraphType::Line)
        .data(&line_data);

    let asset = Dataset::default()
        .name("Your Asset")
        .marker(symbols::Marker::Block)
        .style(Style::default().fg(theme::WARNING))
        .graph_type(GraphType::Scatter)
        .data(&point_data);

    let x_mid = (x_min + x_max) / 2.0;
    let y_mid = (y_min + y_max) / 2.0;

    let chart = Chart::new(vec![sml, asset])
        .legend_position(Some(LegendPosition::TopLeft))
        .hidden_legend_constraints((Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)))
        .x_axis(
            Axis::default()
                .title(Span::styled("Beta (β)", theme::muted()))
                .style(theme::muted())
                .bounds([x_min, x_max])
                .labels(vec![
                    Span::styled(format!("{x_min:.1}"), theme::muted()),
                    Span::styled(format!("{x_mid:.1}"), theme::muted()),
                    Span::styled(format!("{x_max:.1}"), theme::muted()),
                ]),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled("Expected Return (%)", theme::muted()))
                .style(theme::muted())
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::styled(format!("{y_min:.1}"), theme::muted()),
                    Span::styled(format!("{y_mid:.1}"), theme::muted()),
                    Span::styled(format!("{y_max:.1}"), theme::muted()),
                ]),
        );

    f.render_widget(chart, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use capmlab_core::{calculate, CapmInputs, Settings};

    #[test]
    fn bounds_cover_default_line() {
        let report = calculate(&CapmInputs::default(), &Settings::default());
        let ([x0, x1], [y0, y1]) = chart_bounds(&report);
        assert_eq!((x0, x1), (0.0, 2.0));
        assert!(y0 < 2.0 && y1 > 14.0);
    }

    #[test]
    fn bounds_stretch_to_far_highlight() {
        let report = calculate(&CapmInputs::from_percent(2.0, 5.0, 8.0), &Settings::default());
        let ([_, x1], [_, y1]) = chart_bounds(&report);
        assert_eq!(x1, 5.0);
        assert!(y1 > 32.0);
    }

    #[test]
    fn flat_line_gets_padding() {
        let report = calculate(&CapmInputs::from_percent(5.0, 1.0, 5.0), &Settings::default());
        let (_, [y0, y1]) = chart_bounds(&report);
        assert!(y1 - y0 >= 1.0);
    }
}
