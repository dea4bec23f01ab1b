//! Panel 1 — Calculator: the input form, the calculate trigger and the result.

use std::time::Instant;

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{AppState, InputField};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(
        "Capital Asset Pricing Model (CAPM)",
        theme::accent_bold(),
    )));
    lines.push(Line::from(Span::styled(
        "E[R] = Rf + β × (Rm − Rf)",
        theme::muted(),
    )));
    lines.push(Line::from(""));

    for field in InputField::ALL {
        lines.push(field_line(app, field));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  [j/k] field  [h/l] ±step  [i] type  [Enter] Calculate CAPM  [r] reset  [f] format",
        theme::muted(),
    )));
    lines.push(Line::from(""));

    lines.push(result_line(app));

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("─".repeat(40), theme::muted())));
    lines.push(Line::from(Span::styled(
        "Prepared by - Syndicate 16",
        theme::muted(),
    )));

    f.render_widget(Paragraph::new(lines), area);
}

fn field_line(app: &AppState, field: InputField) -> Line<'static> {
    let form = &app.form;
    let is_active = form.active == field;

    let marker = if is_active { "▶ " } else { "  " };
    let label_style = if is_active {
        theme::accent_bold()
    } else {
        theme::text()
    };

    let value_span = match (&form.edit_buffer, is_active) {
        (Some(buf), true) => Span::styled(
            format!("{buf}_"),
            theme::warning().add_modifier(Modifier::UNDERLINED),
        ),
        _ => {
            let style = if is_active {
                theme::accent().add_modifier(Modifier::REVERSED)
            } else {
                theme::text()
            };
            Span::styled(format!(" {:.2} ", form.value(field)), style)
        }
    };

    Line::from(vec![
        Span::styled(marker, theme::accent()),
        Span::styled(format!("{:<34}", field.label()), label_style),
        value_span,
    ])
}

fn result_line(app: &AppState) -> Line<'static> {
    if app.calc.is_pending() {
        return Line::from(vec![
            Span::styled(
                format!("  {} ", app.calc.spinner_frame(Instant::now())),
                theme::warning(),
            ),
            Span::styled("Calculating...", theme::warning()),
            Span::styled("  [Esc] cancel", theme::muted()),
        ]);
    }

    match &app.calc.report {
        Some(report) => {
            let pct = report.result.expected_return_pct();
            Line::from(vec![
                Span::styled("  ✔ ", theme::positive()),
                Span::styled(
                    format!(
                        "Expected Return: {}",
                        app.settings.format.format_percent(pct)
                    ),
                    theme::return_style(pct, report.comparison.risk_free_pct)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  (β {:.2}, format {})", report.inputs.beta, app.settings.format),
                    theme::muted(),
                ),
            ])
        }
        None => Line::from(Span::styled(
            "  Press Enter to calculate.",
            theme::muted(),
        )),
    }
}
