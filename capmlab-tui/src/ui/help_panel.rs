//! Panel 4 — Help: keyboard shortcuts and a short CAPM glossary.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut lines: Vec<Line> = Vec::new();

    section(&mut lines, "Global");
    key(&mut lines, "1-4", "Switch to panel by number");
    key(&mut lines, "Tab / Shift+Tab", "Cycle panels forward / back");
    key(&mut lines, "f", "Cycle display format (fixed2 → rounded9 → trimmed9)");
    key(&mut lines, "Esc", "Cancel a running calculation");
    key(&mut lines, "q", "Quit");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 1 — Calculator");
    key(&mut lines, "j / k", "Move between inputs");
    key(&mut lines, "h / l  (- / +)", "Decrease / increase by the step (never below 0)");
    key(&mut lines, "i", "Type a value; Enter to accept, Esc to discard");
    key(&mut lines, "r", "Reset inputs to defaults");
    key(&mut lines, "Enter", "Calculate CAPM");
    lines.push(Line::from(""));

    section(&mut lines, "Panels 2-3 — Chart / Compare");
    key(&mut lines, "Enter", "Recalculate with the current inputs");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 4 — Help (this panel)");
    key(&mut lines, "e", "Open error history overlay");
    lines.push(Line::from(""));

    section(&mut lines, "Glossary");
    key(&mut lines, "CAPM", "E[R] = Rf + β × (Rm − Rf)");
    key(&mut lines, "Beta (β)", "Sensitivity of the asset's return to the market");
    key(&mut lines, "Risk-free rate", "Return of a zero-risk investment");
    key(&mut lines, "SML", "Expected return as a linear function of beta");
    lines.push(Line::from(""));

    lines.push(Line::from(vec![
        Span::styled("  Settings: ", theme::muted()),
        Span::styled(
            format!(
                "format {} · {} samples over β [{}, {}] · {} ms simulated latency",
                app.settings.format,
                app.settings.sample_count,
                app.settings.domain.start,
                app.settings.domain.end,
                app.settings.simulated_latency_ms,
            ),
            theme::accent(),
        ),
    ]));

    let para = Paragraph::new(lines).wrap(Wrap { trim: false });
    f.render_widget(para, area);
}

fn section(lines: &mut Vec<Line<'_>>, title: &str) {
    lines.push(Line::from(Span::styled(title.to_string(), theme::accent_bold())));
}

fn key(lines: &mut Vec<Line<'_>>, keys: &str, desc: &str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {:>18}  ", keys), theme::accent()),
        Span::styled(desc.to_string(), theme::muted()),
    ]));
}
