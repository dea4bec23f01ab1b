//! Overlays drawn on top of the active panel.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;
use crate::ui::centered_rect;

pub fn render_error_history(f: &mut Frame, area: Rect, app: &AppState) {
    let popup = centered_rect(80, 70, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::negative())
        .title(format!(" Error History ({}) ", app.error_history.len()))
        .title_style(theme::negative());

    let mut lines: Vec<Line> = Vec::new();
    if app.error_history.is_empty() {
        lines.push(Line::from(Span::styled("No errors recorded.", theme::muted())));
    }
    for record in app.error_history.iter().skip(app.error_scroll) {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{} ", record.timestamp.format("%H:%M:%S")),
                theme::muted(),
            ),
            Span::styled(format!("[{:<6}] ", record.category.label()), theme::warning()),
            Span::styled(record.message.clone(), theme::text()),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "[j/k] scroll  [Esc] close",
        theme::muted(),
    )));

    f.render_widget(Paragraph::new(lines).block(block), popup);
}
