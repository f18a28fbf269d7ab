//! Shown in place of pages the viewer may not open.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::component::Component;
use crate::theme;
use crate::widgets::panel::{centered, panel};

const MESSAGE: &str = "You are not authorized to view this page.";

/// Centered notice, also drawn by gated screens directly.
pub(crate) fn render_unauthorized(frame: &mut Frame, area: Rect) {
    let card = centered(area, 52, 5);
    let block = panel("Unauthorized", true).border_style(theme::error_text());
    let inner = block.inner(card);
    frame.render_widget(block, card);
    frame.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled(MESSAGE, theme::text())),
            Line::from(""),
            Line::from(vec![
                Span::styled("Esc ", theme::key_hint_key()),
                Span::styled("back to the dashboard", theme::key_hint()),
            ]),
        ])
        .centered(),
        inner,
    );
}

pub struct UnauthorizedScreen;

impl Component for UnauthorizedScreen {
    fn render(&self, frame: &mut Frame, area: Rect) {
        render_unauthorized(frame, area);
    }
}
