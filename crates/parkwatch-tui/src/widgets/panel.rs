//! Block, spinner and overlay helpers.

use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear};
use throbber_widgets_tui::{Throbber, ThrobberState};

use crate::theme;

/// Rounded panel with a styled title.
pub fn panel(title: &str, focused: bool) -> Block<'static> {
    Block::default()
        .title(Line::from(Span::styled(
            format!(" {title} "),
            theme::title_style(),
        )))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            theme::border_focused()
        } else {
            theme::border_default()
        })
}

/// `width` x `height` rect centered in `area`, clamped to fit.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    rect
}

/// Spinner with a label, centered in `area`.
pub fn render_spinner(frame: &mut Frame, area: Rect, label: &str, state: &ThrobberState) {
    let width = u16::try_from(label.chars().count() + 2).unwrap_or(u16::MAX);
    let throbber = Throbber::default()
        .label(label.to_owned())
        .style(theme::text())
        .throbber_style(Style::default().fg(theme::ACCENT));
    frame.render_stateful_widget(throbber, centered(area, width, 1), &mut state.clone());
}

/// Clear `area` and fill it with the overlay background.
pub fn clear_overlay(frame: &mut Frame, area: Rect) {
    frame.render_widget(Clear, area);
    frame.render_widget(
        Block::default().style(Style::default().bg(theme::BG_DARK)),
        area,
    );
}
