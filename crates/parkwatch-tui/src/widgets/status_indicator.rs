//! Spot status dot and map legend.

use ratatui::style::Style;
use ratatui::text::{Line, Span};

use parkwatch_core::{SpotStatus, StatusColor};

use crate::theme;

pub const DOT: &str = "●";

/// Colored status dot.
pub fn status_span(status: SpotStatus) -> Span<'static> {
    Span::styled(DOT, Style::default().fg(theme::status_color(status.color())))
}

/// `● Available` with the dot colored and the label in body text.
pub fn status_line(status: SpotStatus) -> Line<'static> {
    Line::from(vec![
        status_span(status),
        Span::styled(format!(" {}", status.label()), theme::text()),
    ])
}

/// One line: `● Available  ● Occupied / Reserved  ● Error`.
pub fn legend_line(legend: &[(StatusColor, &'static str)]) -> Line<'static> {
    let mut spans = Vec::with_capacity(legend.len() * 2);
    for (i, (color, label)) in legend.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(
            DOT,
            Style::default().fg(theme::status_color(*color)),
        ));
        spans.push(Span::styled(format!(" {label}"), theme::text()));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use parkwatch_core::model::LEGEND;

    use super::*;

    fn plain(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn legend_lists_every_entry() {
        assert_eq!(
            plain(&legend_line(&LEGEND)),
            "● Available  ● Occupied / Reserved  ● Error"
        );
    }

    #[test]
    fn error_dot_is_yellow() {
        assert_eq!(status_span(SpotStatus::Error).style.fg, Some(theme::YELLOW));
        assert_eq!(status_span(SpotStatus::Reserved).style.fg, Some(theme::RED));
    }
}
