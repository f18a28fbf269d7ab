//! Page selector line for the map.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};

use parkwatch_core::pagination::PageControls;

use crate::theme;

const PREV: &str = "‹ Prev";
const NEXT: &str = "Next ›";

/// `‹ Prev  1 [2] 3 4 5  Next ›`, with disabled ends dimmed.
pub fn pagination_line(controls: &PageControls) -> Line<'static> {
    let (spans, _) = pagination_spans(controls);
    Line::from(spans)
}

/// Clickable cells of the line drawn left-aligned in `area`, paired with the
/// page each one selects. Disabled ends and the current page are omitted.
pub fn page_targets(controls: &PageControls, area: Rect) -> Vec<(Rect, u32)> {
    let (spans, pages) = pagination_spans(controls);
    let mut x = area.x;
    let mut targets = Vec::new();
    for (span, page) in spans.iter().zip(pages) {
        let width = u16::try_from(span.width()).unwrap_or(u16::MAX);
        if let Some(page) = page.filter(|p| *p != controls.current) {
            let cell = Rect::new(x, area.y, width, 1).intersection(area);
            if !cell.is_empty() {
                targets.push((cell, page));
            }
        }
        x = x.saturating_add(width);
    }
    targets
}

/// The line's spans and, for each span, the page it selects.
fn pagination_spans(controls: &PageControls) -> (Vec<Span<'static>>, Vec<Option<u32>>) {
    let mut spans = Vec::with_capacity(controls.window.len() + 5);
    let mut pages = Vec::with_capacity(controls.window.len() + 5);

    spans.push(Span::styled(
        PREV,
        if controls.prev.is_some() {
            theme::key_hint_key()
        } else {
            theme::disabled()
        },
    ));
    pages.push(controls.prev);
    spans.push(Span::raw("  "));
    pages.push(None);

    for page in &controls.window {
        if *page == controls.current {
            spans.push(Span::styled(format!("[{page}]"), theme::tab_active()));
        } else {
            spans.push(Span::styled(format!(" {page} "), theme::tab_inactive()));
        }
        pages.push(Some(*page));
    }

    spans.push(Span::raw("  "));
    pages.push(None);
    spans.push(Span::styled(
        NEXT,
        if controls.next.is_some() {
            theme::key_hint_key()
        } else {
            theme::disabled()
        },
    ));
    pages.push(controls.next);
    spans.push(Span::styled(
        format!("   page {} of {}", controls.current, controls.total),
        theme::key_hint(),
    ));
    pages.push(None);

    (spans, pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn marks_current_page_inside_window() {
        let line = pagination_line(&PageControls::new(5, 10));
        assert_eq!(
            plain(&line),
            "‹ Prev   3  4 [5] 6  7   Next ›   page 5 of 10"
        );
    }

    #[test]
    fn first_page_disables_prev() {
        let line = pagination_line(&PageControls::new(1, 3));
        assert_eq!(line.spans[0].style, theme::disabled());
        assert_eq!(line.spans[line.spans.len() - 2].style, theme::key_hint_key());
    }

    #[test]
    fn targets_follow_the_drawn_cells() {
        let controls = PageControls::new(5, 10);
        let area = Rect::new(2, 7, 80, 1);
        let targets = page_targets(&controls, area);
        let pages: Vec<u32> = targets.iter().map(|(_, p)| *p).collect();
        assert_eq!(pages, vec![4, 3, 4, 6, 7, 6]);

        // "‹ Prev" (6) + "  " (2) puts " 3 " at x = 2 + 8.
        assert_eq!(targets[1].0, Rect::new(10, 7, 3, 1));
        assert_eq!(targets[2].0, Rect::new(13, 7, 3, 1));
    }

    #[test]
    fn disabled_ends_are_not_targets() {
        let targets = page_targets(&PageControls::new(1, 1), Rect::new(0, 0, 80, 1));
        assert!(targets.is_empty());
    }
}
