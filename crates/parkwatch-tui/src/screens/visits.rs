//! Full latest-visits list behind the dashboards' "View all".

use std::time::Instant;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState, Paragraph};

use parkwatch_core::view::{EMPTY_TEXT, LatestVisitsView};
use parkwatch_core::{Session, VisitUpdate};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::fmt::updated_ago;
use crate::widgets::panel::panel;

const PAGE_JUMP: usize = 10;

pub struct VisitsScreen {
    session: Session,
    visits: Vec<VisitUpdate>,
    selected: usize,
    last_update: Option<Instant>,
}

impl VisitsScreen {
    pub fn new() -> Self {
        Self {
            session: Session::loading(),
            visits: Vec::new(),
            selected: 0,
            last_update: None,
        }
    }

    fn select(&mut self, index: usize) {
        self.selected = index.min(self.visits.len().saturating_sub(1));
    }
}

impl Component for VisitsScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match (key.modifiers, key.code) {
            (_, KeyCode::Down | KeyCode::Char('j')) => self.select(self.selected + 1),
            (_, KeyCode::Up | KeyCode::Char('k')) => {
                self.select(self.selected.saturating_sub(1));
            }
            (KeyModifiers::CONTROL, KeyCode::Char('d')) | (_, KeyCode::PageDown) => {
                self.select(self.selected + PAGE_JUMP);
            }
            (KeyModifiers::CONTROL, KeyCode::Char('u')) | (_, KeyCode::PageUp) => {
                self.select(self.selected.saturating_sub(PAGE_JUMP));
            }
            (_, KeyCode::Char('g') | KeyCode::Home) => self.select(0),
            (_, KeyCode::Char('G') | KeyCode::End) => self.select(usize::MAX),
            (_, KeyCode::Char('r')) => return Ok(Some(Action::Refresh)),
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::SessionUpdated(session) => self.session = session.clone(),
            Action::DashboardUpdated(data) => {
                self.visits.clone_from(&data.visits);
                if data.loaded {
                    self.last_update = Some(Instant::now());
                }
                self.select(self.selected);
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let view = LatestVisitsView::build(&self.session, &self.visits);
        let block = panel(view.heading, true)
            .title_top(
                Line::from(Span::styled(
                    format!(" {} ", updated_ago(self.last_update)),
                    theme::key_hint(),
                ))
                .right_aligned(),
            )
            .title_bottom(Line::from(Span::styled(
                format!(" {} updates ", view.rows.len()),
                theme::key_hint(),
            )));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if view.rows.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(EMPTY_TEXT, theme::key_hint())),
                inner,
            );
            return;
        }

        let items: Vec<ListItem> = view
            .rows
            .into_iter()
            .map(|row| ListItem::new(Span::styled(row, theme::text())))
            .collect();
        let list = List::new(items)
            .highlight_style(theme::selected())
            .highlight_symbol("▸ ");
        let mut state = ListState::default().with_selected(Some(self.selected));
        frame.render_stateful_widget(list, inner, &mut state);
    }

    fn key_hints(&self) -> &'static [(&'static str, &'static str)] {
        &[("j/k", "scroll"), ("g/G", "top/bottom"), ("r", "refresh")]
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::sync::Arc;

    use parkwatch_core::{Counts, DashboardData, Role, SpotRef};
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::screens::test_support::buffer_text;

    fn loaded(n: i64) -> VisitsScreen {
        let mut screen = VisitsScreen::new();
        screen
            .update(&Action::SessionUpdated(Session::established("jane", Role::Admin)))
            .unwrap();
        let visits = (1..=n)
            .map(|id| VisitUpdate {
                id: None,
                created_at: "2024-03-05T08:02:00".into(),
                spot_id: SpotRef::Number(id),
                availability: 1,
            })
            .collect();
        screen
            .update(&Action::DashboardUpdated(Arc::new(DashboardData {
                counts: Counts::default(),
                visits,
                loaded: true,
            })))
            .unwrap();
        screen
    }

    #[test]
    fn lists_every_update_unsliced() {
        let screen = loaded(8);
        let mut terminal = Terminal::new(TestBackend::new(80, 14)).unwrap();
        terminal.draw(|f| screen.render(f, f.area())).unwrap();
        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("PS008 - Departed"));
        assert!(text.contains("8 updates"));
    }

    #[test]
    fn selection_stays_in_bounds() {
        let mut screen = loaded(3);
        screen
            .handle_key_event(KeyEvent::from(KeyCode::End))
            .unwrap();
        assert_eq!(screen.selected, 2);
        screen
            .handle_key_event(KeyEvent::from(KeyCode::PageUp))
            .unwrap();
        assert_eq!(screen.selected, 0);
    }
}
