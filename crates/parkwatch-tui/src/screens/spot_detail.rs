//! Spot detail: status, reservation panel and visit history.

use std::time::Instant;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, Paragraph};
use throbber_widgets_tui::ThrobberState;

use parkwatch_core::view::{EMPTY_TEXT, ReservationPanel, SpotDetailPage, SpotDetailView};
use parkwatch_core::{Capabilities, Route, Session, SpotDetailState};

use crate::action::Action;
use crate::component::Component;
use crate::screens::unauthorized::render_unauthorized;
use crate::theme;
use crate::widgets::fmt::updated_ago;
use crate::widgets::panel::{panel, render_spinner};
use crate::widgets::status_indicator::status_line;

pub struct SpotDetailScreen {
    spot_id: i64,
    caps: Capabilities,
    state: Option<SpotDetailState>,
    scroll: usize,
    last_update: Option<Instant>,
    spinner: ThrobberState,
}

impl SpotDetailScreen {
    pub fn new() -> Self {
        Self {
            spot_id: 0,
            caps: Session::loading().capabilities(),
            state: None,
            scroll: 0,
            last_update: None,
            spinner: ThrobberState::default(),
        }
    }

    /// Switch to another spot; state from the previous one is dropped.
    fn show(&mut self, spot_id: i64) {
        if spot_id != self.spot_id {
            self.spot_id = spot_id;
            self.state = None;
            self.scroll = 0;
            self.last_update = None;
        }
    }

    fn page(&self) -> SpotDetailPage {
        SpotDetailPage::build(self.state.as_ref(), self.caps, self.spot_id)
    }

    fn render_reservation(frame: &mut Frame, area: Rect, panel_state: ReservationPanel) {
        let block = panel("Reservation", false);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let color = if panel_state.reserved {
            theme::RED
        } else {
            theme::GREEN
        };
        let mut lines = vec![Line::from(Span::styled(
            panel_state.summary(),
            theme::figure(color),
        ))];
        if panel_state.can_manage {
            lines.push(Line::from(Span::styled(
                "You can manage reservations for this spot.",
                theme::key_hint(),
            )));
        }
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_detail(&self, frame: &mut Frame, area: Rect, view: &SpotDetailView) {
        let error_height = u16::from(view.error.is_some());
        let [header_area, error_area, body_area] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Length(error_height),
            Constraint::Min(3),
        ])
        .areas(area);
        let [status_area, reservation_area] =
            Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
                .areas(header_area);

        let block = panel(&view.header, true).title_top(
            Line::from(Span::styled(
                format!(" {} ", updated_ago(self.last_update)),
                theme::key_hint(),
            ))
            .right_aligned(),
        );
        let inner = block.inner(status_area);
        frame.render_widget(block, status_area);

        let status = view.status.map_or_else(
            || Line::from(Span::styled("Status unknown", theme::key_hint())),
            status_line,
        );
        let updated = Line::from(vec![
            Span::styled("Last updated ", theme::key_hint()),
            Span::styled(
                view.last_updated.clone().unwrap_or_else(|| "—".to_owned()),
                theme::text(),
            ),
        ]);
        frame.render_widget(Paragraph::new(vec![status, updated]), inner);

        Self::render_reservation(frame, reservation_area, view.reservation);

        if let Some(error) = &view.error {
            frame.render_widget(
                Paragraph::new(Span::styled(format!(" {error}"), theme::error_text())),
                error_area,
            );
        }

        let visits = panel("Latest visits", false);
        let visits_inner = visits.inner(body_area);
        frame.render_widget(visits, body_area);
        if view.visits.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(EMPTY_TEXT, theme::key_hint())),
                visits_inner,
            );
        } else {
            let items: Vec<ListItem> = view
                .visits
                .iter()
                .skip(self.scroll)
                .map(|line| ListItem::new(Span::styled(line.clone(), theme::text())))
                .collect();
            frame.render_widget(List::new(items), visits_inner);
        }
    }
}

impl Component for SpotDetailScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let len = self.state.as_ref().map_or(0, |s| s.visits.len());
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll = (self.scroll + 1).min(len.saturating_sub(1));
            }
            KeyCode::Up | KeyCode::Char('k') => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Char('r') => return Ok(Some(Action::Refresh)),
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Navigate(Route::SpotDetail(id)) => self.show(*id),
            Action::SessionUpdated(session) => self.caps = session.capabilities(),
            Action::SpotUpdated(state) if state.spot_id == self.spot_id => {
                if !state.loading {
                    self.last_update = Some(Instant::now());
                }
                self.state = Some((**state).clone());
            }
            Action::Tick => self.spinner.calc_next(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        match self.page() {
            SpotDetailPage::Loading => {
                render_spinner(frame, area, "Loading spot…", &self.spinner);
            }
            SpotDetailPage::Unauthorized => render_unauthorized(frame, area),
            SpotDetailPage::Detail(view) => self.render_detail(frame, area, &view),
        }
    }

    fn key_hints(&self) -> &'static [(&'static str, &'static str)] {
        &[("j/k", "scroll"), ("r", "refresh"), ("Esc", "map")]
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::sync::Arc;

    use parkwatch_core::{ParkingSpot, Role, Visit};
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::screens::test_support::buffer_text;

    fn draw(screen: &SpotDetailScreen) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|f| screen.render(f, f.area())).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    fn screen_for(role: Role) -> SpotDetailScreen {
        let mut screen = SpotDetailScreen::new();
        screen
            .update(&Action::SessionUpdated(Session::established("jane", role)))
            .unwrap();
        screen
            .update(&Action::Navigate(Route::SpotDetail(7)))
            .unwrap();
        screen
    }

    fn state(error: Option<&str>) -> Arc<SpotDetailState> {
        Arc::new(SpotDetailState {
            spot_id: 7,
            spot: Some(ParkingSpot {
                spot_id: 7,
                available: false,
                reserved: true,
                error: false,
                last_updated: Some("2024-03-05T08:02:00".into()),
            }),
            visits: vec![Visit {
                start_date: "2024-03-05T08:02:00".into(),
                end_date: None,
            }],
            error: error.map(str::to_owned),
            loading: false,
        })
    }

    #[test]
    fn non_admin_sees_unauthorized() {
        let screen = screen_for(Role::User);
        let text = draw(&screen);
        assert!(text.contains("not authorized"));
    }

    #[test]
    fn admin_sees_status_and_history() {
        let mut screen = screen_for(Role::Admin);
        screen.update(&Action::SpotUpdated(state(None))).unwrap();

        let text = draw(&screen);
        assert!(text.contains("PS007"));
        assert!(text.contains("Reserved"));
        assert!(text.contains("05.03.2024 08:02"));
        assert!(text.contains("05.03.2024 08:02 - now"));
    }

    #[test]
    fn fetch_error_is_shown_above_the_history() {
        let mut screen = screen_for(Role::Admin);
        screen
            .update(&Action::SpotUpdated(state(Some("Failed to fetch visit history"))))
            .unwrap();
        assert!(draw(&screen).contains("Failed to fetch visit history"));
    }

    #[test]
    fn snapshots_for_other_spots_are_ignored() {
        let mut screen = screen_for(Role::Admin);
        let mut other = (*state(None)).clone();
        other.spot_id = 8;
        screen.update(&Action::SpotUpdated(Arc::new(other))).unwrap();
        assert!(screen.state.is_none());
    }
}
