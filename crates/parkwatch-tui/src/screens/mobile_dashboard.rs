//! Compact dashboard for narrow terminals.
//!
//! Counters, the personal access-code card (regular users only) and the
//! four most recent updates, stacked vertically. While the session is still
//! resolving, a loading overlay covers everything.

use std::time::Instant;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use throbber_widgets_tui::ThrobberState;

use parkwatch_core::view::{MobileDashboardView, QrCard};
use parkwatch_core::{DashboardData, QrState, Route, Session};

use crate::action::Action;
use crate::component::Component;
use crate::screens::dashboard::{render_counts, render_updates};
use crate::theme;
use crate::widgets::fmt::{payload_size, updated_ago};
use crate::widgets::panel::{panel, render_spinner};

const USER_HINTS: &[(&str, &str)] = &[("r", "new code"), ("↵", "map"), ("v", "all")];
const ADMIN_HINTS: &[(&str, &str)] = &[("↵", "map"), ("v", "all")];

pub struct MobileDashboardScreen {
    session: Session,
    data: DashboardData,
    qr: Option<QrState>,
    last_update: Option<Instant>,
    spinner: ThrobberState,
}

impl MobileDashboardScreen {
    pub fn new() -> Self {
        Self {
            session: Session::loading(),
            data: DashboardData::default(),
            qr: None,
            last_update: None,
            spinner: ThrobberState::default(),
        }
    }

    fn view(&self) -> MobileDashboardView {
        MobileDashboardView::build(&self.session, &self.data, self.qr.as_ref())
    }

    fn render_qr(&self, frame: &mut Frame, area: Rect, card: &QrCard) {
        let block = panel("Access Code", false)
            .title_bottom(Line::from(Span::styled(" r Regenerate ", theme::key_hint())));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if card.pending {
            render_spinner(frame, inner, "Generating code…", &self.spinner);
            return;
        }

        let payload = match card.payload_len() {
            Some(len) => Line::from(vec![
                Span::styled(" ▣ ", theme::figure(theme::CYAN)),
                Span::styled(format!("code ready ({})", payload_size(len)), theme::text()),
            ]),
            None => Line::from(Span::styled(" no code available", theme::error_text())),
        };
        let caption = Line::from(Span::styled(format!(" {}", card.caption()), theme::text()));
        frame.render_widget(Paragraph::new(vec![payload, caption]), inner);
    }
}

impl Component for MobileDashboardScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        Ok(match key.code {
            KeyCode::Char('r') if self.view().qr.is_some() => Some(Action::RegenerateQr),
            KeyCode::Enter | KeyCode::Char('m') => Some(Action::Navigate(Route::Map)),
            KeyCode::Char('v') => Some(Action::Navigate(Route::LatestVisits)),
            _ => None,
        })
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::SessionUpdated(session) => self.session = session.clone(),
            Action::DashboardUpdated(data) => {
                self.data = (**data).clone();
                if data.loaded {
                    self.last_update = Some(Instant::now());
                }
            }
            Action::QrUpdated(qr) => self.qr = Some((**qr).clone()),
            Action::Tick => self.spinner.calc_next(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let view = self.view();
        if view.loading {
            render_spinner(frame, area, "Signing in…", &self.spinner);
            return;
        }

        let qr_height = if view.qr.is_some() { 4 } else { 0 };
        let [counts_area, qr_area, updates_area] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Length(qr_height),
            Constraint::Min(3),
        ])
        .areas(area);

        render_counts(frame, counts_area, &view.counts);
        if let Some(card) = &view.qr {
            self.render_qr(frame, qr_area, card);
        }
        render_updates(
            frame,
            updates_area,
            &view.updates,
            &updated_ago(self.last_update),
            "v View all",
        );
    }

    fn key_hints(&self) -> &'static [(&'static str, &'static str)] {
        if self.session.capabilities().shows_qr_code() {
            USER_HINTS
        } else {
            ADMIN_HINTS
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::sync::Arc;

    use parkwatch_core::view::{ADMIN_UPDATES_HEADING, USER_UPDATES_HEADING};
    use parkwatch_core::{Counts, Role};
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::screens::test_support::buffer_text;

    fn draw(screen: &MobileDashboardScreen) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        terminal.draw(|f| screen.render(f, f.area())).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    fn screen_for(role: Role) -> MobileDashboardScreen {
        let mut screen = MobileDashboardScreen::new();
        screen
            .update(&Action::SessionUpdated(Session::established("jane", role)))
            .unwrap();
        screen
            .update(&Action::DashboardUpdated(Arc::new(DashboardData {
                counts: Counts {
                    available: 3,
                    occupied: 9,
                },
                visits: vec![],
                loaded: true,
            })))
            .unwrap();
        screen
    }

    #[test]
    fn loading_session_covers_the_page() {
        let screen = MobileDashboardScreen::new();
        let text = draw(&screen);
        assert!(text.contains("Signing in"));
        assert!(!text.contains("Parking Spots"));
    }

    #[test]
    fn admins_get_no_access_code() {
        let mut screen = screen_for(Role::Admin);
        let text = draw(&screen);
        assert!(!text.contains("Access Code"));
        assert!(text.contains(ADMIN_UPDATES_HEADING));

        let key = screen
            .handle_key_event(KeyEvent::from(KeyCode::Char('r')))
            .unwrap();
        assert!(key.is_none());
    }

    #[test]
    fn users_see_code_expiry_and_can_regenerate() {
        let mut screen = screen_for(Role::User);
        screen
            .update(&Action::QrUpdated(Arc::new(QrState {
                data_url: Some("data:image/png;base64,AAAA".into()),
                expires_at: Some("2024-03-05T09:00:00".into()),
                pending: false,
            })))
            .unwrap();

        let text = draw(&screen);
        assert!(text.contains(USER_UPDATES_HEADING));
        assert!(text.contains("QR code is valid until 05.03.2024 09:00"));
        assert!(text.contains("available spots"));

        let key = screen
            .handle_key_event(KeyEvent::from(KeyCode::Char('r')))
            .unwrap();
        assert!(matches!(key, Some(Action::RegenerateQr)));
    }
}
