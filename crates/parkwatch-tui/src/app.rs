//! Application core: event loop, routing and action dispatch.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Tabs},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use parkwatch_core::{LayoutMode, Monitor, Route, Session};

use crate::action::{Action, Notification, NotificationLevel};
use crate::component::Component;
use crate::data_bridge::{BridgeCommand, spawn_data_bridge};
use crate::event::{Event, EventReader};
use crate::screen::{ScreenKind, Tab, layout_for};
use crate::screens::create_screens;
use crate::theme;
use crate::tui::Tui;
use crate::widgets::panel::{centered, clear_overlay, panel};

const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// Top-level application state and event loop.
pub struct App {
    route: Route,
    /// `--mobile`; otherwise the layout follows the terminal width.
    forced_layout: Option<LayoutMode>,
    screens: HashMap<ScreenKind, Box<dyn Component>>,
    running: bool,
    help_visible: bool,
    terminal_size: (u16, u16),
    session: Session,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    bridge_tx: mpsc::UnboundedSender<BridgeCommand>,
    /// Handed to the bridge task when the loop starts.
    bridge_rx: Option<mpsc::UnboundedReceiver<BridgeCommand>>,
    monitor: Monitor,
    data_cancel: CancellationToken,
    notification: Option<(Notification, Instant)>,
}

impl App {
    pub fn new(monitor: Monitor, forced_layout: Option<LayoutMode>) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let (bridge_tx, bridge_rx) = mpsc::unbounded_channel();

        Self {
            route: Route::Dashboard,
            forced_layout,
            screens: create_screens().into_iter().collect(),
            running: true,
            help_visible: false,
            terminal_size: (0, 0),
            session: Session::loading(),
            action_tx,
            action_rx,
            bridge_tx,
            bridge_rx: Some(bridge_rx),
            monitor,
            data_cancel: CancellationToken::new(),
            notification: None,
        }
    }

    fn layout_mode(&self) -> LayoutMode {
        layout_for(self.terminal_size.0, self.forced_layout)
    }

    fn active_kind(&self) -> ScreenKind {
        ScreenKind::for_route(self.route, self.layout_mode())
    }

    fn active_screen(&self) -> Option<&dyn Component> {
        self.screens.get(&self.active_kind()).map(Box::as_ref)
    }

    fn active_screen_mut(&mut self) -> Option<&mut Box<dyn Component>> {
        let kind = self.active_kind();
        self.screens.get_mut(&kind)
    }

    /// Ask the bridge for the current page's feed.
    fn mount(&self) {
        let command = BridgeCommand::Mount {
            route: self.route,
            mode: self.layout_mode(),
        };
        if self.bridge_tx.send(command).is_err() {
            debug!("bridge gone, mount dropped");
        }
    }

    fn send_bridge(&self, command: BridgeCommand) {
        if self.bridge_tx.send(command).is_err() {
            debug!(?command, "bridge gone, command dropped");
        }
    }

    /// Run the main event loop.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.terminal_size = tui.size().unwrap_or((80, 24));

        if let Some(commands) = self.bridge_rx.take() {
            let monitor = self.monitor.clone();
            let tx = self.action_tx.clone();
            let cancel = self.data_cancel.clone();
            tokio::spawn(async move {
                spawn_data_bridge(monitor, tx, commands, cancel).await;
            });
        }
        self.mount();

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!(server = %self.monitor.config().url, "TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Mouse(mouse) => {
                    if let Some(action) = self.handle_mouse_event(mouse)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        self.data_cancel.cancel();
        events.stop();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Global keys first, then the active screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.help_visible {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                _ => None,
            });
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c'))
            | (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),

            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char('?')) => {
                return Ok(Some(Action::ToggleHelp));
            }

            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='9')) => {
                let n = u8::try_from(c).unwrap_or(b'0') - b'0';
                if let Some(tab) = Tab::from_number(n) {
                    return Ok(Some(Action::Navigate(tab.route())));
                }
            }

            (KeyModifiers::NONE, KeyCode::Tab) => {
                let tab = Tab::of(self.route).map_or(Tab::Dashboard, Tab::next);
                return Ok(Some(Action::Navigate(tab.route())));
            }
            (KeyModifiers::SHIFT, KeyCode::BackTab) => {
                let tab = Tab::of(self.route).map_or(Tab::Dashboard, Tab::prev);
                return Ok(Some(Action::Navigate(tab.route())));
            }

            (KeyModifiers::NONE, KeyCode::Esc) => return Ok(Some(Action::GoBack)),

            _ => {}
        }

        match self.active_screen_mut() {
            Some(screen) => screen.handle_key_event(key),
            None => Ok(None),
        }
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        match self.active_screen_mut() {
            Some(screen) => screen.handle_mouse_event(mouse),
            None => Ok(None),
        }
    }

    /// Switch to `target` after the capability check. Remounts the feed.
    fn navigate(&mut self, target: Route) -> Result<()> {
        let resolved = self.session.capabilities().authorize(target);
        if resolved != target {
            info!(%target, "route not permitted for this session");
        }
        if resolved == self.route {
            return Ok(());
        }

        debug!(from = %self.route, to = %resolved, "navigating");
        self.route = resolved;
        let announce = Action::Navigate(resolved);
        if let Some(screen) = self.active_screen_mut()
            && let Some(follow_up) = screen.update(&announce)?
        {
            self.action_tx.send(follow_up)?;
        }
        self.mount();
        Ok(())
    }

    fn broadcast(&mut self, action: &Action) -> Result<()> {
        for screen in self.screens.values_mut() {
            if let Some(follow_up) = screen.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,

            Action::Resize(w, h) => {
                let before = self.layout_mode();
                self.terminal_size = (*w, *h);
                if self.layout_mode() != before {
                    debug!(width = w, mode = ?self.layout_mode(), "layout changed");
                    self.mount();
                }
            }

            Action::Navigate(target) => self.navigate(*target)?,

            Action::GoBack => {
                if let Some(parent) = self.route.parent() {
                    self.navigate(parent)?;
                }
            }

            Action::ToggleHelp => self.help_visible = !self.help_visible,

            Action::SessionUpdated(session) => {
                if self.session.is_loading && !session.is_loading {
                    let who = session.user.as_deref().unwrap_or("anonymous");
                    self.action_tx
                        .send(Action::Notify(Notification::success(format!(
                            "Signed in as {who}"
                        ))))?;
                }
                self.session = session.clone();
                self.broadcast(action)?;
                // A narrower session may no longer open the current page
                let allowed = self.session.capabilities().authorize(self.route);
                if allowed != self.route {
                    self.navigate(allowed)?;
                }
            }

            data if data.is_data() => self.broadcast(data)?,

            Action::SetMapPage(page) => self.send_bridge(BridgeCommand::SetMapPage(*page)),
            Action::RegenerateQr => self.send_bridge(BridgeCommand::RegenerateQr),
            Action::Refresh => self.send_bridge(BridgeCommand::Refresh),

            Action::Notify(n) => self.notification = Some((n.clone(), Instant::now())),
            Action::DismissNotification => self.notification = None,

            Action::Tick => {
                if self
                    .notification
                    .as_ref()
                    .is_some_and(|(_, at)| at.elapsed() > NOTIFICATION_TTL)
                {
                    self.action_tx.send(Action::DismissNotification)?;
                }
                if let Some(screen) = self.active_screen_mut()
                    && let Some(follow_up) = screen.update(action)?
                {
                    self.action_tx.send(follow_up)?;
                }
            }

            _ => {}
        }
        Ok(())
    }

    /// Layout: [screen content] [tab bar] [status bar]
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let [content_area, tab_area, status_area] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        if let Some(screen) = self.active_screen() {
            screen.render(frame, content_area);
        }
        self.render_tab_bar(frame, tab_area);
        self.render_status_bar(frame, status_area);

        if let Some((notification, _)) = &self.notification {
            Self::render_notification(frame, area, notification);
        }
        if self.help_visible {
            Self::render_help_overlay(frame, area);
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let active = Tab::of(self.route);
        let titles: Vec<Line> = Tab::ALL
            .iter()
            .map(|&tab| {
                let style = if Some(tab) == active {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                Line::from(Span::styled(
                    format!(" {} {} ", tab.number(), tab.label()),
                    style,
                ))
            })
            .collect();

        let mut tabs = Tabs::new(titles).divider(Span::styled(" ", theme::key_hint()));
        if let Some(idx) = active.and_then(|t| Tab::ALL.iter().position(|&x| x == t)) {
            tabs = tabs.select(idx);
        }
        frame.render_widget(tabs, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let session = if self.session.is_loading {
            Span::styled("◐ signing in", Style::default().fg(theme::YELLOW))
        } else {
            let user = self.session.user.as_deref().unwrap_or("-");
            let role = if self.session.is_admin { "admin" } else { "user" };
            Span::styled(
                format!("● {user} ({role})"),
                Style::default().fg(theme::GREEN),
            )
        };

        let mut spans = vec![
            Span::raw(" "),
            session,
            Span::styled(
                format!(" │ {} │", self.route.path(self.layout_mode())),
                theme::key_hint(),
            ),
        ];
        let hints = self.active_screen().map_or(&[][..], Component::key_hints);
        for (key, label) in hints.iter().chain(&[("?", "help"), ("q", "quit")]) {
            spans.push(Span::styled(format!(" {key}"), theme::key_hint_key()));
            spans.push(Span::styled(format!(" {label}"), theme::key_hint()));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_help_overlay(frame: &mut Frame, area: Rect) {
        let help_area = centered(area, 56, 18);
        clear_overlay(frame, help_area);

        let block = panel("Keyboard Shortcuts", true);
        let inner = block.inner(help_area);
        frame.render_widget(block, help_area);

        let row = |key: &'static str, label: &'static str| {
            Line::from(vec![
                Span::styled(format!("  {key:<10}"), theme::key_hint_key()),
                Span::styled(label, theme::key_hint()),
            ])
        };
        let heading = |text: &'static str| {
            Line::from(Span::styled(format!("  {text}"), theme::title_style()))
        };

        let lines = vec![
            Line::from(""),
            heading("Navigation"),
            row("1-3", "Dashboard / Map / Visits"),
            row("Tab", "Next tab"),
            row("Esc", "Back"),
            row("↵ / click", "Open spot (admins)"),
            row("[ ]", "Previous / next map page"),
            Line::from(""),
            heading("Pages"),
            row("m  v", "Map / all visits"),
            row("r", "Refresh, or new access code"),
            row("j/k ↑/↓", "Move"),
            Line::from(""),
            row("?", "This help"),
            row("q", "Quit"),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_notification(frame: &mut Frame, area: Rect, notification: &Notification) {
        let width = u16::try_from(notification.message.chars().count() + 6)
            .unwrap_or(u16::MAX)
            .clamp(20, 60);
        let height = 3u16;
        let x = area.width.saturating_sub(width + 1);
        let y = area.height.saturating_sub(height + 2);
        let toast_area = Rect::new(
            area.x + x,
            area.y + y,
            width.min(area.width),
            height.min(area.height),
        );

        let (color, icon) = match notification.level {
            NotificationLevel::Success => (theme::GREEN, "✓"),
            NotificationLevel::Error => (theme::RED, "✗"),
            NotificationLevel::Info => (theme::CYAN, "·"),
        };

        clear_overlay(frame, toast_area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(color));
        let inner = block.inner(toast_area);
        frame.render_widget(block, toast_area);
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(format!(" {icon} "), Style::default().fg(color)),
                Span::styled(notification.message.as_str(), theme::text()),
            ])),
            inner,
        );
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use parkwatch_core::{MonitorConfig, Role};
    use pretty_assertions::assert_eq;
    use ratatui::{Terminal, backend::TestBackend};
    use url::Url;

    use super::*;
    use crate::screens::test_support::buffer_text;

    fn app(forced: Option<LayoutMode>) -> App {
        let config = MonitorConfig::new(Url::parse("http://127.0.0.1:9").unwrap());
        let mut app = App::new(Monitor::new(config).unwrap(), forced);
        app.terminal_size = (120, 30);
        app
    }

    fn sign_in(app: &mut App, role: Role) {
        app.process_action(&Action::SessionUpdated(Session::established("jane", role)))
            .unwrap();
    }

    fn drain_bridge(app: &mut App) -> Vec<BridgeCommand> {
        let rx = app.bridge_rx.as_mut().unwrap();
        let mut out = Vec::new();
        while let Ok(command) = rx.try_recv() {
            out.push(command);
        }
        out
    }

    #[test]
    fn viewer_is_redirected_from_spot_detail() {
        let mut app = app(None);
        sign_in(&mut app, Role::User);
        app.process_action(&Action::Navigate(Route::SpotDetail(4)))
            .unwrap();

        assert_eq!(app.route, Route::Unauthorized);
        assert_eq!(
            drain_bridge(&mut app),
            vec![BridgeCommand::Mount {
                route: Route::Unauthorized,
                mode: LayoutMode::Desktop,
            }]
        );
    }

    #[test]
    fn admin_opens_spot_and_goes_back_to_map() {
        let mut app = app(None);
        sign_in(&mut app, Role::Admin);
        app.process_action(&Action::Navigate(Route::SpotDetail(4)))
            .unwrap();
        assert_eq!(app.route, Route::SpotDetail(4));

        app.process_action(&Action::GoBack).unwrap();
        assert_eq!(app.route, Route::Map);
    }

    #[test]
    fn narrowing_the_terminal_remounts_in_mobile_layout() {
        let mut app = app(None);
        app.process_action(&Action::Resize(80, 30)).unwrap();
        assert_eq!(app.active_kind(), ScreenKind::MobileDashboard);
        assert_eq!(
            drain_bridge(&mut app),
            vec![BridgeCommand::Mount {
                route: Route::Dashboard,
                mode: LayoutMode::Mobile,
            }]
        );

        // Same layout, nothing to remount
        app.process_action(&Action::Resize(70, 30)).unwrap();
        assert!(drain_bridge(&mut app).is_empty());
    }

    #[test]
    fn forced_mobile_ignores_width() {
        let app = app(Some(LayoutMode::Mobile));
        assert_eq!(app.active_kind(), ScreenKind::MobileDashboard);
    }

    #[test]
    fn number_keys_switch_tabs() {
        let mut app = app(None);
        let action = app
            .handle_key_event(KeyEvent::from(KeyCode::Char('2')))
            .unwrap();
        assert!(matches!(action, Some(Action::Navigate(Route::Map))));
    }

    #[test]
    fn chrome_shows_tabs_and_session() {
        let mut app = app(None);
        sign_in(&mut app, Role::Admin);
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        let text = buffer_text(terminal.backend().buffer());

        assert!(text.contains("1 Dashboard"));
        assert!(text.contains("3 Visits"));
        assert!(text.contains("● jane (admin)"));
    }
}
