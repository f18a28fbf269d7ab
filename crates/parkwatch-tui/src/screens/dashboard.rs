//! Desktop dashboard.
//!
//! ┌─ Parking Spots ──────────┐┌─ Parking Lot ────────────┐
//! │ 5  available parking ... ││ ████████░░░░  58% full   │
//! │ 7  occupied parking ...  ││ ↵ Show parking lot       │
//! └──────────────────────────┘└──────────────────────────┘
//! ┌─ Latest parking spot updates ───── updated 3s ago ──┐
//! │ ...                                                 │
//! └─ v View all ────────────────────────────────────────┘

use std::time::Instant;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Gauge, Paragraph};
use throbber_widgets_tui::ThrobberState;

use parkwatch_core::view::{CountsCard, DashboardView, EMPTY_TEXT, SHOW_PARKING_LOT, UpdatesList};
use parkwatch_core::{Counts, DashboardData, Route};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::fmt::updated_ago;
use crate::widgets::panel::{panel, render_spinner};

pub struct DashboardScreen {
    data: DashboardData,
    last_update: Option<Instant>,
    spinner: ThrobberState,
}

impl DashboardScreen {
    pub fn new() -> Self {
        Self {
            data: DashboardData::default(),
            last_update: None,
            spinner: ThrobberState::default(),
        }
    }
}

/// Occupied share of all known spots, 0-100.
fn occupancy_percent(counts: Counts) -> u16 {
    let total = counts.available.saturating_add(counts.occupied);
    if total == 0 {
        return 0;
    }
    u16::try_from(counts.occupied.saturating_mul(100) / total).unwrap_or(100)
}

/// Counter card shared with the mobile dashboard.
pub(crate) fn render_counts(frame: &mut Frame, area: Rect, card: &CountsCard) {
    let block = panel("Parking Spots", false);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(vec![
            Span::styled(format!(" {:>4} ", card.available), theme::figure(theme::GREEN)),
            Span::styled(card.available_label, theme::text()),
        ]),
        Line::from(vec![
            Span::styled(format!(" {:>4} ", card.occupied), theme::figure(theme::RED)),
            Span::styled(card.occupied_label, theme::text()),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

/// Headed update list shared with the mobile dashboard.
pub(crate) fn render_updates(
    frame: &mut Frame,
    area: Rect,
    list: &UpdatesList,
    age: &str,
    footer: &str,
) {
    let block = panel(list.heading, true)
        .title_top(Line::from(Span::styled(format!(" {age} "), theme::key_hint())).right_aligned())
        .title_bottom(Line::from(Span::styled(format!(" {footer} "), theme::key_hint())));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = if list.is_empty() {
        vec![Line::from(Span::styled(EMPTY_TEXT, theme::key_hint()))]
    } else {
        list.rows
            .iter()
            .map(|row| Line::from(Span::styled(format!(" {row}"), theme::text())))
            .collect()
    };
    frame.render_widget(Paragraph::new(lines), inner);
}

impl Component for DashboardScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        Ok(match key.code {
            KeyCode::Enter | KeyCode::Char('m') => Some(Action::Navigate(Route::Map)),
            KeyCode::Char('v') => Some(Action::Navigate(Route::LatestVisits)),
            KeyCode::Char('r') => Some(Action::Refresh),
            _ => None,
        })
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::DashboardUpdated(data) => {
                self.data = (**data).clone();
                if data.loaded {
                    self.last_update = Some(Instant::now());
                }
            }
            Action::Tick => self.spinner.calc_next(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        if !self.data.loaded {
            render_spinner(frame, area, "Loading dashboard…", &self.spinner);
            return;
        }

        let view = DashboardView::desktop(self.data.counts, &self.data.visits);
        let [top, bottom] =
            Layout::vertical([Constraint::Length(4), Constraint::Min(3)]).areas(area);
        let [counts_area, lot_area] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(top);

        render_counts(frame, counts_area, &view.counts);

        let lot = panel("Parking Lot", false);
        let lot_inner = lot.inner(lot_area);
        frame.render_widget(lot, lot_area);
        let [gauge_area, action_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(lot_inner);
        let percent = occupancy_percent(self.data.counts);
        frame.render_widget(
            Gauge::default()
                .percent(percent)
                .label(format!("{percent}% occupied"))
                .gauge_style(Style::default().fg(theme::RED).bg(theme::BG_HIGHLIGHT)),
            gauge_area,
        );
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("↵ ", theme::key_hint_key()),
                Span::styled(SHOW_PARKING_LOT, theme::text()),
            ])),
            action_area,
        );

        render_updates(
            frame,
            bottom,
            &view.updates,
            &updated_ago(self.last_update),
            "v View all",
        );
    }

    fn key_hints(&self) -> &'static [(&'static str, &'static str)] {
        &[("↵", "map"), ("v", "all visits"), ("r", "refresh")]
    }
}
