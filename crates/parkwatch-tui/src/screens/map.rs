//! Map screen: one page of spot tiles, legend and page selector.
//!
//! Tiles are selectable with the arrow keys or the mouse. Opening a spot is
//! an admin capability; for everyone else Enter and clicks only move the
//! highlight.

use std::cell::{Cell, RefCell};
use std::time::Instant;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use throbber_widgets_tui::ThrobberState;

use parkwatch_core::view::{EMPTY_TEXT, MapView, SpotTile};
use parkwatch_core::{Capabilities, MapState, Route, Session};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::fmt::updated_ago;
use crate::widgets::pagination::{page_targets, pagination_line};
use crate::widgets::panel::{panel, render_spinner};
use crate::widgets::status_indicator::{legend_line, status_line};

const TILE_HEIGHT: u16 = 3;
const ADMIN_HINTS: &[(&str, &str)] = &[("←↑↓→", "select"), ("↵", "open"), ("[ ]", "page")];
const VIEWER_HINTS: &[(&str, &str)] = &[("←↑↓→", "select"), ("[ ]", "page")];

pub struct MapScreen {
    caps: Capabilities,
    state: MapState,
    selected: usize,
    last_update: Option<Instant>,
    spinner: ThrobberState,
    /// Grid width from the last render, for vertical movement.
    columns: Cell<usize>,
    /// Tile rects from the last render, for mouse hits.
    tile_areas: RefCell<Vec<Rect>>,
    /// Page selector cells from the last render, with their page.
    page_areas: RefCell<Vec<(Rect, u32)>>,
}

impl MapScreen {
    pub fn new() -> Self {
        Self {
            caps: Session::loading().capabilities(),
            state: MapState::default(),
            selected: 0,
            last_update: None,
            spinner: ThrobberState::default(),
            columns: Cell::new(4),
            tile_areas: RefCell::new(Vec::new()),
            page_areas: RefCell::new(Vec::new()),
        }
    }

    fn view(&self) -> MapView {
        MapView::build(&self.state, self.caps)
    }

    fn move_selection(&mut self, delta: isize) {
        let count = self.state.spots.as_ref().map_or(0, Vec::len);
        if count == 0 {
            return;
        }
        let target = self.selected.saturating_add_signed(delta);
        self.selected = target.min(count - 1);
    }

    /// Open the tile at `index`. `None` for viewers without the capability.
    fn open(&self, index: usize) -> Option<Action> {
        self.view()
            .select(index)
            .map(|id| Action::Navigate(Route::SpotDetail(id)))
    }

    fn render_tile(&self, frame: &mut Frame, area: Rect, tile: &SpotTile, selected: bool) {
        let border = if selected {
            theme::border_focused()
        } else {
            theme::border_default()
        };
        let title_style = if selected {
            theme::selected()
        } else {
            theme::title_style()
        };
        let block = Block::default()
            .title(Line::from(Span::styled(format!(" {} ", tile.title), title_style)))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Paragraph::new(status_line(tile.status)), inner);
    }

    fn render_grid(&self, frame: &mut Frame, area: Rect, tiles: &[SpotTile]) {
        let block = panel("Parking Lot", true).title_top(
            Line::from(Span::styled(
                format!(" {} ", updated_ago(self.last_update)),
                theme::key_hint(),
            ))
            .right_aligned(),
        );
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut hits = self.tile_areas.borrow_mut();
        hits.clear();

        if tiles.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(EMPTY_TEXT, theme::key_hint())),
                inner,
            );
            return;
        }

        let columns: usize = if inner.width >= 80 { 4 } else { 3 };
        self.columns.set(columns);

        let rows = tiles.len().div_ceil(columns);
        let row_areas = Layout::vertical(vec![Constraint::Length(TILE_HEIGHT); rows]).split(inner);
        let col_constraints =
            vec![Constraint::Ratio(1, u32::try_from(columns).unwrap_or(4)); columns];

        for (row_idx, chunk) in tiles.chunks(columns).enumerate() {
            let Some(row_area) = row_areas.get(row_idx) else {
                break;
            };
            let cells = Layout::horizontal(col_constraints.clone()).split(*row_area);
            for (col_idx, tile) in chunk.iter().enumerate() {
                let index = row_idx * columns + col_idx;
                let Some(cell) = cells.get(col_idx) else {
                    continue;
                };
                self.render_tile(frame, *cell, tile, index == self.selected);
                hits.push(*cell);
            }
        }
    }
}

impl Component for MapScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let controls = self.view().controls;
        let columns = isize::try_from(self.columns.get()).unwrap_or(4);
        let action = match key.code {
            KeyCode::Left | KeyCode::Char('h') => {
                self.move_selection(-1);
                None
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.move_selection(1);
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_selection(-columns);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_selection(columns);
                None
            }
            KeyCode::Enter => self.open(self.selected),
            KeyCode::Char(']' | 'n') | KeyCode::PageDown => controls.next.map(Action::SetMapPage),
            KeyCode::Char('[' | 'p') | KeyCode::PageUp => controls.prev.map(Action::SetMapPage),
            KeyCode::Home | KeyCode::Char('g') if controls.current != 1 => {
                Some(Action::SetMapPage(1))
            }
            KeyCode::End | KeyCode::Char('G') if controls.current != controls.total => {
                Some(Action::SetMapPage(controls.total))
            }
            KeyCode::Char('r') => Some(Action::Refresh),
            _ => None,
        };
        Ok(action)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return Ok(None);
        }
        let at = Position::new(mouse.column, mouse.row);
        let page = self
            .page_areas
            .borrow()
            .iter()
            .find(|(r, _)| r.contains(at))
            .map(|(_, page)| *page);
        if let Some(page) = page {
            return Ok(Some(Action::SetMapPage(page)));
        }
        let hit = self.tile_areas.borrow().iter().position(|r| r.contains(at));
        let Some(index) = hit else {
            return Ok(None);
        };
        self.selected = index;
        Ok(self.open(index))
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::SessionUpdated(session) => self.caps = session.capabilities(),
            Action::MapUpdated(state) => {
                if state.data_page != self.state.data_page {
                    self.selected = 0;
                }
                self.state = (**state).clone();
                if state.has_loaded() {
                    self.last_update = Some(Instant::now());
                }
                let count = self.state.spots.as_ref().map_or(0, Vec::len);
                self.selected = self.selected.min(count.saturating_sub(1));
            }
            Action::Tick => self.spinner.calc_next(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let view = self.view();
        if view.show_spinner {
            self.tile_areas.borrow_mut().clear();
            self.page_areas.borrow_mut().clear();
            render_spinner(frame, area, "Loading parking spots…", &self.spinner);
            return;
        }

        let error_height = u16::from(view.error.is_some());
        let [grid_area, pages_area, legend_area, error_area] = Layout::vertical([
            Constraint::Min(TILE_HEIGHT + 2),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(error_height),
        ])
        .areas(area);

        self.render_grid(frame, grid_area, &view.tiles);
        frame.render_widget(Paragraph::new(pagination_line(&view.controls)), pages_area);
        *self.page_areas.borrow_mut() = page_targets(&view.controls, pages_area);
        frame.render_widget(Paragraph::new(legend_line(&view.legend)), legend_area);
        if let Some(error) = &view.error {
            frame.render_widget(
                Paragraph::new(Span::styled(error.clone(), theme::error_text())),
                error_area,
            );
        }
    }

    fn key_hints(&self) -> &'static [(&'static str, &'static str)] {
        if self.caps.can_open_spot_detail() {
            ADMIN_HINTS
        } else {
            VIEWER_HINTS
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::sync::Arc;

    use crossterm::event::KeyModifiers;
    use parkwatch_core::{ParkingSpot, Role};
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::screens::test_support::buffer_text;

    fn spot(spot_id: i64) -> ParkingSpot {
        ParkingSpot {
            spot_id,
            available: spot_id % 2 == 0,
            reserved: spot_id == 3,
            error: spot_id == 5,
            last_updated: None,
        }
    }

    fn loaded_screen(role: Role) -> MapScreen {
        screen_on_page(role, 1, 3)
    }

    fn screen_on_page(role: Role, current_page: u32, total_pages: u32) -> MapScreen {
        let mut screen = MapScreen::new();
        screen
            .update(&Action::SessionUpdated(Session::established("jane", role)))
            .unwrap();
        screen
            .update(&Action::MapUpdated(Arc::new(MapState {
                current_page,
                total_pages,
                spots: Some((1..=12).map(spot).collect()),
                data_page: current_page,
                last_error: None,
            })))
            .unwrap();
        screen
    }

    fn draw(screen: &MapScreen) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|f| screen.render(f, f.area())).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn spinner_until_first_page() {
        let screen = MapScreen::new();
        let text = draw(&screen);
        assert!(text.contains("Loading parking spots"));
    }

    #[test]
    fn renders_tiles_pages_and_legend() {
        let screen = loaded_screen(Role::Admin);
        let text = draw(&screen);
        assert!(text.contains("PS001"));
        assert!(text.contains("PS012"));
        assert!(text.contains("Reserved"));
        assert!(text.contains("Error"));
        assert!(text.contains("page 1 of 3"));
        assert!(text.contains("Occupied / Reserved"));
    }

    #[test]
    fn admin_enter_opens_selected_spot() {
        let mut screen = loaded_screen(Role::Admin);
        draw(&screen);
        screen.handle_key_event(key(KeyCode::Right)).unwrap();
        screen.handle_key_event(key(KeyCode::Down)).unwrap();
        let action = screen.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert!(matches!(
            action,
            Some(Action::Navigate(Route::SpotDetail(6)))
        ));
    }

    #[test]
    fn viewer_selection_is_a_no_op() {
        let mut screen = loaded_screen(Role::User);
        draw(&screen);
        let action = screen.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert!(action.is_none());

        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 5,
            row: 2,
            modifiers: KeyModifiers::NONE,
        };
        assert!(screen.handle_mouse_event(click).unwrap().is_none());
    }

    #[test]
    fn admin_click_opens_tile() {
        let mut screen = loaded_screen(Role::Admin);
        draw(&screen);
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 5,
            row: 2,
            modifiers: KeyModifiers::NONE,
        };
        let action = screen.handle_mouse_event(click).unwrap();
        assert!(matches!(
            action,
            Some(Action::Navigate(Route::SpotDetail(1)))
        ));
    }

    #[test]
    fn page_keys_respect_bounds() {
        let mut screen = loaded_screen(Role::User);
        assert!(screen.handle_key_event(key(KeyCode::Char('['))).unwrap().is_none());
        assert!(matches!(
            screen.handle_key_event(key(KeyCode::Char(']'))).unwrap(),
            Some(Action::SetMapPage(2))
        ));
        assert!(matches!(
            screen.handle_key_event(key(KeyCode::End)).unwrap(),
            Some(Action::SetMapPage(3))
        ));
    }

    #[test]
    fn clicking_a_page_number_selects_it() {
        let mut screen = screen_on_page(Role::User, 1, 10);
        let text = draw(&screen);

        let (row, line) = text
            .lines()
            .enumerate()
            .find(|(_, l)| l.contains("page 1 of 10"))
            .unwrap();
        let offset = line.find(" 4 ").unwrap();
        let column = line[..offset].chars().count() + 1;

        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: u16::try_from(column).unwrap(),
            row: u16::try_from(row).unwrap(),
            modifiers: KeyModifiers::NONE,
        };
        assert!(matches!(
            screen.handle_mouse_event(click).unwrap(),
            Some(Action::SetMapPage(4))
        ));
    }

    #[test]
    fn clicking_the_current_page_does_nothing() {
        let mut screen = screen_on_page(Role::User, 1, 10);
        let text = draw(&screen);
        let (row, line) = text
            .lines()
            .enumerate()
            .find(|(_, l)| l.contains("page 1 of 10"))
            .unwrap();
        let column = line[..line.find("[1]").unwrap()].chars().count();

        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: u16::try_from(column).unwrap(),
            row: u16::try_from(row).unwrap(),
            modifiers: KeyModifiers::NONE,
        };
        assert!(screen.handle_mouse_event(click).unwrap().is_none());
    }
}
