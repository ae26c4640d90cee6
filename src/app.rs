use std::time::Instant;

use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::layout::Rect;
use tokio::sync::mpsc;

use crate::config::Config;
use crate::constants::async_tasks::CHANNEL_BUFFER_SIZE;
use crate::deck::Deck;
use crate::diagram::data::{load_dataset, DataSet};
use crate::diagram::shape::Point;
use crate::diagram::DiagramBoard;
use crate::error::Result;
use crate::input::{dispatch, Command, InputContext, InputResult};
use crate::navigator::{Advance, JumpOutcome, Navigator, Transition};
use crate::presenter::PresenterView;
use crate::types::DiagramId;

pub use crate::input::AppMode;

/// Messages from background tasks.
#[derive(Debug)]
pub enum AppUpdate {
    /// Heatmap and dendrogram files finished loading.
    DataLoaded(Result<DataSet>),
}

/// Screen area of a drawn diagram and the scene size mapped onto it.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramArea {
    /// Diagram drawn there.
    pub id: DiagramId,
    /// Terminal cells covered.
    pub area: Rect,
    /// Scene width in scene units.
    pub scene_width: f64,
    /// Scene height in scene units.
    pub scene_height: f64,
}

impl DiagramArea {
    /// Scene point under the centre of a terminal cell.
    pub fn to_scene(&self, column: u16, row: u16) -> Option<Point> {
        if !contains(self.area, column, row) || self.area.width == 0 || self.area.height == 0 {
            return None;
        }
        let fx = (f64::from(column - self.area.x) + 0.5) / f64::from(self.area.width);
        let fy = (f64::from(row - self.area.y) + 0.5) / f64::from(self.area.height);
        Some(Point::new(fx * self.scene_width, fy * self.scene_height))
    }
}

/// Clickable regions recorded by the last draw.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HitAreas {
    /// Previous-slide button.
    pub prev: Rect,
    /// Next-slide button.
    pub next: Rect,
    /// Jump-to-slide field.
    pub jump: Rect,
    /// Diagrams on the current slide.
    pub diagrams: Vec<DiagramArea>,
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x && column < area.x + area.width && row >= area.y && row < area.y + area.height
}

/// The presenter application.
pub struct App {
    /// Current input mode.
    pub mode: AppMode,
    /// Loaded deck.
    pub deck: Deck,
    /// Slide state machine.
    pub navigator: Navigator,
    /// Screen-side view model.
    pub view: PresenterView,
    /// Rendered diagrams.
    pub board: DiagramBoard,
    /// Runtime configuration.
    pub config: Config,
    should_quit: bool,
    /// Key reference overlay shown.
    pub show_help: bool,
    /// Diagram data still loading.
    pub is_loading: bool,
    /// Diagram of the current slide that has keyboard focus.
    pub focused_diagram: Option<usize>,
    /// Regions recorded by the last draw.
    pub hit_areas: HitAreas,
    /// Sender handed to background tasks.
    pub async_task_tx: mpsc::Sender<AppUpdate>,
    async_task_rx: mpsc::Receiver<AppUpdate>,
    pressed_diagram: Option<DiagramId>,
    last_tick: Instant,
}

impl App {
    /// Build the app for a validated deck. Static diagrams render here.
    pub fn new(deck: Deck, config: Config) -> Self {
        Self::with_rng(deck, config, StdRng::from_entropy())
    }

    /// Same as [`Self::new`] with a fixed random source.
    pub fn with_rng(deck: Deck, config: Config, rng: StdRng) -> Self {
        let (async_task_tx, async_task_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        let navigator = Navigator::from_deck(&deck);
        let mut view = PresenterView::new(&deck);
        let mut board = DiagramBoard::new(&deck, rng);
        let now = Instant::now();
        view.update_slide(&navigator, now);
        if let Some(slide) = deck.slide(navigator.current_slide()) {
            board.enter_slide(slide);
        }

        Self {
            mode: AppMode::Presenting,
            deck,
            navigator,
            view,
            board,
            config,
            should_quit: false,
            show_help: false,
            is_loading: false,
            focused_diagram: None,
            hit_areas: HitAreas::default(),
            async_task_tx,
            async_task_rx,
            pressed_diagram: None,
            last_tick: now,
        }
    }

    /// Whether the main loop should exit.
    pub const fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Ask the main loop to exit.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Load the diagram data files on a background task.
    pub fn start_loading(&mut self) {
        self.is_loading = true;
        let tx = self.async_task_tx.clone();
        let dir = self.config.data_dir.clone();
        tokio::spawn(async move {
            let result = load_dataset(&dir).await;
            if let Err(e) = tx.send(AppUpdate::DataLoaded(result)).await {
                tracing::error!("Failed to deliver loaded data: {e}");
            }
        });
    }

    /// Drain messages from background tasks.
    pub fn handle_updates(&mut self) {
        loop {
            match self.async_task_rx.try_recv() {
                Ok(AppUpdate::DataLoaded(result)) => {
                    self.is_loading = false;
                    self.board.on_data(result);
                }
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    tracing::debug!("Update channel closed");
                    break;
                }
            }
        }
    }

    /// Advance deferred effects and the slide timer to `now`.
    /// Returns true if anything visible changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let delta = now.saturating_duration_since(self.last_tick);
        self.last_tick = now;
        let timer = self.navigator.advance_timer(delta);
        let effects = self.view.advance_clock(now);
        timer || effects
    }

    /// Diagrams placed on the current slide.
    pub fn current_diagrams(&self) -> Vec<DiagramId> {
        self.deck
            .slide(self.navigator.current_slide())
            .map(|s| s.diagrams.iter().map(|d| d.id.clone()).collect())
            .unwrap_or_default()
    }

    fn focused_diagram_id(&self) -> Option<DiagramId> {
        self.focused_diagram.and_then(|i| self.current_diagrams().get(i).cloned())
    }

    /// Handle a key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        self.handle_key_at(key, Instant::now());
    }

    /// Key handling with an explicit clock.
    pub fn handle_key_at(&mut self, key: KeyEvent, now: Instant) {
        let ctx = InputContext {
            mode: self.mode,
            show_help: self.show_help,
            has_diagrams: !self.current_diagrams().is_empty(),
        };
        match dispatch(key, &ctx) {
            InputResult::Quit => self.quit(),
            InputResult::ModeChange(mode) => self.set_mode(mode),
            InputResult::Command(command) => {
                // While help is up only the help toggle works
                if self.show_help && command != Command::ToggleHelp {
                    return;
                }
                self.apply(command, now);
            }
            InputResult::Consumed | InputResult::Ignored => {}
        }
    }

    fn set_mode(&mut self, mode: AppMode) {
        if self.mode == AppMode::Diagram && mode != AppMode::Diagram {
            if let Some(id) = self.focused_diagram_id() {
                self.board.blur(&id);
            }
            self.focused_diagram = None;
        }
        self.mode = mode;
    }

    /// Apply a presenter command.
    pub fn apply(&mut self, command: Command, now: Instant) {
        match command {
            Command::Prev => {
                let t = self.navigator.prev_slide();
                self.after_transition(t, now);
            }
            Command::Advance => self.advance(now),
            Command::First => {
                let t = self.navigator.first_slide();
                self.after_transition(t, now);
            }
            Command::Last => {
                let t = self.navigator.last_slide();
                self.after_transition(t, now);
            }
            Command::OpenJump(prefill) => {
                self.view.jump_input.clear();
                if let Some(c) = prefill {
                    self.view.jump_input.push(c);
                }
                self.set_mode(AppMode::JumpInput);
            }
            Command::JumpChar(c) => self.view.jump_input.push(c),
            Command::JumpBackspace => {
                self.view.jump_input.pop();
            }
            Command::SubmitJump => self.submit_jump(now),
            Command::BlurJump => {
                self.set_mode(AppMode::Presenting);
                if !self.view.jump_input.is_empty() {
                    self.submit_jump(now);
                }
            }
            Command::ToggleHelp => self.show_help = !self.show_help,
            Command::FocusDiagrams => {
                if !self.current_diagrams().is_empty() {
                    self.set_mode(AppMode::Diagram);
                    self.focused_diagram = Some(0);
                    self.step_focus(true);
                }
            }
            Command::FocusNext => self.step_focus(true),
            Command::FocusPrev => self.step_focus(false),
            Command::Activate => {
                if let Some(id) = self.focused_diagram_id() {
                    self.board.activate_focused(&id);
                }
            }
        }
    }

    /// Move keyboard hover inside the focused diagram. Once it runs off
    /// either end, the focus moves on to the next visible diagram of the
    /// slide, coming back round to the first.
    fn step_focus(&mut self, forward: bool) {
        let diagrams = self.current_diagrams();
        let len = diagrams.len();
        let Some(start) = self.focused_diagram else { return };
        if let Some(id) = diagrams.get(start) {
            if self.board.is_visible(id) && self.board.focus_step(id, forward).is_some() {
                return;
            }
            self.board.blur(id);
        }
        for offset in 1..=len {
            let index = if forward { (start + offset) % len } else { (start + len * 2 - offset) % len };
            let Some(id) = diagrams.get(index) else { continue };
            if !self.board.is_visible(id) {
                continue;
            }
            if self.board.focus_step(id, forward).is_some() {
                self.focused_diagram = Some(index);
                return;
            }
        }
    }

    fn advance(&mut self, now: Instant) {
        match self.navigator.on_advance() {
            Advance::Revealed => tracing::debug!("Revealed item on slide {}", self.navigator.current_slide() + 1),
            Advance::Navigated(t) => self.after_transition(t, now),
        }
    }

    fn submit_jump(&mut self, now: Instant) {
        let input = std::mem::take(&mut self.view.jump_input);
        match self.navigator.jump_to_slide(&input) {
            JumpOutcome::Jumped(t) => {
                self.set_mode(AppMode::Presenting);
                self.after_transition(t, now);
            }
            JumpOutcome::Empty => {}
            // the field keeps its text, like a number input after a bad entry
            JumpOutcome::Rejected(_) => {
                self.view.jump_input = input;
                self.view.flash_jump_error(now);
            }
        }
    }

    fn after_transition(&mut self, transition: Transition, now: Instant) {
        if let Transition::Moved { to, .. } = transition {
            if self.mode == AppMode::Diagram {
                self.set_mode(AppMode::Presenting);
            }
            self.view.update_slide(&self.navigator, now);
            if let Some(slide) = self.deck.slide(to) {
                self.board.enter_slide(slide);
            }
        }
    }

    /// Handle a mouse event.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        self.handle_mouse_at(mouse, Instant::now());
    }

    /// Mouse handling with an explicit clock.
    pub fn handle_mouse_at(&mut self, mouse: MouseEvent, now: Instant) {
        if self.show_help {
            return;
        }
        let (column, row) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Moved => {
                for area in self.hit_areas.diagrams.clone() {
                    let point = area.to_scene(column, row);
                    self.board.hover(&area.id, point);
                }
            }
            MouseEventKind::Down(MouseButton::Left) => self.mouse_down(column, row, now),
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(id) = self.pressed_diagram.clone() {
                    let area = self.hit_areas.diagrams.iter().find(|a| a.id == id);
                    if let Some(point) = area.and_then(|a| a.to_scene(column, row)) {
                        self.board.drag_to(&id, point);
                    }
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if let Some(id) = self.pressed_diagram.take() {
                    self.board.release(&id);
                }
            }
            _ => {}
        }
    }

    fn mouse_down(&mut self, column: u16, row: u16, now: Instant) {
        let areas = self.hit_areas.clone();
        if contains(areas.jump, column, row) {
            if self.mode != AppMode::JumpInput {
                self.apply(Command::OpenJump(None), now);
            }
            return;
        }
        // Clicking away from the jump field blurs it
        if self.mode == AppMode::JumpInput {
            self.apply(Command::BlurJump, now);
        }
        if contains(areas.prev, column, row) {
            let t = self.navigator.prev_slide();
            self.after_transition(t, now);
            return;
        }
        if contains(areas.next, column, row) {
            let t = self.navigator.next_slide();
            self.after_transition(t, now);
            return;
        }
        for area in &areas.diagrams {
            if let Some(point) = area.to_scene(column, row) {
                if self.board.press(&area.id, point) {
                    self.pressed_diagram = Some(area.id.clone());
                    return;
                }
            }
        }
        self.advance(now);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::time::Duration;

    const DECK: &str = r#"{
        "title": "Test",
        "timed_slide": 2,
        "slides": [
            { "title": "One", "items": [ { "text": "a" }, { "text": "b" } ] },
            { "title": "Two", "paragraphs": [ "p1", "p2" ] },
            { "title": "Three", "diagrams": [ { "id": "playground" } ] },
            { "title": "Four" },
            { "title": "Five" }
        ]
    }"#;

    fn app() -> App {
        let deck = Deck::from_json(DECK).unwrap();
        App::with_rng(deck, Config::default(), StdRng::seed_from_u64(9))
    }

    fn key(app: &mut App, code: KeyCode, now: Instant) {
        app.handle_key_at(KeyEvent::new(code, KeyModifiers::empty()), now);
    }

    fn click(app: &mut App, column: u16, row: u16, now: Instant) {
        app.handle_mouse_at(
            MouseEvent { kind: MouseEventKind::Down(MouseButton::Left), column, row, modifiers: KeyModifiers::empty() },
            now,
        );
    }

    #[test]
    fn right_reveals_then_navigates() {
        let mut app = app();
        let now = Instant::now();
        key(&mut app, KeyCode::Right, now);
        assert_eq!(app.navigator.current_slide(), 0);
        assert_eq!(app.navigator.active_reveal().unwrap().current(), 2);
        key(&mut app, KeyCode::Right, now);
        assert_eq!(app.navigator.current_slide(), 1);
        assert_eq!(app.view.counter(), "2 / 5");
    }

    #[test]
    fn typed_digit_jumps_on_enter() {
        let mut app = app();
        let now = Instant::now();
        key(&mut app, KeyCode::Char('4'), now);
        assert_eq!(app.mode, AppMode::JumpInput);
        assert_eq!(app.view.jump_input, "4");
        key(&mut app, KeyCode::Enter, now);
        assert_eq!(app.navigator.current_slide(), 3);
        assert_eq!(app.mode, AppMode::Presenting);
        assert!(app.view.jump_input.is_empty());
    }

    #[test]
    fn out_of_range_jump_flashes_and_stays() {
        let mut app = app();
        let now = Instant::now();
        key(&mut app, KeyCode::Char('7'), now);
        key(&mut app, KeyCode::Enter, now);
        assert_eq!(app.navigator.current_slide(), 0);
        assert!(app.view.jump_error());
        assert_eq!(app.mode, AppMode::JumpInput);
        assert_eq!(app.view.jump_input, "7");
        app.tick(now + Duration::from_millis(350));
        assert!(!app.view.jump_error());
    }

    #[test]
    fn escape_blurs_and_submits_non_empty_field() {
        let mut app = app();
        let now = Instant::now();
        key(&mut app, KeyCode::Char('g'), now);
        key(&mut app, KeyCode::Esc, now);
        assert_eq!(app.mode, AppMode::Presenting);
        assert_eq!(app.navigator.current_slide(), 0);
        assert!(!app.view.jump_error());

        key(&mut app, KeyCode::Char('3'), now);
        key(&mut app, KeyCode::Esc, now);
        assert_eq!(app.navigator.current_slide(), 2);
    }

    #[test]
    fn home_and_end() {
        let mut app = app();
        let now = Instant::now();
        key(&mut app, KeyCode::End, now);
        assert_eq!(app.navigator.current_slide(), 4);
        assert!(!app.view.next_enabled());
        key(&mut app, KeyCode::Home, now);
        assert_eq!(app.navigator.current_slide(), 0);
        assert!(!app.view.prev_enabled());
    }

    #[test]
    fn help_blocks_navigation() {
        let mut app = app();
        let now = Instant::now();
        key(&mut app, KeyCode::Char('?'), now);
        assert!(app.show_help);
        key(&mut app, KeyCode::End, now);
        assert_eq!(app.navigator.current_slide(), 0);
        key(&mut app, KeyCode::Esc, now);
        assert!(!app.show_help);
    }

    #[test]
    fn timer_runs_only_on_timed_slide() {
        let mut app = app();
        let now = Instant::now();
        app.last_tick = now;
        key(&mut app, KeyCode::Right, now);
        key(&mut app, KeyCode::Right, now);
        assert_eq!(app.navigator.current_slide(), 1);
        assert!(app.tick(now + Duration::from_millis(2100)));
        assert_eq!(app.navigator.timer().elapsed_secs(), 2);
        key(&mut app, KeyCode::Left, now + Duration::from_millis(2100));
        assert_eq!(app.navigator.timer().elapsed_secs(), 0);
    }

    #[test]
    fn paragraphs_stagger_in() {
        let mut app = app();
        let now = Instant::now();
        app.last_tick = now;
        app.apply(Command::OpenJump(Some('2')), now);
        app.apply(Command::SubmitJump, now);
        assert!(!app.view.paragraph_visible(1, 0));
        app.tick(now + Duration::from_millis(250));
        assert!(app.view.paragraph_visible(1, 0));
        assert!(!app.view.paragraph_visible(1, 1));
        app.tick(now + Duration::from_millis(1750));
        assert!(app.view.paragraph_visible(1, 1));
    }

    #[test]
    fn buttons_and_generic_click() {
        let mut app = app();
        let now = Instant::now();
        app.hit_areas.prev = Rect::new(0, 20, 8, 1);
        app.hit_areas.next = Rect::new(10, 20, 8, 1);
        app.hit_areas.jump = Rect::new(20, 20, 12, 1);
        click(&mut app, 12, 20, now);
        assert_eq!(app.navigator.current_slide(), 1);
        click(&mut app, 2, 20, now);
        assert_eq!(app.navigator.current_slide(), 0);
        click(&mut app, 40, 5, now);
        assert_eq!(app.navigator.active_reveal().unwrap().current(), 2);
        click(&mut app, 22, 20, now);
        assert_eq!(app.mode, AppMode::JumpInput);
    }

    #[test]
    fn diagram_keyboard_focus() {
        let mut app = app();
        let now = Instant::now();
        key(&mut app, KeyCode::Char('d'), now);
        assert_eq!(app.mode, AppMode::Presenting);

        key(&mut app, KeyCode::Char('3'), now);
        key(&mut app, KeyCode::Enter, now);
        key(&mut app, KeyCode::Char('d'), now);
        assert_eq!(app.mode, AppMode::Diagram);
        let id = DiagramId::new("playground");
        assert!(app.board.slot(&id).unwrap().state.hovered().is_some());
        key(&mut app, KeyCode::Esc, now);
        assert_eq!(app.mode, AppMode::Presenting);
        assert!(app.board.slot(&id).unwrap().state.hovered().is_none());
    }

    #[test]
    fn mouse_drag_over_diagram() {
        let mut app = app();
        let now = Instant::now();
        app.apply(Command::OpenJump(Some('3')), now);
        app.apply(Command::SubmitJump, now);
        let id = DiagramId::new("playground");
        // one terminal cell per ten scene units
        app.hit_areas.diagrams = vec![DiagramArea {
            id: id.clone(),
            area: Rect::new(0, 0, 120, 34),
            scene_width: 1200.0,
            scene_height: 340.0,
        }];
        // drag-circle sits at (660, 100) in scene units
        click(&mut app, 66, 10, now);
        assert!(app.board.slot(&id).unwrap().is_dragging());
        app.handle_mouse_at(
            MouseEvent { kind: MouseEventKind::Drag(MouseButton::Left), column: 70, row: 10, modifiers: KeyModifiers::empty() },
            now,
        );
        app.handle_mouse_at(
            MouseEvent { kind: MouseEventKind::Up(MouseButton::Left), column: 70, row: 10, modifiers: KeyModifiers::empty() },
            now,
        );
        assert!(!app.board.slot(&id).unwrap().is_dragging());
        let scene = app.board.slot(&id).unwrap().scene().unwrap();
        let center = scene.element(&"drag-circle".into()).unwrap().bounds().center();
        assert!((center.x - 700.0).abs() < 1e-9);
        assert_eq!(app.navigator.current_slide(), 2);
    }

    #[test]
    fn failed_data_load_keeps_navigation() {
        let mut app = app();
        app.async_task_tx
            .try_send(AppUpdate::DataLoaded(Err(crate::error::Error::data("gone"))))
            .unwrap();
        app.is_loading = true;
        app.handle_updates();
        assert!(!app.is_loading);
        let slot = app.board.slot(&DiagramId::new("similarity-heatmap")).unwrap();
        assert!(matches!(slot.content, crate::diagram::SlotContent::Failed(_)));
        key(&mut app, KeyCode::End, Instant::now());
        assert_eq!(app.navigator.current_slide(), 4);
    }
}
