//! Drives the presenter through the demo deck the way a keyboard and mouse
//! would, drawing to an in-memory terminal.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::backend::TestBackend;
use ratatui::Terminal;

use vizdeck::app::{App, AppMode};
use vizdeck::config::Config;
use vizdeck::deck::Deck;
use vizdeck::diagram::flow::box_id;
use vizdeck::types::DiagramId;
use vizdeck::ui;

fn demos() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos")
}

fn demo_app() -> App {
    let deck = Deck::load(&demos().join("deck.json")).unwrap();
    let mut config = Config::default();
    config.data_dir = demos().join("data");
    App::with_rng(deck, config, StdRng::seed_from_u64(42))
}

fn press(app: &mut App, code: KeyCode, now: Instant) {
    app.handle_key_at(KeyEvent::new(code, KeyModifiers::empty()), now);
}

fn screen(app: &mut App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
    terminal.draw(|f| ui::draw(f, app)).unwrap();
    terminal.backend().buffer().content.iter().map(|cell| cell.symbol()).collect()
}

#[test]
fn walks_the_motivation_slide_item_by_item() {
    let mut app = demo_app();
    let now = Instant::now();
    assert_eq!(app.view.counter(), "1 / 9");

    // title slide has nothing to reveal
    press(&mut app, KeyCode::Right, now);
    assert_eq!(app.navigator.current_slide(), 1);
    let reveal = app.navigator.active_reveal().unwrap();
    assert_eq!(reveal.visibility(), &[true, false, false, false]);

    // the explanation arrives with the bullet after it
    press(&mut app, KeyCode::Right, now);
    assert_eq!(app.navigator.active_reveal().unwrap().visibility(), &[true, true, true, false]);
    press(&mut app, KeyCode::Right, now);
    assert!(app.navigator.active_reveal().unwrap().all_revealed());

    press(&mut app, KeyCode::Right, now);
    assert_eq!(app.navigator.current_slide(), 2);

    // leaving and coming back starts from the baseline again
    press(&mut app, KeyCode::Left, now);
    assert_eq!(app.navigator.active_reveal().unwrap().visibility(), &[true, false, false, false]);
}

#[test]
fn paragraphs_enter_one_after_another() {
    let mut app = demo_app();
    let now = Instant::now();
    press(&mut app, KeyCode::Right, now);
    assert!(!app.view.paragraph_visible(1, 0));

    app.tick(now + Duration::from_millis(250));
    assert!(app.view.paragraph_visible(1, 0));
    assert!(!app.view.paragraph_visible(1, 1));

    app.tick(now + Duration::from_millis(3300));
    assert!(app.view.paragraph_visible(1, 1));
    assert!(app.view.paragraph_visible(1, 2));
}

#[test]
fn timer_counts_only_on_the_timed_slide() {
    let mut app = demo_app();
    let start = Instant::now();
    app.tick(start + Duration::from_secs(5));
    assert_eq!(app.navigator.timer().display(), "00:00");

    press(&mut app, KeyCode::Right, start);
    let entered = Instant::now();
    app.tick(entered);
    app.tick(entered + Duration::from_millis(3500));
    assert_eq!(app.navigator.timer().display(), "00:03");

    press(&mut app, KeyCode::Right, entered);
    assert_eq!(app.navigator.current_slide(), 1, "still revealing");
    press(&mut app, KeyCode::End, entered);
    assert_eq!(app.navigator.timer().display(), "00:00");
}

#[test]
fn jump_field_accepts_slide_numbers_and_flashes_on_bad_input() {
    let mut app = demo_app();
    let now = Instant::now();

    press(&mut app, KeyCode::Char('g'), now);
    assert_eq!(app.mode, AppMode::JumpInput);
    press(&mut app, KeyCode::Char('8'), now);
    press(&mut app, KeyCode::Enter, now);
    assert_eq!(app.navigator.current_slide(), 7);
    assert_eq!(app.mode, AppMode::Presenting);

    press(&mut app, KeyCode::Char('4'), now);
    press(&mut app, KeyCode::Char('2'), now);
    press(&mut app, KeyCode::Enter, now);
    assert_eq!(app.navigator.current_slide(), 7);
    assert!(app.view.jump_error());
    assert_eq!(app.view.jump_input, "42");

    app.tick(now + Duration::from_millis(400));
    assert!(!app.view.jump_error());
}

#[test]
fn pipeline_box_reveals_the_process_model() {
    let mut app = demo_app();
    let now = Instant::now();
    press(&mut app, KeyCode::Char('3'), now);
    press(&mut app, KeyCode::Enter, now);

    let process = DiagramId::new("process-model");
    assert!(!app.board.is_visible(&process));
    assert!(app.board.click(&DiagramId::new("pipeline"), &box_id("model")));
    assert!(app.board.is_visible(&process));

    // the same diagram is shown outright on a later slide
    press(&mut app, KeyCode::Char('6'), now);
    press(&mut app, KeyCode::Enter, now);
    assert!(app.board.is_visible(&process));
    press(&mut app, KeyCode::Char('3'), now);
    press(&mut app, KeyCode::Enter, now);
    assert!(!app.board.is_visible(&process));
}

#[test]
fn tab_moves_focus_across_visible_diagrams() {
    let mut app = demo_app();
    let now = Instant::now();
    press(&mut app, KeyCode::Char('3'), now);
    press(&mut app, KeyCode::Enter, now);
    assert!(app.board.click(&DiagramId::new("pipeline"), &box_id("model")));

    press(&mut app, KeyCode::Char('d'), now);
    assert_eq!(app.mode, AppMode::Diagram);
    assert_eq!(app.focused_diagram, Some(0));

    let mut order = vec![app.focused_diagram];
    for _ in 0..500 {
        press(&mut app, KeyCode::Tab, now);
        if order.last() != Some(&app.focused_diagram) {
            order.push(app.focused_diagram);
        }
    }
    assert!(order.starts_with(&[Some(0), Some(1), Some(0)]), "focus order {order:?}");

    // only one diagram holds keyboard hover at a time
    let hovered = ["pipeline", "process-model"]
        .iter()
        .filter(|id| app.board.slot(&DiagramId::new(**id)).unwrap().state.hovered().is_some())
        .count();
    assert_eq!(hovered, 1);
}

#[test]
fn tab_skips_hidden_diagrams() {
    let mut app = demo_app();
    let now = Instant::now();
    press(&mut app, KeyCode::Char('3'), now);
    press(&mut app, KeyCode::Enter, now);
    press(&mut app, KeyCode::Char('d'), now);
    for _ in 0..100 {
        press(&mut app, KeyCode::Tab, now);
        assert_eq!(app.focused_diagram, Some(0));
    }
    press(&mut app, KeyCode::BackTab, now);
    assert_eq!(app.focused_diagram, Some(0));
}

#[test]
fn drawn_screen_shows_slide_and_status_bar() {
    let mut app = demo_app();
    let text = screen(&mut app);
    assert!(text.contains("Exploring Exploration Behavior"));
    assert!(text.contains("1 / 9"));
    assert!(text.contains("Ada Park"));

    press(&mut app, KeyCode::Right, Instant::now());
    let text = screen(&mut app);
    assert!(text.contains("Motivation"));
    assert!(text.contains("Analysts leave long trails"));
    assert!(!text.contains("recurring exploration strategies"));
    assert!(text.contains("00:00"));
}

#[test]
fn next_button_moves_without_revealing() {
    let mut app = demo_app();
    let now = Instant::now();
    press(&mut app, KeyCode::Right, now);
    screen(&mut app);

    let next = app.hit_areas.next;
    app.handle_mouse_at(
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: next.x + 1,
            row: next.y,
            modifiers: KeyModifiers::empty(),
        },
        now,
    );
    assert_eq!(app.navigator.current_slide(), 2);
}

#[test]
fn missing_data_shows_the_error_in_data_diagrams() {
    let mut app = demo_app();
    app.board.on_data(Err(vizdeck::error::Error::data("gone")));
    press(&mut app, KeyCode::Char('4'), Instant::now());
    press(&mut app, KeyCode::Enter, Instant::now());
    let text = screen(&mut app);
    assert!(text.contains("Error loading data"));
}

#[tokio::test]
async fn background_load_fills_the_heatmap() {
    let mut app = demo_app();
    app.start_loading();
    assert!(app.is_loading);

    for _ in 0..200 {
        app.handle_updates();
        if !app.is_loading {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(!app.is_loading, "data never arrived");
    let slot = app.board.slot(&DiagramId::new("similarity-heatmap")).unwrap();
    assert!(slot.scene().is_some());
}
