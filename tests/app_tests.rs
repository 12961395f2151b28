/// Key handling of the terminal front end, driven headless on a manual clock.

use bingo_roulette::app::{App, KeyResult, Prompt};
use bingo_roulette::clock::ManualClock;
use bingo_roulette::config::Config;
use bingo_roulette::rng::SeededSource;
use bingo_roulette::scene::Display;
use bingo_roulette::stage::Notice;
use bingo_roulette::tone::ToneGenerator;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use std::time::Duration;

/// Helper: app with silent audio on a manual clock
fn headless_app(config: &Config) -> (App, ManualClock) {
    let clock = ManualClock::new();
    let app = App::new(
        config,
        Box::new(clock.clone()),
        Box::new(SeededSource::from_seed(21)),
        Box::new(SeededSource::from_seed(22)),
        ToneGenerator::silent(),
    );
    (app, clock)
}

/// Helper: short spin so whole games stay quick
fn fast_config() -> Config {
    Config::from_toml("[roulette]\nspin_ms = 100\nsettle_ms = 0\n[display]\nbackdrop = false\n")
        .unwrap()
}

fn press(app: &mut App, code: KeyCode) -> KeyResult {
    app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
}

/// Helper: run the clock until nothing is scheduled
fn settle(app: &mut App, clock: &ManualClock) {
    while let Some(due) = app.orchestrator().next_deadline() {
        clock.set(due);
        app.update();
    }
}

#[test]
fn test_space_draws_and_marks_the_board() {
    let (mut app, clock) = headless_app(&Config::default());

    assert_eq!(press(&mut app, KeyCode::Char(' ')), KeyResult::Continue);
    assert!(!app.scene().trigger_enabled());
    assert!(matches!(app.scene().display(), Display::Spinning { .. }));
    assert_eq!(app.status(), "Drawing...");

    settle(&mut app, &clock);

    let current = app.orchestrator().state().current().expect("a number was drawn");
    assert!(app.scene().trigger_enabled());
    assert!(app.scene().is_drawn(current));
    assert!(app.scene().is_celebrating(current));
    assert_eq!(app.scene().display(), Display::Shown { number: current });
    assert!(app.status().starts_with(&format!("Drew {current} ")));

    // The celebration highlight fades after a second
    clock.advance(Duration::from_secs(1));
    app.update();
    assert!(!app.scene().is_celebrating(current));
}

#[test]
fn test_enter_during_draw_is_ignored() {
    let (mut app, clock) = headless_app(&Config::default());

    press(&mut app, KeyCode::Enter);
    clock.advance(Duration::from_millis(800));
    app.update();
    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Char(' '));

    settle(&mut app, &clock);
    assert_eq!(app.orchestrator().state().drawn().len(), 1);
    assert_eq!(app.scene().drawn_count(), 1);
}

#[test]
fn test_quit_without_a_game_is_immediate() {
    let (mut app, _clock) = headless_app(&Config::default());
    assert_eq!(press(&mut app, KeyCode::Char('q')), KeyResult::Quit);
}

#[test]
fn test_quit_during_a_game_asks_first() {
    let (mut app, clock) = headless_app(&Config::default());
    press(&mut app, KeyCode::Char(' '));
    settle(&mut app, &clock);

    assert_eq!(press(&mut app, KeyCode::Char('q')), KeyResult::Continue);
    assert_eq!(app.prompt(), Some(Prompt::Quit));

    // Anything but y keeps playing
    assert_eq!(press(&mut app, KeyCode::Char('n')), KeyResult::Continue);
    assert_eq!(app.prompt(), None);

    assert_eq!(press(&mut app, KeyCode::Esc), KeyResult::Continue);
    assert_eq!(app.prompt(), Some(Prompt::Quit));
    assert_eq!(press(&mut app, KeyCode::Char('y')), KeyResult::Quit);
}

#[test]
fn test_confirmation_can_be_disabled() {
    let config = Config::from_toml("[display]\nconfirm_quit = false\n").unwrap();
    let (mut app, clock) = headless_app(&config);
    press(&mut app, KeyCode::Char(' '));
    settle(&mut app, &clock);

    assert_eq!(press(&mut app, KeyCode::Char('q')), KeyResult::Quit);
}

#[test]
fn test_ctrl_c_always_quits() {
    let (mut app, _clock) = headless_app(&Config::default());
    press(&mut app, KeyCode::Char(' '));
    let result = app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert_eq!(result, KeyResult::Quit);
}

#[test]
fn test_key_release_events_are_ignored() {
    let (mut app, _clock) = headless_app(&Config::default());
    let release = KeyEvent {
        code: KeyCode::Char(' '),
        modifiers: KeyModifiers::NONE,
        kind: KeyEventKind::Release,
        state: KeyEventState::NONE,
    };
    app.handle_key(release);
    assert!(!app.orchestrator().state().is_drawing());
}

#[test]
fn test_new_game_after_confirmation() {
    let (mut app, clock) = headless_app(&Config::default());
    press(&mut app, KeyCode::Char(' '));

    // Not while the roulette is spinning
    press(&mut app, KeyCode::Char('n'));
    assert_eq!(app.prompt(), None);
    assert_eq!(app.status(), "Wait for the draw to finish");

    settle(&mut app, &clock);
    press(&mut app, KeyCode::Char('n'));
    assert_eq!(app.prompt(), Some(Prompt::NewGame));
    press(&mut app, KeyCode::Char('y'));

    assert_eq!(app.orchestrator().state().drawn().len(), 0);
    assert_eq!(app.scene().drawn_count(), 0);
    assert_eq!(app.scene().display(), Display::Idle);
}

#[test]
fn test_full_game_notices() {
    let (mut app, clock) = headless_app(&fast_config());

    for _ in 0..75 {
        press(&mut app, KeyCode::Char(' '));
        settle(&mut app, &clock);
    }
    assert_eq!(app.scene().drawn_count(), 75);
    assert_eq!(app.scene().notice(), Some(Notice::GameComplete));
    assert!(!app.orchestrator().is_in_progress());

    // First key only dismisses the notice
    press(&mut app, KeyCode::Char(' '));
    assert_eq!(app.scene().notice(), None);

    press(&mut app, KeyCode::Char(' '));
    assert_eq!(app.scene().notice(), Some(Notice::AllNumbersDrawn));
    assert_eq!(app.orchestrator().state().drawn().len(), 75);

    // A finished game quits without asking
    press(&mut app, KeyCode::Char('x'));
    assert_eq!(press(&mut app, KeyCode::Char('q')), KeyResult::Quit);
}

#[test]
fn test_mute_toggle() {
    let (mut app, _clock) = headless_app(&Config::default());
    assert!(!app.is_muted());
    press(&mut app, KeyCode::Char('m'));
    assert!(app.is_muted());
    assert_eq!(app.status(), "Muted");
    press(&mut app, KeyCode::Char('m'));
    assert!(!app.is_muted());
}

#[test]
fn test_poll_timeout_tracks_next_deadline() {
    let (mut app, clock) = headless_app(&Config::default());
    assert_eq!(app.poll_timeout(), Duration::from_millis(33));

    press(&mut app, KeyCode::Char(' '));
    clock.advance(Duration::from_millis(30));
    // Next tick is due at 50 ms
    assert_eq!(app.poll_timeout(), Duration::from_millis(20));
}
