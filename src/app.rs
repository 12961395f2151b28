//! Full-screen terminal front end
//!
//! Space or Enter draws a number. Quitting or restarting a game in progress
//! asks for confirmation first.

use crate::clock::{Clock, MonotonicClock};
use crate::config::Config;
use crate::draw::{DrawOrchestrator, TriggerOutcome};
use crate::game::GameRange;
use crate::rng::{NumberSource, SeededSource};
use crate::scene::Scene;
use crate::tone::ToneGenerator;
use crate::ui;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use tracing::info;

/// Pending yes/no question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    Quit,
    NewGame,
}

impl Prompt {
    pub fn question(&self) -> &'static str {
        match self {
            Prompt::Quit => "A game is in progress. Quit anyway? (y/n)",
            Prompt::NewGame => "Abandon this game and start a new one? (y/n)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyResult {
    Continue,
    Quit,
}

pub struct App {
    orchestrator: DrawOrchestrator,
    scene: Scene,
    tones: ToneGenerator,
    prompt: Option<Prompt>,
    confirm_quit: bool,
    frame_interval: Duration,
    status: String,
}

impl App {
    pub fn new(
        config: &Config,
        clock: Box<dyn Clock>,
        draw_rng: Box<dyn NumberSource>,
        scene_rng: Box<dyn NumberSource>,
        tones: ToneGenerator,
    ) -> Self {
        let orchestrator = DrawOrchestrator::new(config.phase_table(), clock, draw_rng);
        let scene = Scene::new(GameRange::standard(), config.display.backdrop, scene_rng);
        let status = if tones.is_available() {
            "Press Space to draw".to_string()
        } else {
            "Press Space to draw (no audio)".to_string()
        };

        Self {
            orchestrator,
            scene,
            tones,
            prompt: None,
            confirm_quit: config.display.confirm_quit,
            frame_interval: config.frame_interval(),
            status,
        }
    }

    /// App on the wall clock, entropy-seeded, with the configured audio
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config,
            Box::new(MonotonicClock::new()),
            Box::new(SeededSource::from_entropy()),
            Box::new(SeededSource::from_entropy()),
            ToneGenerator::new(&config.audio),
        )
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn orchestrator(&self) -> &DrawOrchestrator {
        &self.orchestrator
    }

    pub fn prompt(&self) -> Option<Prompt> {
        self.prompt
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn is_muted(&self) -> bool {
        self.tones.is_muted()
    }

    /// Bring the scene to the current time and fire due draw timers
    pub fn update(&mut self) {
        self.scene.advance(self.orchestrator.now());
        if let Some(number) = self.orchestrator.poll(&mut self.scene, &self.tones) {
            let state = self.orchestrator.state();
            self.status = format!(
                "Drew {} ({} of {})",
                number,
                state.drawn().len(),
                state.range().max()
            );
        }
    }

    /// How long the event loop may block before `update` is needed again
    pub fn poll_timeout(&self) -> Duration {
        let now = self.orchestrator.now();
        match self.orchestrator.next_deadline() {
            Some(due) => due.saturating_sub(now).min(self.frame_interval),
            None => self.frame_interval,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult {
        if key.kind != KeyEventKind::Press {
            return KeyResult::Continue;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return KeyResult::Quit;
        }

        if let Some(prompt) = self.prompt.take() {
            return match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => self.confirm(prompt),
                _ => KeyResult::Continue,
            };
        }

        // Any key acknowledges an open notice
        if self.scene.dismiss_notice().is_some() {
            return KeyResult::Continue;
        }

        match key.code {
            KeyCode::Char(' ') | KeyCode::Enter => {
                self.draw();
                KeyResult::Continue
            }
            KeyCode::Char('n') => {
                self.request_new_game();
                KeyResult::Continue
            }
            KeyCode::Char('m') => {
                let muted = !self.tones.is_muted();
                self.tones.set_muted(muted);
                self.status = if muted { "Muted" } else { "Sound on" }.to_string();
                KeyResult::Continue
            }
            KeyCode::Char('q') | KeyCode::Esc => {
                if self.confirm_quit && self.orchestrator.is_in_progress() {
                    self.prompt = Some(Prompt::Quit);
                    KeyResult::Continue
                } else {
                    KeyResult::Quit
                }
            }
            _ => KeyResult::Continue,
        }
    }

    fn draw(&mut self) {
        self.scene.advance(self.orchestrator.now());
        match self.orchestrator.trigger(&mut self.scene, &self.tones) {
            TriggerOutcome::Started { .. } => self.status = "Drawing...".to_string(),
            TriggerOutcome::Exhausted => self.status = "All numbers drawn".to_string(),
            TriggerOutcome::Ignored => {}
        }
    }

    fn request_new_game(&mut self) {
        if self.orchestrator.state().is_drawing() {
            self.status = "Wait for the draw to finish".to_string();
        } else if self.confirm_quit && self.orchestrator.is_in_progress() {
            self.prompt = Some(Prompt::NewGame);
        } else {
            self.start_new_game();
        }
    }

    fn start_new_game(&mut self) {
        if self.orchestrator.new_game(&mut self.scene) {
            self.status = "New game - press Space to draw".to_string();
        }
    }

    fn confirm(&mut self, prompt: Prompt) -> KeyResult {
        match prompt {
            Prompt::Quit => KeyResult::Quit,
            Prompt::NewGame => {
                self.start_new_game();
                KeyResult::Continue
            }
        }
    }

    /// Take over the terminal until the user quits
    pub fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.hide_cursor()?;

        let result = self.run_app(&mut terminal);

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn run_app(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        info!("Terminal session started");
        loop {
            self.update();
            terminal.draw(|f| ui::draw(f, self))?;

            if event::poll(self.poll_timeout())? {
                if let Event::Key(key) = event::read()? {
                    if self.handle_key(key) == KeyResult::Quit {
                        break;
                    }
                }
            }
        }
        info!(
            drawn = self.orchestrator.state().drawn().len(),
            "Terminal session ended"
        );
        Ok(())
    }
}
