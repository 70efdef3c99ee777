pub mod app_dirs;
pub mod config;
pub mod metrics;
pub mod samples;
pub mod session;
pub mod time_series;
pub mod ui;

use crate::{
    config::{Config, ConfigStore, FileConfigStore},
    samples::{get_sample, Difficulty},
    session::{Session, SessionConfig},
};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    sync::mpsc,
    thread,
    time::Duration,
};

/// One session-clock second per tick.
const TICK_RATE_MS: u64 = 1000;

/// terminal typing speed test with difficulty tiers and live stats
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal typing speed test: type the sample text against the clock and watch words-per-minute, accuracy, and error counts update on every keystroke."
)]
pub struct Cli {
    /// difficulty tier of the sample text
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<Difficulty>,

    /// number of seconds on the session clock
    #[clap(short = 's', long)]
    number_of_secs: Option<u32>,

    /// custom reference text to type instead of a sampled one
    #[clap(short = 'p', long)]
    prompt: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    Typing,
    Results,
}

#[derive(Debug)]
pub struct App {
    pub session: Session,
    /// Raw content of the input field; the session receives a snapshot
    /// of it on every edit.
    pub input: String,
    pub difficulty: Difficulty,
    pub duration_secs: u32,
    pub custom_prompt: Option<String>,
    pub state: AppState,
}

impl App {
    pub fn new(difficulty: Difficulty, duration_secs: u32, custom_prompt: Option<String>) -> Self {
        let reference = custom_prompt
            .clone()
            .unwrap_or_else(|| get_sample(difficulty));
        Self {
            session: Session::new(reference, SessionConfig { duration_secs }),
            input: String::new(),
            difficulty,
            duration_secs,
            custom_prompt,
            state: AppState::Typing,
        }
    }

    pub fn with_reference(reference: String, difficulty: Difficulty, duration_secs: u32) -> Self {
        Self {
            session: Session::new(reference, SessionConfig { duration_secs }),
            input: String::new(),
            difficulty,
            duration_secs,
            custom_prompt: None,
            state: AppState::Typing,
        }
    }

    /// Fresh session over the same reference text.
    pub fn restart(&mut self) {
        self.session = Session::new(
            self.session.reference().to_string(),
            SessionConfig {
                duration_secs: self.duration_secs,
            },
        );
        self.input.clear();
        self.state = AppState::Typing;
    }

    /// Fresh session over a newly sampled text (the custom prompt, when
    /// one was given, is kept).
    pub fn new_text(&mut self) {
        let reference = self
            .custom_prompt
            .clone()
            .unwrap_or_else(|| get_sample(self.difficulty));
        self.session = Session::new(
            reference,
            SessionConfig {
                duration_secs: self.duration_secs,
            },
        );
        self.input.clear();
        self.state = AppState::Typing;
    }

    /// Switch tiers and start over with a sample from the new pool.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.custom_prompt = None;
        self.new_text();
    }

    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
        self.session.on_input(&self.input);
    }

    pub fn pop_char(&mut self) {
        self.input.pop();
        self.session.on_input(&self.input);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileConfigStore::new();
    let cfg = store.load();
    let difficulty = cli
        .difficulty
        .or_else(|| Difficulty::from_name(&cfg.difficulty))
        .unwrap_or(Difficulty::Easy);
    let duration_secs = cli.number_of_secs.unwrap_or(cfg.number_of_secs).max(1);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(difficulty, duration_secs, cli.prompt.clone());
    start_tui(&mut terminal, &mut app, &store)?;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    Ok(())
}

#[derive(Debug)]
enum ExitType {
    Restart,
    New,
    Quit,
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    mut app: &mut App,
    store: &FileConfigStore,
) -> Result<(), Box<dyn Error>> {
    let session_events = get_session_events();

    loop {
        let mut exit_type: ExitType = ExitType::Quit;
        terminal.draw(|f| ui(app, f))?;

        loop {
            let app = &mut app;

            match session_events.recv()? {
                SessionEvent::Tick => {
                    // Only a running session consumes ticks; the session
                    // guards its own phase as well, so a stray tick after
                    // the finish can never move the clock or counters.
                    if app.session.is_running() {
                        app.session.on_tick();

                        if app.session.has_finished() {
                            app.state = AppState::Results;
                        }

                        terminal.draw(|f| ui(app, f))?;
                    }
                }
                SessionEvent::Resize => {
                    terminal.draw(|f| ui(app, f))?;
                }
                SessionEvent::Key(key) => {
                    match key.code {
                        KeyCode::Esc => {
                            break;
                        }
                        KeyCode::Backspace => {
                            if app.state == AppState::Typing && !app.session.has_finished() {
                                app.pop_char();
                            }
                        }
                        KeyCode::Left => {
                            exit_type = ExitType::Restart;
                            break;
                        }
                        KeyCode::Right => {
                            exit_type = ExitType::New;
                            break;
                        }
                        KeyCode::Char(c) => {
                            if key.modifiers.contains(KeyModifiers::CONTROL)
                                && key.code == KeyCode::Char('c')
                            // ctrl+c to quit
                            {
                                break;
                            }

                            match app.state {
                                AppState::Typing => {
                                    if !app.session.has_finished() {
                                        app.push_char(c);
                                        if app.session.has_finished() {
                                            app.state = AppState::Results;
                                        }
                                    }
                                }
                                AppState::Results => match key.code {
                                    KeyCode::Char('r') => {
                                        exit_type = ExitType::Restart;
                                        break;
                                    }
                                    KeyCode::Char('n') => {
                                        exit_type = ExitType::New;
                                        break;
                                    }
                                    KeyCode::Char('1') => {
                                        switch_difficulty(app, store, Difficulty::Easy);
                                    }
                                    KeyCode::Char('2') => {
                                        switch_difficulty(app, store, Difficulty::Medium);
                                    }
                                    KeyCode::Char('3') => {
                                        switch_difficulty(app, store, Difficulty::Hard);
                                    }
                                    _ => {}
                                },
                            }
                        }
                        _ => {}
                    }
                    terminal.draw(|f| ui(app, f))?;
                }
            }
        }

        match exit_type {
            ExitType::Restart => {
                app.restart();
            }
            ExitType::New => {
                app.new_text();
            }
            ExitType::Quit => {
                break;
            }
        }
    }

    Ok(())
}

fn switch_difficulty(app: &mut App, store: &FileConfigStore, difficulty: Difficulty) {
    app.set_difficulty(difficulty);
    // remember the chosen tier; preferences only, never session data
    let _ = store.save(&Config {
        difficulty: difficulty.to_string().to_lowercase(),
        number_of_secs: app.duration_secs,
    });
}

fn ui(app: &mut App, f: &mut Frame) {
    f.render_widget(&*app, f.area());
}

#[derive(Clone)]
enum SessionEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

fn get_session_events() -> mpsc::Receiver<SessionEvent> {
    let (tx, rx) = mpsc::channel();

    let tick_tx = tx.clone();
    thread::spawn(move || loop {
        if tick_tx.send(SessionEvent::Tick).is_err() {
            break;
        }

        thread::sleep(Duration::from_millis(TICK_RATE_MS))
    });

    thread::spawn(move || loop {
        let evt = match event::read() {
            Ok(Event::Key(key)) => Some(SessionEvent::Key(key)),
            Ok(Event::Resize(_, _)) => Some(SessionEvent::Resize),
            Ok(_) => None,
            Err(_) => break,
        };

        if let Some(evt) = evt {
            if tx.send(evt).is_err() {
                break;
            }
        }
    });

    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Phase;

    #[test]
    fn push_char_drives_the_session() {
        let mut app = App::with_reference("cat".to_string(), Difficulty::Easy, 60);

        app.push_char('c');
        app.push_char('b');

        assert_eq!(app.session.typed(), "cb");
        assert_eq!(app.session.counters().error_count, 1);
        assert_eq!(app.session.phase(), Phase::Running);
    }

    #[test]
    fn pop_char_rescores_the_shorter_prefix() {
        let mut app = App::with_reference("cat".to_string(), Difficulty::Easy, 60);

        app.push_char('c');
        app.push_char('b');
        app.pop_char();

        assert_eq!(app.session.typed(), "c");
        assert_eq!(app.session.counters().error_count, 0);
    }

    #[test]
    fn restart_keeps_the_reference_text() {
        let mut app = App::with_reference("cat".to_string(), Difficulty::Easy, 60);
        app.push_char('c');
        app.state = AppState::Results;

        app.restart();

        assert_eq!(app.session.reference(), "cat");
        assert_eq!(app.session.phase(), Phase::NotStarted);
        assert_eq!(app.session.clock_remaining(), 60);
        assert_eq!(app.input, "");
        assert_eq!(app.state, AppState::Typing);
    }

    #[test]
    fn new_text_samples_from_the_current_tier() {
        let mut app = App::new(Difficulty::Medium, 60, None);
        app.push_char('x');

        app.new_text();

        assert!(!app.session.reference().is_empty());
        assert_eq!(app.session.phase(), Phase::NotStarted);
        assert!(Difficulty::Medium
            .as_pool()
            .samples
            .contains(&app.session.reference().to_string()));
    }

    #[test]
    fn new_text_keeps_a_custom_prompt() {
        let mut app = App::new(Difficulty::Easy, 60, Some("fixed text".to_string()));
        app.new_text();
        assert_eq!(app.session.reference(), "fixed text");
    }

    #[test]
    fn set_difficulty_switches_pools_and_resets() {
        let mut app = App::new(Difficulty::Easy, 60, Some("fixed text".to_string()));

        app.set_difficulty(Difficulty::Hard);

        assert_eq!(app.difficulty, Difficulty::Hard);
        assert_eq!(app.custom_prompt, None);
        assert!(Difficulty::Hard
            .as_pool()
            .samples
            .contains(&app.session.reference().to_string()));
    }

    #[test]
    fn cli_asserts_valid() {
        Cli::command().debug_assert();
    }
}
