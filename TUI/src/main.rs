mod action;
mod app;
mod clipboard;
mod command;
mod config;
mod error;
mod gemini;
mod generation;
mod image;
mod logging;
mod prompts;
mod stats;
mod ui;
mod ui_state;

use std::env;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use action::Action;
use app::App;
use clipboard::SystemClipboard;
use config::Config;
use gemini::GeminiClient;
use generation::Generator;
use stats::{CounterStore, FileStore};
use ui::draw;
use ui_state::{Screen, View, MENU_VIEWS};

#[tokio::main]
async fn main() -> io::Result<()> {
    let mut config = Config::from_env();
    let args: Vec<String> = env::args().collect();
    config.apply_args(&args);

    match logging::init_logging(&config.data_dir) {
        Ok(path) => log::info!("Logging to {}", path.display()),
        Err(e) => eprintln!("Logging disabled: {}", e),
    }

    let client = GeminiClient::new(&config).map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    let generator = Generator::new(Arc::new(client));
    let counters = CounterStore::new(Box::new(FileStore::new(config.data_dir.clone())));
    let missing_key = config.api_key.is_none();

    let mut app = App::new(config, counters, generator, Box::new(SystemClipboard::new()));
    if missing_key {
        log::warn!("No GEMINI_API_KEY set; generation will return fallback text");
        app.set_status("Falta GEMINI_API_KEY: no se podrá generar nada");
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableBracketedPaste)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        log::error!("Terminal error: {}", e);
        eprintln!("Error: {}", e);
    }

    log::info!("Bye");
    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> io::Result<()> {
    let mut clock = TickClock::new(Duration::from_millis(app.config.tick_rate_ms), Instant::now());

    loop {
        if clock.due(Instant::now()) {
            app.tick();
        }
        app.poll_tasks();

        terminal.draw(|frame| draw(frame, app))?;

        if event::poll(clock.timeout(Instant::now()))? {
            let action = match event::read()? {
                Event::Key(key) => {
                    let input_empty = match &app.ui.screen {
                        Screen::ChatAnalyzer(state) => state.input.is_empty(),
                        _ => true,
                    };
                    key_to_action(app.view(), input_empty, key)
                }
                // Dropping a file on most terminals pastes its path
                Event::Paste(text) if app.view() == View::ChatAnalyzer => Some(Action::InputPaste(text)),
                _ => None,
            };

            if let Some(action) = action {
                app.dispatch(action);
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Paces `App::tick` by wall time so key bursts don't speed up animations.
struct TickClock {
    rate: Duration,
    last: Instant,
}

impl TickClock {
    fn new(rate: Duration, now: Instant) -> Self {
        Self { rate, last: now }
    }

    /// How long to wait for input before the next tick is due.
    fn timeout(&self, now: Instant) -> Duration {
        self.rate.saturating_sub(now.saturating_duration_since(self.last))
    }

    /// True once per elapsed interval; advances the clock when it fires.
    fn due(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last) >= self.rate {
            self.last = now;
            true
        } else {
            false
        }
    }
}

/// Map a key press on `view` to an action. `input_empty` is whether the
/// analyzer's command line is empty.
fn key_to_action(view: View, input_empty: bool, key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match view {
        View::Login => match key.code {
            KeyCode::Enter => Some(Action::Confirm),
            KeyCode::Esc => Some(Action::Quit),
            _ => None,
        },
        View::Dashboard => match key.code {
            KeyCode::Char(c @ '1'..='3') => {
                let index = c as usize - '1' as usize;
                Some(Action::Open(MENU_VIEWS[index]))
            }
            KeyCode::Up | KeyCode::Char('k') => Some(Action::MenuUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::MenuDown),
            KeyCode::Enter => Some(Action::OpenSelected),
            KeyCode::Esc | KeyCode::Char('q') => Some(Action::Quit),
            _ => None,
        },
        View::IceBreaker => match key.code {
            KeyCode::Esc => Some(Action::Back),
            KeyCode::Char('g') | KeyCode::Enter => Some(Action::Generate),
            KeyCode::Up | KeyCode::Char('k') => Some(Action::SelectPrev),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::SelectNext),
            KeyCode::Char('c') => Some(Action::CopySelected),
            _ => None,
        },
        View::ChatAnalyzer => match key.code {
            KeyCode::Esc if input_empty => Some(Action::Back),
            KeyCode::Esc => Some(Action::InputClear),
            KeyCode::Enter => Some(Action::SubmitInput),
            KeyCode::Backspace => Some(Action::InputBackspace),
            KeyCode::Left => Some(Action::ToneDown),
            KeyCode::Right => Some(Action::ToneUp),
            KeyCode::Char('y') if ctrl => Some(Action::CopyReply),
            KeyCode::Char('u') if ctrl => Some(Action::InputClear),
            KeyCode::Char(c) if !ctrl => Some(Action::InputChar(c)),
            _ => None,
        },
        View::MoreOptions => match key.code {
            KeyCode::Esc => Some(Action::Back),
            KeyCode::Char('r') => Some(Action::RequestReset),
            KeyCode::Char('y') => Some(Action::ConfirmReset),
            KeyCode::Char('n') => Some(Action::CancelReset),
            _ => None,
        },
    }
}
