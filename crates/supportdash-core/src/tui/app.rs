//! Main TUI application state and logic

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::event::{is_quit, Event, EventHandler};
use crate::client::MetricsClient;
use crate::error::Result;
use crate::models::DateRange;
use crate::render::error_headline;
use crate::view::{fetch_with_deadline, DateField, FetchTicket, MetricsView};

/// How long a status message stays visible
const STATUS_TTL: Duration = Duration::from_secs(3);

/// Main TUI application state
pub struct App {
    /// Whether the app should quit
    pub should_quit: bool,
    /// Dates, loading flag and fetched metrics
    pub view: MetricsView,
    /// Date input receiving keystrokes
    pub focus: DateField,
    /// Show help overlay
    pub show_help: bool,
    /// Status message
    pub status_message: Option<(String, Instant)>,
    /// Tick rate
    pub tick_rate: Duration,
    client: Arc<dyn MetricsClient>,
    deadline: Duration,
}

impl App {
    /// Create a new TUI app fetching through `client`
    pub fn new(client: Arc<dyn MetricsClient>, deadline: Duration) -> Self {
        Self {
            should_quit: false,
            view: MetricsView::new(),
            focus: DateField::default(),
            show_help: false,
            status_message: None,
            tick_rate: Duration::from_millis(250),
            client,
            deadline,
        }
    }

    /// Set tick rate
    pub fn with_tick_rate(mut self, ms: u64) -> Self {
        self.tick_rate = Duration::from_millis(ms);
        self
    }

    /// Prefill the date inputs
    pub fn with_range(mut self, range: DateRange) -> Self {
        self.view = MetricsView::with_range(range);
        self
    }

    /// Handle key events.
    ///
    /// Returns a ticket when the key started a fetch; the caller is
    /// responsible for running it.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<FetchTicket> {
        if self.show_help {
            // Any key closes the overlay; quit keys still quit
            self.show_help = false;
            if is_quit(key) {
                self.should_quit = true;
            }
            return None;
        }

        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL)
            | (KeyCode::Char('q'), KeyModifiers::NONE)
            | (KeyCode::Esc, _) => {
                self.should_quit = true;
            }
            (KeyCode::Char('?'), _) => {
                self.show_help = true;
            }
            (KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down, _) => {
                self.focus = self.focus.toggle();
            }
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT)
                if c.is_ascii_digit() || c == '-' =>
            {
                self.view.date_mut(self.focus).push(c);
            }
            (KeyCode::Backspace, _) => {
                self.view.date_mut(self.focus).pop();
            }
            (KeyCode::Enter, _) | (KeyCode::Char('g'), KeyModifiers::NONE) => {
                return self.get_metrics();
            }
            (KeyCode::Char('r'), KeyModifiers::NONE) => {
                self.reset();
            }
            _ => {}
        }
        None
    }

    /// "Get Metrics" button
    fn get_metrics(&mut self) -> Option<FetchTicket> {
        if self.view.is_loading() {
            self.set_status("A fetch is already in progress".to_string());
            return None;
        }
        Some(self.view.begin_fetch())
    }

    /// "Reset" button
    fn reset(&mut self) {
        if self.view.is_loading() {
            self.set_status("Wait for the current fetch to finish".to_string());
            return;
        }
        self.view.reset();
        self.focus = DateField::Start;
        self.set_status("Form reset".to_string());
    }

    /// Apply an event; returns a ticket when a fetch should be started
    pub fn handle_event(&mut self, event: Event) -> Option<FetchTicket> {
        match event {
            Event::Key(key) => return self.handle_key(key),
            Event::FetchCompleted { ticket, outcome } => {
                let failure = outcome.as_ref().err().map(error_headline);
                if self.view.complete(&ticket, outcome) {
                    match failure {
                        Some(headline) => self.set_status(headline.to_string()),
                        None => self.set_status(format!("Loaded metrics for {}", ticket.range())),
                    }
                } else {
                    debug!(seq = ticket.seq(), "Ignored superseded fetch");
                }
            }
            Event::Tick | Event::Resize(_, _) => {}
        }
        None
    }

    /// Run a fetch on a background task, reporting back through `tx`
    pub fn spawn_fetch(&self, ticket: FetchTicket, tx: mpsc::UnboundedSender<Event>) {
        let client = Arc::clone(&self.client);
        let deadline = self.deadline;

        tokio::spawn(async move {
            let outcome = fetch_with_deadline(client.as_ref(), ticket.range(), deadline).await;
            // Receiver gone means the app is shutting down
            let _ = tx.send(Event::FetchCompleted { ticket, outcome });
        });
    }

    /// Set a status message that expires after a few seconds
    pub fn set_status(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get current status message if not expired
    pub fn get_status(&self) -> Option<&str> {
        self.status_message.as_ref().and_then(|(msg, time)| {
            if time.elapsed() < STATUS_TTL {
                Some(msg.as_str())
            } else {
                None
            }
        })
    }

    /// Run the TUI application
    pub async fn run(&mut self) -> Result<()> {
        use crossterm::{
            execute,
            terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
        };
        use ratatui::{backend::CrosstermBackend, Terminal};
        use std::io;

        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        info!("Dashboard started");
        let result = self.event_loop(&mut terminal).await;

        // Restore terminal even when the loop failed
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        info!("Dashboard stopped");

        result
    }

    async fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut ratatui::Terminal<B>,
    ) -> Result<()> {
        let tick_ms = u64::try_from(self.tick_rate.as_millis()).unwrap_or(u64::MAX);
        let mut events = EventHandler::new(tick_ms);
        events.start();

        while !self.should_quit {
            terminal.draw(|frame| super::ui::draw(frame, self))?;

            match events.next().await {
                Some(event) => {
                    if let Some(ticket) = self.handle_event(event) {
                        self.spawn_fetch(ticket, events.sender());
                    }
                }
                None => break,
            }
        }

        Ok(())
    }
}
