//! The TUI event loop.
//!
//! All flow mutations happen here, on the UI task, in response to input
//! events or network-completion messages. Submissions are dispatched on
//! spawned tasks and their outcomes drained from an mpsc channel each loop
//! iteration, so the draw/input loop never blocks on the network.

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::api::HttpVerificationClient;
use crate::config::Config;
use crate::flow::{
    self, Step, StepPayload, SubmissionResult, SubmitDisposition, VerificationFlow,
};
use crate::ui::steps::{CompleteScreen, CredentialsScreen, OtpScreen, PinScreen};

/// Completion message from a dispatched submission task
struct SubmissionOutcome {
    ticket: u64,
    result: SubmissionResult,
}

pub struct App {
    config: Config,
    flow: VerificationFlow,
    credentials: CredentialsScreen,
    pin: PinScreen,
    otp: OtpScreen,
    complete: CompleteScreen,
    outcome_tx: mpsc::UnboundedSender<SubmissionOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<SubmissionOutcome>,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let client =
            HttpVerificationClient::new(&config.service.base_url, config.service.timeout())?;
        let flow = VerificationFlow::new(Arc::new(client));
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();

        tracing::info!(base_url = %config.service.base_url, "verification flow starting");

        Ok(Self {
            credentials: CredentialsScreen::new(),
            pin: PinScreen::new(config.ui.mask_code_cells),
            otp: OtpScreen::new(config.ui.mask_code_cells),
            complete: CompleteScreen::new(),
            config,
            flow,
            outcome_tx,
            outcome_rx,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(self.config.ui.refresh_rate_ms);

        while !self.should_quit {
            terminal.draw(|f| self.render(f))?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }

            // Apply any submissions that resolved since the last tick
            self.drain_outcomes();
        }

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        Ok(())
    }

    fn render(&self, frame: &mut Frame) {
        match self.flow.step() {
            Step::Credentials => self.credentials.render(frame, self.flow.submission()),
            Step::Pin => self.pin.render(
                frame,
                self.flow.session().identifier(),
                self.flow.submission(),
            ),
            Step::Otp => self.otp.render(
                frame,
                self.flow.session().identifier(),
                self.flow.submission(),
            ),
            Step::Complete => self.complete.render(frame),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match key.code {
            KeyCode::Esc => self.handle_escape(),
            code => {
                let payload = match self.flow.step() {
                    Step::Credentials => self.credentials.handle_key(code),
                    Step::Pin => self.pin.handle_key(code),
                    Step::Otp => self.otp.handle_key(code),
                    Step::Complete => {
                        if code == KeyCode::Enter {
                            self.should_quit = true;
                        }
                        None
                    }
                };
                if let Some(payload) = payload {
                    self.submit(payload);
                }
            }
        }
    }

    /// Esc quits from the edges of the flow and cancels from the middle
    fn handle_escape(&mut self) {
        match self.flow.step() {
            Step::Credentials | Step::Complete => self.should_quit = true,
            Step::Pin | Step::Otp => {
                self.flow.cancel();
                self.credentials.reset();
                self.pin.reset();
                self.otp.reset();
            }
        }
    }

    /// Claim the submission slot and run the client call on its own task
    fn submit(&mut self, payload: StepPayload) {
        match self.flow.begin_submit(&payload) {
            SubmitDisposition::Dispatched(ticket) => {
                let client = self.flow.client();
                let tx = self.outcome_tx.clone();
                tokio::spawn(async move {
                    let result = flow::dispatch(client.as_ref(), &payload).await;
                    // The receiver only goes away on shutdown
                    let _ = tx.send(SubmissionOutcome { ticket, result });
                });
            }
            // Screens validate before handing out a payload, so the engine
            // guards fire only on races (e.g. Enter while pending)
            SubmitDisposition::Ignored | SubmitDisposition::Invalid(_) => {}
        }
    }

    fn drain_outcomes(&mut self) {
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            let before = self.flow.step();
            self.flow.apply_result(outcome.ticket, outcome.result);
            let after = self.flow.step();

            if after != before {
                self.on_step_entered(after);
            } else if self.flow.submission().error.is_some() {
                self.on_submission_failed(after);
            }
        }
    }

    /// A step was just entered: its entry widgets start empty
    fn on_step_entered(&mut self, step: Step) {
        match step {
            Step::Pin => self.pin.reset(),
            Step::Otp => self.otp.reset(),
            Step::Credentials | Step::Complete => {}
        }
    }

    /// The step was kept after a failure: preserve input for correction
    fn on_submission_failed(&mut self, step: Step) {
        match step {
            Step::Pin => self.pin.on_submission_failed(),
            Step::Otp => self.otp.on_submission_failed(),
            Step::Credentials | Step::Complete => {}
        }
    }
}
