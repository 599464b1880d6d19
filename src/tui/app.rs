//! Visualizer application state and logic.

use crate::booth::{BoothEngine, StepOutcome, StepSnapshot};
use crate::booth::trace::describe_action;
use crate::config::SimConfig;
use std::time::{Duration, Instant};

/// Which input currently receives typed characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Multiplicand,
    Multiplier,
}

/// A text box accepting a signed integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputField {
    pub text: String,
}

impl InputField {
    pub fn new(value: i64) -> Self {
        Self { text: value.to_string() }
    }

    /// Accept digits anywhere and `-` only as the first character.
    pub fn push(&mut self, c: char) {
        if c.is_ascii_digit() || (c == '-' && self.text.is_empty()) {
            self.text.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.text.pop();
    }

    /// The entered value, or `fallback` if the text is not a valid integer.
    pub fn value_or(&self, fallback: i64) -> i64 {
        self.text.parse().unwrap_or(fallback)
    }
}

/// Visualizer application state.
pub struct BoothApp {
    /// The engine being visualized.
    pub engine: BoothEngine,
    pub config: SimConfig,
    pub multiplicand: InputField,
    pub multiplier: InputField,
    /// Focused input.
    pub focus: Field,
    /// Index into `config.widths`.
    pub width_index: usize,
    /// Is auto-run stepping?
    pub auto_run: bool,
    last_step: Option<Instant>,
    /// Should we quit?
    pub should_quit: bool,
    /// Status message to display.
    pub status: String,
}

impl BoothApp {
    /// Create the app with an engine built from the config defaults.
    pub fn new(config: SimConfig) -> Self {
        let engine = BoothEngine::with_width(config.multiplicand, config.multiplier, config.bits);

        Self {
            multiplicand: InputField::new(config.multiplicand),
            multiplier: InputField::new(config.multiplier),
            focus: Field::Multiplicand,
            width_index: config.default_width_index(),
            engine,
            config,
            auto_run: false,
            last_step: None,
            should_quit: false,
            status: "Ready. Press 's' to step, 'r' to run, 'q' to quit.".into(),
        }
    }

    /// Width currently chosen in the selector.
    pub fn selected_bits(&self) -> u32 {
        self.config.widths[self.width_index].get()
    }

    /// Perform one Booth step.
    pub fn step(&mut self) {
        match self.engine.step() {
            StepOutcome::Stepped(snap) => {
                self.status = format!("Step {}: {}", snap.step, describe_action(snap.action));
            }
            StepOutcome::Finished => {
                self.auto_run = false;
                self.status = format!("Done. Product = {}", self.engine.product_signed());
            }
        }
    }

    /// Toggle continuous stepping.
    pub fn toggle_run(&mut self) {
        self.auto_run = !self.auto_run;
        self.last_step = None;
        self.status = if self.auto_run { "Running..." } else { "Paused." }.into();
    }

    /// Advance auto-run if the step delay has elapsed.
    pub fn tick(&mut self, now: Instant) {
        if !self.auto_run {
            return;
        }

        if self.engine.is_done() {
            self.auto_run = false;
            self.status = format!("Done. Product = {}", self.engine.product_signed());
            return;
        }

        let due = match self.last_step {
            Some(last) => now.duration_since(last) >= self.config.run_delay(),
            None => true,
        };
        if due {
            self.step();
            self.last_step = Some(now);
        }
    }

    /// Restart with the entered inputs and selected width.
    ///
    /// Unparsable input keeps the engine's current value.
    pub fn reset(&mut self) {
        let m = self.multiplicand.value_or(self.engine.multiplicand());
        let q = self.multiplier.value_or(self.engine.multiplier());
        let bits = self.selected_bits();

        match self.engine.reset(Some(m), Some(q), Some(bits)) {
            Ok(()) => {
                self.multiplicand = InputField::new(m);
                self.multiplier = InputField::new(q);
                self.auto_run = false;
                self.status = format!("Reset: {} x {} at {} bits.", m, q, bits);
            }
            Err(e) => self.status = format!("Error: {}", e),
        }
    }

    /// Cycle the width selector.
    pub fn next_width(&mut self) {
        self.width_index = (self.width_index + 1) % self.config.widths.len();
        self.status = format!("Width {} selected; press 'x' to apply.", self.config.widths[self.width_index]);
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Field::Multiplicand => Field::Multiplier,
            Field::Multiplier => Field::Multiplicand,
        };
    }

    fn focused_mut(&mut self) -> &mut InputField {
        match self.focus {
            Field::Multiplicand => &mut self.multiplicand,
            Field::Multiplier => &mut self.multiplier,
        }
    }

    /// Apply a key press.
    pub fn handle_char(&mut self, c: char) {
        match c {
            'q' => self.should_quit = true,
            's' => {
                self.auto_run = false;
                self.step();
            }
            'r' => self.toggle_run(),
            'x' => self.reset(),
            'w' => self.next_width(),
            c => self.focused_mut().push(c),
        }
    }

    pub fn handle_backspace(&mut self) {
        self.focused_mut().backspace();
    }

    /// The latest `lines` log entries, newest first.
    pub fn recent_steps(&self, lines: usize) -> impl Iterator<Item = &StepSnapshot> {
        self.engine.log().iter().rev().take(lines)
    }

    /// Footer text: progress and last action.
    pub fn footer(&self) -> String {
        let last = self
            .engine
            .log()
            .last()
            .map(|s| describe_action(s.action))
            .unwrap_or("-");
        format!(
            "Step: {}/{}  |  Current Action (last): {}",
            self.engine.step_count(),
            self.engine.bits(),
            last
        )
    }
}

/// Run the visualizer until the user quits.
pub fn run_visualizer(config: SimConfig) -> std::io::Result<()> {
    use crossterm::{
        event::{self, Event, KeyCode, KeyEventKind},
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
        ExecutableCommand,
    };
    use ratatui::prelude::*;
    use std::io::stdout;

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut app = BoothApp::new(config);

    loop {
        terminal.draw(|frame| {
            super::ui::draw(frame, &app);
        })?;

        if event::poll(Duration::from_millis(30))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char(c) => app.handle_char(c),
                        KeyCode::Backspace => app.handle_backspace(),
                        KeyCode::Tab => app.toggle_focus(),
                        KeyCode::Enter => app.reset(),
                        KeyCode::Esc => app.should_quit = true,
                        _ => {}
                    }
                }
            }
        }

        app.tick(Instant::now());

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    Ok(())
}
