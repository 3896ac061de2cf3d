use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Asked once per loop iteration whether the user wants out.
pub trait QuitSignal {
    fn quit_requested(&mut self) -> Result<bool>;
}

pub fn is_quit_key(key: &KeyEvent) -> bool {
    if key.kind == KeyEventKind::Release {
        return false;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Non-blocking keyboard poll plus SIGINT delivered from outside the terminal.
pub struct KeyboardQuit {
    interrupted: Arc<AtomicBool>,
}

impl KeyboardQuit {
    pub fn install() -> Result<Self> {
        let interrupted = Arc::new(AtomicBool::new(false));
        let flag = interrupted.clone();
        ctrlc::set_handler(move || {
            flag.store(true, Ordering::SeqCst);
        })
        .context("failed to install interrupt handler")?;
        Ok(Self { interrupted })
    }
}

impl QuitSignal for KeyboardQuit {
    fn quit_requested(&mut self) -> Result<bool> {
        if self.interrupted.load(Ordering::SeqCst) {
            return Ok(true);
        }
        // Drain whatever is queued so a burst of keys never lags behind playback.
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if is_quit_key(&key) {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }
}
