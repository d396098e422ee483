use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

pub enum AppEvent {
    Key(KeyEvent),
    Tick,
    Resize,
}

/// Reads terminal input on a background thread and interleaves it with a
/// fixed-rate tick. Ticks are scheduled against a deadline, so a stream of
/// keystrokes cannot starve the redraw.
pub struct EventHandler {
    rx: mpsc::Receiver<AppEvent>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();

        let spawned = thread::Builder::new()
            .name("input".to_string())
            .spawn(move || {
                let mut next_tick = Instant::now() + tick_rate;
                loop {
                    let timeout = next_tick.saturating_duration_since(Instant::now());
                    if event::poll(timeout).unwrap_or(false) {
                        let forwarded = match event::read() {
                            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                                Some(AppEvent::Key(key))
                            }
                            Ok(Event::Resize(_, _)) => Some(AppEvent::Resize),
                            _ => None,
                        };
                        if let Some(ev) = forwarded {
                            if tx.send(ev).is_err() {
                                return;
                            }
                        }
                    }
                    if Instant::now() >= next_tick {
                        if tx.send(AppEvent::Tick).is_err() {
                            return;
                        }
                        next_tick += tick_rate;
                        // Skip missed ticks rather than bursting to catch up.
                        let now = Instant::now();
                        if next_tick < now {
                            next_tick = now + tick_rate;
                        }
                    }
                }
            });
        if let Err(err) = spawned {
            tracing::error!(error = %err, "failed to spawn input thread");
        }

        Self { rx }
    }

    pub fn next(&self) -> anyhow::Result<AppEvent> {
        Ok(self.rx.recv()?)
    }
}
