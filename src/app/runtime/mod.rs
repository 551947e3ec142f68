use std::sync::Arc;
use std::sync::atomic::Ordering;

use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::select;

use crate::sources::DataService;
use crate::state::AppState;
use crate::ui::ui;

use super::terminal::{restore_terminal, setup_terminal};

pub mod channels;
mod handlers;
mod workers;

use channels::Channels;
pub use handlers::handle_data_msg;
use workers::{spawn_event_thread, spawn_tick_worker};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Environment variable that skips terminal setup, input and drawing (`1` to enable).
pub const HEADLESS_ENV: &str = "FINSCOPE_TEST_HEADLESS";

/// What: Run the finscope TUI end-to-end: initialize the terminal, spawn the fetch workers,
/// load the initial symbol, drive the event loop, and restore the terminal on exit.
///
/// Inputs:
/// - `service`: Data service shared by the fetch workers
/// - `app`: Initial application state (symbol, columns, chart settings)
///
/// Output:
/// - `Ok(())` when the UI exits cleanly; `Err` on unrecoverable terminal errors.
///
/// Details:
/// - Event loop: renders a frame, then waits for a key, a worker response or a tick.
/// - Worker responses go through the engine's request ids; stale ones are dropped.
/// - Headless mode (`FINSCOPE_TEST_HEADLESS=1`) skips raw mode, input and drawing.
pub async fn run<S: DataService>(service: Arc<S>, mut app: AppState) -> Result<()> {
    let headless = std::env::var(HEADLESS_ENV).ok().as_deref() == Some("1");
    if !headless {
        setup_terminal()?;
    }
    let mut terminal = if headless {
        None
    } else {
        Some(Terminal::new(CrosstermBackend::new(std::io::stdout()))?)
    };

    let mut channels = Channels::new(service);
    spawn_tick_worker(channels.tick_tx.clone());
    spawn_event_thread(
        headless,
        channels.event_tx.clone(),
        Arc::clone(&channels.event_thread_cancelled),
    );

    let symbol = app.symbol.clone();
    channels.dispatch.load(app.begin_load(&symbol));

    loop {
        if let Some(t) = terminal.as_mut() {
            let _ = t.draw(|f| ui(f, &mut app));
        }

        select! {
            Some(ev) = channels.event_rx.recv() => {
                if crate::events::handle_event(&ev, &mut app, &channels.dispatch) {
                    break;
                }
            }
            Some(msg) = channels.data_rx.recv() => {
                handle_data_msg(&mut app, msg);
            }
            Some(()) = channels.tick_rx.recv() => {
                app.tick = app.tick.wrapping_add(1);
            }
            else => break,
        }
    }

    channels.event_thread_cancelled.store(true, Ordering::Relaxed);
    if !headless {
        restore_terminal()?;
    }
    tracing::info!(symbol = %app.symbol, "event loop finished");
    Ok(())
}
