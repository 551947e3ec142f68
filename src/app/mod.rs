//! finscope application module: terminal runtime, fetch workers and `--print` mode.

/// Plain-text table output.
mod print;
/// Runtime event loop and background workers.
mod runtime;
/// Terminal setup and restoration utilities.
mod terminal;

// Re-export the public entrypoint so callers keep using `app::run(...)`.
pub use print::{print_table, render_plain};
pub use runtime::channels::{DataMsg, Dispatch};
pub use runtime::{HEADLESS_ENV, handle_data_msg, run};
