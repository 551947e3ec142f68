/// Auxiliary background workers (tick, terminal input).
pub mod auxiliary;
/// Baseline/profile fetching worker.
pub mod baseline;
/// Sort/filter query worker.
pub mod query;

pub use auxiliary::{spawn_event_thread, spawn_tick_worker};
pub use baseline::spawn_baseline_worker;
pub use query::spawn_query_worker;
