pub mod check;
pub mod engine;
pub mod shutdown;

pub use check::{sample_all, CheckLine};
pub use engine::{LoopState, LoopTiming, Monitor, RuleOutcome};
pub use shutdown::{install_signal_handlers, ShutdownFlag};
