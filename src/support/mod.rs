//! Cross-cutting runtime support

pub mod deadline;
pub mod shutdown;

pub use deadline::RequestGuard;
pub use shutdown::{listen_for_shutdown_signals, ShutdownCoordinator, ShutdownSignal};
