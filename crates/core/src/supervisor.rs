use std::sync::atomic::{AtomicBool, Ordering};

use tokio_util::sync::CancellationToken;

use crate::registry::Registry;

/// Launches (or, in tests, no-ops instead of launching) the out-of-process
/// viewer for a report the first time it becomes current.
///
/// The real implementation lives in the server crate, where it has access to
/// the configured browser/Node launch command; the core engine only needs
/// the hook, not the mechanism, so it depends on this trait rather than a
/// concrete launcher.
pub trait ViewerLauncher: Send + Sync {
    fn launch(&self, report_name: &str);
}

/// A launcher that does nothing, for the core engine's own unit tests.
pub struct NullViewerLauncher;

impl ViewerLauncher for NullViewerLauncher {
    fn launch(&self, _report_name: &str) {}
}

/// Owns process-lifetime concerns that don't belong to any single report:
/// launching a viewer on first registration and shutting the whole process
/// down once the registry has no current sessions left, or once a fatal
/// error demands it.
///
/// Shutdown is signalled rather than performed directly — `serve()` awaits
/// the [`CancellationToken`] alongside the usual SIGINT/SIGTERM handling, the
/// same graceful-shutdown shape used throughout the rest of the proxy.
pub struct Supervisor {
    launcher: Box<dyn ViewerLauncher>,
    shutdown: CancellationToken,
    fatal: AtomicBool,
}

impl Supervisor {
    pub fn new(launcher: Box<dyn ViewerLauncher>) -> Self {
        Self {
            launcher,
            shutdown: CancellationToken::new(),
            fatal: AtomicBool::new(false),
        }
    }

    /// A token that is cancelled exactly once, when the process should exit.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Registers `session` and launches a viewer if this is the first
    /// session for its report name.
    pub fn register_report(&self, session: std::sync::Arc<crate::session::ReportSession>, registry: &Registry) {
        let report_name = session.identity.report_name.clone();
        if registry.register(session) {
            self.launcher.launch(&report_name);
        }
    }

    /// Checks whether the registry has become empty and, if so, signals
    /// shutdown. Called after every event that can empty the registry
    /// (LC−, CC−, T) — idempotent, since cancelling an already-cancelled
    /// token is a no-op.
    pub fn potentially_stop(&self, registry: &Registry) {
        if registry.is_empty() {
            self.shutdown.cancel();
        }
    }

    /// A fatal error (protocol violation, internal invariant violation)
    /// demands immediate shutdown regardless of registry state.
    pub fn fail_fast(&self) {
        self.fatal.store(true, Ordering::SeqCst);
        self.shutdown.cancel();
    }

    /// Whether shutdown was triggered by [`Supervisor::fail_fast`] rather
    /// than by the registry becoming empty. Used to pick a process exit code.
    pub fn is_fatal(&self) -> bool {
        self.fatal.load(Ordering::SeqCst)
    }
}
