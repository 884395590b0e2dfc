//! The delta fan-out engine: report registry, per-report session state
//! machine, and the process-lifetime supervisor. No networking, no wire
//! format — those live in `deltaproxy-wire` and `deltaproxy-server`.

mod delta;
mod error;
mod queue;
mod registry;
mod session;
mod supervisor;

pub use delta::{Delta, ReportIdentity};
pub use error::{Error, Result};
pub use queue::DeltaQueue;
pub use registry::Registry;
pub use session::ReportSession;
pub use supervisor::{NullViewerLauncher, Supervisor, ViewerLauncher};
