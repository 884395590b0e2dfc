use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::session::ReportSession;

/// The mapping from report name to the currently *current* [`ReportSession`].
///
/// Cardinality is at most one session per name; non-current sessions are
/// simply absent from this map and are reachable only via whatever endpoint
/// tasks still hold an `Arc` to them.
pub struct Registry {
    sessions: Mutex<HashMap<String, Arc<ReportSession>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Makes `session` the current session for its name. Returns `true` if
    /// this name had no current session before the call, which is the
    /// supervisor's signal to launch a viewer.
    ///
    /// If another session was current for the name, it is simply replaced:
    /// `Registry::lookup` will never return it again, which is the entire
    /// content of the **LC+** transition from the replaced session's point
    /// of view. Re-registering the same session that is already current is
    /// a no-op beyond the redundant map write.
    pub fn register(&self, session: Arc<ReportSession>) -> bool {
        let mut sessions = self.sessions.lock();
        let is_new_name = !sessions.contains_key(&session.identity.report_name);
        sessions.insert(session.identity.report_name.clone(), session);
        is_new_name
    }

    /// Removes `session` from the map, but only if it is still the current
    /// session for its name. If it has already been superseded, this is a
    /// no-op — the session's disappearance is invisible to anyone looking
    /// it up by name, since they were already seeing the newer one.
    pub fn deregister(&self, session: &Arc<ReportSession>) {
        let mut sessions = self.sessions.lock();
        if let Some(current) = sessions.get(&session.identity.report_name)
            && Arc::ptr_eq(current, session)
        {
            sessions.remove(&session.identity.report_name);
        }
    }

    /// The current session for `name`, if any.
    pub fn lookup(&self, name: &str) -> Option<Arc<ReportSession>> {
        self.sessions.lock().get(name).cloned()
    }

    /// Whether `session` is still the one `lookup` would return for its name.
    pub fn is_current(&self, session: &Arc<ReportSession>) -> bool {
        self.sessions
            .lock()
            .get(&session.identity.report_name)
            .is_some_and(|current| Arc::ptr_eq(current, session))
    }

    /// Whether the registry holds no current sessions at all. The only
    /// condition under which the supervisor may shut down.
    pub fn is_empty(&self) -> bool {
        self.sessions.lock().is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
