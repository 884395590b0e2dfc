use std::sync::Arc;

use parking_lot::Mutex;

use crate::delta::{Delta, ReportIdentity};
use crate::queue::DeltaQueue;
use crate::registry::Registry;
use crate::supervisor::Supervisor;

struct SessionState {
    producer_alive: bool,
    has_had_consumer: bool,
    consumer_queues: Vec<DeltaQueue>,
}

/// Per-report state: identity, producer-alive flag, master queue, the set
/// of attached consumer queues, and the lifecycle flags that drive the
/// four-state machine of §4.2.
///
/// "Current" is deliberately not a field here — whether this session is the
/// one a report name currently resolves to is a property of the
/// [`Registry`], not of the session. Consumers detect rotation by comparing
/// `Arc` pointers against a fresh `Registry::lookup`, not by asking the
/// session about itself.
///
/// `producer_alive`, `has_had_consumer` and `consumer_queues` are guarded by
/// a single mutex. That same mutex is the "external serialization" the
/// queue-cloning invariant requires between [`DeltaQueue::fork`] and
/// concurrent appends: both only ever happen while this lock is held.
pub struct ReportSession {
    pub identity: ReportIdentity,
    master_queue: DeltaQueue,
    state: Mutex<SessionState>,
}

impl ReportSession {
    pub fn new(identity: ReportIdentity) -> Self {
        Self {
            identity,
            master_queue: DeltaQueue::new(),
            state: Mutex::new(SessionState {
                producer_alive: true,
                has_had_consumer: false,
                consumer_queues: Vec::new(),
            }),
        }
    }

    /// Append a delta to the master queue and fan it out to every attached
    /// consumer queue. This is the implementation of the source's `enqueue`,
    /// which the spec notes invokes the master queue as if it were callable
    /// rather than calling `append` on it — the intent was always `append`.
    pub fn enqueue(&self, delta: Delta) {
        let state = self.state.lock();
        self.master_queue.append(delta.clone());
        for queue in &state.consumer_queues {
            queue.append(delta.clone());
        }
    }

    /// CC+: a consumer attaches. Marks the session as having had a consumer
    /// and returns a fresh queue pre-populated with everything buffered so
    /// far.
    pub fn add_consumer_queue(&self) -> DeltaQueue {
        let mut state = self.state.lock();
        state.has_had_consumer = true;
        let queue = self.master_queue.fork();
        state.consumer_queues.push(queue.clone());
        queue
    }

    /// LC−: the producer's connection ended. Deregisters the session if it
    /// has had a consumer and none remain attached, then always gives the
    /// supervisor a chance to notice the registry became empty.
    pub fn on_producer_finished(self: &Arc<Self>, registry: &Registry, supervisor: &Supervisor) {
        let should_deregister = {
            let mut state = self.state.lock();
            state.producer_alive = false;
            state.has_had_consumer && state.consumer_queues.is_empty()
        };

        if should_deregister {
            registry.deregister(self);
        }

        supervisor.potentially_stop(registry);
    }

    /// CC−: a consumer's connection ended. Deregisters the session if no
    /// consumers remain and the producer is already gone.
    pub fn on_consumer_detached(self: &Arc<Self>, queue_id: u64, registry: &Registry, supervisor: &Supervisor) {
        let should_deregister = {
            let mut state = self.state.lock();
            state.consumer_queues.retain(|q| q.id() != queue_id);
            state.consumer_queues.is_empty() && !state.producer_alive
        };

        if should_deregister {
            registry.deregister(self);
        }

        supervisor.potentially_stop(registry);
    }

    /// T: the startup timeout fired with no consumer ever having attached.
    /// A no-op if a consumer showed up in the meantime.
    pub fn on_startup_timeout(self: &Arc<Self>, registry: &Registry, supervisor: &Supervisor) {
        let should_deregister = !self.state.lock().has_had_consumer;

        if should_deregister {
            registry.deregister(self);
        }

        supervisor.potentially_stop(registry);
    }

    #[cfg(test)]
    pub(crate) fn has_had_consumer(&self) -> bool {
        self.state.lock().has_had_consumer
    }

    #[cfg(test)]
    pub(crate) fn producer_alive(&self) -> bool {
        self.state.lock().producer_alive
    }

    #[cfg(test)]
    pub(crate) fn consumer_count(&self) -> usize {
        self.state.lock().consumer_queues.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::supervisor::{NullViewerLauncher, Supervisor};
    use serde_json::json;

    fn session(name: &str) -> Arc<ReportSession> {
        Arc::new(ReportSession::new(ReportIdentity::new("id-a", name)))
    }

    fn harness() -> (Registry, Supervisor) {
        (Registry::new(), Supervisor::new(Box::new(NullViewerLauncher)))
    }

    #[test]
    fn enqueue_fans_out_to_consumer_queues() {
        let s = session("r");
        let q1 = s.add_consumer_queue();
        let q2 = s.add_consumer_queue();

        s.enqueue(Delta::new(json!(1)));

        assert_eq!(q1.drain(), vec![Delta::new(json!(1))]);
        assert_eq!(q2.drain(), vec![Delta::new(json!(1))]);
    }

    #[test]
    fn late_consumer_sees_buffered_prefix_only() {
        let s = session("r");
        s.enqueue(Delta::new(json!(1)));
        s.enqueue(Delta::new(json!(2)));

        let q = s.add_consumer_queue();
        s.enqueue(Delta::new(json!(3)));

        assert_eq!(q.drain(), vec![Delta::new(json!(1)), Delta::new(json!(2)), Delta::new(json!(3))]);
    }

    #[test]
    fn s1_producer_finish_with_no_consumer_keeps_session_registered() {
        let (registry, supervisor) = harness();
        let s = session("r");
        registry.register(s.clone());

        s.on_producer_finished(&registry, &supervisor);

        // has_had_consumer is false (S1 -> S3 in the table), so no dereg.
        assert!(registry.lookup("r").is_some());
        assert!(!s.producer_alive());
    }

    #[test]
    fn s2_producer_finish_with_no_consumers_deregisters() {
        let (registry, supervisor) = harness();
        let s = session("r");
        registry.register(s.clone());

        let q = s.add_consumer_queue();
        s.on_consumer_detached(q.id(), &registry, &supervisor);
        // Consumer left while producer was still alive: no dereg yet.
        assert!(registry.lookup("r").is_some());

        s.on_producer_finished(&registry, &supervisor);
        assert!(registry.lookup("r").is_none());
    }

    #[test]
    fn consumer_detach_after_producer_gone_deregisters() {
        let (registry, supervisor) = harness();
        let s = session("r");
        registry.register(s.clone());

        let q = s.add_consumer_queue();
        s.on_producer_finished(&registry, &supervisor);
        assert!(registry.lookup("r").is_some(), "consumer still attached");

        s.on_consumer_detached(q.id(), &registry, &supervisor);
        assert!(registry.lookup("r").is_none());
    }

    #[test]
    fn startup_timeout_drops_session_without_consumer() {
        let (registry, supervisor) = harness();
        let s = session("r");
        registry.register(s.clone());

        s.on_startup_timeout(&registry, &supervisor);
        assert!(registry.lookup("r").is_none());
    }

    #[test]
    fn startup_timeout_is_noop_once_consumer_attached() {
        let (registry, supervisor) = harness();
        let s = session("r");
        registry.register(s.clone());
        let _q = s.add_consumer_queue();

        s.on_startup_timeout(&registry, &supervisor);
        assert!(registry.lookup("r").is_some());
    }
}
