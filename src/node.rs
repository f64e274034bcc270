//! The event node: the single representation used for both concrete (leaf)
//! events and hierarchical queues acting as events in their parent, per the
//! "composition over inheritance" re-architecture (a hierarchical queue
//! *is* a queue and *is* an event by holding both capabilities in one
//! struct rather than by subclassing a shared event base).

use crate::arena::Key;
use crate::error::EngineError;
use crate::kernel::Engine;
use crate::order::OrderedSet;
use crate::state::EventState;
use crate::time::{Counter, Time};

/// A generation-checked reference to a [`Node`] in the engine's arena.
/// Never exposed directly; [`crate::kernel::Queue`] and
/// [`crate::kernel::EventHandle`] are the public handle types client code
/// holds.
pub(crate) type EventId = Key<Node>;

/// Which queue currently owns a node: the root main queue, or another
/// hierarchical queue node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum QueueRef {
    Main,
    Node(EventId),
}

/// The boxed body a concrete event runs when dispatched. Consuming-self in
/// spirit (the body always runs exactly once), expressed as `FnOnce` since
/// handles rather than generic `Self: Event<S>` values now live in the
/// queue's ordered set.
pub(crate) type EventBody = Box<dyn FnOnce(&mut Engine) -> Result<(), EngineError>>;

pub(crate) enum NodeKind {
    /// A leaf event. `body` is `None` once it has been taken for dispatch.
    Concrete { body: Option<EventBody> },
    /// A queue that also presents itself as an event to its own parent.
    Hierarchical(HierarchicalData),
}

pub(crate) struct HierarchicalData {
    pub(crate) local: OrderedSet,
    pub(crate) local_stamp: u64,
    /// The affine offset between this queue's local clock and its parent's
    /// clock: `local_clock = parent_clock - epoch`. Updated only
    /// across suspend/resume of this queue itself; otherwise constant.
    pub(crate) epoch: Time,
    /// Set while this queue is itself Suspended: the local clock value to
    /// report to children instead of re-deriving a moving one from a
    /// (possibly still advancing) ancestor clock.
    pub(crate) frozen_local_clock: Option<Time>,
}

pub(crate) struct Node {
    pub(crate) owner: QueueRef,
    pub(crate) priority: i64,
    /// Meaning depends on `state`; see [`EventState`]'s doc comments.
    pub(crate) time: Time,
    pub(crate) state: EventState,
    pub(crate) suspend_count: Counter,
    pub(crate) kind: NodeKind,
    /// This node's current arrival stamp within `owner`'s ordered set.
    pub(crate) stamp: u64,
    /// The owner-frame clock value observed at the most recent Active ->
    /// Suspended transition; used to reject a resume observed at an
    /// earlier clock value than the suspend.
    pub(crate) suspended_since: Option<Time>,
}

impl Node {
    pub(crate) fn is_hierarchical(&self) -> bool {
        matches!(self.kind, NodeKind::Hierarchical(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;

    #[test]
    fn node_kind_discriminates() {
        let mut arena: Arena<Node> = Arena::new();
        let leaf = arena.insert(Node {
            owner: QueueRef::Main,
            priority: 0,
            time: Time::ZERO,
            state: EventState::Active,
            suspend_count: Counter::new(),
            kind: NodeKind::Concrete { body: None },
            stamp: 0,
            suspended_since: None,
        });
        assert!(!arena.get(leaf).unwrap().is_hierarchical());
    }
}
