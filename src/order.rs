//! The total order on active events, and the ordered set that backs both
//! the main queue and every hierarchical queue's local set of children
//! ascending due time, descending priority, ascending
//! arrival stamp.

use std::cmp::Reverse;
use std::collections::BTreeSet;

use crate::node::EventId;
use crate::time::Time;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct OrderKey {
    time_due: Time,
    priority_desc: Reverse<i64>,
    stamp: u64,
}

impl OrderKey {
    pub(crate) fn new(time_due: Time, priority: i64, stamp: u64) -> Self {
        OrderKey {
            time_due,
            priority_desc: Reverse(priority),
            stamp,
        }
    }
}

/// An ordered set of active event handles, keyed by [`OrderKey`].
///
/// Backed by a `BTreeSet` rather than a `BinaryHeap`: the dispatcher needs
/// to remove arbitrary (non-head) entries on `deschedule`/re-key, which a
/// heap doesn't support without a parallel index; a balanced tree gives
/// O(log n) insert, remove-by-key, and peek-min uniformly.
#[derive(Debug, Default)]
pub(crate) struct OrderedSet {
    entries: BTreeSet<(OrderKey, EventId)>,
}

impl OrderedSet {
    pub(crate) fn new() -> Self {
        OrderedSet {
            entries: BTreeSet::new(),
        }
    }

    pub(crate) fn insert(&mut self, key: OrderKey, id: EventId) {
        let inserted = self.entries.insert((key, id));
        debug_assert!(inserted, "duplicate (key, id) in ordered set");
    }

    pub(crate) fn remove(&mut self, key: OrderKey, id: EventId) -> bool {
        self.entries.remove(&(key, id))
    }

    pub(crate) fn peek(&self) -> Option<EventId> {
        self.entries.iter().next().map(|(_, id)| *id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;
    use crate::node::{Node, NodeKind, QueueRef};
    use crate::state::EventState;
    use crate::time::Counter;

    fn fake_id(arena: &mut Arena<Node>) -> EventId {
        arena.insert(Node {
            owner: QueueRef::Main,
            priority: 0,
            time: Time::ZERO,
            state: EventState::Active,
            suspend_count: Counter::new(),
            kind: NodeKind::Concrete { body: None },
            stamp: 0,
            suspended_since: None,
        })
    }

    #[test]
    fn orders_by_time_then_priority_then_stamp() {
        let mut arena: Arena<Node> = Arena::new();
        let mut set = OrderedSet::new();
        let a = fake_id(&mut arena);
        let b = fake_id(&mut arena);
        let c = fake_id(&mut arena);

        // b is due earlier than a and c.
        set.insert(OrderKey::new(Time::new(5.0).unwrap(), 0, 2), a);
        set.insert(OrderKey::new(Time::new(1.0).unwrap(), 0, 0), b);
        set.insert(OrderKey::new(Time::new(5.0).unwrap(), 10, 1), c);

        assert_eq!(set.peek(), Some(b));
        assert!(set.remove(OrderKey::new(Time::new(1.0).unwrap(), 0, 0), b));
        // c has higher priority than a at the same due time, so it's next.
        assert_eq!(set.peek(), Some(c));
    }
}
