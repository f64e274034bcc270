//! The five-state event life-cycle as a tagged-variant enum
//! plus a pair of pure functions for interpreting `time` by state,
//! replacing the source's shared flyweight state objects.

use crate::time::{Counter, Time};

/// The state an [`crate::node::Node`] can be in. Descheduled is the initial
/// and terminal-by-cancellation state; Dispatched is terminal-by-completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventState {
    /// Not scheduled anywhere; `time` is undefined.
    Descheduled,
    /// Scheduled and present in its owner's ordered set; `time` holds the
    /// absolute due time, expressed in the owner's clock frame.
    Active,
    /// Scheduled but held back by at least one outstanding `suspend()`
    /// call; `time` holds the *residual* time (due time minus the owner's
    /// clock at the moment of suspension), not an absolute value.
    Suspended,
    /// Popped by the dispatcher, body running.
    Dispatching,
    /// Body has returned; terminal.
    Dispatched,
}

impl EventState {
    /// `time_due(state, time, parent_clock)`, a pure function of the three.
    pub fn time_due(self, time: Time, parent_clock: Time) -> Time {
        let _ = parent_clock;
        match self {
            EventState::Descheduled | EventState::Suspended => Time::infinity(),
            EventState::Active => time,
            EventState::Dispatching | EventState::Dispatched => Time::ZERO,
        }
    }

    /// `time_remaining(state, time, parent_clock)`, a pure function of the
    /// three.
    pub fn time_remaining(self, time: Time, parent_clock: Time) -> Time {
        match self {
            EventState::Descheduled => Time::infinity(),
            EventState::Active => {
                if time.is_infinite() {
                    Time::infinity()
                } else {
                    time - parent_clock
                }
            }
            EventState::Suspended => time,
            EventState::Dispatching | EventState::Dispatched => Time::ZERO,
        }
    }
}

/// Applies one `suspend()` call's counter bookkeeping.
///
/// Returns `true` exactly when the counter was empty beforehand, i.e. when
/// the caller must drive an Active → Suspended transition alongside this
/// call; `false` means the event was already Suspended and only the
/// counter moved.
pub fn apply_suspend(counter: &mut Counter) -> bool {
    let was_empty = counter.is_empty();
    counter.inc();
    was_empty
}

/// Applies one `resume()` call's counter bookkeeping.
///
/// Returns `true` exactly when the counter reached zero, i.e. when the
/// caller must drive a Suspended → Active transition; `false` means
/// outstanding suspends remain and the event stays Suspended.
pub fn apply_resume(counter: &mut Counter) -> Result<bool, crate::error::EngineError> {
    counter.dec()?;
    Ok(counter.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_due_by_state() {
        let t = Time::new(5.0).unwrap();
        let clock = Time::new(2.0).unwrap();
        assert_eq!(EventState::Descheduled.time_due(t, clock), Time::infinity());
        assert_eq!(EventState::Suspended.time_due(t, clock), Time::infinity());
        assert_eq!(EventState::Active.time_due(t, clock), t);
        assert_eq!(EventState::Dispatching.time_due(t, clock), Time::ZERO);
        assert_eq!(EventState::Dispatched.time_due(t, clock), Time::ZERO);
    }

    #[test]
    fn time_remaining_by_state() {
        let due = Time::new(10.0).unwrap();
        let clock = Time::new(4.0).unwrap();
        assert_eq!(EventState::Active.time_remaining(due, clock).as_f64(), 6.0);
        assert_eq!(EventState::Descheduled.time_remaining(due, clock), Time::infinity());
        let residual = Time::new(3.0).unwrap();
        assert_eq!(EventState::Suspended.time_remaining(residual, clock), residual);
        assert_eq!(EventState::Dispatched.time_remaining(due, clock), Time::ZERO);
    }

    #[test]
    fn suspend_resume_counter_transitions() {
        let mut c = Counter::new();
        assert!(apply_suspend(&mut c)); // Active -> Suspended
        assert!(!apply_suspend(&mut c)); // nested suspend, stays Suspended
        assert!(!apply_resume(&mut c).unwrap()); // one outstanding remains
        assert!(apply_resume(&mut c).unwrap()); // Suspended -> Active
    }
}
