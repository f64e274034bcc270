//! Error taxonomy and the optional message-localization seam.

use thiserror::Error;

/// Errors the engine can raise.
///
/// `OutOfEvents` is deliberately absent here: it is an
/// internal-only signal consumed entirely inside the dispatcher's `step`
/// (see [`crate::kernel::StepOutcome`]) and never escapes as an
/// `EngineError` variant.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The event/queue/counter state machine was used in a way its contract
    /// forbids: double schedule, resuming something that isn't suspended,
    /// decrementing an empty counter, descheduling something not active,
    /// and so on. The engine remains inspectable afterwards but the caller
    /// should treat the simulation as unsound past this point.
    #[error("{message}")]
    ContractViolation { message: String },

    /// A constructor was handed a malformed argument.
    #[error("{message}")]
    InvalidArgument { message: String },
}

impl EngineError {
    pub fn contract_violation(message: impl Into<String>) -> Self {
        EngineError::ContractViolation {
            message: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        EngineError::InvalidArgument {
            message: message.into(),
        }
    }
}

/// Formats human-readable messages for the error keys the engine itself
/// raises. A host application can supply its own catalog (translations,
/// a different tone, structured codes); [`DefaultLocalizer`] is what the
/// crate uses when nothing else is wired in.
pub trait Localize {
    fn format(&self, key: &str, args: &[&str]) -> String;
}

/// The catalog the engine falls back to when no host-supplied [`Localize`]
/// is configured. Covers the three keys the dispatcher and state machine
/// actually reference: `eventNotResumable`, `eventNotSuspendable`,
/// `outOfEvents`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultLocalizer;

impl Localize for DefaultLocalizer {
    fn format(&self, key: &str, args: &[&str]) -> String {
        match key {
            "eventNotResumable" => {
                format!("event is not resumable in its current state{}", fmt_args(args))
            }
            "eventNotSuspendable" => {
                format!("event is not suspendable in its current state{}", fmt_args(args))
            }
            "outOfEvents" => "no events remain on the queue".to_string(),
            other => format!("unrecognized message key `{other}`{}", fmt_args(args)),
        }
    }
}

fn fmt_args(args: &[&str]) -> String {
    if args.is_empty() {
        String::new()
    } else {
        format!(" ({})", args.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_localizer_covers_known_keys() {
        let loc = DefaultLocalizer;
        assert!(loc.format("outOfEvents", &[]).contains("no events"));
        assert!(loc.format("eventNotResumable", &["e#3"]).contains("e#3"));
        assert!(loc.format("eventNotSuspendable", &[]).contains("not suspendable"));
    }

    #[test]
    fn default_localizer_falls_back_for_unknown_key() {
        let loc = DefaultLocalizer;
        assert!(loc.format("somethingElse", &[]).contains("somethingElse"));
    }
}
