//! dessert: a discrete-event simulation kernel
//!
//! Virtual-time scheduler built around one arena of event nodes, with
//! hierarchical, suspendable event queues and a five-state per-event
//! life-cycle ([`EventState`]).
//!
//! Non-goals (layered on top by a host application, not here): units,
//! scene/config loading, statistics collection, a CLI, message
//! localization beyond the [`Localize`] seam.
//!
//! # Quick example
//!
//! ```
//! use dessert::{Simulation, Time};
//!
//! let mut sim = Simulation::new();
//! let main = sim.main_queue();
//! sim.engine_mut()
//!     .schedule(main, 0, Time::new(1.0).unwrap(), |_engine| {
//!         println!("fired");
//!         Ok(())
//!     })
//!     .unwrap();
//! sim.start().unwrap();
//! sim.run_until_empty().unwrap();
//! assert_eq!(sim.phase(), dessert::Phase::Finished);
//! ```
//!
//! A hierarchical queue behaves like any other scheduling target, and is
//! itself suspendable/resumable as an event in its own parent:
//!
//! ```
//! use dessert::{Simulation, Time};
//!
//! let mut sim = Simulation::new();
//! let main = sim.main_queue();
//! let (sub, _sub_as_event) = sim.engine_mut().create_hierarchical_queue(main, 0).unwrap();
//! sim.engine_mut()
//!     .schedule(sub, 0, Time::new(2.0).unwrap(), |_engine| Ok(()))
//!     .unwrap();
//! sim.start().unwrap();
//! sim.run_until_empty().unwrap();
//! assert_eq!(sim.engine().current_time(), Time::new(2.0).unwrap());
//! ```

mod arena;
mod error;
mod kernel;
mod node;
mod order;
mod simulation;
mod state;
mod time;

pub use error::{DefaultLocalizer, EngineError, Localize};
pub use kernel::{Engine, EventHandle, Queue, StepOutcome};
pub use simulation::{Phase, Simulation};
pub use state::EventState;
pub use time::{Counter, Time};
