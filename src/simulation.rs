//! The coarse simulation life-cycle: `Starting -> Running ->
//! Finishing -> Finished`, one-way, wrapping an [`Engine`] and its
//! dispatcher.

use crate::error::EngineError;
use crate::kernel::{Engine, Queue, StepOutcome};

/// The simulation's coarse life-cycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Initial phase: client code may seed events but the dispatcher has
    /// not run yet.
    Starting,
    /// The dispatcher is actively stepping.
    Running,
    /// Termination detected (out of events, or `stop()` called); teardown
    /// runs synchronously and the phase advances to `Finished` before
    /// returning to the caller.
    Finishing,
    /// Terminal.
    Finished,
}

/// Owns an [`Engine`] and drives it through its life-cycle. This is the
/// type client code constructs; event bodies, scheduled through
/// [`Simulation::engine_mut`] before or during a run, receive `&mut Engine`
/// directly (not `&mut Simulation`) since the life-cycle phase is not
/// meaningful from inside a running body.
pub struct Simulation {
    engine: Engine,
    phase: Phase,
    stop_requested: bool,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulation {
    /// A fresh simulation in the `Starting` phase.
    pub fn new() -> Self {
        Simulation {
            engine: Engine::new(),
            phase: Phase::Starting,
            stop_requested: false,
        }
    }

    /// Builds a simulation around a caller-constructed engine (e.g. one
    /// using a custom [`crate::error::Localize`] catalog).
    pub fn with_engine(engine: Engine) -> Self {
        Simulation {
            engine,
            phase: Phase::Starting,
            stop_requested: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Read-only access to the engine, for inspecting state between steps.
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Mutable access to the engine, for seeding events before
    /// [`Simulation::start`] or scheduling more once running.
    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    /// A handle to the engine's root main queue, for convenience.
    pub fn main_queue(&self) -> Queue {
        self.engine.main_queue()
    }

    /// Starting -> Running. A contract violation from any other phase.
    pub fn start(&mut self) -> Result<(), EngineError> {
        if self.phase != Phase::Starting {
            return Err(EngineError::contract_violation(format!(
                "cannot start a simulation in phase {:?}",
                self.phase
            )));
        }
        self.phase = Phase::Running;
        tracing::info!("simulation starting");
        Ok(())
    }

    /// Requests termination at the next step boundary, before any further
    /// event is dispatched. A no-op outside `Running`.
    pub fn stop(&mut self) {
        if self.phase == Phase::Running {
            self.stop_requested = true;
        }
    }

    fn finish(&mut self) {
        self.phase = Phase::Finishing;
        tracing::info!(time = ?self.engine.current_time(), "simulation finishing");
        // No resources beyond the arena to release; transition straight
        // through since nothing here can block or fail.
        self.phase = Phase::Finished;
        tracing::info!("simulation finished");
    }

    /// Runs a single dispatcher step. Requires `Running`; drives the
    /// life-cycle to `Finished` (via `Finishing`) if the queue is empty or
    /// `stop()` was called, reporting that as `StepOutcome::OutOfEvents`
    /// rather than an error.
    pub fn step(&mut self) -> Result<StepOutcome, EngineError> {
        if self.phase != Phase::Running {
            return Err(EngineError::contract_violation(format!(
                "cannot step a simulation in phase {:?}",
                self.phase
            )));
        }
        if self.stop_requested {
            self.finish();
            return Ok(StepOutcome::OutOfEvents);
        }
        let outcome = self.engine.step()?;
        if outcome == StepOutcome::OutOfEvents {
            self.finish();
        }
        Ok(outcome)
    }

    /// Steps until the queue is empty or `stop()` is called, leaving the
    /// simulation in `Finished`.
    pub fn run_until_empty(&mut self) -> Result<(), EngineError> {
        loop {
            match self.step()? {
                StepOutcome::Dispatched(_) => continue,
                StepOutcome::OutOfEvents => return Ok(()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Time;

    #[test]
    fn life_cycle_is_one_way() {
        let mut sim = Simulation::new();
        assert_eq!(sim.phase(), Phase::Starting);
        assert!(sim.step().is_err(), "cannot step before start()");
        sim.start().unwrap();
        assert_eq!(sim.phase(), Phase::Running);
        assert!(sim.start().is_err(), "cannot start twice");
        sim.run_until_empty().unwrap();
        assert_eq!(sim.phase(), Phase::Finished);
        assert!(sim.step().is_err(), "cannot step after finishing");
    }

    #[test]
    fn stop_halts_before_next_dispatch() {
        let mut sim = Simulation::new();
        let main = sim.main_queue();
        let ran = std::rc::Rc::new(std::cell::RefCell::new(false));
        let ran2 = ran.clone();
        sim.engine_mut()
            .schedule(main, 0, Time::new(1.0).unwrap(), move |_| {
                *ran2.borrow_mut() = true;
                Ok(())
            })
            .unwrap();
        sim.start().unwrap();
        sim.stop();
        sim.run_until_empty().unwrap();
        assert!(!*ran.borrow());
        assert_eq!(sim.phase(), Phase::Finished);
    }

    #[test]
    fn run_until_empty_dispatches_everything() {
        let mut sim = Simulation::new();
        let main = sim.main_queue();
        let count = std::rc::Rc::new(std::cell::RefCell::new(0));
        for i in 0..5 {
            let count = count.clone();
            sim.engine_mut()
                .schedule(main, 0, Time::new(i as f64).unwrap(), move |_| {
                    *count.borrow_mut() += 1;
                    Ok(())
                })
                .unwrap();
        }
        sim.start().unwrap();
        sim.run_until_empty().unwrap();
        assert_eq!(*count.borrow(), 5);
    }
}
