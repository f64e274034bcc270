//! A narrated walk through scheduling, cancelling, and suspending a handful
//! of events directly on the main queue. Run with `cargo run --example
//! basic_walkthrough`.

use dessert::{Simulation, Time};

fn main() {
    tracing_subscriber::fmt::init();

    let mut sim = Simulation::new();
    let main = sim.main_queue();

    sim.engine_mut()
        .schedule(main, 0, Time::new(1.0).unwrap(), |_engine| {
            println!("t=1.0  delivery truck arrives");
            Ok(())
        })
        .unwrap();

    sim.engine_mut()
        .schedule(main, 0, Time::new(3.0).unwrap(), |engine| {
            println!("t=3.0  shift change begins");
            engine
                .schedule(
                    engine.main_queue(),
                    0,
                    Time::new(0.5).unwrap(),
                    |_engine| {
                        println!("t=3.5  shift change complete");
                        Ok(())
                    },
                )
                .unwrap();
            Ok(())
        })
        .unwrap();

    let doomed = sim
        .engine_mut()
        .schedule(main, 0, Time::new(2.0).unwrap(), |_engine| {
            println!("t=2.0  this should never print");
            Ok(())
        })
        .unwrap();
    sim.engine_mut().cancel(doomed).unwrap();

    sim.start().unwrap();
    sim.run_until_empty().unwrap();

    println!(
        "simulation finished at t={}",
        sim.engine().current_time()
    );
}
