//! A small production line (mill, then bakery) modeled as a hierarchical
//! queue nested under the main queue, with a break that suspends the whole
//! line mid-run and resumes it later without losing each job's remaining
//! time. Run with `cargo run --example hierarchical_factory`.

use dessert::{Simulation, Time};

fn main() {
    tracing_subscriber::fmt::init();

    let mut sim = Simulation::new();
    let main = sim.main_queue();
    let (line, line_as_event) = sim.engine_mut().create_hierarchical_queue(main, 0).unwrap();

    sim.engine_mut()
        .schedule(line, 0, Time::new(4.0).unwrap(), |_engine| {
            println!("milling batch ready");
            Ok(())
        })
        .unwrap();
    sim.engine_mut()
        .schedule(line, 0, Time::new(9.0).unwrap(), |_engine| {
            println!("baking batch ready");
            Ok(())
        })
        .unwrap();

    // An unrelated event on the main queue announces a break at t=2 and
    // suspends the whole line; the break ends at t=6, well after the mill
    // job's original due time (4) would have passed had the line kept
    // running.
    sim.engine_mut()
        .schedule(main, 0, Time::new(2.0).unwrap(), move |engine| {
            println!("t=2.0  break called, line paused");
            engine.suspend(line_as_event).unwrap();
            engine
                .schedule(engine.main_queue(), 0, Time::new(4.0).unwrap(), move |engine| {
                    println!("t=6.0  break over, line resumed");
                    engine.resume(line_as_event).unwrap();
                    Ok(())
                })
                .unwrap();
            Ok(())
        })
        .unwrap();

    sim.start().unwrap();
    sim.run_until_empty().unwrap();

    println!(
        "simulation finished at t={}",
        sim.engine().current_time()
    );
}
