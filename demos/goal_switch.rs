use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use planar_quadrotor::control::{CostWeights, GoalHandle, LqrConfig, LqrController};
use planar_quadrotor::dynamics::state::{hover_at, Params, SimConfig, X, Y};
use planar_quadrotor::sim::event::EventKind;
use planar_quadrotor::sim::{PlanarQuadrotor, Simulation};

/// Ticks per paced batch; the loop sleeps between batches so that
/// goal changes from the main thread land mid-flight.
const BATCH: usize = 1_000;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let params = Params::default();
    let config = SimConfig { max_time: f64::INFINITY, ..Default::default() };
    let controller =
        LqrController::from_params(&params, config.dt, &CostWeights::default(), &LqrConfig::default())?;

    let goal = GoalHandle::new(hover_at(0.0, 0.0));
    let quadrotor = PlanarQuadrotor::new(hover_at(0.0, 0.0), params)?.with_goal_handle(goal.clone());
    let stop = Arc::new(AtomicBool::new(false));

    let worker = {
        let stop = Arc::clone(&stop);
        thread::spawn(move || -> planar_quadrotor::Result<_> {
            let mut sim = Simulation::new(quadrotor, controller, config)?;
            while !stop.load(Ordering::Relaxed) {
                for _ in 0..BATCH {
                    sim.tick()?;
                }
                thread::sleep(Duration::from_millis(10));
            }
            Ok((sim.time(), sim.state(), sim.events().to_vec()))
        })
    };

    for (x, y) in [(2.0, 1.0), (-3.0, 0.5), (0.0, -2.0)] {
        println!("New goal: ({:.1}, {:.1})", x, y);
        goal.set(&[x, y, 0.0, 0.0, 0.0, 0.0])?;
        thread::sleep(Duration::from_millis(1_500));
    }

    // A malformed goal is rejected and the previous one stays in force
    if let Err(e) = goal.set(&[1.0, 2.0]) {
        println!("Rejected goal: {}", e);
    }

    stop.store(true, Ordering::Relaxed);
    let (time, state, events) = worker.join().map_err(|_| "simulation thread panicked")??;

    for event in &events {
        if event.kind == EventKind::Settled {
            println!(
                "  t={:>7.2}s  settled at ({:.3}, {:.3})",
                event.time, event.state[X], event.state[Y]
            );
        }
    }
    println!("Stopped at t={:.1}s, position ({:.3}, {:.3})", time, state[X], state[Y]);
    Ok(())
}
