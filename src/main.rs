use clap::Parser;

use planar_quadrotor::control::{CostWeights, LqrConfig, LqrController};
use planar_quadrotor::dynamics::state::{hover_at, IntegrationScheme, Params, SimConfig, THETA, X, Y};
use planar_quadrotor::io::{csv, json::{self, RunSummary}};
use planar_quadrotor::sim::{PlanarQuadrotor, Simulation};

/// Headless planar quadrotor run with LQR hover stabilisation
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Initial x position (m)
    #[arg(long, default_value_t = 100.0, allow_hyphen_values = true)]
    x0: f64,

    /// Initial y position (m)
    #[arg(long, default_value_t = 50.0, allow_hyphen_values = true)]
    y0: f64,

    /// Goal x position (m)
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    goal_x: f64,

    /// Goal y position (m)
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    goal_y: f64,

    /// Integration and discretisation step (s)
    #[arg(long, default_value_t = 0.001)]
    dt: f64,

    /// Simulated duration (s)
    #[arg(short = 't', long, default_value_t = 150.0)]
    duration: f64,

    /// Integrate with RK4 instead of forward Euler
    #[arg(long)]
    rk4: bool,

    /// Write the trajectory to this CSV file
    #[arg(long)]
    csv: Option<String>,

    /// Write the run summary to this JSON file
    #[arg(long)]
    json: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let params = Params::default();
    let config = SimConfig {
        dt: args.dt,
        max_time: args.duration,
        scheme: if args.rk4 { IntegrationScheme::Rk4 } else { IntegrationScheme::Euler },
    };
    let goal = hover_at(args.goal_x, args.goal_y);

    // -----------------------------------------------------------------------
    // Gain synthesis
    // -----------------------------------------------------------------------
    let controller =
        LqrController::from_params(&params, config.dt, &CostWeights::default(), &LqrConfig::default())?;

    let mut quadrotor = PlanarQuadrotor::new(hover_at(args.x0, args.y0), params)?;
    quadrotor.set_goal_state(goal);

    // -----------------------------------------------------------------------
    // Run simulation
    // -----------------------------------------------------------------------
    let mut sim = Simulation::new(quadrotor, controller, config.clone())?;
    let mut states = Vec::with_capacity(config.steps() + 1);
    let mut inputs = Vec::with_capacity(config.steps() + 1);
    states.push(sim.state());
    inputs.push(sim.controller().equilibrium_input());

    while sim.steps() < config.steps() && !sim.has_diverged() {
        let tick = sim.tick()?;
        states.push(tick.state);
        inputs.push(tick.input);
    }

    let summary = RunSummary::from_trajectory(&states, &inputs, &goal, config.dt, 1e-2, 1e-3);
    let last = sim.state();

    // -----------------------------------------------------------------------
    // Print results
    // -----------------------------------------------------------------------
    println!();
    println!("====================================================================");
    println!("  PLANAR QUADROTOR — LQR HOVER REGULATION");
    println!("====================================================================");
    println!();
    println!("  Vehicle Parameters");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Mass:          {:>8.3} kg    Inertia:      {:>8.3} kg·m^2",
        params.mass, params.inertia
    );
    println!(
        "  Arm length:    {:>8.3} m     Gravity:      {:>8.3} m/s^2",
        params.arm_length, params.gravity
    );
    println!(
        "  Hover thrust:  {:>8.3} N per rotor",
        sim.controller().equilibrium_input()[0]
    );
    println!();

    println!("  Feedback Gain K");
    println!("  ──────────────────────────────────────────────────────────────────");
    let k = sim.controller().gain();
    for row in 0..2 {
        let cells: Vec<String> = (0..6).map(|j| format!("{:>10.4}", k[(row, j)])).collect();
        println!("  u{} {}", row + 1, cells.join(" "));
    }
    println!();

    println!("  Flight");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!("  START     x={:>9.3}m   y={:>9.3}m", args.x0, args.y0);
    println!("  GOAL      x={:>9.3}m   y={:>9.3}m", goal[X], goal[Y]);
    println!(
        "  FINAL     x={:>9.3}m   y={:>9.3}m   theta={:>8.5} rad   t={:.1}s",
        last[X], last[Y], last[THETA], sim.time()
    );
    match summary.settling_time {
        Some(t) => println!("  SETTLED   t={:>8.2}s  (1 cm / 1 mrad band)", t),
        None => println!("  SETTLED   not within the run"),
    }
    if sim.has_diverged() {
        println!("  DIVERGED  the state left the finite region; try a smaller --dt");
    }
    println!();

    println!("  Performance Summary");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!("  Final position error: {:>10.3e} m", summary.final_position_error);
    println!("  Final angle error:    {:>10.3e} rad", summary.final_angle_error);
    println!("  Max tilt:             {:>10.4} rad ({:.1} deg)", summary.max_tilt, summary.max_tilt.to_degrees());
    println!("  Peak thrust:          {:>10.3} N", summary.peak_thrust);
    println!();

    // -----------------------------------------------------------------------
    // Trajectory table (sampled)
    // -----------------------------------------------------------------------
    println!("  Trajectory");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>8}  {:>9}  {:>9}  {:>9}  {:>8}  {:>8}",
        "t (s)", "x (m)", "y (m)", "theta", "u1 (N)", "u2 (N)"
    );
    println!("  {}", "─".repeat(60));
    let sample_interval = (states.len() / 30).max(1);
    for (i, (s, u)) in states.iter().zip(&inputs).enumerate() {
        if i % sample_interval != 0 && i != states.len() - 1 {
            continue;
        }
        println!(
            "  {:>8.2}  {:>9.3}  {:>9.3}  {:>9.5}  {:>8.3}  {:>8.3}",
            i as f64 * config.dt, s[X], s[Y], s[THETA], u[0], u[1]
        );
    }
    println!();
    println!("  Simulation: {} steps, dt={} s", sim.steps(), config.dt);
    println!("====================================================================");
    println!();

    if let Some(path) = &args.csv {
        csv::write_trajectory_file(path, &states, &inputs, config.dt)?;
        println!("Exported trajectory: {}", path);
    }
    if let Some(path) = &args.json {
        json::write_summary_file(path, &params, &goal, &summary)?;
        println!("Exported summary: {}", path);
    }

    Ok(())
}
