use planar_quadrotor::control::Controller;
use planar_quadrotor::dynamics::state::{
    hover_at, Input, Params, SimConfig, State, THETA, THETA_DOT, X, X_DOT, Y, Y_DOT,
};
use planar_quadrotor::sim::{self, PlanarQuadrotor};

/// Cascaded PD: position error → desired tilt, tilt error → differential thrust.
/// Small-angle only; compare with the LQR gains on the same start.
struct CascadedPd {
    params: Params,
    kp_pos: f64,
    kd_pos: f64,
    kp_att: f64,
    kd_att: f64,
    max_tilt: f64,
}

impl Controller for CascadedPd {
    fn control(&mut self, state: &State, goal: &State) -> Input {
        let p = &self.params;
        let e = state - goal;

        // x_ddot = -F sin(theta) / m, so pushing towards +x needs a negative tilt
        let ax = -self.kp_pos * e[X] - self.kd_pos * e[X_DOT];
        let theta_des = -(ax / p.gravity).clamp(-self.max_tilt, self.max_tilt);

        let ay = -self.kp_pos * e[Y] - self.kd_pos * e[Y_DOT];
        let collective = p.mass * (p.gravity + ay) / state[THETA].cos().max(0.5);

        let alpha = self.kp_att * (theta_des - state[THETA]) - self.kd_att * state[THETA_DOT];
        let differential = p.inertia * alpha / p.arm_length;

        Input::new(
            0.5 * (collective + differential),
            0.5 * (collective - differential),
        )
    }

    fn name(&self) -> &str {
        "CascadedPd"
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let params = Params::default();
    let config = SimConfig { max_time: 30.0, ..Default::default() };

    let mut quadrotor = PlanarQuadrotor::new(hover_at(5.0, -3.0), params)?;
    quadrotor.set_goal_state(hover_at(0.0, 0.0));

    let mut controller = CascadedPd {
        params,
        kp_pos: 1.0,
        kd_pos: 1.8,
        kp_att: 40.0,
        kd_att: 12.0,
        max_tilt: 0.3,
    };

    println!("Simulating with {} controller...", controller.name());
    let (trajectory, inputs) = sim::simulate_with(quadrotor, &config, &mut controller)?;

    let max_tilt = trajectory.iter().map(|s| s[THETA].abs()).fold(0.0_f64, f64::max);
    let peak = inputs.iter().map(|u| u[0] + u[1]).fold(0.0_f64, f64::max);

    if let Some(last) = trajectory.last() {
        println!("Final position: ({:.4}, {:.4}) m", last[X], last[Y]);
        println!("Final attitude: {:.5} rad", last[THETA]);
    }
    println!("Max tilt: {:.3} rad", max_tilt);
    println!("Peak collective thrust: {:.2} N", peak);
    println!("Trajectory points: {}", trajectory.len());
    Ok(())
}
