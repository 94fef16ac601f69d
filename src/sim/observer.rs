//! Read-only helpers for the consumers of a running simulation
//! (renderer, audio, goal picking). None of them touch simulation state.

use crate::dynamics::state::{Input, State, THETA, X, Y};

/// World position → screen pixel, origin at the screen centre, y up in the world.
pub fn world_to_screen(x: f64, y: f64, width: f64, height: f64) -> (f64, f64) {
    (x + width / 2.0, height / 2.0 - y)
}

/// Screen pixel → world position; inverse of [`world_to_screen`].
pub fn screen_to_world(sx: f64, sy: f64, width: f64, height: f64) -> (f64, f64) {
    (sx - width / 2.0, height / 2.0 - sy)
}

/// Rotor hub positions for drawing: centre ± arm along the body axis.
pub fn rotor_positions(state: &State, arm_length: f64) -> [(f64, f64); 2] {
    let (sin, cos) = state[THETA].sin_cos();
    let (dx, dy) = (arm_length * cos, arm_length * sin);
    [
        (state[X] + dx, state[Y] + dy),
        (state[X] - dx, state[Y] - dy),
    ]
}

/// Loudness for a rotor tone: grows with total thrust, capped at 100.
pub fn tone_volume(input: &Input) -> f64 {
    (0.6 * (input[0].abs() + input[1].abs())).exp().min(100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn screen_round_trip_centre() {
        assert_eq!(world_to_screen(0.0, 0.0, 1280.0, 720.0), (640.0, 360.0));
        assert_eq!(screen_to_world(640.0, 360.0, 1280.0, 720.0), (0.0, 0.0));
        let (sx, sy) = world_to_screen(-100.0, 50.0, 1280.0, 720.0);
        assert_eq!((sx, sy), (540.0, 310.0));
        assert_eq!(screen_to_world(sx, sy, 1280.0, 720.0), (-100.0, 50.0));
    }

    #[test]
    fn tone_volume_saturates() {
        assert_abs_diff_eq!(tone_volume(&Input::zeros()), 1.0);
        assert_abs_diff_eq!(tone_volume(&Input::new(1.0, -1.0)), (1.2f64).exp());
        assert_eq!(tone_volume(&Input::new(50.0, 50.0)), 100.0);
    }

    #[test]
    fn rotors_straddle_centre() {
        let s = State::new(10.0, 20.0, 0.0, 0.0, 0.0, 0.0);
        let [a, b] = rotor_positions(&s, 0.5);
        assert_eq!(a, (10.5, 20.0));
        assert_eq!(b, (9.5, 20.0));
    }
}
