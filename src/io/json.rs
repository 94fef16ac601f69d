use std::io::{self, Write};

use crate::dynamics::state::{Input, Params, State, THETA, X, Y};

/// Summary statistics computed from a closed-loop run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub duration: f64,
    pub steps: usize,
    /// Time after which position and angle error stay inside the tolerances.
    pub settling_time: Option<f64>,
    pub final_position_error: f64,
    pub final_angle_error: f64,
    pub max_tilt: f64,
    pub peak_thrust: f64,
}

impl RunSummary {
    /// Compute summary from trajectory data against a fixed goal.
    pub fn from_trajectory(
        states: &[State],
        inputs: &[Input],
        goal: &State,
        dt: f64,
        position_tol: f64,
        angle_tol: f64,
    ) -> Self {
        let within = |s: &State| {
            let e = s - goal;
            e[X].hypot(e[Y]) < position_tol && e[THETA].abs() < angle_tol
        };

        // Index of the first sample of the final run of in-tolerance samples
        let settled_from = states.iter().rposition(|s| !within(s)).map_or(0, |i| i + 1);
        let settling_time = (settled_from < states.len()).then(|| settled_from as f64 * dt);

        let (final_position_error, final_angle_error) = states
            .last()
            .map(|s| {
                let e = s - goal;
                (e[X].hypot(e[Y]), e[THETA].abs())
            })
            .unwrap_or((0.0, 0.0));

        RunSummary {
            duration: states.len().saturating_sub(1) as f64 * dt,
            steps: states.len().saturating_sub(1),
            settling_time,
            final_position_error,
            final_angle_error,
            max_tilt: max_or_nan(states.iter().map(|s| s[THETA].abs())),
            peak_thrust: max_or_nan(inputs.iter().map(|u| u[0] + u[1])),
        }
    }
}

/// Maximum that lets a NaN through instead of skipping it (`f64::max` drops NaN).
fn max_or_nan(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(0.0, |acc, v| if acc.is_nan() || v.is_nan() { f64::NAN } else { acc.max(v) })
}

/// JSON number with fixed precision, or `null` when not finite.
fn number(value: f64, precision: usize) -> String {
    if value.is_finite() {
        format!("{:.*}", precision, value)
    } else {
        "null".to_string()
    }
}

/// As [`number`], in scientific notation.
fn number_exp(value: f64, precision: usize) -> String {
    if value.is_finite() {
        format!("{:.*e}", precision, value)
    } else {
        "null".to_string()
    }
}

/// Write run summary as JSON to a writer.
pub fn write_summary<W: Write>(
    writer: &mut W,
    params: &Params,
    goal: &State,
    summary: &RunSummary,
) -> io::Result<()> {
    let settling = summary
        .settling_time
        .map_or_else(|| "null".to_string(), |t| number(t, 4));

    writeln!(writer, "{{")?;
    writeln!(writer, "  \"vehicle\": {{")?;
    writeln!(writer, "    \"mass_kg\": {},", params.mass)?;
    writeln!(writer, "    \"inertia_kgm2\": {},", params.inertia)?;
    writeln!(writer, "    \"arm_length_m\": {},", params.arm_length)?;
    writeln!(writer, "    \"gravity_ms2\": {}", params.gravity)?;
    writeln!(writer, "  }},")?;
    writeln!(
        writer,
        "  \"goal\": [{}, {}, {}],",
        number(goal[X], 4),
        number(goal[Y], 4),
        number(goal[THETA], 4)
    )?;
    writeln!(writer, "  \"performance\": {{")?;
    writeln!(writer, "    \"duration_s\": {},", number(summary.duration, 4))?;
    writeln!(writer, "    \"steps\": {},", summary.steps)?;
    writeln!(writer, "    \"settling_time_s\": {},", settling)?;
    writeln!(writer, "    \"final_position_error_m\": {},", number_exp(summary.final_position_error, 6))?;
    writeln!(writer, "    \"final_angle_error_rad\": {},", number_exp(summary.final_angle_error, 6))?;
    writeln!(writer, "    \"max_tilt_rad\": {},", number(summary.max_tilt, 6))?;
    writeln!(writer, "    \"peak_thrust_n\": {}", number(summary.peak_thrust, 4))?;
    writeln!(writer, "  }}")?;
    writeln!(writer, "}}")?;
    Ok(())
}

/// Write run summary JSON to a file.
pub fn write_summary_file(
    path: &str,
    params: &Params,
    goal: &State,
    summary: &RunSummary,
) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_summary(&mut file, params, goal, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::state::hover_at;

    fn approach() -> (Vec<State>, Vec<Input>) {
        let states = vec![
            hover_at(1.0, 0.0),
            State::new(0.5, 0.0, 0.2, 0.0, 0.0, 0.0),
            hover_at(0.001, 0.0),
            hover_at(0.0001, 0.0),
        ];
        let inputs = vec![
            Input::zeros(),
            Input::new(6.0, 5.0),
            Input::new(4.9, 4.9),
            Input::new(4.905, 4.905),
        ];
        (states, inputs)
    }

    #[test]
    fn summary_finds_settling_time() {
        let (states, inputs) = approach();
        let s = RunSummary::from_trajectory(&states, &inputs, &State::zeros(), 0.5, 1e-2, 1e-3);
        assert_eq!(s.settling_time, Some(1.0));
        assert_eq!(s.steps, 3);
        assert_eq!(s.duration, 1.5);
        assert_eq!(s.max_tilt, 0.2);
        assert_eq!(s.peak_thrust, 11.0);
        assert!((s.final_position_error - 0.0001).abs() < 1e-12);
    }

    #[test]
    fn never_settling_reports_none() {
        let (mut states, inputs) = approach();
        states.push(hover_at(3.0, 0.0));
        let s = RunSummary::from_trajectory(&states, &inputs, &State::zeros(), 0.5, 1e-2, 1e-3);
        assert_eq!(s.settling_time, None);
    }

    #[test]
    fn blown_up_run_is_reported_not_hidden() {
        let states = vec![State::zeros(), State::from_element(f64::NAN)];
        let inputs = vec![Input::zeros(), Input::new(f64::INFINITY, 1.0)];
        let s = RunSummary::from_trajectory(&states, &inputs, &State::zeros(), 0.01, 1e-2, 1e-3);
        assert!(s.max_tilt.is_nan());
        assert_eq!(s.peak_thrust, f64::INFINITY);
        assert_eq!(s.settling_time, None);

        let mut buf = Vec::new();
        write_summary(&mut buf, &Params::default(), &State::zeros(), &s).unwrap();
        let json = String::from_utf8(buf).unwrap();
        assert!(json.contains("\"final_position_error_m\": null,"));
        assert!(json.contains("\"final_angle_error_rad\": null,"));
        assert!(json.contains("\"max_tilt_rad\": null,"));
        assert!(json.contains("\"peak_thrust_n\": null"));
        assert!(!json.contains("NaN") && !json.contains("inf"));
    }

    #[test]
    fn json_output_is_valid() {
        let (states, inputs) = approach();
        let summary = RunSummary::from_trajectory(&states, &inputs, &State::zeros(), 0.5, 1e-2, 1e-3);

        let mut buf = Vec::new();
        write_summary(&mut buf, &Params::default(), &State::zeros(), &summary).unwrap();
        let json = String::from_utf8(buf).unwrap();
        assert!(json.contains("\"vehicle\""));
        assert!(json.contains("\"settling_time_s\": 1.0000"));
        assert!(json.contains("\"mass_kg\": 1"));
    }
}
