use std::io::{self, Write};

use crate::dynamics::state::{Input, State};

/// Write trajectory data to CSV format.
///
/// Columns: time, x, y, theta, x_dot, y_dot, theta_dot, u1, u2
///
/// `inputs[i]` is the thrust that was applied to reach `states[i]`; rows are
/// emitted for the shorter of the two slices.
pub fn write_trajectory<W: Write>(
    writer: &mut W,
    states: &[State],
    inputs: &[Input],
    dt: f64,
) -> io::Result<()> {
    writeln!(writer, "time,x,y,theta,x_dot,y_dot,theta_dot,u1,u2")?;

    for (i, (s, u)) in states.iter().zip(inputs).enumerate() {
        writeln!(
            writer,
            "{:.4},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6}",
            i as f64 * dt,
            s[0], s[1], s[2],
            s[3], s[4], s[5],
            u[0], u[1],
        )?;
    }

    Ok(())
}

/// Write trajectory to a CSV file at the given path.
pub fn write_trajectory_file(
    path: &str,
    states: &[State],
    inputs: &[Input],
    dt: f64,
) -> io::Result<()> {
    let mut file = io::BufWriter::new(std::fs::File::create(path)?);
    write_trajectory(&mut file, states, inputs, dt)?;
    file.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_output_has_header_and_rows() {
        let states = vec![State::zeros(), State::new(1.0, 2.0, 0.1, 0.0, 0.0, 0.0)];
        let inputs = vec![Input::zeros(), Input::new(4.905, 4.905)];

        let mut buf = Vec::new();
        write_trajectory(&mut buf, &states, &inputs, 0.001).unwrap();
        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert!(lines[0].starts_with("time,x,y,theta"));
        assert_eq!(lines.len(), 3); // header + 2 data rows
        assert!(lines[1].starts_with("0.0000,"));
        assert!(lines[2].starts_with("0.0010,1.000000,2.000000,0.100000"));
        assert!(lines[2].ends_with("4.905000,4.905000"));
    }
}
