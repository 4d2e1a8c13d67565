//! Plain-text drawing of circuits, states, and outcome distributions.
//!
//! Everything here returns a `String`; nothing is printed.
//!
//! Circuits are drawn with three text lines per register, one box per
//! non-identity gate:
//! ```text
//! Circuit: 2 register(s), 3 step(s)
//!         +---+
//! q_0 : ==| H |====O===========
//!         +---+    |
//!                ++|++
//! q_1 : =========| X |=========
//!                +---+
//! ```

use num_complex::Complex64 as C64;
use crate::{
    circuit::{ Circuit, CircuitResult },
    gate::{ Gate, GateKind, Shape },
    matrix::Matrix,
    state,
};

/// Drawing options.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderConfig {
    /// Number of `#` characters in a histogram bar at probability 1.
    pub bar_width: usize,
    /// Decimal places for amplitudes and probabilities.
    pub precision: usize,
    /// Amplitudes with squared magnitude at or below this are not drawn.
    pub threshold: f64,
    /// Minimum width of a circuit column, not counting the wire gap.
    pub min_cell_width: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            bar_width: 50,
            precision: 3,
            threshold: 1e-10,
            min_cell_width: 5,
        }
    }
}

impl RenderConfig {
    /// Narrower output for small terminals and logs.
    pub fn compact() -> Self {
        Self {
            bar_width: 20,
            precision: 2,
            threshold: 1e-6,
            min_cell_width: 3,
        }
    }
}

type Cell = [String; 3];

fn edge(sym: &str) -> String {
    format!("+{}+", "-".repeat(sym.chars().count() + 2))
}

fn boxed(sym: &str) -> String { format!("| {sym} |") }

fn middle(sym: &str) -> String {
    format!("|{}|", " ".repeat(sym.chars().count() + 2))
}

fn blank(sym: &str) -> String { " ".repeat(sym.chars().count() + 4) }

// `l` and `r` filling either side of a centered `mid`
fn split(sym: &str, l: char, mid: char, r: char) -> String {
    let width = sym.chars().count() + 4;
    let left = (width - 1) / 2;
    let right = width - left - 1;
    format!("{}{mid}{}", l.to_string().repeat(left), r.to_string().repeat(right))
}

fn wire_cell() -> Cell { [String::new(), String::new(), String::new()] }

fn single_cell(sym: &str) -> Cell { [edge(sym), boxed(sym), edge(sym)] }

// the part of a multi-register gate drawn on `register`, within its footprint
fn multi_cell(gate: &Gate, register: usize) -> Cell {
    let sym = gate.symbol();
    match gate.shape() {
        Shape::Controlled { control, target } => {
            let down = control < target;
            if register == target {
                if down {
                    [split(sym, '+', '|', '+'), boxed(sym), edge(sym)]
                } else {
                    [edge(sym), boxed(sym), split(sym, '+', '|', '+')]
                }
            } else if register == control {
                let vert = split(sym, ' ', '|', ' ');
                let dot = split(sym, '=', 'O', '=');
                if down {
                    [blank(sym), dot, vert]
                } else {
                    [vert, dot, blank(sym)]
                }
            } else {
                [
                    split(sym, ' ', '|', ' '),
                    split(sym, '=', '|', '='),
                    split(sym, ' ', '|', ' '),
                ]
            }
        },
        _ => {
            let size = gate.footprint();
            let rel = register - gate.anchor();
            let line = |k: usize| -> String {
                match (k, rel) {
                    (0, 0) => edge(sym),
                    (2, r) if r == size - 1 => edge(sym),
                    (1, r) if r == size / 2 => boxed(sym),
                    _ => middle(sym),
                }
            };
            [line(0), line(1), line(2)]
        },
    }
}

fn step_cells(circuit: &Circuit, step: usize) -> Vec<Cell> {
    let column: Vec<&Gate> = circuit.step_components(step).collect();
    let multis: Vec<&Gate> =
        column.iter().copied()
        .filter(|g| g.kind() == GateKind::Multi)
        .collect();
    column.iter().enumerate()
        .map(|(register, gate)| {
            match multis.iter().find(|m| m.covers(register)) {
                Some(m) => multi_cell(m, register),
                None if gate.is_identity() => wire_cell(),
                None => single_cell(gate.symbol()),
            }
        })
        .collect()
}

/// Draw a circuit diagram.
pub fn circuit(circuit: &Circuit, config: &RenderConfig) -> String {
    let n = circuit.register_size();
    let digits = (n - 1).to_string().len();
    let mut rows: Vec<[String; 3]> =
        (0..n)
        .map(|k| {
            let label = format!("q_{k:<digits$} : ==");
            let pad = " ".repeat(label.chars().count());
            [pad.clone(), label, pad]
        })
        .collect();
    for step in 0..circuit.num_steps() {
        let cells = step_cells(circuit, step);
        let width =
            cells.iter().flatten()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0)
            .max(config.min_cell_width)
            + 2;
        for (row, cell) in rows.iter_mut().zip(cells.iter()) {
            for (k, (out, line)) in row.iter_mut().zip(cell.iter()).enumerate() {
                let fill = if k == 1 { "=" } else { " " };
                let padding = width - line.chars().count();
                out.push_str(line);
                out.push_str(&fill.repeat(padding));
            }
        }
    }
    let mut out = format!(
        "Circuit: {} register(s), {} step(s)\n",
        n,
        circuit.num_steps(),
    );
    for row in rows.iter() {
        // the label line goes in the middle of each register's three lines
        for line in row.iter() {
            out.push_str(line.trim_end());
            out.push('\n');
        }
    }
    out
}

fn fmt_amp(a: C64, config: &RenderConfig) -> String {
    let p = config.precision;
    let re = a.re + 0.0;
    let sign = if a.im < 0.0 { '-' } else { '+' };
    format!("({re:.p$}{sign}{:.p$}i)", a.im.abs())
}

/// Write a state vector in ket notation, e.g. `(0.707+0.000i)|00> +
/// (0.707+0.000i)|11>`.
///
/// Unit amplitudes are written without a coefficient and negligible ones are
/// skipped; a state with no terms is written as `0`. Each label is the binary
/// representation of the basis index, so register 0 is the rightmost digit.
pub fn state(ket: &Matrix, config: &RenderConfig) -> String {
    let dim = ket.rows() * ket.cols();
    let n = state::register_count(dim)
        .unwrap_or_else(|| (usize::BITS - dim.leading_zeros()) as usize);
    let terms: Vec<String> =
        ket.iter().enumerate()
        .filter(|(_, a)| a.norm_sqr() > config.threshold)
        .map(|(index, a)| {
            let ket = format!("|{}>", state::basis_label(index, n));
            if (*a - 1.0).norm() <= config.threshold {
                ket
            } else {
                format!("{}{ket}", fmt_amp(*a, config))
            }
        })
        .collect();
    if terms.is_empty() { "0".to_string() } else { terms.join(" + ") }
}

/// Write the initial state of a circuit followed by a histogram of the
/// outcome probabilities of its final state, one row per basis state.
pub fn probabilities(circuit: &Circuit, config: &RenderConfig)
    -> CircuitResult<String>
{
    let n = circuit.register_size();
    let p = config.precision;
    let mut out = String::from("Initial state:\n");
    out.push_str(&state(&circuit.get_initial_state()?, config));
    out.push_str("\n\nProbabilities of final states:\n");
    for (index, prob) in circuit.probabilities()?.into_iter().enumerate() {
        let bar =
            ((prob + config.threshold) * config.bar_width as f64).floor()
            as usize;
        out.push_str(&format!(
            "|{}> ||{prob:.p$} ||{}\n",
            state::basis_label(index, n),
            "#".repeat(bar),
        ));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ c, gates };

    #[test]
    fn single_box() {
        let mut circ = Circuit::new(1).unwrap();
        circ.add_component(gates::x(0)).unwrap();
        let drawn = circuit(&circ, &RenderConfig::default());
        let lines: Vec<&str> = drawn.lines().collect();
        assert_eq!(
            lines,
            [
                "Circuit: 1 register(s), 1 step(s)",
                "        +---+",
                "q_0 : ==| X |==",
                "        +---+",
            ],
        );
    }

    #[test]
    fn controlled_box() {
        let mut circ = Circuit::new(2).unwrap();
        circ.add_component(gates::cx(0, 1).unwrap()).unwrap();
        let drawn = circuit(&circ, &RenderConfig::default());
        let lines: Vec<&str> = drawn.lines().collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[2], format!("q_0 : =={}{}", "==O====", "======="));
        assert_eq!(lines[3], "          |");
        assert_eq!(lines[4], "        ++|++");
        assert_eq!(lines[5], format!("q_1 : =={}{}", "| X |==", "======="));
        assert_eq!(lines[6], "        +---+");
    }

    #[test]
    fn multi_box_spans_footprint() {
        let mut circ = Circuit::new(3).unwrap();
        circ.add_component(gates::swap(0, 2).unwrap()).unwrap();
        let drawn = circuit(&circ, &RenderConfig::default());
        let lines: Vec<&str> = drawn.lines().collect();
        // "0 <-> 2" is seven characters wide
        assert_eq!(lines[1], "        +---------+");
        assert_eq!(lines[2], format!("q_0 : ==|{}|{}", " ".repeat(9), "=".repeat(9)));
        assert_eq!(lines[5], format!("q_1 : ==| 0 <-> 2 |{}", "=".repeat(9)));
        assert_eq!(lines[9], "        +---------+");
    }

    #[test]
    fn kets() {
        let cfg = RenderConfig::default();
        assert_eq!(state(&state::basis_ket(2, 1).unwrap(), &cfg), "|01>");
        assert_eq!(state(&Matrix::zeros(4, 1), &cfg), "0");
        let r = std::f64::consts::FRAC_1_SQRT_2;
        let bell = Matrix::column([c!(r), c!(0.0), c!(0.0), c!(0.0, -r)]).unwrap();
        assert_eq!(
            state(&bell, &cfg),
            "(0.707+0.000i)|00> + (0.000-0.707i)|11>",
        );
    }

    #[test]
    fn histogram() {
        let mut circ = Circuit::new(1).unwrap();
        circ.add_component(gates::h(0)).unwrap();
        let drawn = probabilities(&circ, &RenderConfig::default()).unwrap();
        let lines: Vec<&str> = drawn.lines().collect();
        assert_eq!(lines[0], "Initial state:");
        assert_eq!(lines[1], "|0>");
        assert_eq!(lines[3], "Probabilities of final states:");
        assert_eq!(lines[4], format!("|0> ||0.500 ||{}", "#".repeat(25)));
        assert_eq!(lines[5], format!("|1> ||0.500 ||{}", "#".repeat(25)));

        let compact = probabilities(&circ, &RenderConfig::compact()).unwrap();
        assert!(compact.contains(&format!("|1> ||0.50 ||{}", "#".repeat(10))));
    }
}
