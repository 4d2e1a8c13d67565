//! Register × step grid of gates, folded into whole-circuit matrices.
//!
//! A [`Circuit`] holds one lane per register and one column per step. Every
//! cell is occupied: steps are created full of identity placeholders by
//! [`Circuit::evolve`], and [`Circuit::add_component`] overwrites them,
//! appending new steps as needed so that gates never alias or overlap.
//!
//! ```
//! use matcirc::{ circuit::Circuit, gates };
//!
//! // Bell state
//! let mut circuit = Circuit::new(2).unwrap();
//! circuit.add_component(gates::h(0)).unwrap();
//! circuit.add_component(gates::cx(0, 1).unwrap()).unwrap();
//! let probs = circuit.probabilities().unwrap();
//! assert!((probs[0b00] - 0.5).abs() < 1e-10);
//! assert!((probs[0b11] - 0.5).abs() < 1e-10);
//! ```

use rustc_hash::FxHashSet;
use thiserror::Error;
use tracing::{ debug, trace };
use crate::{
    gate::{ Gate, GateError, GateId, GateKind },
    matrix::{ Matrix, MatrixError, identity_matrix },
    state,
};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CircuitError {
    #[error("a circuit must have at least one register")]
    EmptyCircuit,

    #[error("a circuit of {register_size} registers cannot be simulated; the maximum is {max}")]
    TooManyRegisters { register_size: usize, max: usize },

    #[error("gate {0} is already in the circuit")]
    DuplicateGateInsertion(GateId),

    #[error("gate at register {anchor} spanning {footprint} register(s) does not fit in a circuit of {register_size} register(s)")]
    GateDoesNotFit { anchor: usize, footprint: usize, register_size: usize },

    #[error("invalid input register: {0}")]
    InputRegisterMismatch(String),

    #[error("no multi-register gate at step {0}")]
    NoMultigateAtStep(usize),

    #[error("step {step} is out of range; the last step is {total_steps}")]
    StepOutOfRange { step: usize, total_steps: usize },

    #[error("register {register} is out of range for a circuit of {register_size} register(s)")]
    RegisterOutOfRange { register: usize, register_size: usize },

    #[error("gate anchored at register {anchor} cannot be placed on register {register}")]
    AnchorMismatch { anchor: usize, register: usize },

    #[error("gate footprint overlaps the gate on register {register} at step {step}")]
    FootprintOverlap { register: usize, step: usize },

    #[error("gate error: {0}")]
    Gate(#[from] GateError),

    #[error("matrix error: {0}")]
    Matrix(#[from] MatrixError),
}
pub type CircuitResult<T> = Result<T, CircuitError>;
use CircuitError::*;

/// Largest register size whose state space dimension fits in a `usize`.
pub const MAX_REGISTERS: usize = usize::BITS as usize - 1;

/// A quantum circuit over a fixed number of registers.
///
/// The circuit exclusively owns every gate placed in it. Gate identities (see
/// [`GateId`]) are tracked so that the same gate can never occupy two cells.
#[derive(Clone, Debug)]
pub struct Circuit {
    register_size: usize,
    // grid[register][step]
    grid: Vec<Vec<Gate>>,
    total_steps: usize,
    input_register: Vec<u8>,
    placed: FxHashSet<GateId>,
}

impl Circuit {
    /// Create a new circuit with one identity-filled step and an all-zero
    /// input register.
    ///
    /// Fails if `register_size` is zero or greater than [`MAX_REGISTERS`].
    pub fn new(register_size: usize) -> CircuitResult<Self> {
        if register_size == 0 { return Err(EmptyCircuit); }
        if register_size > MAX_REGISTERS {
            return Err(TooManyRegisters { register_size, max: MAX_REGISTERS });
        }
        let grid: Vec<Vec<Gate>> =
            (0..register_size)
            .map(|k| vec![Gate::identity(k)])
            .collect();
        let placed: FxHashSet<GateId> =
            grid.iter().flatten().map(|g| g.id()).collect();
        Ok(Self {
            register_size,
            grid,
            total_steps: 0,
            input_register: vec![0; register_size],
            placed,
        })
    }

    /// Return the number of registers.
    pub fn register_size(&self) -> usize { self.register_size }

    /// Return the index of the last step.
    pub fn total_steps(&self) -> usize { self.total_steps }

    /// Return the number of steps, i.e. `total_steps + 1`.
    pub fn num_steps(&self) -> usize { self.total_steps + 1 }

    /// Return the current input register.
    pub fn input_register(&self) -> &[u8] { &self.input_register }

    fn check_step(&self, step: usize) -> CircuitResult<()> {
        if step > self.total_steps {
            Err(StepOutOfRange { step, total_steps: self.total_steps })
        } else {
            Ok(())
        }
    }

    fn check_register(&self, register: usize) -> CircuitResult<()> {
        if register >= self.register_size {
            Err(RegisterOutOfRange {
                register,
                register_size: self.register_size,
            })
        } else {
            Ok(())
        }
    }

    fn check_fit(&self, gate: &Gate) -> CircuitResult<()> {
        if gate.can_fit(self.register_size) {
            Ok(())
        } else {
            Err(GateDoesNotFit {
                anchor: gate.anchor(),
                footprint: gate.footprint(),
                register_size: self.register_size,
            })
        }
    }

    /// Return the gate occupying a cell.
    pub fn component(&self, register: usize, step: usize)
        -> CircuitResult<&Gate>
    {
        self.check_register(register)?;
        self.check_step(step)?;
        Ok(&self.grid[register][step])
    }

    /// Return an iterator over the gates in a step, in register order.
    ///
    /// The iterator is empty if `step` is out of range.
    pub fn step_components(&self, step: usize)
        -> impl Iterator<Item = &Gate> + '_
    {
        self.grid.iter().filter_map(move |lane| lane.get(step))
    }

    /// Append one step of identity placeholders.
    pub fn evolve(&mut self) {
        for (k, lane) in self.grid.iter_mut().enumerate() {
            let placeholder = Gate::identity(k);
            self.placed.insert(placeholder.id());
            lane.push(placeholder);
        }
        self.total_steps += 1;
        trace!(total_steps = self.total_steps, "evolve");
    }

    /// Append `n` steps of identity placeholders.
    pub fn evolve_by(&mut self, n: usize) {
        (0..n).for_each(|_| { self.evolve(); });
    }

    /// Return `true` if `gate` (or a clone of it) occupies any cell.
    pub fn is_gate_in_circuit(&self, gate: &Gate) -> bool {
        self.placed.contains(&gate.id())
    }

    fn step_is_empty(&self, step: usize) -> bool {
        self.step_components(step).all(|g| g.is_identity())
    }

    fn multigate_at(&self, step: usize) -> Option<&Gate> {
        self.step_components(step).find(|g| g.kind() == GateKind::Multi)
    }

    // a multi-register gate in `step` other than on `register` whose
    // footprint covers `register`
    fn multigate_covering(&self, register: usize, step: usize)
        -> Option<&Gate>
    {
        self.step_components(step)
            .find(|g| {
                g.kind() == GateKind::Multi
                    && g.anchor() != register
                    && g.covers(register)
            })
    }

    /// Return `true` if every register shows an identity at `step`.
    pub fn is_step_empty(&self, step: usize) -> CircuitResult<bool> {
        self.check_step(step)?;
        Ok(self.step_is_empty(step))
    }

    /// Return `true` if a multi-register gate occupies `step`.
    pub fn step_contains_multigate(&self, step: usize) -> CircuitResult<bool> {
        self.check_step(step)?;
        Ok(self.multigate_at(step).is_some())
    }

    /// Return the first multi-register gate (in register order) at `step`.
    pub fn get_multigate_at_step(&self, step: usize) -> CircuitResult<&Gate> {
        self.check_step(step)?;
        self.multigate_at(step).ok_or(NoMultigateAtStep(step))
    }

    // place without validation, releasing the previous occupant
    fn install(&mut self, gate: Gate, register: usize, step: usize) {
        debug!(
            gate = %gate,
            register,
            step,
            kind = ?gate.kind(),
            "place gate",
        );
        let old = std::mem::replace(&mut self.grid[register][step], gate);
        self.placed.remove(&old.id());
        self.placed.insert(self.grid[register][step].id());
    }

    /// Add a gate at its anchor register in the last step, appending steps as
    /// needed.
    ///
    /// Single-register gates go into the last step unless their cell is
    /// already taken (or covered by a multi-register gate), in which case a
    /// new step is appended first. Multi-register gates require an entirely
    /// empty last step, and are always followed by a new empty step.
    ///
    /// Fails if the gate is already in the circuit or does not fit.
    pub fn add_component(&mut self, gate: Gate) -> CircuitResult<()> {
        if self.is_gate_in_circuit(&gate) {
            return Err(DuplicateGateInsertion(gate.id()));
        }
        self.check_fit(&gate)?;
        let register = gate.anchor();
        match gate.kind() {
            GateKind::Single => {
                let last = self.total_steps;
                if !self.grid[register][last].is_identity()
                    || self.multigate_covering(register, last).is_some()
                {
                    debug!(register, step = last, "cell occupied; extending");
                    self.evolve();
                }
                self.install(gate, register, self.total_steps);
            },
            GateKind::Multi => {
                if !self.step_is_empty(self.total_steps) {
                    debug!(step = self.total_steps, "step occupied; extending");
                    self.evolve();
                }
                self.install(gate, register, self.total_steps);
                self.evolve();
            },
        }
        Ok(())
    }

    /// Replace the gate at a cell, releasing the previous occupant.
    ///
    /// Fails if the gate is already in the circuit, does not fit, is not
    /// anchored at `register`, or would overlap the footprint of another
    /// non-identity gate in the same step.
    pub fn replace_component(
        &mut self,
        gate: Gate,
        register: usize,
        step: usize,
    ) -> CircuitResult<()>
    {
        if self.is_gate_in_circuit(&gate) {
            return Err(DuplicateGateInsertion(gate.id()));
        }
        self.check_fit(&gate)?;
        self.check_register(register)?;
        self.check_step(step)?;
        if gate.anchor() != register {
            return Err(AnchorMismatch { anchor: gate.anchor(), register });
        }
        let span = gate.registers();
        let overlap =
            self.step_components(step).enumerate()
            .find(|(k, other)| {
                *k != register
                    && !other.is_identity()
                    && other.registers().start < span.end
                    && span.start < other.registers().end
            });
        if let Some((k, _)) = overlap {
            return Err(FootprintOverlap { register: k, step });
        }
        self.install(gate, register, step);
        Ok(())
    }

    /// Set the input register.
    ///
    /// Fails if `bits` does not have one entry per register or any entry is
    /// not 0 or 1.
    pub fn set_input_register(&mut self, bits: &[u8]) -> CircuitResult<()> {
        if bits.len() != self.register_size {
            return Err(InputRegisterMismatch(format!(
                "expected {} bit(s), got {}", self.register_size, bits.len())));
        }
        if let Some((k, b)) =
            bits.iter().enumerate().find(|(_, b)| **b > 1)
        {
            return Err(InputRegisterMismatch(format!(
                "entry {k} is {b}; inputs must be 0 or 1")));
        }
        self.input_register = bits.to_vec();
        Ok(())
    }

    /// Return the full-space matrix of a single step.
    ///
    /// Starting from the identity, each register's gate is embedded and
    /// multiplied on the left, in register order. Placeholders within a
    /// multi-register gate's footprint embed to the identity.
    pub fn get_matrix_at_step(&self, step: usize) -> CircuitResult<Matrix> {
        self.check_step(step)?;
        let n = self.register_size;
        let mut acc = identity_matrix(1 << n);
        for lane in self.grid.iter() {
            acc = lane[step].embed(n)?.multiply(&acc)?;
        }
        trace!(step, "folded step matrix");
        Ok(acc)
    }

    /// Return the matrix of the whole circuit, with earlier steps applied
    /// first (i.e. on the right).
    pub fn get_matrix(&self) -> CircuitResult<Matrix> {
        let mut acc = self.get_matrix_at_step(0)?;
        for step in 1..=self.total_steps {
            acc = self.get_matrix_at_step(step)?.multiply(&acc)?;
        }
        Ok(acc)
    }

    /// Return the state prepared from the input register.
    pub fn get_initial_state(&self) -> CircuitResult<Matrix> {
        Ok(state::register_ket(&self.input_register)?)
    }

    /// Return the result of applying the whole circuit to the initial state.
    pub fn get_final_state(&self) -> CircuitResult<Matrix> {
        Ok(self.get_matrix()?.multiply(&self.get_initial_state()?)?)
    }

    /// Return the result of applying *only* the matrix of `step` to the
    /// initial state.
    ///
    /// This is not the cumulative state through `step`.
    pub fn get_state_after_step(&self, step: usize) -> CircuitResult<Matrix> {
        Ok(
            self.get_matrix_at_step(step)?
                .multiply(&self.get_initial_state()?)?
        )
    }

    /// Return the outcome probabilities of the final state, indexed by basis
    /// state.
    pub fn probabilities(&self) -> CircuitResult<Vec<f64>> {
        Ok(state::probabilities(&self.get_final_state()?))
    }

    /// Return the final state for every computational-basis input, in order of
    /// basis index (register *j* holds bit *j* of the index).
    ///
    /// The circuit matrix is computed once; the stored input register is left
    /// unchanged.
    pub fn truth_table(&self) -> CircuitResult<Vec<(Vec<u8>, Matrix)>> {
        let n = self.register_size;
        let circuit_matrix = self.get_matrix()?;
        (0..1_usize << n)
            .map(|index| -> CircuitResult<(Vec<u8>, Matrix)> {
                let bits = state::bits_of(index, n);
                let output =
                    circuit_matrix.multiply(&state::register_ket(&bits)?)?;
                Ok((bits, output))
            })
            .collect()
    }
}
