//! Base processor trace table and the machine's transition constraints.
//!
//! A row records one execution cycle of an eight-instruction pointer machine
//! (Brainfuck's instruction set, with jump targets inlined after `[` and `]`).
//! The table itself is produced by an untrusted interpreter; this module fixes
//! the column layout and supplies the six transition polynomials that encode
//! the machine semantics, plus the per-instruction selector polynomials the
//! extension constraints are gated with.

use ark_bls12_381::Fr;
use ark_ff::Field;

use crate::math::mpolynomial::MPolynomial;

/// The base field the interpreter writes trace values in.
pub type BaseElement = Fr;

// column indices of the base table
pub const CYCLE: usize = 0;
pub const INSTRUCTION_POINTER: usize = 1;
pub const CURRENT_INSTRUCTION: usize = 2;
pub const NEXT_INSTRUCTION: usize = 3;
pub const MEMORY_POINTER: usize = 4;
pub const MEMORY_VALUE: usize = 5;
pub const IS_ZERO: usize = 6;
pub const BASE_WIDTH: usize = 7;

/// The instruction set, as ASCII opcodes.
pub const INSTRUCTIONS: [u8; 8] = [b'[', b']', b'<', b'>', b'+', b'-', b',', b'.'];
/// Opcode that reads one value from the input stream into the current cell.
pub const READ_INSTRUCTION: u8 = b',';
/// Opcode that writes the current cell to the output stream.
pub const WRITE_INSTRUCTION: u8 = b'.';

/// Number of transition constraints the base table produces.
pub const NUM_TRANSITION_CONSTRAINTS: usize = 6;

/// Execution trace of the base machine, one row per cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessorTable {
    /// Rows in execution order, each `BASE_WIDTH` elements wide.
    pub rows: Vec<Vec<BaseElement>>,
}

impl ProcessorTable {
    pub fn new(rows: Vec<Vec<BaseElement>>) -> Self {
        Self { rows }
    }

    /// Number of recorded cycles.
    pub fn height(&self) -> usize {
        self.rows.len()
    }
}

/// Polynomial in `x` that vanishes at every opcode except `instruction`.
///
/// Multiplying a constraint by this deselector activates it exactly on rows
/// whose current instruction is `instruction`; the complementary factor
/// `x - opcode` (built inline where needed) vanishes only there.
pub fn instruction_deselector<F: Field>(instruction: u8, x: &MPolynomial<F>) -> MPolynomial<F> {
    let mut deselector = MPolynomial::one();
    for &opcode in INSTRUCTIONS.iter() {
        if opcode != instruction {
            deselector = deselector.mul(&x.sub(&MPolynomial::constant(F::from(opcode as u64))));
        }
    }
    deselector
}

/// The three transition polynomials describing one instruction's effect on a
/// pair of consecutive rows: instruction pointer, memory pointer and memory
/// value evolution, in that order. A zero polynomial leaves the corresponding
/// column unconstrained for that instruction.
pub fn instruction_polynomials<F: Field>(
    instruction: u8,
    current: &[MPolynomial<F>],
    next: &[MPolynomial<F>],
) -> [MPolynomial<F>; 3] {
    let one = MPolynomial::one();
    let two = MPolynomial::constant(F::from(2u64));

    let ip = &current[INSTRUCTION_POINTER];
    let ip_next = &next[INSTRUCTION_POINTER];
    let ni = &current[NEXT_INSTRUCTION];
    let mp = &current[MEMORY_POINTER];
    let mp_next = &next[MEMORY_POINTER];
    let mv = &current[MEMORY_VALUE];
    let mv_next = &next[MEMORY_VALUE];
    let is_zero = &current[IS_ZERO];

    match instruction {
        // jump forward: skip the two-cell pair when the cell is nonzero,
        // otherwise jump to the inlined target
        b'[' => [
            mv.mul(&ip_next.sub(ip).sub(&two))
                .add(&is_zero.mul(&ip_next.sub(ni))),
            mp_next.sub(mp),
            mv_next.sub(mv),
        ],
        // jump backward: mirror image of `[`
        b']' => [
            is_zero
                .mul(&ip_next.sub(ip).sub(&two))
                .add(&mv.mul(&ip_next.sub(ni))),
            mp_next.sub(mp),
            mv_next.sub(mv),
        ],
        // the pointer moves to a different cell, so the next memory value is
        // unconstrained here (the memory table covers it)
        b'<' => [
            ip_next.sub(ip).sub(&one),
            mp_next.sub(mp).add(&one),
            MPolynomial::zero(),
        ],
        b'>' => [
            ip_next.sub(ip).sub(&one),
            mp_next.sub(mp).sub(&one),
            MPolynomial::zero(),
        ],
        b'+' => [
            ip_next.sub(ip).sub(&one),
            mp_next.sub(mp),
            mv_next.sub(mv).sub(&one),
        ],
        b'-' => [
            ip_next.sub(ip).sub(&one),
            mp_next.sub(mp),
            mv_next.sub(mv).add(&one),
        ],
        // input overwrites the cell with an external value
        b',' => [
            ip_next.sub(ip).sub(&one),
            mp_next.sub(mp),
            MPolynomial::zero(),
        ],
        b'.' => [
            ip_next.sub(ip).sub(&one),
            mp_next.sub(mp),
            mv_next.sub(mv),
        ],
        _ => panic!("unknown instruction opcode {instruction}"),
    }
}

/// The six machine transition constraints over (current row, next row)
/// variables: the three deselector-combined instruction polynomials, the cycle
/// increment, and the two `is_zero` consistency constraints.
pub fn transition_constraints<F: Field>(
    current: &[MPolynomial<F>],
    next: &[MPolynomial<F>],
) -> Vec<MPolynomial<F>> {
    let one = MPolynomial::one();

    // combine per-instruction polynomials; at any concrete row the deselector
    // kills every term whose instruction does not match the current one
    let mut combined = [
        MPolynomial::zero(),
        MPolynomial::zero(),
        MPolynomial::zero(),
    ];
    for &instruction in INSTRUCTIONS.iter() {
        let deselector = instruction_deselector(instruction, &current[CURRENT_INSTRUCTION]);
        let polynomials = instruction_polynomials(instruction, current, next);
        for (slot, polynomial) in combined.iter_mut().zip(polynomials) {
            *slot = slot.add(&deselector.mul(&polynomial));
        }
    }

    let mut constraints = combined.to_vec();
    // the cycle counter always increments
    constraints.push(next[CYCLE].sub(&current[CYCLE]).sub(&one));
    // is_zero is boolean and excludes a nonzero memory value
    constraints.push(current[IS_ZERO].mul(&current[MEMORY_VALUE]));
    constraints.push(current[IS_ZERO].mul(&current[IS_ZERO].sub(&one)));
    constraints
}
