//! Trace extension with permutation and evaluation accumulators.
//!
//! Under ten verifier challenges, the base processor trace grows four running
//! accumulator columns: two permutation products (instruction and memory
//! access order) and two Horner-style evaluations (input and output streams).
//! Each row stores the accumulator *before* that row's factor is folded in, so
//! the update rule turns into a transition identity between consecutive rows
//! that needs no sequential recomputation to check.

use ark_bls12_381::Fr;
use ark_ff::{BigInteger, Field, PrimeField};

use crate::error::{Error, Result};
use crate::math::mpolynomial::MPolynomial;
use crate::vm::table::{
    self, BASE_WIDTH, CURRENT_INSTRUCTION, CYCLE, INSTRUCTION_POINTER, IS_ZERO, MEMORY_POINTER,
    MEMORY_VALUE, NEXT_INSTRUCTION, ProcessorTable, READ_INSTRUCTION, WRITE_INSTRUCTION,
};

// extension column indices, continuing the base layout
pub const INSTRUCTION_PERMUTATION: usize = 7;
pub const MEMORY_PERMUTATION: usize = 8;
pub const INPUT_EVALUATION: usize = 9;
pub const OUTPUT_EVALUATION: usize = 10;
pub const EXTENSION_WIDTH: usize = BASE_WIDTH + 4;

/// The ten challenge scalars, sampled once per proving session by the
/// verifier (or its Fiat-Shamir stand-in) and opaque to this layer.
///
/// Zero challenges are not rejected here; they degrade soundness and keeping
/// them nonzero is the sampler's responsibility.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Challenges<X: Field> {
    pub a: X,
    pub b: X,
    pub c: X,
    pub d: X,
    pub e: X,
    pub f: X,
    pub alpha: X,
    pub beta: X,
    pub gamma: X,
    pub delta: X,
}

impl<X: Field> Challenges<X> {
    /// Samples a uniformly random challenge set.
    pub fn sample<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            a: X::rand(rng),
            b: X::rand(rng),
            c: X::rand(rng),
            d: X::rand(rng),
            e: X::rand(rng),
            f: X::rand(rng),
            alpha: X::rand(rng),
            beta: X::rand(rng),
            gamma: X::rand(rng),
            delta: X::rand(rng),
        }
    }
}

/// Final accumulator values after folding the whole trace; public inputs to
/// the outer protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Terminals<X: Field> {
    pub instruction_permutation: X,
    pub memory_permutation: X,
    pub input_evaluation: X,
    pub output_evaluation: X,
}

/// The extended processor trace: base columns lifted into the extension
/// field, followed by the four accumulator columns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessorExtension<X: Field> {
    /// Rows in execution order, each `EXTENSION_WIDTH` elements wide.
    pub rows: Vec<Vec<X>>,
    pub challenges: Challenges<X>,
    pub terminals: Terminals<X>,
}

impl<X: Field<BasePrimeField = Fr>> ProcessorExtension<X> {
    /// Extends the base trace under the given challenges.
    ///
    /// A pure function of its inputs: row `i`'s accumulator values depend only
    /// on row `i-1`'s and on row `i`'s base fields, and identical inputs yield
    /// identical output. Each accumulator column stores the pre-update value;
    /// the four terminals are the post-update values after the final row.
    pub fn extend(table: &ProcessorTable, challenges: Challenges<X>) -> Result<Self> {
        if table.rows.is_empty() {
            return Err(Error::EmptyTrace);
        }
        for (i, row) in table.rows.iter().enumerate() {
            if row.len() != BASE_WIDTH {
                return Err(Error::RowWidth {
                    row: i,
                    got: row.len(),
                    expected: BASE_WIDTH,
                });
            }
        }

        let read = Fr::from(READ_INSTRUCTION as u64);
        let write = Fr::from(WRITE_INSTRUCTION as u64);

        let mut instruction_permutation = X::one();
        let mut memory_permutation = X::one();
        let mut input_evaluation = X::zero();
        let mut output_evaluation = X::zero();

        let mut rows = Vec::with_capacity(table.rows.len());
        for base_row in &table.rows {
            let mut row: Vec<X> = base_row
                .iter()
                .map(|&value| X::from_base_prime_field(value))
                .collect();

            // running product for the instruction permutation
            row.push(instruction_permutation);
            instruction_permutation *= challenges.alpha
                - challenges.a * row[INSTRUCTION_POINTER]
                - challenges.b * row[CURRENT_INSTRUCTION]
                - challenges.c * row[NEXT_INSTRUCTION];

            // running product for the memory permutation
            row.push(memory_permutation);
            memory_permutation *= challenges.beta
                - challenges.d * row[CYCLE]
                - challenges.e * row[MEMORY_POINTER]
                - challenges.f * row[MEMORY_VALUE];

            // running evaluation of the input stream, folded only on reads
            row.push(input_evaluation);
            if base_row[CURRENT_INSTRUCTION] == read {
                input_evaluation = input_evaluation * challenges.gamma + row[MEMORY_VALUE];
            }

            // running evaluation of the output stream, folded only on writes
            row.push(output_evaluation);
            if base_row[CURRENT_INSTRUCTION] == write {
                output_evaluation = output_evaluation * challenges.delta + row[MEMORY_VALUE];
            }

            rows.push(row);
        }

        tracing::debug!(
            rows = rows.len(),
            width = EXTENSION_WIDTH,
            "extended processor trace"
        );

        Ok(Self {
            rows,
            challenges,
            terminals: Terminals {
                instruction_permutation,
                memory_permutation,
                input_evaluation,
                output_evaluation,
            },
        })
    }
}

impl<X: Field> ProcessorExtension<X> {
    /// Transition constraints over the 22 variables (current row, next row):
    /// the six machine constraints followed by the four accumulator
    /// identities, in fixed order.
    pub fn transition_constraints(&self) -> Vec<MPolynomial<X>> {
        let variables = MPolynomial::<X>::variables(2 * EXTENSION_WIDTH);
        let (current, next) = variables.split_at(EXTENSION_WIDTH);

        let mut polynomials = table::transition_constraints(current, next);
        assert_eq!(
            polynomials.len(),
            table::NUM_TRANSITION_CONSTRAINTS,
            "base table produced {} transition constraints, expected {}",
            polynomials.len(),
            table::NUM_TRANSITION_CONSTRAINTS
        );

        let a = MPolynomial::constant(self.challenges.a);
        let b = MPolynomial::constant(self.challenges.b);
        let c = MPolynomial::constant(self.challenges.c);
        let d = MPolynomial::constant(self.challenges.d);
        let e = MPolynomial::constant(self.challenges.e);
        let f = MPolynomial::constant(self.challenges.f);
        let alpha = MPolynomial::constant(self.challenges.alpha);
        let beta = MPolynomial::constant(self.challenges.beta);
        let gamma = MPolynomial::constant(self.challenges.gamma);
        let delta = MPolynomial::constant(self.challenges.delta);

        let cycle = &current[CYCLE];
        let ip = &current[INSTRUCTION_POINTER];
        let ci = &current[CURRENT_INSTRUCTION];
        let ni = &current[NEXT_INSTRUCTION];
        let mp = &current[MEMORY_POINTER];
        let mv = &current[MEMORY_VALUE];

        // next row's stored instruction permutation product equals this row's
        // product times this row's folding factor
        polynomials.push(
            current[INSTRUCTION_PERMUTATION]
                .mul(&alpha.sub(&a.mul(ip)).sub(&b.mul(ci)).sub(&c.mul(ni)))
                .sub(&next[INSTRUCTION_PERMUTATION]),
        );
        // same identity for the memory permutation product
        polynomials.push(
            current[MEMORY_PERMUTATION]
                .mul(&beta.sub(&d.mul(cycle)).sub(&e.mul(mp)).sub(&f.mul(mv)))
                .sub(&next[MEMORY_PERMUTATION]),
        );

        // the evaluation updates are conditional on the instruction, but a
        // constraint polynomial cannot branch: the deselector keeps the Horner
        // update active exactly at the gating opcode, while the complementary
        // factor forces a carry at every other instruction
        polynomials.push(Self::evaluation_identity(
            READ_INSTRUCTION,
            &gamma,
            &current[INPUT_EVALUATION],
            &next[INPUT_EVALUATION],
            ci,
            mv,
        ));
        polynomials.push(Self::evaluation_identity(
            WRITE_INSTRUCTION,
            &delta,
            &current[OUTPUT_EVALUATION],
            &next[OUTPUT_EVALUATION],
            ci,
            mv,
        ));

        polynomials
    }

    fn evaluation_identity(
        instruction: u8,
        challenge: &MPolynomial<X>,
        evaluation: &MPolynomial<X>,
        evaluation_next: &MPolynomial<X>,
        ci: &MPolynomial<X>,
        mv: &MPolynomial<X>,
    ) -> MPolynomial<X> {
        let opcode = MPolynomial::constant(X::from(instruction as u64));
        evaluation_next
            .sub(&evaluation.mul(challenge))
            .sub(mv)
            .mul(&table::instruction_deselector(instruction, ci))
            .add(&evaluation_next.sub(evaluation).mul(&ci.sub(&opcode)))
    }

    /// Boundary constraints pinned at row 0: counters and memory state start
    /// at zero, the zero indicator at one, the permutation products at one and
    /// the evaluations at zero.
    ///
    /// The current and next instruction columns are intentionally not
    /// constrained here; their row-0 values depend on the program being run
    /// and the program table is responsible for them.
    pub fn boundary_constraints(&self) -> Vec<(usize, MPolynomial<X>)> {
        let x = MPolynomial::<X>::variables(EXTENSION_WIDTH);
        let one = MPolynomial::one();
        vec![
            (0, x[CYCLE].clone()),
            (0, x[INSTRUCTION_POINTER].clone()),
            (0, x[MEMORY_POINTER].clone()),
            (0, x[MEMORY_VALUE].clone()),
            (0, x[IS_ZERO].sub(&one)),
            (0, x[INSTRUCTION_PERMUTATION].sub(&one)),
            (0, x[MEMORY_PERMUTATION].sub(&one)),
            (0, x[INPUT_EVALUATION].clone()),
            (0, x[OUTPUT_EVALUATION].clone()),
        ]
    }

    /// Serializes each extended row into a fixed-layout byte string, fit for
    /// leaf commitment: every element is decomposed into base prime field
    /// elements and each of those is written as its 32-byte big-endian
    /// canonical representative. Deterministic and injective over the field
    /// element domain.
    pub fn serialize_rows(&self) -> Vec<Vec<u8>> {
        self.rows
            .iter()
            .map(|row| {
                let mut bytes = Vec::new();
                for element in row {
                    for limb in element.to_base_prime_field_elements() {
                        bytes.extend_from_slice(&limb.into_bigint().to_bytes_be());
                    }
                }
                bytes
            })
            .collect()
    }
}
