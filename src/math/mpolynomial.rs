//! Symbolic multivariate polynomials over a finite field.
//!
//! Constraints are built once as polynomials in indexed variables and only
//! evaluated when a concrete row (or pair of rows) is substituted for those
//! variables. Nothing here is interpolated or reduced to a univariate form;
//! that is the outer protocol's job.

use ark_ff::Field;
use std::collections::BTreeMap;

/// Multivariate polynomial in sparse canonical form.
///
/// Each term maps an exponent vector to a nonzero coefficient, where index `i`
/// of the vector is the power of variable `x_i`. Exponent vectors carry no
/// trailing zeros and zero coefficients are never stored, so two equal
/// polynomials compare equal regardless of how many variables were in scope
/// when they were built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MPolynomial<F: Field> {
    coefficients: BTreeMap<Vec<usize>, F>,
}

impl<F: Field> MPolynomial<F> {
    /// Creates the zero polynomial.
    pub fn zero() -> Self {
        Self {
            coefficients: BTreeMap::new(),
        }
    }

    /// Creates the constant polynomial one.
    pub fn one() -> Self {
        Self::constant(F::one())
    }

    /// Creates a constant polynomial.
    pub fn constant(value: F) -> Self {
        let mut coefficients = BTreeMap::new();
        if !value.is_zero() {
            coefficients.insert(Vec::new(), value);
        }
        Self { coefficients }
    }

    /// Returns the `count` indeterminates `x_0 .. x_{count-1}`.
    pub fn variables(count: usize) -> Vec<Self> {
        (0..count)
            .map(|i| {
                let mut exponents = vec![0; i + 1];
                exponents[i] = 1;
                let mut coefficients = BTreeMap::new();
                coefficients.insert(exponents, F::one());
                Self { coefficients }
            })
            .collect()
    }

    /// Checks if the polynomial is zero.
    pub fn is_zero(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// Returns the total degree; 0 for the zero polynomial.
    pub fn degree(&self) -> usize {
        self.coefficients
            .keys()
            .map(|exponents| exponents.iter().sum())
            .max()
            .unwrap_or(0)
    }

    /// Adds two polynomials.
    pub fn add(&self, other: &Self) -> Self {
        let mut coefficients = self.coefficients.clone();
        for (exponents, &coefficient) in &other.coefficients {
            let updated = coefficients
                .get(exponents)
                .copied()
                .unwrap_or_else(F::zero)
                + coefficient;
            if updated.is_zero() {
                coefficients.remove(exponents);
            } else {
                coefficients.insert(exponents.clone(), updated);
            }
        }
        Self { coefficients }
    }

    /// Negates the polynomial.
    pub fn neg(&self) -> Self {
        Self {
            coefficients: self
                .coefficients
                .iter()
                .map(|(exponents, &coefficient)| (exponents.clone(), -coefficient))
                .collect(),
        }
    }

    /// Subtracts `other` from this polynomial.
    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.neg())
    }

    /// Multiplies two polynomials.
    pub fn mul(&self, other: &Self) -> Self {
        let mut coefficients: BTreeMap<Vec<usize>, F> = BTreeMap::new();
        for (left_exponents, &left_coefficient) in &self.coefficients {
            for (right_exponents, &right_coefficient) in &other.coefficients {
                let mut exponents = vec![0; left_exponents.len().max(right_exponents.len())];
                for (i, &e) in left_exponents.iter().enumerate() {
                    exponents[i] += e;
                }
                for (i, &e) in right_exponents.iter().enumerate() {
                    exponents[i] += e;
                }
                let updated = coefficients
                    .get(&exponents)
                    .copied()
                    .unwrap_or_else(F::zero)
                    + left_coefficient * right_coefficient;
                if updated.is_zero() {
                    coefficients.remove(&exponents);
                } else {
                    coefficients.insert(exponents, updated);
                }
            }
        }
        Self { coefficients }
    }

    /// Evaluates the polynomial at `point`.
    ///
    /// The point must supply a value for every variable the polynomial
    /// references; extra entries are ignored.
    pub fn evaluate(&self, point: &[F]) -> F {
        let mut result = F::zero();
        for (exponents, &coefficient) in &self.coefficients {
            let mut term = coefficient;
            for (variable, &exponent) in exponents.iter().enumerate() {
                if exponent > 0 {
                    term *= point[variable].pow([exponent as u64]);
                }
            }
            result += term;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::Fr;

    #[test]
    fn test_constant_zero_is_zero() {
        assert!(MPolynomial::<Fr>::constant(Fr::from(0u64)).is_zero());
        assert_eq!(MPolynomial::<Fr>::constant(Fr::from(0u64)), MPolynomial::zero());
    }

    #[test]
    fn test_variables_are_distinct() {
        let vars = MPolynomial::<Fr>::variables(4);
        for i in 0..4 {
            for j in 0..4 {
                assert_eq!(vars[i] == vars[j], i == j);
            }
        }
    }

    #[test]
    fn test_product_of_conjugates() {
        // (x + 1)(x - 1) = x^2 - 1
        let x = &MPolynomial::<Fr>::variables(1)[0];
        let one = MPolynomial::one();
        let product = x.add(&one).mul(&x.sub(&one));
        let expected = x.mul(x).sub(&one);
        assert_eq!(product, expected);
        assert_eq!(product.degree(), 2);
    }

    #[test]
    fn test_addition_cancels() {
        let x = &MPolynomial::<Fr>::variables(1)[0];
        assert!(x.sub(x).is_zero());
        assert!(x.add(&x.neg()).is_zero());
    }

    #[test]
    fn test_multivariate_evaluation() {
        // p = 3*x0*x1^2 + x2 + 5
        let vars = MPolynomial::<Fr>::variables(3);
        let p = MPolynomial::constant(Fr::from(3u64))
            .mul(&vars[0])
            .mul(&vars[1])
            .mul(&vars[1])
            .add(&vars[2])
            .add(&MPolynomial::constant(Fr::from(5u64)));

        let point = [Fr::from(2u64), Fr::from(3u64), Fr::from(7u64)];
        // 3*2*9 + 7 + 5 = 66
        assert_eq!(p.evaluate(&point), Fr::from(66u64));
    }

    #[test]
    fn test_variable_width_does_not_affect_equality() {
        // x_0 built in a 1-variable context equals x_0 built in a 22-variable
        // context, as long as it is the same indeterminate
        let narrow = MPolynomial::<Fr>::variables(1);
        let wide = MPolynomial::<Fr>::variables(22);
        assert_eq!(narrow[0], wide[0]);
    }
}
