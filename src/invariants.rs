// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/invariants.rs - Quantities derived from a functional equation.
 *  Copyright (C) 2026  Forest Crossman <cyrozap@gmail.com>
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  You should have received a copy of the GNU General Public License
 *  along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

/*!
 * # `invariants` Module
 *
 * Derives the degree, the (approximate) conductor, and the self-duality and
 * Langlands-normalization flags of a functional equation from its raw
 * parameters.
 *
 * The input data are floating point approximations of analytic quantities,
 * so every comparison here uses one of the fixed tolerances below. The
 * self-duality and normalization flags are heuristics and never fail.
 */

use std::f64::consts::PI;

use num_complex::Complex64;
use tracing::{debug, warn};

use crate::error::FormatError;
use crate::model::FunctionalEquationModel;

/// How close `kappa` must be to 1/2 or 1 to count as a Gamma_R or Gamma_C
/// factor.
pub const FACTOR_TOLERANCE: f64 = 1e-5;

/// Largest imaginary part of `a(n)/a(0)` still considered real.
pub const SELFDUAL_TOLERANCE: f64 = 1e-5;

/// Number of leading coefficients examined by [is_selfdual].
pub const SELFDUAL_WINDOW: usize = 8;

/// Largest distance of `2 * sum(kappa)` from an integer.
pub const DEGREE_TOLERANCE: f64 = 1e-3;

/// A gamma factor `Gamma(kappa * s + lambda)` sorted by its weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GammaFactor {
    /// `kappa = 1/2`: contributes `2 * lambda` to `mu`.
    Real(Complex64),
    /// `kappa = 1`: contributes `lambda` to `nu`.
    Complex(Complex64),
    /// Any other weight. Counted with `nu`, but the functional equation is
    /// not Langlands-normalized.
    NonStandard(Complex64),
}

pub fn classify(kappa: f64, lambda: Complex64) -> GammaFactor {
    if (kappa - 0.5).abs() < FACTOR_TOLERANCE {
        GammaFactor::Real(2.0 * lambda)
    } else if (kappa - 1.0).abs() < FACTOR_TOLERANCE {
        GammaFactor::Complex(lambda)
    } else {
        GammaFactor::NonStandard(lambda)
    }
}

/// The gamma factors of a functional equation in Gamma_R/Gamma_C form.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GammaLists {
    pub mu: Vec<Complex64>,
    pub nu: Vec<Complex64>,
    pub langlands: bool,
}

pub fn gamma_lists(kappa: &[f64], lambda: &[Complex64]) -> GammaLists {
    let mut lists = GammaLists {
        langlands: true,
        ..GammaLists::default()
    };

    for (&k, &l) in kappa.iter().zip(lambda) {
        match classify(k, l) {
            GammaFactor::Real(mu) => lists.mu.push(mu),
            GammaFactor::Complex(nu) => lists.nu.push(nu),
            GammaFactor::NonStandard(nu) => {
                warn!(kappa = k, "gamma factor is neither Gamma_R nor Gamma_C");
                lists.nu.push(nu);
                lists.langlands = false;
            }
        }
    }

    lists
}

/// The degree `round(2 * sum(kappa))`.
pub fn degree(model: &FunctionalEquationModel) -> Result<u32, FormatError> {
    let twice_sum = 2.0 * model.kappa.iter().sum::<f64>();
    let rounded = twice_sum.round();

    if !twice_sum.is_finite() || (twice_sum - rounded).abs() > DEGREE_TOLERANCE {
        return Err(FormatError::InvalidFunctionalEquation(format!(
            "2 * sum(kappa) = {} is not an integer",
            twice_sum
        )));
    }
    if rounded < 0.0 || rounded >= u32::MAX as f64 {
        return Err(FormatError::InvalidFunctionalEquation(format!(
            "degree {} is out of range",
            rounded
        )));
    }

    Ok(rounded as u32)
}

/// The level `round(pi^degree * 4^len(nu) * q_fe^2)`.
///
/// This equals the conductor only when the functional equation is
/// arithmetically normalized. For anything else the result is just a number
/// derived from `q_fe`.
pub fn level(model: &FunctionalEquationModel) -> Result<u64, FormatError> {
    if !(model.q_fe.is_finite() && model.q_fe > 0.0) {
        return Err(FormatError::InvalidFunctionalEquation(format!(
            "Q = {} is not positive",
            model.q_fe
        )));
    }

    let degree = degree(model)?;
    let nu_len = gamma_lists(&model.kappa, &model.lambda).nu.len();

    let level = PI.powf(degree as f64) * 4f64.powf(nu_len as f64) * model.q_fe.powi(2);
    let rounded = level.round();
    if !rounded.is_finite() || rounded >= u64::MAX as f64 {
        return Err(FormatError::InvalidFunctionalEquation(format!(
            "level {} is out of range",
            level
        )));
    }

    Ok(rounded as u64)
}

/// Whether the coefficients look real up to a common phase.
///
/// Compares `a(n)` for `n` in `1..8` against `a(0)`. If `a(0)` is zero there
/// is no phase to remove and every coefficient in the window must itself be
/// real. This is a numerical test on a few coefficients, not a proof of
/// self-duality.
pub fn coefficients_are_selfdual(coefficients: &[Complex64]) -> bool {
    let window = &coefficients[..coefficients.len().min(SELFDUAL_WINDOW)];

    let reference = match window.first() {
        Some(a) if *a != Complex64::new(0.0, 0.0) => *a,
        Some(_) => Complex64::new(1.0, 0.0),
        None => return true,
    };

    window
        .iter()
        .skip(1)
        .all(|a| (*a / reference).im.abs() <= SELFDUAL_TOLERANCE)
}

pub fn is_selfdual(model: &FunctionalEquationModel) -> bool {
    coefficients_are_selfdual(&model.dirichlet_coefficients)
}

/// Whether every gamma factor is a Gamma_R or a Gamma_C factor.
pub fn langlands_normalized(model: &FunctionalEquationModel) -> bool {
    model
        .kappa
        .iter()
        .all(|&k| !matches!(classify(k, Complex64::new(0.0, 0.0)), GammaFactor::NonStandard(_)))
}

fn check_structure(model: &FunctionalEquationModel) -> Result<(), FormatError> {
    if model.kappa.len() != model.quasidegree || model.lambda.len() != model.quasidegree {
        return Err(FormatError::InvalidFunctionalEquation(format!(
            "quasidegree is {} but there are {} kappa and {} lambda values",
            model.quasidegree,
            model.kappa.len(),
            model.lambda.len()
        )));
    }
    if model.poles.len() != model.residues.len() {
        return Err(FormatError::InvalidFunctionalEquation(format!(
            "{} poles but {} residues",
            model.poles.len(),
            model.residues.len()
        )));
    }
    if let (Some(poles), Some(residues)) = (&model.poles_l, &model.residues_l) {
        if poles.len() != residues.len() {
            return Err(FormatError::InvalidFunctionalEquation(format!(
                "{} poles of L(s) but {} residues",
                poles.len(),
                residues.len()
            )));
        }
    }

    Ok(())
}

/// Validates a model and fills in its derived fields.
///
/// Finalizing an already finalized model returns it unchanged.
pub fn finalize(mut model: FunctionalEquationModel) -> Result<FunctionalEquationModel, FormatError> {
    check_structure(&model)?;

    let lists = gamma_lists(&model.kappa, &model.lambda);
    model.mu = lists.mu;
    model.nu = lists.nu;
    model.langlands = lists.langlands;

    model.degree = degree(&model)?;
    model.level = level(&model)?;
    model.selfdual = is_selfdual(&model);

    debug!(
        degree = model.degree,
        level = model.level,
        selfdual = model.selfdual,
        langlands = model.langlands,
        "finalized functional equation"
    );

    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn real(x: f64) -> Complex64 {
        Complex64::new(x, 0.0)
    }

    fn with_kappa(kappa: &[f64]) -> FunctionalEquationModel {
        FunctionalEquationModel {
            quasidegree: kappa.len(),
            kappa: kappa.to_vec(),
            lambda: vec![real(0.0); kappa.len()],
            q_fe: 1.0,
            ..FunctionalEquationModel::default()
        }
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(0.5, real(0.25)), GammaFactor::Real(real(0.5)));
        assert_eq!(classify(0.500001, real(0.0)), GammaFactor::Real(real(0.0)));
        assert_eq!(classify(1.0, real(0.5)), GammaFactor::Complex(real(0.5)));
        assert_eq!(classify(0.75, real(1.0)), GammaFactor::NonStandard(real(1.0)));
    }

    #[test]
    fn test_gamma_lists() {
        let lists = gamma_lists(&[0.5, 1.0, 2.0], &[real(0.5), real(1.5), real(3.0)]);
        assert_eq!(lists.mu, vec![real(1.0)]);
        assert_eq!(lists.nu, vec![real(1.5), real(3.0)]);
        assert!(!lists.langlands);
    }

    #[test]
    fn test_degree() {
        assert_eq!(degree(&with_kappa(&[0.5])).unwrap(), 1);
        assert_eq!(degree(&with_kappa(&[1.0])).unwrap(), 2);
        assert_eq!(degree(&with_kappa(&[0.5, 0.5])).unwrap(), 2);
        assert_eq!(degree(&with_kappa(&[])).unwrap(), 0);
        assert_eq!(degree(&with_kappa(&[0.5000001, 1.0])).unwrap(), 3);
    }

    #[test]
    fn test_degree_rejects_bad_kappa() {
        assert!(matches!(
            degree(&with_kappa(&[0.3])),
            Err(FormatError::InvalidFunctionalEquation(_))
        ));
        assert!(matches!(
            degree(&with_kappa(&[-1.0])),
            Err(FormatError::InvalidFunctionalEquation(_))
        ));
    }

    #[test]
    fn test_level() {
        let mut zeta = with_kappa(&[0.5]);
        zeta.q_fe = 1.0 / PI.sqrt();
        assert_eq!(level(&zeta).unwrap(), 1);

        let mut character = with_kappa(&[0.5]);
        character.q_fe = 2.0 / PI.sqrt();
        assert_eq!(level(&character).unwrap(), 4);

        // Dedekind zeta of Q(i): one complex place, discriminant -4.
        let mut gaussian = with_kappa(&[1.0]);
        gaussian.q_fe = 2.0 / (2.0 * PI);
        assert_eq!(level(&gaussian).unwrap(), 4);
    }

    #[test]
    fn test_level_rejects_non_positive_q() {
        for q in [0.0, -1.0, f64::NAN] {
            let mut model = with_kappa(&[0.5]);
            model.q_fe = q;
            assert!(matches!(
                level(&model),
                Err(FormatError::InvalidFunctionalEquation(_))
            ));
        }
    }

    #[test]
    fn test_out_of_range() {
        let mut model = with_kappa(&[]);
        model.q_fe = 2f64.powi(32);
        assert!(matches!(
            level(&model),
            Err(FormatError::InvalidFunctionalEquation(_))
        ));

        model.q_fe = 2f64.powi(31);
        assert_eq!(level(&model).unwrap(), 1 << 62);

        assert!(matches!(
            degree(&with_kappa(&[2147483647.5])),
            Err(FormatError::InvalidFunctionalEquation(_))
        ));
    }

    #[test]
    fn test_selfdual() {
        let reals = (0..10).map(|n| real(n as f64 - 3.0)).collect::<Vec<_>>();
        assert!(coefficients_are_selfdual(&reals));

        let mut complex = vec![real(1.0); 8];
        complex[5] = Complex64::new(0.5, 0.001);
        assert!(!coefficients_are_selfdual(&complex));

        // Outside the window.
        let mut late = vec![real(1.0); 10];
        late[8] = Complex64::new(0.0, 1.0);
        assert!(coefficients_are_selfdual(&late));

        // Within tolerance.
        let mut tiny = vec![real(1.0); 4];
        tiny[2] = Complex64::new(1.0, 1e-7);
        assert!(coefficients_are_selfdual(&tiny));

        assert!(coefficients_are_selfdual(&[]));
    }

    #[test]
    fn test_selfdual_zero_leading_coefficient() {
        assert!(coefficients_are_selfdual(&[real(0.0), real(1.0), real(0.0), real(-1.0)]));
        assert!(!coefficients_are_selfdual(&[
            real(0.0),
            real(1.0),
            Complex64::new(0.0, 1.0),
            real(-1.0),
        ]));
        assert!(coefficients_are_selfdual(&[real(0.0); 5]));

        // No common phase is removed without a leading coefficient.
        let i = Complex64::new(0.0, 1.0);
        assert!(!coefficients_are_selfdual(&[real(0.0), i, 2.0 * i, -i]));
    }

    #[test]
    fn test_selfdual_common_phase() {
        let i = Complex64::new(0.0, 1.0);
        assert!(coefficients_are_selfdual(&[i, 2.0 * i, 3.0 * i]));
    }

    #[test]
    fn test_langlands_normalized() {
        assert!(langlands_normalized(&with_kappa(&[0.5, 1.0])));
        assert!(!langlands_normalized(&with_kappa(&[0.5, 2.0])));
    }

    #[test]
    fn test_finalize() {
        let model = FunctionalEquationModel {
            coefficient_type: crate::model::CoefficientType::Integer,
            quasidegree: 1,
            kappa: vec![0.5],
            lambda: vec![real(0.5)],
            q_fe: 2.0 / PI.sqrt(),
            dirichlet_coefficients: vec![real(0.0), real(1.0), real(0.0), real(-1.0)],
            coefficient_period: 4,
            ..FunctionalEquationModel::default()
        };

        let finalized = finalize(model).unwrap();
        assert_eq!(finalized.degree, 1);
        assert_eq!(finalized.level, 4);
        assert!(finalized.selfdual);
        assert!(finalized.langlands);
        assert_eq!(finalized.mu, vec![real(1.0)]);

        assert_eq!(finalize(finalized.clone()).unwrap(), finalized);
    }

    #[test]
    fn test_finalize_rejects_structure() {
        let mut model = with_kappa(&[0.5]);
        model.quasidegree = 2;
        assert!(finalize(model).is_err());

        let mut model = with_kappa(&[0.5]);
        model.poles = vec![real(1.0)];
        assert!(finalize(model).is_err());

        let mut model = with_kappa(&[0.5]);
        model.poles_l = Some(vec![real(1.0)]);
        model.residues_l = Some(vec![]);
        assert!(finalize(model).is_err());
    }
}
