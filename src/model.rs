// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/model.rs - In-memory model of an L-function's functional equation.
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
 * # `model` Module
 *
 * The functional equation of an L-function, together with its Dirichlet
 * coefficients. With
 *
 * ```text
 * Lambda(s) = Q^s * prod_j Gamma(kappa_j s + lambda_j) * L(s)
 * ```
 *
 * the functional equation reads `Lambda(s) = omega * conj(Lambda(1 - conj(s)))`.
 *
 * A model is created either by one of the decoders ([crate::v1],
 * [crate::v2]) or from values computed by an external coefficient provider
 * ([FunctionalEquationModel::from_provider]). Either way it has to be
 * finalized ([FunctionalEquationModel::finalize]) before its derived fields
 * can be trusted.
 */

use num_complex::Complex64;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::FormatError;
use crate::invariants;

/// Declares what kind of numbers the Dirichlet coefficients are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CoefficientType {
    #[default]
    Unknown,
    Integer,
    Real,
    Complex,
}

impl CoefficientType {
    /// Maps an lcalc coefficient type code to a [CoefficientType].
    pub fn from_code(code: i64) -> Result<Self, FormatError> {
        match code {
            0 => Ok(Self::Unknown),
            1 => Ok(Self::Integer),
            2 => Ok(Self::Real),
            3 => Ok(Self::Complex),
            _ => Err(FormatError::UnsupportedCoefficientType(code)),
        }
    }

    /// The lcalc code of this coefficient type.
    pub fn code(self) -> i64 {
        match self {
            Self::Unknown => 0,
            Self::Integer => 1,
            Self::Real => 2,
            Self::Complex => 3,
        }
    }
}

/// The kind of mathematical object an L-function was computed from.
///
/// These tags only record provenance. All object-specific computation is done
/// by the provider before the model is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Provider {
    RiemannZeta,
    EllipticCurve {
        /// Cremona label, e.g. `11a1`.
        label: String,
    },
    ModularForm {
        weight: u32,
        level: u64,
        character: u32,
        label: String,
        /// Index of the embedding of the coefficient field.
        number: u32,
    },
    DirichletCharacter {
        modulus: u64,
        number: u64,
    },
    MaassForm {
        id: String,
    },
    DedekindZeta {
        /// Number field label.
        label: String,
    },
}

/// Where a model came from.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Origin {
    /// Decoded from a functional-equation file or built by hand.
    #[default]
    Generic,
    /// Supplied by an external coefficient provider.
    Provider(Provider),
}

impl Origin {
    pub fn is_zeta(&self) -> bool {
        matches!(self, Origin::Provider(Provider::RiemannZeta))
    }
}

/// Values an external coefficient provider computes for an L-function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderData {
    pub coefficient_type: CoefficientType,
    pub quasidegree: usize,
    pub kappa: Vec<f64>,
    pub lambda: Vec<Complex64>,
    pub q_fe: f64,
    pub sign: Complex64,
    pub poles: Vec<Complex64>,
    pub residues: Vec<Complex64>,
    pub dirichlet_coefficients: Vec<Complex64>,
    pub coefficient_period: u64,
}

impl Default for ProviderData {
    fn default() -> Self {
        Self {
            coefficient_type: CoefficientType::Unknown,
            quasidegree: 0,
            kappa: Vec::new(),
            lambda: Vec::new(),
            q_fe: 0.0,
            sign: Complex64::new(1.0, 0.0),
            poles: Vec::new(),
            residues: Vec::new(),
            dirichlet_coefficients: Vec::new(),
            coefficient_period: 0,
        }
    }
}

/// The functional equation and Dirichlet coefficients of an L-function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionalEquationModel {
    pub origin: Origin,
    pub coefficient_type: CoefficientType,
    /// Number of gamma factors.
    pub quasidegree: usize,
    /// Gamma factor weights, one per gamma factor.
    pub kappa: Vec<f64>,
    /// Gamma factor shifts, one per gamma factor.
    pub lambda: Vec<Complex64>,
    /// Gamma_R shifts: `2 * lambda[i]` for every `kappa[i]` close to 1/2.
    pub mu: Vec<Complex64>,
    /// Gamma_C shifts: `lambda[i]` for every other gamma factor.
    pub nu: Vec<Complex64>,
    /// The scale factor `Q` of the functional equation.
    pub q_fe: f64,
    /// The sign `omega` of the functional equation.
    pub sign: Complex64,
    /// Simple poles of `Lambda(s)` in `Re(s) > 1/2`.
    pub poles: Vec<Complex64>,
    /// Residues of `Lambda(s)` at [Self::poles].
    pub residues: Vec<Complex64>,
    pub dirichlet_coefficients: Vec<Complex64>,
    /// 0 if the coefficients are not periodic.
    pub coefficient_period: u64,

    pub degree: u32,
    /// Approximate conductor, see [invariants::level].
    pub level: u64,
    pub selfdual: bool,
    pub langlands: bool,

    /// Poles of `L(s)` rather than `Lambda(s)`, written by the version 2
    /// encoder.
    pub poles_l: Option<Vec<Complex64>>,
    /// Residues of `L(s)` at [Self::poles_l].
    pub residues_l: Option<Vec<Complex64>>,
    /// Exponent `e` such that the listed coefficients are `a(n) * n^e`.
    pub normalize_by: Option<Decimal>,
    /// The coefficients before normalization, e.g. the integer `a(p)` of an
    /// elliptic curve.
    pub unnormalized_coefficients: Option<Vec<Complex64>>,
}

impl Default for FunctionalEquationModel {
    fn default() -> Self {
        Self {
            origin: Origin::Generic,
            coefficient_type: CoefficientType::Unknown,
            quasidegree: 0,
            kappa: Vec::new(),
            lambda: Vec::new(),
            mu: Vec::new(),
            nu: Vec::new(),
            q_fe: 0.0,
            sign: Complex64::new(1.0, 0.0),
            poles: Vec::new(),
            residues: Vec::new(),
            dirichlet_coefficients: Vec::new(),
            coefficient_period: 0,
            degree: 0,
            level: 0,
            selfdual: false,
            langlands: true,
            poles_l: None,
            residues_l: None,
            normalize_by: None,
            unnormalized_coefficients: None,
        }
    }
}

impl FunctionalEquationModel {
    /// Builds and finalizes a model from values computed by a coefficient
    /// provider.
    pub fn from_provider(provider: Provider, data: ProviderData) -> Result<Self, FormatError> {
        let model = Self {
            origin: Origin::Provider(provider),
            coefficient_type: data.coefficient_type,
            quasidegree: data.quasidegree,
            kappa: data.kappa,
            lambda: data.lambda,
            q_fe: data.q_fe,
            sign: data.sign,
            poles: data.poles,
            residues: data.residues,
            dirichlet_coefficients: data.dirichlet_coefficients,
            coefficient_period: data.coefficient_period,
            ..Self::default()
        };

        model.finalize()
    }

    /// Validates the model and fills in `mu`, `nu`, `degree`, `level`,
    /// `selfdual` and `langlands`.
    pub fn finalize(self) -> Result<Self, FormatError> {
        invariants::finalize(self)
    }

    /// Whether the coefficients are those of the Riemann zeta function.
    pub fn is_zeta(&self) -> bool {
        self.origin.is_zeta()
    }

    /// Whether the version 2 encoder flags the coefficients as periodic.
    ///
    /// Zeta counts as periodic: its single listed coefficient repeats.
    pub fn is_periodic(&self) -> bool {
        self.coefficient_period != 0 || self.is_zeta()
    }

    /// TeX name of the completed L-function at `1 - s`.
    pub fn completed_dual_name(&self) -> &'static str {
        if self.selfdual {
            "\\Lambda(1-s)"
        } else {
            "\\overline{\\Lambda(1-\\overline{s})}"
        }
    }
}
