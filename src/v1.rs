// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/v1.rs - Codec for version 1 lcalc files.
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
 * # `v1` Module
 *
 * This module decodes and encodes version 1 lcalc files. These have one
 * value per line at fixed positions:
 *
 * ```text
 * 0        coefficient type (0 unknown, 1 integer, 2 real, 3 complex)
 * 1        L-function type (0 unknown)
 * 2        number of coefficients listed
 * 3        coefficient period (0 if not periodic)
 * 4        quasidegree Q
 * 5+2i     kappa[i]
 * 6+2i     lambda[i] as "re im"
 * 5+2Q     Q
 * 6+2Q     omega as "re im"
 * 7+2Q     number of poles P
 * ...      2P lines: pole, residue, pole, residue, ...
 * ...      one coefficient per line until the end of the file
 * ```
 *
 * ## Usage Example
 *
 * ```no_run
 * use lcalcfile::v1::{decode_v1, encode_v1};
 *
 * fn main() -> Result<(), Box<dyn std::error::Error>> {
 *     let text = std::fs::read_to_string("zeta.lcalc")?;
 *
 *     // Decode the file and check its functional equation
 *     let model = decode_v1(&text)?.finalize()?;
 *     println!("degree {}, level {}", model.degree, model.level);
 *
 *     // Write it back out
 *     print!("{}", encode_v1(&model));
 *
 *     Ok(())
 * }
 * ```
 */

use tracing::{debug, warn};

use crate::error::FormatError;
use crate::invariants;
use crate::model::{CoefficientType, FunctionalEquationModel};
use crate::tokens::{
    format_integer, format_pair, format_real, parse_coefficient_block, parse_complex_pair,
    parse_float, parse_int,
};

/// Lines of a file, numbered from `first` (1-based).
struct Lines<'a> {
    lines: Vec<&'a str>,
    first: usize,
}

impl<'a> Lines<'a> {
    fn split(text: &'a str, pieces: usize, first: usize) -> Self {
        Self {
            lines: text.splitn(pieces, '\n').collect(),
            first,
        }
    }

    fn number(&self, index: usize) -> usize {
        self.first + index
    }

    fn get(&self, index: usize, field: &'static str) -> Result<&'a str, FormatError> {
        self.lines
            .get(index)
            .copied()
            .ok_or(FormatError::MalformedField {
                line: Some(self.number(index)),
                field,
                token: String::new(),
            })
    }

    fn field<T>(
        &self,
        index: usize,
        field: &'static str,
        parse: fn(&str) -> Result<T, FormatError>,
    ) -> Result<T, FormatError> {
        let text = self.get(index, field)?;
        parse(text).map_err(|e| e.in_field(field).at(self.number(index)))
    }

    fn count(&self, index: usize, field: &'static str) -> Result<usize, FormatError> {
        let value = self.field(index, field, parse_int)?;
        usize::try_from(value).map_err(|_| {
            FormatError::malformed(field, &value.to_string()).at(self.number(index))
        })
    }
}

/// Decodes a version 1 lcalc file.
///
/// Gamma factors are sorted into `mu` and `nu`. `degree`, `level` and
/// `selfdual` are filled in when they can be computed and left at their
/// defaults otherwise. Only [FunctionalEquationModel::finalize] checks the
/// functional equation for consistency.
pub fn decode_v1(text: &str) -> Result<FunctionalEquationModel, FormatError> {
    // Everything after line 4 depends on the quasidegree.
    let head = Lines::split(text, 6, 1);
    let code = head.field(0, "coefficient type", parse_int)?;
    let coefficient_type = CoefficientType::from_code(code)?;
    head.field(1, "L-function type", parse_int)?;
    let declared_count = head.count(2, "coefficient count")?;
    let coefficient_period = head.count(3, "coefficient period")? as u64;
    let quasidegree = head.count(4, "quasidegree")?;

    debug!(
        ?coefficient_type,
        quasidegree, coefficient_period, "decoding version 1 header"
    );

    let fixed = quasidegree.saturating_mul(2).saturating_add(8);
    let lines = Lines::split(text, fixed.saturating_add(1), 1);

    let mut kappa = Vec::new();
    let mut lambda = Vec::new();
    for i in 0..quasidegree {
        kappa.push(lines.field(5 + 2 * i, "kappa", parse_float)?);
        lambda.push(lines.field(6 + 2 * i, "lambda", parse_complex_pair)?);
    }

    let q_fe = lines.field(5 + 2 * quasidegree, "Q", parse_float)?;
    let sign = lines.field(6 + 2 * quasidegree, "sign", parse_complex_pair)?;
    let pole_count = lines.count(7 + 2 * quasidegree, "pole count")?;

    let rest = lines.lines.get(fixed).copied().unwrap_or("");
    let rest = Lines::split(rest, pole_count.saturating_mul(2).saturating_add(1), fixed + 1);

    let mut poles = Vec::new();
    let mut residues = Vec::new();
    for i in 0..pole_count {
        poles.push(rest.field(2 * i, "pole", parse_complex_pair)?);
        residues.push(rest.field(2 * i + 1, "residue", parse_complex_pair)?);
    }

    let block_index = 2 * pole_count;
    let block = rest.lines.get(block_index).copied().unwrap_or("");
    let dirichlet_coefficients = parse_coefficient_block(block, coefficient_type)
        .map_err(|e| e.shift_line(rest.number(block_index)))?;

    if dirichlet_coefficients.len() != declared_count {
        warn!(
            declared = declared_count,
            found = dirichlet_coefficients.len(),
            "coefficient count does not match the coefficient block"
        );
    }

    let gamma = invariants::gamma_lists(&kappa, &lambda);

    let mut model = FunctionalEquationModel {
        coefficient_type,
        quasidegree,
        kappa,
        lambda,
        mu: gamma.mu,
        nu: gamma.nu,
        q_fe,
        sign,
        poles,
        residues,
        dirichlet_coefficients,
        coefficient_period,
        langlands: gamma.langlands,
        ..FunctionalEquationModel::default()
    };

    model.degree = invariants::degree(&model).unwrap_or_default();
    model.level = invariants::level(&model).unwrap_or_default();
    model.selfdual = invariants::is_selfdual(&model);

    Ok(model)
}

/// Encodes a model as a version 1 lcalc file.
///
/// Coefficients are written as `re im` pairs when the model has complex
/// coefficients or any coefficient has a nonzero imaginary part. Files of
/// unknown coefficient type keep code 0, which allows pairs. Others switch
/// to code 3. Without pairs only real parts are written, and integral
/// values of integer coefficients lose their fractional part.
pub fn encode_v1(model: &FunctionalEquationModel) -> String {
    let pairs = model.coefficient_type == CoefficientType::Complex
        || model.dirichlet_coefficients.iter().any(|a| a.im != 0.0);
    let coefficient_type = match model.coefficient_type {
        CoefficientType::Unknown => CoefficientType::Unknown,
        _ if pairs => CoefficientType::Complex,
        other => other,
    };

    let mut file = String::new();

    file.push_str(&format!("{}\n", coefficient_type.code()));
    file.push_str("0\n");
    file.push_str(&format!("{}\n", model.dirichlet_coefficients.len()));
    file.push_str(&format!("{}\n", model.coefficient_period));
    file.push_str(&format!("{}\n", model.quasidegree));

    for (kappa, lambda) in model.kappa.iter().zip(&model.lambda) {
        file.push_str(&format!("{}\n", format_real(*kappa)));
        file.push_str(&format!("{}\n", format_pair(*lambda)));
    }

    file.push_str(&format!("{}\n", format_real(model.q_fe)));
    file.push_str(&format!("{}\n", format_pair(model.sign)));

    file.push_str(&format!("{}\n", model.poles.len()));
    for (pole, residue) in model.poles.iter().zip(&model.residues) {
        file.push_str(&format!("{}\n", format_pair(*pole)));
        file.push_str(&format!("{}\n", format_pair(*residue)));
    }

    for a in &model.dirichlet_coefficients {
        let literal = match coefficient_type {
            _ if pairs => format_pair(*a),
            CoefficientType::Integer => format_integer(a.re),
            _ => format_real(a.re),
        };
        file.push_str(&literal);
        file.push('\n');
    }

    file
}
