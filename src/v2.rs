// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/v2.rs - Codec for version 2 lcalc files.
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
 * # `v2` Module
 *
 * This module encodes and decodes version 2 lcalc files: commented
 * `key = value` files that describe the functional equation with Gamma_R and
 * Gamma_C factors and list the Dirichlet coefficients at the end.
 *
 * ## Usage Example
 *
 * ```no_run
 * use lcalcfile::v1::decode_v1;
 * use lcalcfile::v2::{Provenance, encode_v2};
 *
 * fn main() -> Result<(), Box<dyn std::error::Error>> {
 *     let text = std::fs::read_to_string("11a1.lcalc")?;
 *     let model = decode_v1(&text)?.finalize()?;
 *
 *     let provenance = Provenance {
 *         source_label: "/L/EllipticCurve/Q/11a1/?download".to_string(),
 *         generated_at: "Sat Oct 17 12:00:00 2026".to_string(),
 *         host: "localhost".to_string(),
 *     };
 *     print!("{}", encode_v2(&model, &provenance));
 *
 *     Ok(())
 * }
 * ```
 */

use std::f64::consts::PI;
use std::str::FromStr;

use num_complex::Complex64;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tracing::{debug, warn};

use crate::error::FormatError;
use crate::model::{CoefficientType, FunctionalEquationModel, Origin, Provider};
use crate::tokens::{
    format_complex, format_integer, format_number_list, format_real, parse_int, parse_number,
    parse_number_list, split_list_items,
};

const RULE: &str = "##########################################################################################################";

const FUNCTIONAL_EQUATION_HELP: &str = "\
##########################################################################################################
### Specify the functional equation using the Gamma_R and Gamma_C
### notation. Let Gamma_R = pi^(-s/2) Gamma(s/2), and  Gamma_C = (2 pi)^(-s) Gamma(s).
###
### Let Lambda(s) :=
###
###                  a
###               --------'
###              '  |  |
###          s      |  |
###   sqrt(N)       |  |   Gamma_{R or C}(s + lambda_j)  L(s)
###                 |  |
###                j = 1
###
###                          ___________
###                                    _
### satisfy Lambda(s) = omega Lambda(1-s), where N is a positive integer, |omega|=1,
### Each of the Gamma factors can be a Gamma_R or Gamma_C.

### Specify the conductor. Other possible keywords: N, level.";

const POLES_HELP: &str = "\
##########################################################################################################
### Specify, as lists, the poles and residues of L(s) in Re(s)>1/2 (i.e. assumes that there are no
### poles on s=1/2). Also assumes that the poles are simple. Lines with empty lists can be omitted.";

const OPTIONAL_HELP: &str = "\
##########################################################################################################
### Optional:";

const PERIODIC_HELP: &str = "\
##########################################################################################################
### Specify the Dirichlet coefficients, whether they are periodic
### (relevant for Dirichlet L-functions), and whether to normalize them
### if needed to get a functional equation s <--> 1-s
###
### periodic should be set to either True (in the case of Dirichlet L-functions,
### for instance), or False (the default). If True, then lcalc assumes that the coefficients
### given, a[0]...a[N], specify all a[n] with a[n]=a[m] if n=m mod (N+1).
### For example, for the real character mod 4, one should,
### have periodic = True and at the bottom of this file, then specify:
### dirichlet_coefficient =[
### 0,
### 1,
### 0,
### -1
### ]
###
### Specify whether Dirichlet coefficients are periodic:";

const NORMALIZE_HELP: &str = "\
##########################################################################################################
### The default is to assume that the Dirichlet coefficients are provided
### normalized so that the functional equation is s <--> 1-s, i.e. `normalize_by'
### is set to 0 by default.
###
### Sometimes, such as for an elliptic curve L-function, it is more convenient to
### record the Dirichlet coefficients normalized differently, for example, as
### integers rather than as floating point approximations.
###
### For example, an elliptic curve L-function is assumed by lcalc to be of the
### form:
###
###     L(s) = sum (a(n)/n^(1/2)) n^(-s),
###
### i.e. to have Dirichlet coefficients a(n)/n^(1/2) rather than a(n),
### where a(p) = p+1-#E(F_p), and functional equation of the form
###
###     Lambda(s):=(sqrt(N)/(2 pi))^s Gamma(s+1/2) L(s) = omega Lambda(1-s),
###
### where omega = \\pm 1.
###
### So, the normalize_by variable is meant to allow the convenience, for example,
### of listing the a(n)'s rather than the a(n)/sqrt(n)'s.";

const COEFFICIENTS_HELP: &str = "\
##########################################################################################################
### The last entry must be the dirichlet_coefficient list, one coefficient per
### line, separated # by commas. The 0-th entry is ignored unless the Dirichlet
### coefficients are periodic. One should always include it, however, because, in
### computer languages such as python, the 0-th entry is the `first' entry of an
### array. Since this file is meant to be compatible also with python, we assume
### that the 0-th entry is also listed.
###
### Complex numbers should be entered, as usual as a pair of numbers, separated
### by a comma. If no complex numbers appear amongst the Dirichlet coefficients,
### lcalc will assume the L-function is self-dual.";

/// Where and when a file was generated. Written into the banner of a
/// version 2 file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Provenance {
    /// Path-like label of the L-function, e.g.
    /// `http://www.lmfdb.org/L/EllipticCurve/Q/11a1/?download`.
    pub source_label: String,
    pub generated_at: String,
    pub host: String,
}

/// Derives the `name` and `kind` entries of a version 2 file from a source
/// label.
///
/// The name is the part of the label after `/L/` and before `?download`,
/// without leading or trailing slashes. The kind is its first path segment,
/// or its first two segments if it has more than two.
pub fn label_name_kind(source_label: &str) -> (String, Option<String>) {
    let path = source_label
        .split_once("/L/")
        .map(|(_, after)| after)
        .unwrap_or("");
    let path = path
        .split_once("?download")
        .map(|(before, _)| before)
        .unwrap_or(path);

    let name = path.trim_matches('/').to_string();
    let segments = path.split('/').collect::<Vec<_>>();
    let kind = match segments.as_slice() {
        [first, second, _, ..] => Some(format!("{}/{}", first, second)),
        [first, _] => Some(first.to_string()),
        _ => None,
    };

    (name, kind)
}

/// Whether the coefficients have to be written as `(re,im)` literals.
fn complex_literals(model: &FunctionalEquationModel) -> bool {
    !model.selfdual
        || model.coefficient_type == CoefficientType::Complex
        || model.dirichlet_coefficients.iter().any(|a| a.im != 0.0)
}

fn coefficient_literal(model: &FunctionalEquationModel, complex: bool, a: Complex64) -> String {
    if complex {
        format_complex(a)
    } else if model.coefficient_type == CoefficientType::Integer {
        format_integer(a.re)
    } else {
        format_real(a.re)
    }
}

/// The coefficients as listed in a version 2 file: `a(n) * n^normalize_by`
/// for `n = 1, 2, ...`.
fn listed_coefficients(model: &FunctionalEquationModel) -> Vec<Complex64> {
    match (&model.normalize_by, &model.unnormalized_coefficients) {
        (Some(_), Some(unnormalized)) => unnormalized.clone(),
        (Some(exponent), None) => {
            let exponent = exponent.to_f64().unwrap_or_default();
            model
                .dirichlet_coefficients
                .iter()
                .enumerate()
                .map(|(i, a)| *a * ((i + 1) as f64).powf(exponent))
                .collect()
        }
        (None, _) => model.dirichlet_coefficients.clone(),
    }
}

fn push_coefficients(file: &mut String, model: &FunctionalEquationModel) {
    file.push_str("Dirichlet_coefficient = [\n");

    if model.is_zeta() {
        file.push_str("1    ### the Dirichlet coefficients of zeta are all 1\n]\n");
        return;
    }

    let complex = complex_literals(model);
    let mut entries = vec![("0".to_string(), Some("### set Dirichlet_coefficient[0]".to_string()))];
    for (i, a) in listed_coefficients(model).into_iter().enumerate() {
        let comment = (i < 2).then(|| format!("### set Dirichlet_coefficient[{}] ", i + 1));
        entries.push((coefficient_literal(model, complex, a), comment));
    }

    let count = entries.len();
    for (i, (literal, comment)) in entries.into_iter().enumerate() {
        file.push_str(&literal);
        match (i + 1 == count, comment) {
            (false, Some(comment)) => file.push_str(&format!(",\t\t\t{}\n", comment)),
            (false, None) => file.push_str(",\n"),
            (true, Some(comment)) => file.push_str(&format!("\t\t\t{}\n]\n", comment)),
            (true, None) => file.push_str("]\n"),
        }
    }
}

/// Encodes a finalized model as a version 2 lcalc file.
pub fn encode_v2(model: &FunctionalEquationModel, provenance: &Provenance) -> String {
    let mut file = String::new();

    file.push_str(&format!("{}\n", RULE));
    file.push_str("###\n");
    file.push_str(&format!(
        "### lcalc file for the url: {}\n",
        provenance.source_label
    ));
    file.push_str(&format!(
        "### This file assembled: {}\n",
        provenance.generated_at
    ));
    file.push_str(&format!("### on machine: {}\n", provenance.host));
    file.push_str("###\n");
    file.push_str(&format!("{}\n\n", RULE));
    file.push_str(
        "lcalcfile_version = 2    ### lcalc files should have a version number for future enhancements\n\n",
    );

    file.push_str(FUNCTIONAL_EQUATION_HELP);
    file.push_str("\n\n");
    file.push_str(&format!("conductor = {}\n\n", model.level));

    file.push_str("### Specify the sign of the functional equation.\n");
    file.push_str("### Complex numbers should be specified as:\n");
    file.push_str("### omega = (Re(omega),Im(omega)). Other possible keyword: sign\n\n");
    if model.selfdual && model.sign.im == 0.0 {
        file.push_str(&format!("omega = {}\n\n", format_real(model.sign.re)));
    } else {
        file.push_str(&format!("omega = {}\n\n", format_complex(model.sign)));
    }

    file.push_str("### Gamma_{R or C}_list lists the associated lambda_j's. Lines with empty lists can be omitted.\n\n");
    file.push_str(&format!("Gamma_R_list = {}\n", format_number_list(&model.mu)));
    file.push_str(&format!("Gamma_C_list = {}\n\n", format_number_list(&model.nu)));

    file.push_str(POLES_HELP);
    file.push_str("\n\n");
    let poles = model.poles_l.as_deref().unwrap_or_default();
    let residues = model.residues_l.as_deref().unwrap_or_default();
    file.push_str(&format!("pole_list = {}\n", format_number_list(poles)));
    file.push_str(&format!("residue_list = {}\n\n", format_number_list(residues)));

    file.push_str(OPTIONAL_HELP);
    file.push_str("\n\n");
    let (name, kind) = label_name_kind(&provenance.source_label);
    file.push_str(&format!("name = \"{}\"\n", name));
    if let Some(kind) = kind {
        file.push_str(&format!("kind = \"{}\"\n\n", kind));
    }

    file.push_str(PERIODIC_HELP);
    file.push_str("\n\n");
    if model.is_periodic() {
        file.push_str("periodic = True\n\n");
    } else {
        file.push_str("periodic = False\n\n");
    }

    file.push_str(NORMALIZE_HELP);
    file.push_str("\n\n");
    match &model.normalize_by {
        Some(exponent) => {
            file.push_str(&format!(
                "normalize_by = {}    ### floating point is also okay.\n",
                exponent
            ));
            file.push_str(&format!(
                "### Normalize, below, the n-th Dirichlet coefficient by n^({})\n\n",
                exponent
            ));
        }
        None => file.push_str("normalize_by = 0    # the default, i.e. no normalizing\n\n"),
    }

    file.push_str(COEFFICIENTS_HELP);
    file.push_str("\n\n");
    push_coefficients(&mut file, model);

    file
}

/// A `key = value` line of a version 2 file. List values may span several
/// lines and are joined.
#[derive(Debug)]
struct Assignment {
    line: usize,
    key: String,
    value: String,
}

fn bracket_depth(s: &str) -> i64 {
    s.chars().fold(0, |depth, c| match c {
        '[' => depth + 1,
        ']' => depth - 1,
        _ => depth,
    })
}

fn assignments(text: &str) -> Result<Vec<Assignment>, FormatError> {
    let mut assignments = Vec::new();
    let mut open: Option<Assignment> = None;

    for (index, raw) in text.lines().enumerate() {
        let line = raw.split_once('#').map(|(code, _)| code).unwrap_or(raw).trim();
        if line.is_empty() {
            continue;
        }

        if let Some(mut assignment) = open.take() {
            assignment.value.push(' ');
            assignment.value.push_str(line);
            if bracket_depth(&assignment.value) > 0 {
                open = Some(assignment);
            } else {
                assignments.push(assignment);
            }
            continue;
        }

        let (key, value) = line
            .split_once('=')
            .ok_or_else(|| FormatError::malformed("assignment", line).at(index + 1))?;
        let assignment = Assignment {
            line: index + 1,
            key: key.trim().to_string(),
            value: value.trim().to_string(),
        };
        if bracket_depth(&assignment.value) > 0 {
            open = Some(assignment);
        } else {
            assignments.push(assignment);
        }
    }

    match open {
        Some(assignment) => Err(FormatError::malformed("list", &assignment.value).at(assignment.line)),
        None => Ok(assignments),
    }
}

fn parse_bool(value: &str) -> Result<bool, FormatError> {
    match value {
        "True" | "true" => Ok(true),
        "False" | "false" => Ok(false),
        _ => Err(FormatError::malformed("boolean", value)),
    }
}

/// Parses a decimal (`0.5`) or a fraction (`1/2`).
fn parse_exponent(value: &str) -> Result<Decimal, FormatError> {
    let malformed = || FormatError::malformed("exponent", value);
    match value.split_once('/') {
        Some((numerator, denominator)) => {
            let numerator = Decimal::from_str(numerator.trim()).map_err(|_| malformed())?;
            let denominator = Decimal::from_str(denominator.trim()).map_err(|_| malformed())?;
            numerator.checked_div(denominator).ok_or_else(malformed)
        }
        None => Decimal::from_str(value).map_err(|_| malformed()),
    }
}

/// The values read from a version 2 file, before the functional equation is
/// reconstructed from them.
#[derive(Debug, Default)]
struct Fields {
    conductor: Option<u64>,
    omega: Option<Complex64>,
    mu: Vec<Complex64>,
    nu: Vec<Complex64>,
    poles_l: Option<Vec<Complex64>>,
    residues_l: Option<Vec<Complex64>>,
    periodic: bool,
    normalize_by: Option<Decimal>,
    coefficients: Option<Vec<String>>,
}

impl Fields {
    fn read(&mut self, assignment: &Assignment) -> Result<(), FormatError> {
        let value = assignment.value.as_str();
        match assignment.key.as_str() {
            "lcalcfile_version" => {
                let version = parse_int(value).map_err(|e| e.in_field("lcalcfile_version"))?;
                if version != 2 {
                    warn!(version, "unexpected lcalc file version");
                }
            }
            "conductor" | "N" | "level" => {
                let conductor = parse_int(value).map_err(|e| e.in_field("conductor"))?;
                let conductor = u64::try_from(conductor)
                    .map_err(|_| FormatError::malformed("conductor", value))?;
                self.conductor = Some(conductor);
            }
            "omega" | "sign" => {
                self.omega = Some(parse_number(value).map_err(|e| e.in_field("omega"))?);
            }
            "Gamma_R_list" => {
                self.mu = parse_number_list(value).map_err(|e| e.in_field("Gamma_R_list"))?;
            }
            "Gamma_C_list" => {
                self.nu = parse_number_list(value).map_err(|e| e.in_field("Gamma_C_list"))?;
            }
            "pole_list" => {
                self.poles_l = Some(parse_number_list(value).map_err(|e| e.in_field("pole_list"))?);
            }
            "residue_list" => {
                self.residues_l =
                    Some(parse_number_list(value).map_err(|e| e.in_field("residue_list"))?);
            }
            "name" | "kind" => {
                debug!(key = assignment.key.as_str(), value = value.trim_matches('"'), "label");
            }
            "periodic" => self.periodic = parse_bool(value)?,
            "normalize_by" => {
                let exponent = parse_exponent(value)?;
                self.normalize_by = (!exponent.is_zero()).then_some(exponent);
            }
            "Dirichlet_coefficient" | "dirichlet_coefficient" => {
                let items = split_list_items(value).map_err(|e| e.in_field("Dirichlet_coefficient"))?;
                self.coefficients = Some(items.into_iter().map(String::from).collect());
            }
            key => warn!(key, line = assignment.line, "ignoring unknown key"),
        }

        Ok(())
    }
}

fn missing(field: &'static str) -> FormatError {
    FormatError::MalformedField {
        line: None,
        field,
        token: String::new(),
    }
}

fn coefficient_type_of(items: &[String]) -> CoefficientType {
    if items.is_empty() {
        CoefficientType::Unknown
    } else if items.iter().any(|item| item.starts_with('(')) {
        CoefficientType::Complex
    } else if items.iter().all(|item| parse_int(item).is_ok()) {
        CoefficientType::Integer
    } else {
        CoefficientType::Real
    }
}

/// Decodes a version 2 lcalc file and finalizes the result.
///
/// The scale factor `Q` is recovered from the conductor, assuming an
/// arithmetically normalized functional equation. The `0` placeholder in
/// front of the coefficients is dropped. A coefficient list of just `[1]`
/// marked periodic is read as the Riemann zeta function.
pub fn decode_v2(text: &str) -> Result<FunctionalEquationModel, FormatError> {
    let mut fields = Fields::default();
    for assignment in assignments(text)? {
        fields
            .read(&assignment)
            .map_err(|e| e.at(assignment.line))?;
    }

    let conductor = fields.conductor.ok_or_else(|| missing("conductor"))?;
    let sign = fields.omega.ok_or_else(|| missing("omega"))?;
    let items = fields
        .coefficients
        .ok_or_else(|| missing("Dirichlet_coefficient"))?;

    let mut kappa = vec![0.5; fields.mu.len()];
    kappa.extend(vec![1.0; fields.nu.len()]);
    let mut lambda = fields.mu.iter().map(|mu| *mu / 2.0).collect::<Vec<_>>();
    lambda.extend(fields.nu.iter().copied());

    let degree = fields.mu.len() + 2 * fields.nu.len();
    let q_fe = (conductor as f64
        / (PI.powf(degree as f64) * 4f64.powf(fields.nu.len() as f64)))
    .sqrt();

    let mut model = FunctionalEquationModel {
        quasidegree: kappa.len(),
        kappa,
        lambda,
        q_fe,
        sign,
        poles_l: fields.poles_l,
        residues_l: fields.residues_l,
        ..FunctionalEquationModel::default()
    };

    if fields.periodic && items.len() == 1 && items[0] == "1" {
        model.origin = Origin::Provider(Provider::RiemannZeta);
        model.coefficient_type = CoefficientType::Integer;
        model.dirichlet_coefficients = vec![Complex64::new(1.0, 0.0)];
        return model.finalize();
    }

    let listed = items.get(1..).unwrap_or_default();
    let values = listed
        .iter()
        .map(|item| parse_number(item).map_err(|e| e.in_field("Dirichlet_coefficient")))
        .collect::<Result<Vec<_>, _>>()?;

    model.coefficient_type = coefficient_type_of(listed);
    if fields.periodic {
        model.coefficient_period = items.len() as u64;
    }

    match fields.normalize_by {
        Some(exponent) => {
            let e = exponent.to_f64().unwrap_or_default();
            model.dirichlet_coefficients = values
                .iter()
                .enumerate()
                .map(|(i, b)| *b / ((i + 1) as f64).powf(e))
                .collect();
            if model.coefficient_type == CoefficientType::Integer {
                model.coefficient_type = CoefficientType::Real;
            }
            model.normalize_by = Some(exponent);
            model.unnormalized_coefficients = Some(values);
        }
        None => model.dirichlet_coefficients = values,
    }

    model.finalize()
}
