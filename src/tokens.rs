// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/tokens.rs - Numeric tokens of lcalc files.
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
 * # `tokens` Module
 *
 * Conversion between the textual numeric literals of lcalc files and typed
 * values: integers, reals, complex pairs, coefficient lines and blocks, and
 * the bracketed lists of version 2 files.
 *
 * Complex numbers appear in two spellings. Version 1 files write a pair of
 * reals separated by whitespace (`0.5 14.13`), version 2 files write a
 * parenthesized pair (`(0.5,14.13)`). Both are accepted wherever a complex
 * pair is expected.
 */

use std::str::FromStr;

use num_complex::Complex64;

use crate::error::FormatError;
use crate::model::CoefficientType;

fn split_tokens(line: &str) -> Vec<&str> {
    line.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .collect()
}

fn strip_parens(s: &str) -> &str {
    let s = s.trim();
    match s.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        Some(inner) => inner,
        None => s,
    }
}

/// Parses a line holding a single integer.
pub fn parse_int(line: &str) -> Result<i64, FormatError> {
    let s = line.trim();
    i64::from_str(s).map_err(|_| FormatError::malformed("integer", s))
}

/// Parses a line holding a single real number.
pub fn parse_float(line: &str) -> Result<f64, FormatError> {
    let s = line.trim();
    f64::from_str(s).map_err(|_| FormatError::malformed("real", s))
}

/// Parses a line holding exactly two reals, the real and imaginary parts of
/// a complex number.
pub fn parse_complex_pair(line: &str) -> Result<Complex64, FormatError> {
    let tokens = split_tokens(strip_parens(line));
    pair_from_tokens(&tokens).map_err(|_| FormatError::malformed("complex pair", line.trim()))
}

fn pair_from_tokens(tokens: &[&str]) -> Result<Complex64, FormatError> {
    match tokens {
        [re, im] => Ok(Complex64::new(parse_float(re)?, parse_float(im)?)),
        _ => Err(FormatError::malformed("complex pair", &tokens.join(" "))),
    }
}

fn coefficient_from_tokens(
    tokens: &[&str],
    coefficient_type: CoefficientType,
) -> Result<Complex64, FormatError> {
    let malformed = || FormatError::malformed("coefficient", &tokens.join(" "));
    match (coefficient_type, tokens) {
        (CoefficientType::Complex | CoefficientType::Unknown, [_, _]) => {
            pair_from_tokens(tokens).map_err(|_| malformed())
        }
        (CoefficientType::Complex, _) => Err(malformed()),
        (_, [re]) => parse_float(re)
            .map(|re| Complex64::new(re, 0.0))
            .map_err(|_| malformed()),
        _ => Err(malformed()),
    }
}

/// Parses one Dirichlet coefficient. Complex coefficient files need a pair
/// on every line, integer and real files a single number, and files of
/// unknown type may use either.
pub fn parse_coefficient_line(
    line: &str,
    coefficient_type: CoefficientType,
) -> Result<Complex64, FormatError> {
    coefficient_from_tokens(&split_tokens(strip_parens(line)), coefficient_type)
}

/// Parses the trailing coefficient block of a version 1 file, one
/// coefficient per line.
///
/// Blank lines and lines starting with `#` are skipped. Errors carry the
/// 1-based line number within the block.
pub fn parse_coefficient_block(
    block: &str,
    coefficient_type: CoefficientType,
) -> Result<Vec<Complex64>, FormatError> {
    let normalized = block.replace([',', '\t'], " ");

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b' ')
        .flexible(true)
        .has_headers(false)
        .quoting(false)
        .comment(Some(b'#'))
        .from_reader(normalized.as_bytes());

    let mut coefficients = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| FormatError::malformed("coefficient", &e.to_string()))?;
        let tokens = record.iter().filter(|t| !t.is_empty()).collect::<Vec<_>>();
        if tokens.is_empty() {
            continue;
        }

        let coefficient = coefficient_from_tokens(&tokens, coefficient_type);
        match (coefficient, record.position()) {
            (Ok(c), _) => coefficients.push(c),
            (Err(e), Some(pos)) => return Err(e.at(pos.line() as usize)),
            (Err(e), None) => return Err(e),
        }
    }

    Ok(coefficients)
}

/// Parses a single numeric literal: a bare real or a `(re,im)` pair.
pub fn parse_number(literal: &str) -> Result<Complex64, FormatError> {
    let s = literal.trim();
    if s.starts_with('(') {
        parse_complex_pair(s)
    } else {
        parse_float(s).map(|re| Complex64::new(re, 0.0))
    }
}

/// Splits the items of a bracketed list (`[a, (b,c), d]`) at the commas
/// that are not inside parentheses. A trailing comma is allowed.
pub fn split_list_items(text: &str) -> Result<Vec<&str>, FormatError> {
    let s = text.trim();
    let inner = s
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| FormatError::malformed("list", s))?;

    let mut items = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in inner.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            ',' if depth == 0 => {
                items.push(inner[start..i].trim());
                start = i + 1;
            }
            _ => (),
        }
        if depth < 0 {
            return Err(FormatError::malformed("list", s));
        }
    }
    if depth != 0 {
        return Err(FormatError::malformed("list", s));
    }

    let last = inner[start..].trim();
    if !last.is_empty() {
        items.push(last);
    }
    if items.iter().any(|item| item.is_empty()) {
        return Err(FormatError::malformed("list", s));
    }

    Ok(items)
}

/// Parses a bracketed list of numeric literals.
pub fn parse_number_list(text: &str) -> Result<Vec<Complex64>, FormatError> {
    split_list_items(text)?
        .into_iter()
        .map(parse_number)
        .collect()
}

/// Formats a real so that it parses back to the same `f64`. Integral values
/// keep a fractional part (`1.0`).
pub fn format_real(x: f64) -> String {
    format!("{:?}", x)
}

/// Formats an integral real without a fractional part (`-1`). Anything
/// else is written with [format_real] so no value is rounded away.
pub fn format_integer(x: f64) -> String {
    if x.fract() == 0.0 && x.abs() < i64::MAX as f64 {
        format!("{}", x as i64)
    } else {
        format_real(x)
    }
}

/// Formats a complex number as a version 1 pair: `re im`.
pub fn format_pair(z: Complex64) -> String {
    format!("{} {}", format_real(z.re), format_real(z.im))
}

/// Formats a complex number as a version 2 literal: `(re,im)`.
pub fn format_complex(z: Complex64) -> String {
    format!("({},{})", format_real(z.re), format_real(z.im))
}

/// Formats a complex number as a bare real when its imaginary part is zero,
/// and as `(re,im)` otherwise.
pub fn format_number(z: Complex64) -> String {
    if z.im == 0.0 {
        format_real(z.re)
    } else {
        format_complex(z)
    }
}

/// Formats a bracketed, comma-separated list of numbers.
pub fn format_number_list(values: &[Complex64]) -> String {
    let items = values.iter().map(|z| format_number(*z)).collect::<Vec<_>>();
    format!("[{}]", items.join(", "))
}
