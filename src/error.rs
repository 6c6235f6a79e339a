// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/error.rs - Error types for lcalc file decoding and validation.
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

use thiserror::Error;

/// Errors produced while decoding or finalizing a functional equation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    /// A token did not parse as the integer, real, or complex pair expected
    /// at its position.
    #[error("malformed {field}{}: {token:?}", at_line(.line))]
    MalformedField {
        /// 1-based line number, when known.
        line: Option<usize>,
        /// Name of the field being read.
        field: &'static str,
        /// The offending text (empty if the line is missing).
        token: String,
    },

    /// The parsed values violate an invariant of a functional equation.
    #[error("invalid functional equation: {0}")]
    InvalidFunctionalEquation(String),

    /// The coefficient type code is not one of 0, 1, 2, 3.
    #[error("unsupported coefficient type code {0}")]
    UnsupportedCoefficientType(i64),
}

impl FormatError {
    pub(crate) fn malformed(field: &'static str, token: &str) -> Self {
        Self::MalformedField {
            line: None,
            field,
            token: token.to_string(),
        }
    }

    /// Renames the field of a [FormatError::MalformedField].
    pub(crate) fn in_field(self, name: &'static str) -> Self {
        match self {
            Self::MalformedField { line, token, .. } => Self::MalformedField {
                line,
                field: name,
                token,
            },
            other => other,
        }
    }

    /// Moves the line number of a [FormatError::MalformedField] from a
    /// position within an embedded block to a position within the file.
    pub(crate) fn shift_line(self, first_line: usize) -> Self {
        match self {
            Self::MalformedField {
                line: Some(n),
                field,
                token,
            } => Self::MalformedField {
                line: Some(n + first_line - 1),
                field,
                token,
            },
            other => other,
        }
    }

    /// Attaches a line number to a [FormatError::MalformedField] that does
    /// not have one yet. Other variants pass through unchanged.
    pub fn at(self, line_number: usize) -> Self {
        match self {
            Self::MalformedField {
                line: None,
                field,
                token,
            } => Self::MalformedField {
                line: Some(line_number),
                field,
                token,
            },
            other => other,
        }
    }
}

fn at_line(line: &Option<usize>) -> String {
    match line {
        Some(n) => format!(" on line {}", n),
        None => String::new(),
    }
}

/// Errors produced while loading an lcalc file from a reader or the
/// filesystem.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("file is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error(transparent)]
    Format(#[from] FormatError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_display() {
        let e = FormatError::malformed("quasidegree", "x");
        assert_eq!(e.to_string(), "malformed quasidegree: \"x\"");
        assert_eq!(
            e.at(5).to_string(),
            "malformed quasidegree on line 5: \"x\""
        );
    }

    #[test]
    fn test_at_keeps_existing_line() {
        let e = FormatError::malformed("sign", "1 2 3").at(7).at(9);
        assert_eq!(
            e,
            FormatError::MalformedField {
                line: Some(7),
                field: "sign",
                token: "1 2 3".to_string(),
            }
        );
    }
}
