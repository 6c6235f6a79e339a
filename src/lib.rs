// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/lib.rs - Reader and writer library for lcalc functional-equation files.
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
 * # `lcalcfile` Crate
 *
 * A library for reading, validating, and writing the functional-equation
 * files consumed by the lcalc L-function calculator.
 *
 * This crate provides a full pipeline for working with lcalc files:
 *
 * 1. [source]: Loads a file, decompressing it if needed, and picks the
 *    decoder for its layout.
 * 2. [v1] and [v2]: Convert between text and a [FunctionalEquationModel].
 * 3. [invariants]: Derives the degree, level, and self-duality of a model
 *    and checks it for consistency.
 *
 * ## Usage Example
 *
 * ```no_run
 * use lcalcfile::source::RawLcalcFile;
 * use lcalcfile::v2::{Provenance, encode_v2};
 *
 * fn main() -> Result<(), Box<dyn std::error::Error>> {
 *     // Load and decode the file
 *     let raw = RawLcalcFile::from_filename("11a1.lcalc.gz")?;
 *     let model = raw.decode()?;
 *
 *     println!(
 *         "degree {}, level {}, self-dual: {}",
 *         model.degree, model.level, model.selfdual
 *     );
 *
 *     // Write it back out in the commented layout
 *     let provenance = Provenance {
 *         source_label: "/L/EllipticCurve/Q/11.a/".to_string(),
 *         ..Provenance::default()
 *     };
 *     print!("{}", encode_v2(&model, &provenance));
 *
 *     Ok(())
 * }
 * ```
 */

pub mod error;
pub mod invariants;
pub mod model;
pub mod source;
pub mod tokens;
pub mod v1;
pub mod v2;

pub use error::{FormatError, LoadError};
pub use model::{CoefficientType, FunctionalEquationModel, Origin, Provider, ProviderData};
