// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/source.rs - Loader for plain and compressed lcalc files.
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

use std::fs::File;
use std::io::BufReader;
use std::io::prelude::*;

use flate2::read::{GzDecoder, ZlibDecoder};
use tracing::trace;

use crate::error::{FormatError, LoadError};
use crate::model::FunctionalEquationModel;
use crate::v1::decode_v1;
use crate::v2::decode_v2;

/// How the bytes of a file were stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
    Zlib,
}

/// The layout of an lcalc file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    /// Fixed-position lines.
    V1,
    /// Commented `key = value` lines.
    V2,
}

fn decompress(data: &[u8]) -> Result<(Compression, Vec<u8>), std::io::Error> {
    let mut buffer = Vec::new();
    let compression = match data {
        [0x1f, 0x8b, ..] => {
            GzDecoder::new(data).read_to_end(&mut buffer)?;
            Compression::Gzip
        }
        [0x78, 0x01 | 0x5e | 0x9c | 0xda, ..] => {
            ZlibDecoder::new(data).read_to_end(&mut buffer)?;
            Compression::Zlib
        }
        _ => {
            buffer.extend_from_slice(data);
            Compression::None
        }
    };
    Ok((compression, buffer))
}

/// The text of an lcalc file, decompressed if needed.
#[derive(Debug)]
pub struct RawLcalcFile {
    pub text: String,
    pub compression: Compression,
}

impl RawLcalcFile {
    pub fn from_bytes(data: &[u8]) -> Result<Self, LoadError> {
        let (compression, buffer) = decompress(data)?;
        trace!(?compression, bytes = buffer.len(), "loaded lcalc file");

        Ok(Self {
            text: String::from_utf8(buffer)?,
            compression,
        })
    }

    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, LoadError> {
        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer)?;
        Self::from_bytes(&buffer)
    }

    pub fn from_filename(filename: &str) -> Result<Self, LoadError> {
        let file = File::open(filename)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Guesses the layout from the first line that is not blank or a
    /// comment: version 2 files start with an assignment.
    pub fn version(&self) -> Version {
        let first = self
            .text
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty() && !line.starts_with('#'));

        match first {
            Some(line) if line.contains('=') => Version::V2,
            _ => Version::V1,
        }
    }

    /// Decodes and finalizes the functional equation in this file.
    pub fn decode(&self) -> Result<FunctionalEquationModel, FormatError> {
        match self.version() {
            Version::V1 => decode_v1(&self.text)?.finalize(),
            Version::V2 => decode_v2(&self.text),
        }
    }
}
