// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  convert.rs - Conversion demo for lcalc functional-equation files.
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

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use lcalcfile::source::*;
use lcalcfile::v1::encode_v1;
use lcalcfile::v2::{Provenance, encode_v2};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The file to read.
    file: String,

    /// Layout of the output, 1 or 2.
    #[arg(long = "format", default_value_t = 2, value_parser = clap::value_parser!(u8).range(1..=2))]
    format: u8,

    /// Source label written into the header of a version 2 file.
    #[arg(long)]
    label: Option<String>,

    /// Host name written into the header of a version 2 file.
    #[arg(long, default_value = "localhost")]
    host: String,
}

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let raw = match RawLcalcFile::from_filename(&args.file) {
        Ok(f) => f,
        Err(error) => {
            eprintln!("Error opening file {:?}: {}", &args.file, error);
            return;
        }
    };

    let model = match raw.decode() {
        Ok(m) => m,
        Err(error) => {
            eprintln!("Error decoding file {:?}: {}", &args.file, error);
            return;
        }
    };

    let output = match args.format {
        1 => encode_v1(&model),
        _ => {
            let now = chrono::Utc::now();
            let provenance = Provenance {
                source_label: args.label.unwrap_or_else(|| args.file.clone()),
                generated_at: now.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
                host: args.host,
            };
            encode_v2(&model, &provenance)
        }
    };

    print!("{}", output);
}
