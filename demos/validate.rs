// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  validate.rs - Batch validation demo for lcalc functional-equation files.
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

use std::process::ExitCode;
use std::thread;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use lcalcfile::model::FunctionalEquationModel;
use lcalcfile::source::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The files to check.
    #[arg(required = true)]
    files: Vec<String>,

    /// Also print the decoded model as JSON.
    #[arg(long)]
    json: bool,
}

fn check(filename: &str) -> Result<FunctionalEquationModel, String> {
    let raw = RawLcalcFile::from_filename(filename).map_err(|e| e.to_string())?;
    raw.decode().map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let results: Vec<_> = thread::scope(|s| {
        let workers: Vec<_> = args
            .files
            .iter()
            .map(|file| s.spawn(move || check(file)))
            .collect();
        workers
            .into_iter()
            .map(|w| w.join().unwrap_or_else(|_| Err("worker panicked".to_string())))
            .collect()
    });

    let mut failures = 0;
    for (file, result) in args.files.iter().zip(results) {
        match result {
            Ok(model) => {
                println!(
                    "{}: degree {}, level {}, self-dual {}, langlands {}",
                    file, model.degree, model.level, model.selfdual, model.langlands
                );
                if args.json {
                    match serde_json::to_string(&model) {
                        Ok(json) => println!("{}", json),
                        Err(error) => eprintln!("Error serializing {:?}: {}", file, error),
                    }
                }
            }
            Err(error) => {
                failures += 1;
                eprintln!("{}: {}", file, error);
            }
        }
    }

    println!("{} ok, {} failed", args.files.len() - failures, failures);
    if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
