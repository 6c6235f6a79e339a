// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  tests/properties.rs - Cross-module tests for lcalc file handling.
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

use std::f64::consts::PI;
use std::io::Write;

use flate2::write::GzEncoder;
use num_complex::Complex64;
use rust_decimal::Decimal;
use tempfile::NamedTempFile;

use lcalcfile::source::{Compression, RawLcalcFile, Version};
use lcalcfile::v1::{decode_v1, encode_v1};
use lcalcfile::v2::{Provenance, decode_v2, encode_v2};
use lcalcfile::{
    CoefficientType, FormatError, FunctionalEquationModel, Origin, Provider, ProviderData,
};

fn real(x: f64) -> Complex64 {
    Complex64::new(x, 0.0)
}

fn zeta() -> FunctionalEquationModel {
    let data = ProviderData {
        coefficient_type: CoefficientType::Integer,
        quasidegree: 1,
        kappa: vec![0.5],
        lambda: vec![real(0.0)],
        q_fe: 1.0 / PI.sqrt(),
        sign: real(1.0),
        poles: vec![real(0.0), real(1.0)],
        residues: vec![real(-1.0), real(1.0)],
        dirichlet_coefficients: vec![real(1.0); 20],
        coefficient_period: 0,
    };
    FunctionalEquationModel::from_provider(Provider::RiemannZeta, data).unwrap()
}

fn character_mod_4() -> FunctionalEquationModel {
    let data = ProviderData {
        coefficient_type: CoefficientType::Integer,
        quasidegree: 1,
        kappa: vec![0.5],
        lambda: vec![real(0.5)],
        q_fe: 2.0 / PI.sqrt(),
        sign: real(1.0),
        dirichlet_coefficients: vec![real(0.0), real(1.0), real(0.0), real(-1.0)],
        coefficient_period: 4,
        ..ProviderData::default()
    };
    FunctionalEquationModel::from_provider(
        Provider::DirichletCharacter {
            modulus: 4,
            number: 3,
        },
        data,
    )
    .unwrap()
}

fn twisted() -> FunctionalEquationModel {
    let data = ProviderData {
        coefficient_type: CoefficientType::Complex,
        quasidegree: 2,
        kappa: vec![0.5, 1.0],
        lambda: vec![real(0.0), Complex64::new(0.5, 2.25)],
        q_fe: 0.75,
        sign: Complex64::new(0.6, -0.8),
        poles: vec![real(1.0)],
        residues: vec![Complex64::new(0.5, 0.5)],
        dirichlet_coefficients: vec![
            real(1.0),
            Complex64::new(0.25, 1.5),
            Complex64::new(-1.0, -0.5),
            real(0.125),
        ],
        ..ProviderData::default()
    };
    FunctionalEquationModel::from_provider(
        Provider::MaassForm {
            id: "twisted".to_string(),
        },
        data,
    )
    .unwrap()
}

fn with_gamma(kappa: Vec<f64>) -> FunctionalEquationModel {
    FunctionalEquationModel {
        quasidegree: kappa.len(),
        lambda: vec![real(0.0); kappa.len()],
        kappa,
        q_fe: 1.0,
        dirichlet_coefficients: vec![real(1.0)],
        ..FunctionalEquationModel::default()
    }
}

fn provenance() -> Provenance {
    Provenance {
        source_label: "http://www.lmfdb.org/L/Character/Dirichlet/4/3/?download".to_string(),
        generated_at: "Sat Oct 17 12:00:00 2026".to_string(),
        host: "localhost".to_string(),
    }
}

#[test]
fn dirichlet_character_scenario() {
    let model = character_mod_4();
    assert_eq!(model.degree, 1);
    assert_eq!(model.level, 4);
    assert!(model.selfdual);
    assert!(model.langlands);
    assert_eq!(model.mu, vec![real(1.0)]);
}

#[test]
fn zeta_level() {
    let model = zeta();
    assert_eq!(model.degree, 1);
    assert_eq!(model.level, 1);
    assert!(model.selfdual);
}

#[test]
fn degree_of_gamma_factors() {
    let cases = [
        (vec![0.5], 1),
        (vec![1.0], 2),
        (vec![0.5, 0.5], 2),
        (vec![0.5, 1.0], 3),
        (vec![1.0, 1.0, 0.5], 5),
    ];
    for (kappa, degree) in cases {
        let model = with_gamma(kappa).finalize().unwrap();
        assert_eq!(model.degree, degree);
    }

    assert!(matches!(
        with_gamma(vec![0.3]).finalize(),
        Err(FormatError::InvalidFunctionalEquation(_))
    ));
}

#[test]
fn finalize_is_idempotent() {
    for model in [zeta(), character_mod_4(), twisted()] {
        assert_eq!(model.clone().finalize().unwrap(), model);
    }
}

#[test]
fn finalize_rejects_inconsistent_models() {
    let mut model = character_mod_4();
    model.quasidegree = 2;
    assert!(matches!(
        model.finalize(),
        Err(FormatError::InvalidFunctionalEquation(_))
    ));

    let mut model = zeta();
    model.q_fe = 0.0;
    assert!(matches!(
        model.finalize(),
        Err(FormatError::InvalidFunctionalEquation(_))
    ));
}

#[test]
fn v1_round_trip() {
    for model in [zeta(), character_mod_4(), twisted()] {
        let mut decoded = decode_v1(&encode_v1(&model)).unwrap().finalize().unwrap();
        assert_eq!(decoded.origin, Origin::Generic);
        decoded.origin = model.origin.clone();
        assert_eq!(decoded, model);
    }
}

#[test]
fn round_trips_keep_imaginary_parts() {
    let i = Complex64::new(0.0, 1.0);
    let model = FunctionalEquationModel {
        quasidegree: 1,
        kappa: vec![0.5],
        lambda: vec![real(0.0)],
        q_fe: 1.0 / PI.sqrt(),
        dirichlet_coefficients: vec![i, 2.0 * i, 3.0 * i],
        ..FunctionalEquationModel::default()
    }
    .finalize()
    .unwrap();
    assert!(model.selfdual);

    let again = decode_v1(&encode_v1(&model)).unwrap().finalize().unwrap();
    assert_eq!(again, model);

    let decoded = decode_v2(&encode_v2(&model, &provenance())).unwrap();
    assert_eq!(decoded.dirichlet_coefficients, model.dirichlet_coefficients);
}

#[test]
fn selfdual_without_leading_coefficient() {
    let i = Complex64::new(0.0, 1.0);
    let model = FunctionalEquationModel {
        quasidegree: 1,
        kappa: vec![0.5],
        lambda: vec![real(0.0)],
        q_fe: 1.0,
        dirichlet_coefficients: vec![real(0.0), i, 2.0 * i, -i],
        ..FunctionalEquationModel::default()
    }
    .finalize()
    .unwrap();
    assert!(!model.selfdual);
    assert!(character_mod_4().selfdual);
}

#[test]
fn v1_malformed_input() {
    let text = encode_v1(&character_mod_4()).replace("0.5\n", "half\n");
    assert_eq!(
        decode_v1(&text).unwrap_err(),
        FormatError::MalformedField {
            line: Some(6),
            field: "kappa",
            token: "half".to_string(),
        }
    );
}

#[test]
fn v2_preserves_invariants() {
    for model in [zeta(), character_mod_4(), twisted()] {
        let decoded = decode_v2(&encode_v2(&model, &provenance())).unwrap();
        assert_eq!(decoded.degree, model.degree);
        assert_eq!(decoded.level, model.level);
        assert_eq!(decoded.selfdual, model.selfdual);
        assert_eq!(decoded.mu, model.mu);
        assert_eq!(decoded.nu, model.nu);
    }
}

#[test]
fn load_gzip_files() {
    let model = twisted();
    let texts = [
        (encode_v1(&model), Version::V1),
        (encode_v2(&model, &provenance()), Version::V2),
    ];

    for (text, version) in texts {
        let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(text.as_bytes()).unwrap();

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&encoder.finish().unwrap()).unwrap();
        file.flush().unwrap();

        let raw = RawLcalcFile::from_filename(file.path().to_str().unwrap()).unwrap();
        assert_eq!(raw.compression, Compression::Gzip);
        assert_eq!(raw.version(), version);

        let decoded = raw.decode().unwrap();
        assert_eq!(decoded.degree, 3);
        assert_eq!(decoded.level, model.level);
        assert!(!decoded.selfdual);
    }
}

#[test]
fn serde_snapshot() {
    let mut model = twisted();
    model.normalize_by = Some(Decimal::new(5, 1));
    model.unnormalized_coefficients = Some(vec![real(1.0), real(-2.0)]);
    model.poles_l = Some(vec![real(1.0)]);
    model.residues_l = Some(vec![real(0.5)]);

    let json = serde_json::to_string(&model).unwrap();
    let restored: FunctionalEquationModel = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, model);
}
