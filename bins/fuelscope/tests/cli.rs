//! End-to-end tests for the `fuelscope` binary against saved listings.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn station(brand: &str, province: &str, municipality: &str, lat: &str, lng: &str) -> Value {
    json!({
        "Rótulo": brand,
        "Provincia": province,
        "Municipio": municipality,
        "Localidad": municipality,
        "Latitud": lat,
        "Longitud (WGS84)": lng,
        "Precio Gasoleo A": "1,459",
        "Precio Gasolina 95 E5": ""
    })
}

/// Writes a listing into a fresh directory with no config files in it.
fn workspace(entries: Vec<Value>) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("listing.json");
    let body = json!({
        "Fecha": "18/10/2026 9:15:02",
        "ListaEESSPrecio": entries,
        "ResultadoConsulta": "OK"
    });
    fs::write(&path, body.to_string()).unwrap();
    (dir, path)
}

fn fuelscope(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("fuelscope").unwrap();
    cmd.current_dir(dir.path()).env_remove("RUST_LOG");
    cmd
}

fn json_stdout(cmd: &mut Command) -> Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).unwrap()
}

fn province_listing() -> Vec<Value> {
    vec![
        station("X", "A", "A-1", "40,0", "-3,0"),
        station("Y", "A", "A-2", "40,1", "-3,1"),
        station("X", "B", "B-1", "41,0", "-4,0"),
    ]
}

#[test]
fn fuel_types_come_from_the_listing() {
    let (dir, listing) = workspace(province_listing());

    let fuels = json_stdout(fuelscope(&dir).args(["--format", "json", "--input"]).arg(&listing).arg("fuel-types"));

    assert_eq!(fuels, json!(["Gasoleo A", "Gasolina 95 E5"]));
}

#[test]
fn facets_narrow_brands_by_province() {
    let (dir, listing) = workspace(province_listing());

    let facets = json_stdout(
        fuelscope(&dir)
            .args(["--format", "json", "--input"])
            .arg(&listing)
            .args(["facets", "--province", "B"]),
    );

    assert_eq!(facets["brands"], json!(["X"]));
    assert_eq!(facets["provinces"], json!(["A", "B"]));
    assert_eq!(facets["municipalities"], json!(["B-1"]));
    assert_eq!(facets["matching"], json!(1));
}

#[test]
fn list_ranks_and_limits_by_radius() {
    // 2 km, 8 km and 15 km north of the origin, plus a station without coordinates
    let (dir, listing) = workspace(vec![
        station("FAR", "A", "A-1", "0,134898", "0,0"),
        station("NEAR", "A", "A-1", "0,017986", "0,0"),
        station("UNKNOWN", "A", "A-1", "", ""),
        station("MID", "A", "A-1", "0,071946", "0,0"),
    ]);

    let stations = json_stdout(
        fuelscope(&dir)
            .args(["--format", "json", "--input"])
            .arg(&listing)
            .args(["list", "--lat", "0", "--lng", "0", "--radius", "10"]),
    );

    let brands: Vec<&str> = stations
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["brand"].as_str().unwrap())
        .collect();
    assert_eq!(brands, vec!["NEAR", "MID"]);

    let nearest = stations[0]["distance_to_user"].as_f64().unwrap();
    assert!((nearest - 2.0).abs() < 0.01, "nearest was {nearest} km");
}

#[test]
fn list_text_output_shows_a_table() {
    let (dir, listing) = workspace(province_listing());

    fuelscope(&dir)
        .arg("--input")
        .arg(&listing)
        .args(["list", "--brand", "X", "--fuel", "Gasoleo A"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Gasoleo A"))
        .stdout(predicate::str::contains("1.459 €/l"))
        .stdout(predicate::str::contains("Showing 2 of 2 stations"));
}

#[test]
fn missing_input_fails() {
    let dir = TempDir::new().unwrap();

    fuelscope(&dir)
        .args(["--input", "nope.json", "fuel-types"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("nope.json"));
}

#[test]
fn invalid_config_exits_with_config_code() {
    let (dir, listing) = workspace(province_listing());
    fs::write(dir.path().join(".fuelscope.toml"), "[search]\nradius_km = -3.0\n").unwrap();

    fuelscope(&dir)
        .arg("--input")
        .arg(&listing)
        .arg("fuel-types")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("search.radius_km"));
}

#[test]
fn invalid_config_is_reported_as_json() {
    let (dir, listing) = workspace(province_listing());
    fs::write(dir.path().join(".fuelscope.toml"), "[source]\nschema = \"xml\"\n").unwrap();

    let output = fuelscope(&dir)
        .args(["--format", "json", "--input"])
        .arg(&listing)
        .arg("fuel-types")
        .assert()
        .code(3)
        .get_output()
        .stdout
        .clone();

    let report: Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(report["code"], "E3003");
    assert_eq!(report["kind"], "invalid_config_value");
    assert_eq!(report["path"], "./.fuelscope.toml");
}
