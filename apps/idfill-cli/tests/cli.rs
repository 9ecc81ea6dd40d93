use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

const ROWS: &str = "Asha Devi,1234 5678 9012,Female\n\
Ravi Kumar,9988 7766 5543,Male\n\
Sunita,1111 2222 5543,Female\n\
broken row\n";

fn idfill(state: &Path) -> Command {
    let mut cmd = Command::cargo_bin("idfill").unwrap();
    cmd.env("IDFILL_STATE_DIR", state)
        .env_remove("IDFILL_CONFIG")
        .env("RUST_LOG", "warn");
    cmd
}

fn seed(state: &Path) {
    let file = state.join("people.csv");
    std::fs::write(&file, ROWS).unwrap();
    idfill(state)
        .arg("import")
        .arg(&file)
        .arg("--batch-size")
        .arg("2")
        .assert()
        .success()
        .stdout(predicate::str::contains("3 Records Saved"))
        .stderr(predicate::str::contains("100% done"));
}

#[test]
fn status_without_data() {
    let dir = tempfile::tempdir().unwrap();
    idfill(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("No data loaded"));
}

#[test]
fn import_then_status_and_lookup() {
    let dir = tempfile::tempdir().unwrap();
    seed(dir.path());
    idfill(dir.path())
        .args(["status", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"{"state":"ready","count":3}"#));
    idfill(dir.path())
        .args(["lookup", "0000 0000 5543"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ravi Kumar\t...5543"))
        .stdout(predicate::str::contains("Sunita\t...5543"));
}

#[test]
fn lookup_rejects_non_digit_tail() {
    let dir = tempfile::tempdir().unwrap();
    idfill(dir.path())
        .args(["lookup", "12ab"])
        .assert()
        .failure();
}

#[test]
fn import_of_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    idfill(dir.path())
        .args(["import", "does-not-exist.csv", "--quiet"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does-not-exist.csv"));
}

#[test]
fn prefs_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    idfill(dir.path())
        .args(["prefs", "set", "--block", " Mohanpur "])
        .assert()
        .success();
    idfill(dir.path())
        .args(["prefs", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""block": "Mohanpur""#))
        .stdout(predicate::str::contains(r#""sub_district": """#));
}

#[test]
fn replay_fills_fixture_page() {
    let dir = tempfile::tempdir().unwrap();
    seed(dir.path());
    idfill(dir.path())
        .args(["prefs", "set", "--sub-district", "rampur", "--block", "mohan"])
        .assert()
        .success();
    let fixture = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/registration.json");
    let out = idfill(dir.path())
        .arg("replay")
        .arg(&fixture)
        .args(["--field", "uid", "--text", "1234 5678 9012", "--dump-page"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
    let outcome = &json["outcomes"][0];
    assert_eq!(outcome["outcome"], "filled");
    assert_eq!(outcome["person"]["name"], "Asha Devi");
    assert_eq!(outcome["report"]["gender_option"], 2);
    assert_eq!(outcome["report"]["sub_district_option"], 1);
    assert_eq!(outcome["report"]["block_option"], 1);
    assert_eq!(outcome["report"]["consent_clicked"], true);
    let elements = json["page"]["elements"].as_array().unwrap();
    let agree = elements.iter().find(|e| e["handle"] == "agree").unwrap();
    assert_eq!(agree["checked"], true);
}

#[test]
fn replay_with_pick_resolves_shared_suffix() {
    let dir = tempfile::tempdir().unwrap();
    seed(dir.path());
    let fixture = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/registration.json");
    let out = idfill(dir.path())
        .arg("replay")
        .arg(&fixture)
        .args(["--field", "uid", "--text", "000000005543", "--pick", "Ravi Kumar"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(json["outcomes"][0]["outcome"], "suggested");
    assert_eq!(json["outcomes"][0]["count"], 2);
    assert_eq!(json["outcomes"][1]["outcome"], "filled");
    assert_eq!(json["outcomes"][1]["report"]["gender_option"], 1);
}

#[test]
fn schema_is_written() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("schema.json");
    idfill(dir.path())
        .arg("schema")
        .arg("--out")
        .arg(&out)
        .assert()
        .success();
    assert!(std::fs::read_to_string(out).unwrap().contains("identifier_length"));
}
