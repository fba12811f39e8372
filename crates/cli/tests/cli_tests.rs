// End-to-end tests for the `rollcall` binary.
// Run with: cargo test -p rollcall-cli --test cli_tests

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const OLD: &str = "\
bioguide_id,title,state,district,in_office,party
S000148,Sen,NY,Senior Seat,1,D
G000555,Sen,NY,Junior Seat,1,D
Y000033,Rep,AK,0,1,R
";

const NEW: &str = "\
bioguide_id,title,state,district,in_office,party,twitter_id
S000148,Sen,NY,Senior Seat,1,D,SenSchumer
G000555,Sen,NY,Junior Seat,1,D,SenGillibrand
Y000033,Rep,AK,0,1,I,
Z999999,Rep,NY,9,1,D,newcomer
";

fn rollcall() -> Command {
    Command::new(env!("CARGO_BIN_EXE_rollcall"))
}

fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    path
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

// -------------------------------------------------------------------------
// reconcile
// -------------------------------------------------------------------------

#[test]
fn reconcile_reports_and_rewrites_without_approvals() {
    let dir = tempfile::tempdir().unwrap();
    let old = write(dir.path(), "old.csv", OLD);
    let new = write(dir.path(), "new.csv", NEW);

    let out = rollcall().arg("reconcile").arg(&old).arg(&new).output().unwrap();
    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));

    let text = stdout(&out);
    assert!(text.contains("+ Z999999"));
    assert!(text.contains("+ column twitter_id (not approved)"));
    assert!(text.contains("~ Y000033 party: \"R\" -> \"I\" (not approved)"));

    // Rewritten sorted by identifier, values untouched.
    let written = std::fs::read_to_string(&old).unwrap();
    let first_ids: Vec<&str> = written.lines().skip(1).map(|l| &l[..7]).collect();
    assert_eq!(first_ids, vec!["G000555", "S000148", "Y000033"]);
    assert!(written.contains("Y000033,Rep,AK,0,1,R"));
}

#[test]
fn reconcile_applies_approved_attributes() {
    let dir = tempfile::tempdir().unwrap();
    let old = write(dir.path(), "old.csv", OLD);
    let new = write(dir.path(), "new.csv", NEW);

    let out = rollcall()
        .arg("reconcile")
        .arg(&old)
        .arg(&new)
        .args(["--approve", "party,twitter_id"])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));

    let written = std::fs::read_to_string(&old).unwrap();
    let mut lines = written.lines();
    assert_eq!(lines.next(), Some("bioguide_id,title,state,district,in_office,party,twitter_id"));
    assert!(written.contains("S000148,Sen,NY,Senior Seat,1,D,SenSchumer"));
    assert!(written.contains("Y000033,Rep,AK,0,1,I,"));
    assert!(!written.contains("Z999999"));
}

#[test]
fn reconcile_json_report() {
    let dir = tempfile::tempdir().unwrap();
    let old = write(dir.path(), "old.csv", OLD);
    let new = write(dir.path(), "new.csv", NEW);
    let report_path = dir.path().join("report.json");

    let out = rollcall()
        .arg("reconcile")
        .arg(&old)
        .arg(&new)
        .arg("--json")
        .arg("--output")
        .arg(&report_path)
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));

    let json: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(json["new_identifiers"][0], "Z999999");
    assert_eq!(json["new_attributes"][0], "twitter_id");
    assert_eq!(json["changed"]["Y000033"][0]["new"], "I");
    assert_eq!(json["applied_edits"], 0);

    let on_disk: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(on_disk["new_identifiers"], json["new_identifiers"]);
}

#[test]
fn reconcile_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let old = write(dir.path(), "old.csv", OLD);
    write(dir.path(), "new.csv", NEW);
    let config = write(
        dir.path(),
        "rollcall.toml",
        "old = \"old.csv\"\nnew = \"new.csv\"\napprove = [\"party\"]\n",
    );

    let out = rollcall().arg("reconcile").arg("--config").arg(&config).output().unwrap();
    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));

    let written = std::fs::read_to_string(&old).unwrap();
    assert!(written.contains("Y000033,Rep,AK,0,1,I"));
    assert!(!written.contains("twitter_id"));
}

#[test]
fn reconcile_missing_id_column_is_format_error() {
    let dir = tempfile::tempdir().unwrap();
    let old = write(dir.path(), "old.csv", OLD);
    let new = write(dir.path(), "new.csv", "name,party\nSchumer,D\n");
    let before = std::fs::read_to_string(&old).unwrap();

    let out = rollcall().arg("reconcile").arg(&old).arg(&new).output().unwrap();
    assert_eq!(out.status.code(), Some(3));
    assert!(stderr(&out).contains("bioguide_id"));
    assert_eq!(std::fs::read_to_string(&old).unwrap(), before);
}

#[test]
fn reconcile_without_inputs_is_usage_error() {
    let out = rollcall().arg("reconcile").output().unwrap();
    assert_eq!(out.status.code(), Some(2));
    assert!(stderr(&out).contains("hint:"));
}

#[test]
fn reconcile_rejects_duplicates_on_request() {
    let dir = tempfile::tempdir().unwrap();
    let old = write(dir.path(), "old.csv", "bioguide_id,party\nA000001,D\nA000001,R\n");
    let new = write(dir.path(), "new.csv", "bioguide_id,party\nA000001,D\n");

    let out = rollcall()
        .arg("reconcile")
        .arg(&old)
        .arg(&new)
        .arg("--reject-duplicates")
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(3));
    assert!(stderr(&out).contains("duplicate identifier"));
}

// -------------------------------------------------------------------------
// check / find / bioguide / validate
// -------------------------------------------------------------------------

#[test]
fn check_reports_issues() {
    let dir = tempfile::tempdir().unwrap();
    let roster = write(dir.path(), "old.csv", OLD);

    let out = rollcall().arg("check").arg(&roster).output().unwrap();
    // No delegates in this roster.
    assert_eq!(out.status.code(), Some(6));
    assert!(stdout(&out).contains("missing delegates from:"));
}

#[test]
fn find_by_clause() {
    let dir = tempfile::tempdir().unwrap();
    let roster = write(dir.path(), "old.csv", OLD);

    let out = rollcall()
        .arg("find")
        .arg(&roster)
        .args(["--where", "state=NY", "--where", "title=Sen", "--all"])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));
    let text = stdout(&out);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("G000555,"));
    assert!(lines[2].starts_with("S000148,"));

    let out = rollcall()
        .arg("find")
        .arg(&roster)
        .args(["--where", "state=TX"])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(7));

    let out = rollcall()
        .arg("find")
        .arg(&roster)
        .args(["--where", "state"])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn bioguide_lists_max_ids() {
    let dir = tempfile::tempdir().unwrap();
    let roster = write(dir.path(), "old.csv", OLD);

    let out = rollcall().arg("bioguide").arg(&roster).output().unwrap();
    assert_eq!(out.status.code(), Some(0));
    let text = stdout(&out);
    assert!(text.contains("S  S000148  next S000149"));
    assert!(text.contains("Q  Q000022  next Q000023"));
}

#[test]
fn validate_config() {
    let dir = tempfile::tempdir().unwrap();
    let good = write(dir.path(), "good.toml", "approve = [\"party\"]\n");
    let bad = write(dir.path(), "bad.toml", "approve = [\"bioguide_id\"]\n");

    let out = rollcall().arg("validate").arg(&good).output().unwrap();
    assert_eq!(out.status.code(), Some(0));

    let out = rollcall().arg("validate").arg(&bad).output().unwrap();
    assert_eq!(out.status.code(), Some(5));
}
