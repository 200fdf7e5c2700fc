use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

const VALID_TABLE: &str = "\
siteName,siteURL,username,password,navHelper
Acme,https://acme.test,u,p,download latest invoice
Globex,https://globex.test,admin,hunter2,download the bill
";

const MISSING_PASSWORD_TABLE: &str = "\
siteName,siteURL,username,password,navHelper
Acme,https://acme.test,u,,download latest invoice
";

fn write_table(dir: &tempfile::TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("source.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

#[test]
fn test_check_accepts_valid_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_table(&dir, VALID_TABLE);

    Command::cargo_bin("billfetch")
        .unwrap()
        .arg("check")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 task(s)"));
}

#[test]
fn test_check_reports_row_and_field_on_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_table(&dir, MISSING_PASSWORD_TABLE);

    Command::cargo_bin("billfetch")
        .unwrap()
        .arg("check")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Row 2"))
        .stderr(predicate::str::contains("password"));
}

#[test]
fn test_check_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();

    Command::cargo_bin("billfetch")
        .unwrap()
        .arg("check")
        .arg(dir.path().join("nope.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_check_rejects_duplicate_site_names() {
    let dir = tempfile::tempdir().unwrap();
    let table = "\
siteName,siteURL,username,password,navHelper
Acme,https://acme.test,u,p,download latest invoice
Acme,https://other.test,u,p,download latest invoice
";
    let path = write_table(&dir, table);

    Command::cargo_bin("billfetch")
        .unwrap()
        .arg("check")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("duplicate site name"));
}
