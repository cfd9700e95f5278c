// Sprint 1: Loading result files into model/data groups
//
// Integration tests for file discovery, delay type selection, per-set
// summaries and per-file load failures.

mod utils;

use predicates::prelude::*;
use utils::{fast_and_slow, spread, Experiment};

#[test]
fn test_summaries_for_each_set() {
    let exp = fast_and_slow();

    exp.distview()
        .arg("--no-match")
        .assert()
        .success()
        .stdout(predicate::str::contains("model [0]"))
        .stdout(predicate::str::contains("model_a.csv  n=200 mean=4995.0"))
        .stdout(predicate::str::contains("model [1]"))
        .stdout(predicate::str::contains("data  [0]"))
        .stdout(predicate::str::contains("data_0.csv  n=200 mean=9995.0"))
        .stdout(predicate::str::contains("vs data 0").not());
}

#[test]
fn test_default_delay_type_sums_columns_three_and_four() {
    let exp = Experiment::new();
    exp.write_run("model_a.csv", &[8_000; 10]);

    exp.distview()
        .arg("--no-match")
        .assert()
        .success()
        .stdout(predicate::str::contains("mean=8000.0"));
}

#[test]
fn test_delay_type_selects_column() {
    let exp = Experiment::new();
    exp.write_run("model_a.csv", &[8_000; 10]);

    // Column 1 holds half the delay
    exp.distview()
        .args(["--no-match", "-t", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mean=4000.0"));

    // Column 2 holds the delay plus 250us
    exp.distview()
        .args(["--no-match", "-t", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mean=8250.0"));
}

#[test]
fn test_invalid_delay_type_rejected() {
    let exp = fast_and_slow();

    exp.distview().args(["-t", "9"]).assert().failure();
}

#[test]
fn test_bad_row_fails_only_its_file() {
    let exp = Experiment::new();
    exp.write_run("model_a.csv", &spread(4_000, 10, 50));
    exp.write_raw(
        "model_bad.csv",
        "id,pre,client,seek,read\n0,1,2,3,4\n1,1,2,x,4\n2,1,2,3,4\n",
    );
    exp.write_run("data_0.csv", &spread(9_000, 10, 50));

    exp.distview()
        .arg("--no-match")
        .assert()
        .success()
        .stderr(predicate::str::contains("warning: Failed to load"))
        .stderr(predicate::str::contains("model_bad.csv"))
        .stderr(predicate::str::contains("line 3"))
        .stdout(predicate::str::contains("model [0]"))
        .stdout(predicate::str::contains("model [1]").not())
        .stdout(predicate::str::contains("model skipped:"));
}

#[test]
fn test_short_row_fails_its_file() {
    let exp = Experiment::new();
    exp.write_raw("model_short.csv", "id,pre,client,seek,read\n0,1,2\n");
    exp.write_run("data_0.csv", &spread(9_000, 10, 50));

    exp.distview()
        .arg("--no-match")
        .assert()
        .success()
        .stderr(predicate::str::contains("expected at least 5 columns, found 3"));
}

#[test]
fn test_no_matching_files_is_an_error() {
    let exp = Experiment::new();

    exp.distview()
        .assert()
        .failure()
        .stderr(predicate::str::contains("No sample sets loaded"));
}

#[test]
fn test_invalid_sample_rate_rejected() {
    let exp = fast_and_slow();

    exp.distview()
        .args(["-r", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("sample_rate must be in (0, 100]"));
}

#[test]
fn test_header_only_file_has_no_samples() {
    let exp = Experiment::new();
    exp.write_raw("model_empty.csv", "id,pre,client,seek,read\n");
    exp.write_run("data_0.csv", &spread(9_000, 10, 20));

    exp.distview()
        .arg("--no-match")
        .assert()
        .success()
        .stdout(predicate::str::contains("model_empty.csv  (no samples)"));
}
