// Shared fixtures for CLI integration tests
//
// Each experiment lives in its own temp directory holding NetFetcher-style
// result files: a header row, then `id,pre,client,seek,read` rows.

#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub const HEADER: &str = "id,pre,client,seek,read\n";

/// `n` delays starting at `start`, `step` apart
pub fn spread(start: u64, step: u64, n: u64) -> Vec<u64> {
    (0..n).map(|i| start + i * step).collect()
}

pub struct Experiment {
    pub dir: TempDir,
}

impl Experiment {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Write a run whose column 3 + column 4 equals each delay and whose
    /// column 1 is half of it
    pub fn write_run(&self, name: &str, delays: &[u64]) -> PathBuf {
        let mut content = String::from(HEADER);
        for (i, delay) in delays.iter().enumerate() {
            let seek = delay / 4;
            let read = delay - seek;
            content.push_str(&format!(
                "{},{},{},{},{}\n",
                i,
                delay / 2,
                delay + 250,
                seek,
                read
            ));
        }
        self.write_raw(name, &content)
    }

    pub fn write_raw(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    pub fn pattern(&self, glob: &str) -> String {
        self.dir.path().join(glob).to_string_lossy().into_owned()
    }

    /// `distview` pointed at `model*.csv` / `data*.csv` with a fixed seed
    pub fn distview(&self) -> Command {
        let mut cmd = Command::cargo_bin("distview").unwrap();
        cmd.arg("-m")
            .arg(self.pattern("model*.csv"))
            .arg("-d")
            .arg(self.pattern("data*.csv"))
            .arg("--seed")
            .arg("7");
        cmd
    }
}

/// Fast model run, slow model run and a slow data run
pub fn fast_and_slow() -> Experiment {
    let exp = Experiment::new();
    exp.write_run("model_a.csv", &spread(4_000, 10, 200));
    exp.write_run("model_b.csv", &spread(9_000, 10, 200));
    exp.write_run("data_0.csv", &spread(9_000, 10, 200));
    exp
}
