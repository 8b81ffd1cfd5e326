// ============================================================
// Layer 6 — Training Run Log
// ============================================================
// Appends one CSV row per successful training run.
//
// Why keep a run log?
//   - Compare scores across model kinds on the same catalog
//   - Spot score regressions after bulk imports
//   - Permanent record of when each artifact pair was produced
//
// Output file: modelos/runs.csv
//
// Example:
//   timestamp,model_kind,rows_total,rows_train,rows_test,r2
//   2026-08-30T14:05:11,linear,1000,800,200,0.734512
//   2026-08-30T14:09:47,random-forest,1000,800,200,0.901260

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use crate::domain::error::Result;
use crate::ml::trainer::TrainReport;

pub struct RunLog {
    csv_path: PathBuf,
}

impl RunLog {
    /// Create a RunLog in the given directory, writing the CSV
    /// header only when the file is new so runs accumulate.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        let csv_path = dir.join("runs.csv");
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "timestamp,model_kind,rows_total,rows_train,rows_test,r2")?;
        }
        Ok(Self { csv_path })
    }

    /// Append one run's outcome.
    pub fn log(&self, report: &TrainReport) -> Result<()> {
        let mut f = OpenOptions::new().append(true).open(&self.csv_path)?;
        writeln!(
            f,
            "{},{},{},{},{},{:.6}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S"),
            report.kind,
            report.rows_total,
            report.rows_train,
            report.rows_test,
            report.r2,
        )?;
        Ok(())
    }

    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::model::ModelKind;

    #[test]
    fn test_runs_accumulate_under_one_header() {
        let dir = tempfile::tempdir().unwrap();
        let report = TrainReport {
            kind: ModelKind::Linear,
            rows_total: 10,
            rows_train: 8,
            rows_test: 2,
            r2: 0.5,
        };

        let log = RunLog::new(dir.path()).unwrap();
        log.log(&report).unwrap();
        // A second RunLog over the same directory must append,
        // not rewrite the header
        let log = RunLog::new(dir.path()).unwrap();
        log.log(&report).unwrap();

        let content = fs::read_to_string(log.csv_path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("timestamp,"));
        assert!(lines[1].contains(",linear,10,8,2,"));
    }
}
