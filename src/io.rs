//! Textual import and export of curves
//!
//! The export format is one breakpoint per line, two whitespace-separated
//! columns: x and the cumulative value at x, in ascending key order. It is
//! consumed by plotting tools. The import format mirrors it with the
//! stored delta in the second column, so a curve written with
//! [`write_breakpoints`] reads back identical.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use crate::tree::Curve;

/// Errors that can occur while reading or writing curve files.
#[derive(Debug, Error)]
pub enum CurveFileError {
    /// The file could not be opened or written.
    #[error("i/o error on {path}: {source}")]
    Io {
        /// Path of the offending file.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A line did not parse as two floating-point columns.
    #[error("{path}:{line}: expected two numeric columns, got {content:?}")]
    Malformed {
        /// Path of the offending file.
        path: String,
        /// 1-based line number.
        line: usize,
        /// The offending line.
        content: String,
    },
}

fn io_err(path: &Path, source: std::io::Error) -> CurveFileError {
    CurveFileError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Write `(x, cumulative value)` samples, one breakpoint per line.
///
/// If the file cannot be opened the error is returned and nothing is
/// written.
pub fn export_samples(curve: &Curve, path: &Path) -> Result<(), CurveFileError> {
    let file = File::create(path).map_err(|e| io_err(path, e))?;
    let mut out = BufWriter::new(file);
    for (x, y) in curve.to_points() {
        writeln!(out, "{x} {y}").map_err(|e| io_err(path, e))?;
    }
    out.flush().map_err(|e| io_err(path, e))?;
    tracing::info!(path = %path.display(), breakpoints = curve.len(), "exported curve");
    Ok(())
}

/// Write `(x, delta)` pairs, one breakpoint per line.
pub fn write_breakpoints(curve: &Curve, path: &Path) -> Result<(), CurveFileError> {
    let file = File::create(path).map_err(|e| io_err(path, e))?;
    let mut out = BufWriter::new(file);
    for bp in curve.to_deltas() {
        writeln!(out, "{} {}", bp.x, bp.delta_y).map_err(|e| io_err(path, e))?;
    }
    out.flush().map_err(|e| io_err(path, e))
}

/// Build a curve from a file of `x delta` lines.
///
/// Blank lines and lines starting with `#` are skipped. Malformed lines
/// are reported with their 1-based line number.
pub fn read_breakpoints(path: &Path) -> Result<Curve, CurveFileError> {
    let file = File::open(path).map_err(|e| io_err(path, e))?;
    let reader = BufReader::new(file);

    let mut curve = Curve::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| io_err(path, e))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let malformed = || CurveFileError::Malformed {
            path: path.display().to_string(),
            line: idx + 1,
            content: line.clone(),
        };
        let mut cols = trimmed.split_whitespace();
        let x: f64 = cols
            .next()
            .and_then(|c| c.parse().ok())
            .ok_or_else(malformed)?;
        let delta_y: f64 = cols
            .next()
            .and_then(|c| c.parse().ok())
            .ok_or_else(malformed)?;
        if cols.next().is_some() {
            return Err(malformed());
        }
        curve.insert(x, delta_y);
    }
    tracing::debug!(path = %path.display(), breakpoints = curve.len(), "loaded curve");
    Ok(curve)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("deltacurve-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_export_writes_cumulative_columns() {
        let mut curve = Curve::new();
        curve.insert(0.0, 2.0);
        curve.insert(3.5, -1.0);
        let path = temp_path("export.txt");

        export_samples(&curve, &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines, vec!["0 2", "3.5 1"]);
    }

    #[test]
    fn test_export_to_unwritable_path_errors() {
        let curve = Curve::new();
        let err = export_samples(&curve, Path::new("/nonexistent-dir/out.txt"));
        assert!(matches!(err, Err(CurveFileError::Io { .. })));
    }

    #[test]
    fn test_read_breakpoints_round_trips() {
        let mut curve = Curve::new();
        curve.insert(0.0, 2.0);
        curve.insert(3.5, -1.0);
        curve.insert(6.0, 2.5);
        let path = temp_path("roundtrip.txt");

        write_breakpoints(&curve, &path).unwrap();
        let loaded = read_breakpoints(&path).unwrap();
        std::fs::remove_file(&path).ok();

        for x in [0.0, 2.0, 3.5, 5.0, 6.0, 8.0] {
            assert!((loaded.eval(x) - curve.eval(x)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_read_reports_malformed_line_number() {
        let path = temp_path("malformed.txt");
        std::fs::write(&path, "0 1\n# comment\n\n2.5 oops\n").unwrap();

        let err = read_breakpoints(&path).unwrap_err();
        std::fs::remove_file(&path).ok();

        match err {
            CurveFileError::Malformed { line, .. } => assert_eq!(line, 4),
            other => panic!("unexpected error: {other}"),
        }
    }
}
