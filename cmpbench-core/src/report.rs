//! Comparison report

use std::fmt;

/// Timing of one target's full batch
#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    pub name: String,
    /// Wall-clock seconds from batch generation to the last joined worker
    pub elapsed_time: f64,
    pub requests: usize,
    pub bytes_read: u64,
}

impl RunResult {
    pub fn new(name: impl Into<String>, elapsed_time: f64) -> Self {
        Self {
            name: name.into(),
            elapsed_time,
            requests: 0,
            bytes_read: 0,
        }
    }

    pub fn with_traffic(mut self, requests: usize, bytes_read: u64) -> Self {
        self.requests = requests;
        self.bytes_read = bytes_read;
        self
    }
}

/// Results ordered fastest first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    results: Vec<RunResult>,
}

/// Stable-sort results by ascending elapsed time
pub fn build_report(mut results: Vec<RunResult>) -> Report {
    results.sort_by(|a, b| a.elapsed_time.total_cmp(&b.elapsed_time));
    Report { results }
}

impl Report {
    pub fn results(&self) -> &[RunResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Fastest target, if any ran
    pub fn fastest(&self) -> Option<&RunResult> {
        self.results.first()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, result) in self.results.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{:>10}: {}", result.name, result.elapsed_time)?;
        }
        Ok(())
    }
}
