//! Mock Line Source for Testing
//!
//! Produces a fixed list of lines, then optionally fails the way a dropped
//! upload or unreadable file would.

use std::io;

/// Line source that yields `lines` and then an error if `fail_after` is set
pub struct MockSource {
    lines: Vec<String>,
    idx: usize,
    fail_after: Option<usize>,
    failed: bool,
}

impl MockSource {
    pub fn new(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|l| l.to_string()).collect(),
            idx: 0,
            fail_after: None,
            failed: false,
        }
    }

    /// Fail once `n` lines have been produced
    pub fn failing_after(lines: &[&str], n: usize) -> Self {
        let mut source = Self::new(lines);
        source.fail_after = Some(n);
        source
    }
}

impl Iterator for MockSource {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        if self.fail_after == Some(self.idx) {
            self.failed = true;
            return Some(Err(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "upload interrupted",
            )));
        }
        let line = self.lines.get(self.idx)?.clone();
        self.idx += 1;
        Some(Ok(line))
    }
}
