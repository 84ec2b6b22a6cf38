use std::io::{self, Write};
use std::time::Instant;

/// Counts processed files and prints a dot for each one.
///
/// Every tenth file the running count is printed after its dot. Output is best
/// effort: a closed stdout never interrupts indexing.
pub struct IndexingProgress {
    out: Option<Box<dyn Write>>,
    files_processed: usize,
    tags_extracted: usize,
    errors: usize,
    started_at: Instant,
}

pub struct ProgressSnapshot {
    pub files_processed: usize,
    pub tags_extracted: usize,
    pub errors: usize,
    pub elapsed_ms: u64,
}

impl IndexingProgress {
    pub fn new(quiet: bool) -> Self {
        let out: Option<Box<dyn Write>> = if quiet {
            None
        } else {
            Some(Box::new(io::stdout()))
        };
        Self::with_output(out)
    }

    pub fn with_output(out: Option<Box<dyn Write>>) -> Self {
        Self {
            out,
            files_processed: 0,
            tags_extracted: 0,
            errors: 0,
            started_at: Instant::now(),
        }
    }

    /// A file is about to be parsed.
    pub fn tick(&mut self) {
        self.files_processed += 1;
        let count = self.files_processed;
        if let Some(out) = self.out.as_mut() {
            let _ = write!(out, ".");
            if count % 10 == 0 {
                let _ = write!(out, "{count}");
            }
            let _ = out.flush();
        }
    }

    pub fn add_tags(&mut self, count: usize) {
        self.tags_extracted += count;
    }

    pub fn inc_error(&mut self) {
        self.errors += 1;
    }

    pub fn finish(&mut self) {
        if let Some(out) = self.out.as_mut() {
            let _ = writeln!(out);
            let _ = out.flush();
        }
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            files_processed: self.files_processed,
            tags_extracted: self.tags_extracted,
            errors: self.errors,
            elapsed_ms: self.started_at.elapsed().as_millis() as u64,
        }
    }
}
