use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::config::IndexConfig;
use crate::error::{Result, TagsError};
use crate::indexer::cursor::{CompilerFlags, DiagnosticCategory, ParseBackend};
use crate::indexer::diagnostics::MissingFileSet;
use crate::indexer::parser::Parser;
use crate::indexer::progress::IndexingProgress;
use crate::indexer::source::SourceContents;
use crate::indexer::visitor::definitions;
use crate::indexer::walker::{FileWalker, SourceFileFilter};
use crate::languages::LanguageRegistry;
use crate::tags::{TagBuffer, TagsWriter};

/// Totals for one run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub files_indexed: usize,
    pub files_skipped: usize,
    pub tags_written: usize,
    pub bytes_written: u64,
    pub elapsed_ms: u64,
    pub missing_includes: Vec<String>,
    /// Missing includes not listed because the set was full.
    pub missing_overflow: usize,
}

/// Per-file stage of the run: parse, collect definitions, emit one section.
struct FileIndexer<W: Write, B: ParseBackend> {
    writer: TagsWriter<W>,
    buffer: TagBuffer,
    missing: MissingFileSet,
    backend: B,
    flags: CompilerFlags,
    progress: IndexingProgress,
    files_indexed: usize,
    files_skipped: usize,
}

impl<W: Write, B: ParseBackend> FileIndexer<W, B> {
    fn skip(&mut self, path: &Path, error: &TagsError) {
        warn!("Skipping {}: {}", path.display(), error);
        self.progress.inc_error();
        self.files_skipped += 1;
    }

    /// Returns `Ok(false)` when the file was skipped. Only buffer allocation and
    /// output failures are returned as errors.
    fn index_file(&mut self, path: &Path) -> Result<bool> {
        self.progress.tick();

        let contents = match SourceContents::open(path) {
            Ok(contents) => contents,
            Err(e) => {
                self.skip(path, &e);
                return Ok(false);
            }
        };

        let unit = match self.backend.parse(path, &contents, &self.flags) {
            Ok(unit) => unit,
            Err(e) => {
                self.skip(path, &e);
                return Ok(false);
            }
        };

        self.missing.record_diagnostics(unit.diagnostics());
        for diagnostic in unit.diagnostics() {
            if diagnostic.category == DiagnosticCategory::ParseIssue {
                debug!("{}: {}", path.display(), diagnostic.spelling);
            }
        }

        let mut count = 0;
        for record in definitions(unit.as_ref(), &contents) {
            self.buffer.append_record(&record)?;
            count += 1;
        }
        drop(unit);

        self.writer.emit_section(path, &mut self.buffer)?;
        self.progress.add_tags(count);
        self.files_indexed += 1;
        debug!("Indexed {} ({} tags)", path.display(), count);
        Ok(true)
    }
}

/// State for one indexing run.
///
/// Built once, visited for each root path and then finished, which flushes the
/// output and reports the totals.
pub struct RunContext<W: Write, B: ParseBackend> {
    walker: FileWalker,
    indexer: FileIndexer<W, B>,
}

impl<W: Write, B: ParseBackend> RunContext<W, B> {
    pub fn new(
        output: W,
        backend: B,
        flags: CompilerFlags,
        filter: SourceFileFilter,
        progress: IndexingProgress,
    ) -> Self {
        Self {
            walker: FileWalker::new(filter),
            indexer: FileIndexer {
                writer: TagsWriter::new(output),
                buffer: TagBuffer::new(),
                missing: MissingFileSet::new(),
                backend,
                flags,
                progress,
                files_indexed: 0,
                files_skipped: 0,
            },
        }
    }

    /// Indexes every source file under `root`, or `root` itself if it is one.
    pub fn visit(&mut self, root: &Path) -> Result<()> {
        debug!("Visiting {}", root.display());
        for path in self.walker.walk(root) {
            self.indexer.index_file(&path)?;
        }
        Ok(())
    }

    /// Indexes a single file without consulting the source filter.
    pub fn index_file(&mut self, path: &Path) -> Result<bool> {
        self.indexer.index_file(path)
    }

    pub fn missing_includes(&self) -> &MissingFileSet {
        &self.indexer.missing
    }

    pub fn finish(self) -> Result<(RunSummary, W)> {
        let mut indexer = self.indexer;
        indexer.progress.finish();
        indexer.writer.flush()?;

        let snapshot = indexer.progress.snapshot();
        let summary = RunSummary {
            files_indexed: indexer.files_indexed,
            files_skipped: indexer.files_skipped,
            tags_written: snapshot.tags_extracted,
            bytes_written: indexer.writer.bytes_written(),
            elapsed_ms: snapshot.elapsed_ms,
            missing_includes: indexer.missing.files().to_vec(),
            missing_overflow: indexer.missing.overflow(),
        };
        info!(
            "Indexed {} files ({} skipped), {} tags in {}ms",
            summary.files_indexed, summary.files_skipped, summary.tags_written, summary.elapsed_ms
        );
        Ok((summary, indexer.writer.into_inner()))
    }
}

/// Runs a complete indexing pass as described by `config`.
///
/// Options are validated before the output file is created, so an invalid
/// configuration leaves no TAGS file behind.
pub fn run(config: &IndexConfig) -> Result<RunSummary> {
    let registry = LanguageRegistry::new();
    let flags = config.compiler_flags(&registry)?;
    let filter = config.source_filter()?;

    let file = File::create(&config.output).map_err(|source| TagsError::Output {
        path: config.output.clone(),
        source,
    })?;

    let mut ctx = RunContext::new(
        BufWriter::new(file),
        Parser::new(registry),
        flags,
        filter,
        IndexingProgress::new(config.quiet),
    );
    for root in &config.roots {
        ctx.visit(root)?;
    }

    let (summary, _) = ctx.finish()?;
    Ok(summary)
}
