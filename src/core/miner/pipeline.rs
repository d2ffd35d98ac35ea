//! Mining pipeline orchestration.
//!
//! Coordinates one run over an input tree:
//! 1. Validate the dataset id and input root, create the destination areas
//! 2. Walk the input tree
//! 3. Per file: store the raw blob, extract text, chunk, score, route,
//!    write zone texts (sequentially or on a worker pool)
//! 4. Accumulate records in discovery order and commit the catalog
//!
//! Failures on one file are logged and counted; they never stop the run.
//! The catalog commit is the only point where a run becomes visible.

use chrono::{DateTime, Utc};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Instant, SystemTime};

use crate::core::catalog::{validate_dataset_id, CatalogWriter};
use crate::core::config::Config;
use crate::core::error::{MineError, Result};
use crate::core::miner::chunker::Chunker;
use crate::core::miner::normalizer::TextNormalizer;
use crate::core::miner::router::{RoutingDecision, ZoneRouter};
use crate::core::miner::scorer::{LanguageTagger, RiskScorer};
use crate::core::miner::walker::FileWalker;
use crate::core::store::{ContentStore, ZoneLayout};
use crate::core::types::{
    chunk_id, doc_uid, ChunkRecord, DocumentRecord, MiningReport, RiskVector, UNDETERMINED_LANG,
};

/// Files between progress log lines
const PROGRESS_EVERY: usize = 100;

/// Records produced for one input file
#[derive(Debug)]
struct MinedFile {
    document: DocumentRecord,
    chunks: Vec<ChunkRecord>,
    newly_stored: bool,
}

/// Per-run state shared by every file
struct RunContext<'a> {
    dataset_id: &'a str,
    store: ContentStore,
    total: usize,
    processed: AtomicUsize,
}

/// Orchestrates the mining pipeline
pub struct MiningPipeline {
    walker: FileWalker,
    normalizer: TextNormalizer,
    chunker: Chunker,
    scorer: Arc<dyn RiskScorer>,
    tagger: Arc<dyn LanguageTagger>,
    router: ZoneRouter,
    layout: ZoneLayout,
    workers: usize,
}

impl fmt::Debug for MiningPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiningPipeline")
            .field("walker", &self.walker)
            .field("chunker", &self.chunker)
            .field("scorer", &self.scorer.name())
            .field("router", &self.router)
            .field("layout", &self.layout)
            .field("workers", &self.workers)
            .finish_non_exhaustive()
    }
}

impl MiningPipeline {
    /// Build a pipeline from validated configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Run configuration; validated again here
    /// * `scorer` - Risk scoring policy
    /// * `tagger` - Language tagging policy
    pub fn new(
        config: &Config,
        scorer: Arc<dyn RiskScorer>,
        tagger: Arc<dyn LanguageTagger>,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            walker: FileWalker::new(config.mining.exclude_patterns.clone())?,
            normalizer: TextNormalizer::from_config(&config.normalize),
            chunker: Chunker::from_config(&config.chunking),
            scorer,
            tagger,
            router: ZoneRouter::new(config.routing),
            layout: ZoneLayout::new(config.data_root()),
            workers: config.mining.workers.max(1),
        })
    }

    pub fn layout(&self) -> &ZoneLayout {
        &self.layout
    }

    /// Mine `input_root` into the destination tree under `dataset_id`.
    ///
    /// Startup problems (bad dataset id, missing input root, unusable
    /// destination) fail before any file is read. A catalog write
    /// failure fails the run and leaves the previous catalog in place.
    pub fn mine(&self, input_root: &Path, dataset_id: &str) -> Result<MiningReport> {
        let start = Instant::now();

        validate_dataset_id(dataset_id)?;
        if !input_root.is_dir() {
            return Err(MineError::InvalidPath(format!(
                "Input root {input_root:?} is not a directory"
            )));
        }
        self.layout.ensure_dirs()?;
        let store = ContentStore::open(self.layout.bronze_dir())?;

        tracing::info!(
            "Mining {:?} into {:?} as dataset '{}' (scorer: {}, workers: {})",
            input_root,
            self.layout.root(),
            dataset_id,
            self.scorer.name(),
            self.workers
        );

        let discovery = self.walker.collect_files(input_root)?;
        tracing::info!("Found {} files to mine", discovery.files.len());

        let ctx = RunContext {
            dataset_id,
            store,
            total: discovery.files.len(),
            processed: AtomicUsize::new(0),
        };
        let results = self.process_all(&ctx, &discovery.files);

        let mut writer = CatalogWriter::new(dataset_id, input_root, self.layout.catalog_dir());
        writer.record_skipped(discovery.walk_errors);

        let mut blobs_written = 0;
        let mut duplicate_blobs = 0;

        for (path, result) in discovery.files.iter().zip(results) {
            match result {
                Ok(mined) => {
                    if mined.newly_stored {
                        blobs_written += 1;
                    } else {
                        duplicate_blobs += 1;
                    }
                    writer.add(mined.document, mined.chunks);
                }
                Err(e) => {
                    tracing::warn!("Skipping {:?}: {}", path, e);
                    writer.record_skipped(1);
                }
            }
        }

        let documents = writer.documents().len();
        let bytes = writer.documents().iter().map(|d| d.bytes).sum();
        let chunks = writer.chunks().len();
        let quarantined = writer.documents().iter().filter(|d| d.quarantine).count();
        let skipped_files = writer.skipped_files();

        let committed = writer.commit()?;
        let duration_ms = start.elapsed().as_millis() as u64;

        tracing::info!(
            "Mining complete: {} documents ({} quarantined, {} clean), \
             {} chunks, {} skipped in {}ms",
            documents,
            quarantined,
            documents - quarantined,
            chunks,
            skipped_files,
            duration_ms
        );

        Ok(MiningReport {
            dataset_id: dataset_id.to_string(),
            source_root: input_root.to_path_buf(),
            documents,
            bytes,
            chunks,
            quarantined,
            clean: documents - quarantined,
            skipped_files,
            blobs_written,
            duplicate_blobs,
            duration_ms,
            catalog_dir: committed.dir,
        })
    }

    /// Process every file, returning results in discovery order
    fn process_all(&self, ctx: &RunContext<'_>, files: &[PathBuf]) -> Vec<Result<MinedFile>> {
        if self.workers <= 1 || files.len() <= 1 {
            return files.iter().map(|f| self.process_tracked(ctx, f)).collect();
        }

        let cursor = &AtomicUsize::new(0);
        let mut results: Vec<(usize, Result<MinedFile>)> = thread::scope(|s| {
            let handles: Vec<_> = (0..self.workers.min(files.len()))
                .map(|_| {
                    s.spawn(move || {
                        let mut local = Vec::new();
                        loop {
                            let i = cursor.fetch_add(1, Ordering::Relaxed);
                            let Some(path) = files.get(i) else {
                                break;
                            };
                            local.push((i, self.process_tracked(ctx, path)));
                        }
                        local
                    })
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
                .collect()
        });

        results.sort_by_key(|(i, _)| *i);
        results.into_iter().map(|(_, r)| r).collect()
    }

    fn process_tracked(&self, ctx: &RunContext<'_>, path: &Path) -> Result<MinedFile> {
        let result = self.process_file(ctx, path);

        let done = ctx.processed.fetch_add(1, Ordering::Relaxed) + 1;
        if done % PROGRESS_EVERY == 0 {
            tracing::info!("Progress: {}/{} files processed", done, ctx.total);
        }

        result
    }

    /// Mine a single file into its document and chunk records
    fn process_file(&self, ctx: &RunContext<'_>, path: &Path) -> Result<MinedFile> {
        let bytes = fs::read(path).map_err(|source| MineError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let metadata = fs::metadata(path).ok();

        let blob = ctx.store.put_file(path, &bytes)?;
        let uid = doc_uid(&blob.digest);

        let mut document = DocumentRecord {
            doc_uid: uid.clone(),
            dataset_id: ctx.dataset_id.to_string(),
            source_path: path.to_path_buf(),
            mime: guess_mime(path).to_string(),
            bytes: blob.size,
            checksum: blob.digest.clone(),
            created_ts: metadata
                .as_ref()
                .and_then(|m| m.created().ok())
                .map(to_utc),
            modified_ts: metadata
                .as_ref()
                .and_then(|m| m.modified().ok())
                .map(to_utc),
            title: path.file_name().map(|n| n.to_string_lossy().into_owned()),
            author: None,
            lang: UNDETERMINED_LANG.to_string(),
            charset: None,
            chunk_count: 0,
            quarantine: true,
            nsfw_score: 0.0,
            toxicity_score: 0.0,
            illicit_score: 0.0,
            pii_score: 0.0,
            risk_tags: Vec::new(),
        };

        let Some(normalized) = self.normalizer.extract(path, &bytes) else {
            let decision = RoutingDecision::non_text();
            document.risk_tags = decision.reason_tags();
            tracing::debug!("Quarantined non-text file {:?}", path);
            return Ok(MinedFile {
                document,
                chunks: Vec::new(),
                newly_stored: blob.newly_written,
            });
        };

        let spans = self.chunker.chunk(&normalized.text);
        let scores: Vec<RiskVector> = spans
            .iter()
            .map(|span| self.scorer.score(&span.text).clamped())
            .collect();
        let doc_scores = RiskVector::aggregate(&scores);
        let decision = self.router.route(&doc_scores);

        self.layout
            .write_document_text(decision.zone, &blob.digest, &normalized.text)?;

        let mut chunks = Vec::with_capacity(spans.len());
        for (idx, (span, score)) in spans.into_iter().zip(&scores).enumerate() {
            self.layout
                .write_chunk_text(decision.zone, &blob.digest, &uid, idx, &span.text)?;
            chunks.push(ChunkRecord {
                doc_uid: uid.clone(),
                chunk_id: chunk_id(&uid, idx),
                idx,
                offset_start: span.start,
                offset_end: span.end,
                lang: self.tagger.tag(&span.text),
                nsfw_score: score.nsfw,
                toxicity_score: score.toxicity,
                illicit_score: score.illicit,
                pii_score: score.pii,
                text: span.text,
            });
        }

        document.lang = self.tagger.tag(&normalized.text);
        document.charset = Some(normalized.charset);
        document.chunk_count = chunks.len();
        document.quarantine = decision.zone.is_quarantined();
        document.nsfw_score = doc_scores.nsfw;
        document.toxicity_score = doc_scores.toxicity;
        document.illicit_score = doc_scores.illicit;
        document.pii_score = doc_scores.pii;
        document.risk_tags = decision.reason_tags();

        tracing::debug!(
            "Mined {:?} ({} chunks, {})",
            path,
            document.chunk_count,
            decision.zone
        );

        Ok(MinedFile {
            document,
            chunks,
            newly_stored: blob.newly_written,
        })
    }
}

fn to_utc(time: SystemTime) -> DateTime<Utc> {
    DateTime::<Utc>::from(time)
}

/// MIME type from the file extension
pub fn guess_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "txt" | "text" | "log" => "text/plain",
        "md" | "markdown" => "text/markdown",
        "html" | "htm" => "text/html",
        "csv" => "text/csv",
        "xml" => "application/xml",
        "json" => "application/json",
        "yaml" | "yml" => "application/yaml",
        "toml" => "application/toml",
        "rtf" => "application/rtf",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "eml" => "message/rfc822",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "zip" => "application/zip",
        _ => "application/octet-stream",
    }
}
