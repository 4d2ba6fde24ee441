use std::path::Path;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tally_core::{SourceKind, TransactionSink, UserId, UserTransaction};
use tally_extract::{Aggregator, DocumentKind, ErrorKind, ExtractConfig, ExtractError};
use tracing::Instrument;

use crate::hash::Fingerprint;
use crate::pdf::PdfBackend;
use crate::recognizer::OcrBackend;
use crate::source::TextSource;

/// One uploaded artifact and who sent it.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    /// Takes precedence over the file extension when present.
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
    pub document_kind: DocumentKind,
    pub user: UserId,
    /// Defaults to [`DocumentKind::describe`] of the file name.
    pub description: Option<String>,
}

impl Upload {
    pub fn new(
        file_name: impl Into<String>,
        bytes: Vec<u8>,
        document_kind: DocumentKind,
        user: UserId,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: None,
            bytes,
            document_kind,
            user,
            description: None,
        }
    }

    pub fn with_mime_type(mut self, mime: impl Into<String>) -> Self {
        self.mime_type = Some(mime.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn source_kind(&self) -> Option<SourceKind> {
        Self::source_kind_for(self.mime_type.as_deref(), &self.file_name)
    }

    fn source_kind_for(mime_type: Option<&str>, file_name: &str) -> Option<SourceKind> {
        match mime_type {
            Some(mime) => SourceKind::from_mime(mime),
            None => Path::new(file_name)
                .extension()
                .and_then(|e| e.to_str())
                .and_then(SourceKind::from_extension),
        }
    }
}

/// What a successful upload produced.
#[derive(Debug, Clone, Serialize)]
pub struct UploadOutcome {
    pub fingerprint: String,
    pub source_kind: SourceKind,
    pub document_date: Option<NaiveDate>,
    pub transactions: Vec<UserTransaction>,
}

/// Orchestrates: resolve source kind → acquire text → extract → normalize → commit.
pub struct UploadPipeline<O: OcrBackend, P: PdfBackend, S: TransactionSink> {
    source: Arc<TextSource<O, P>>,
    sink: S,
    config: ExtractConfig,
}

impl<O, P, S> UploadPipeline<O, P, S>
where
    O: OcrBackend + 'static,
    P: PdfBackend + 'static,
    S: TransactionSink,
{
    pub fn new(source: TextSource<O, P>, sink: S, config: ExtractConfig) -> Self {
        Self { source: Arc::new(source), sink, config }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Read a file from disk and process it as `document_kind`.
    pub async fn process_file(
        &self,
        path: &Path,
        document_kind: DocumentKind,
        user: UserId,
    ) -> Result<UploadOutcome, ExtractError> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            tracing::error!(path = %path.display(), error = %e, "could not read upload");
            ExtractError::processing(e)
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.process(Upload::new(file_name, bytes, document_kind, user)).await
    }

    pub async fn process(&self, upload: Upload) -> Result<UploadOutcome, ExtractError> {
        let fingerprint = Fingerprint::of(&upload.bytes);
        let span = tracing::info_span!(
            "upload",
            fingerprint = %fingerprint.short(),
            file = %upload.file_name,
            kind = ?upload.document_kind,
        );

        let result = self.run(upload, fingerprint).instrument(span.clone()).await;
        let _entered = span.enter();
        match &result {
            Ok(outcome) => {
                tracing::info!(transactions = outcome.transactions.len(), "upload accepted")
            }
            Err(e) => match e.kind() {
                ErrorKind::UnsupportedInput | ErrorKind::EmptyExtraction => {
                    tracing::warn!(reason = %e, "upload rejected")
                }
                ErrorKind::ProcessingFailure => {
                    tracing::error!(error = %e.detail(), "upload processing failed")
                }
            },
        }
        result
    }

    async fn run(&self, upload: Upload, fingerprint: Fingerprint) -> Result<UploadOutcome, ExtractError> {
        let Upload { file_name, mime_type, bytes, document_kind, user, description } = upload;

        // 1. Resolve which adapter can read it.
        let source_kind = Upload::source_kind_for(mime_type.as_deref(), &file_name).ok_or_else(|| {
            ExtractError::UnsupportedInput(format!("'{file_name}' is not a supported file type"))
        })?;
        if !document_kind.accepts(source_kind, &self.config) {
            return Err(ExtractError::UnsupportedInput(format!(
                "{document_kind:?} uploads cannot be read from {source_kind} files"
            )));
        }

        // 2. Acquire text off the async runtime.
        let source = Arc::clone(&self.source);
        let document = tokio::task::spawn_blocking(move || source.acquire(&bytes, source_kind))
            .await
            .map_err(ExtractError::processing)?
            .map_err(ExtractError::processing)?;

        // 3–4. Extract and normalize.
        let description = description.unwrap_or_else(|| document_kind.describe(&file_name));
        let today = Utc::now().date_naive();
        let parsed = document_kind.parse(document.text(), &description, today, &self.config)?;
        let document_date = parsed.document_date;

        // 5. Commit as one batch.
        let transactions =
            Aggregator::commit(parsed, &user, &self.sink, document_kind.empty_reason()).await?;

        Ok(UploadOutcome {
            fingerprint: fingerprint.to_hex(),
            source_kind,
            document_date,
            transactions,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
