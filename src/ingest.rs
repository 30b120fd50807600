//! Ingestion pipeline - token sequences into bigram counts

use std::path::Path;
use serde::Serialize;
use crate::bigram::increment_in;
use crate::dictionary::get_or_create_id_in;
use crate::storage::StoreHandle;
use crate::tokenize::{self, Tokenizer};
use crate::Result;

/// Summary of one ingested document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// Tokens in the document
    pub tokens: usize,
    /// Pairs counted
    pub bigrams: usize,
}

/// Count every consecutive pair of `tokens`, left to right.
///
/// The whole sequence is written in one transaction; on error nothing from
/// this call is kept.
pub fn ingest<S: AsRef<str>>(handle: &mut StoreHandle, tokens: &[S]) -> Result<IngestReport> {
    let mut report = IngestReport {
        tokens: tokens.len(),
        bigrams: 0,
    };
    let Some((first, rest)) = tokens.split_first() else {
        return Ok(report);
    };
    if rest.is_empty() {
        return Ok(report);
    }

    let tx = handle.conn_mut()?.transaction()?;
    let mut previous = get_or_create_id_in(&tx, first.as_ref())?;
    for token in rest {
        let current = get_or_create_id_in(&tx, token.as_ref())?;
        if increment_in(&tx, previous, current)? {
            report.bigrams += 1;
        }
        previous = current;
    }
    tx.commit()?;

    tracing::debug!("Ingested {} tokens, {} bigrams", report.tokens, report.bigrams);
    Ok(report)
}

/// Tokenize `text` and ingest the result
pub fn ingest_text(handle: &mut StoreHandle, text: &str, tokenizer: &Tokenizer) -> Result<IngestReport> {
    let tokens = tokenizer.tokenize(text);
    ingest(handle, tokens.as_slice())
}

/// Ingest a document from disk.
///
/// A missing file yields `Ok(None)`, an empty one an empty report.
pub fn ingest_file(handle: &mut StoreHandle, path: &Path, tokenizer: &Tokenizer) -> Result<Option<IngestReport>> {
    let Some(text) = tokenize::read_document(path)? else {
        tracing::debug!("No document at {}", path.display());
        return Ok(None);
    };
    ingest_text(handle, &text, tokenizer).map(Some)
}
