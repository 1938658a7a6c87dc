//! Parallel Batch Import
//!
//! Documents are independent, so a batch is split across rayon's pool with
//! one fresh `Importer` per document. Results come back in input order.

use rayon::prelude::*;
use tracing::warn;

use crate::config::ImportConfig;
use crate::core::encoding::decode_document;
use crate::error::{DocumentError, ImportError};
use crate::import::{import_bytes, ImportedDocument};
use crate::structure::{collect_structure, StructureCollector};

/// Import every `(id, bytes)` document in parallel
///
/// A failed document does not affect the others; its slot holds the error
/// tagged with the document id.
pub fn import_batch<I, D>(docs: &[(I, D)], config: ImportConfig) -> Vec<Result<ImportedDocument, DocumentError>>
where
    I: AsRef<str> + Sync,
    D: AsRef<[u8]> + Sync,
{
    docs.par_iter()
        .map(|(id, bytes)| {
            import_bytes(bytes.as_ref(), config).map_err(|source| {
                let document = id.as_ref().to_owned();
                warn!(document = %document, kind = source.kind(), error = %source, "document import failed");
                DocumentError { document, source }
            })
        })
        .collect()
}

/// Distinct annotation keys across a corpus
///
/// Per-document key sets are merged in input order. The first failing
/// document, in input order, fails the whole call.
pub fn discover_corpus<I, D>(docs: &[(I, D)]) -> Result<Vec<String>, DocumentError>
where
    I: AsRef<str> + Sync,
    D: AsRef<[u8]> + Sync,
{
    let collected: Vec<Result<StructureCollector, DocumentError>> = docs
        .par_iter()
        .map(|(id, bytes)| {
            collect_document(bytes.as_ref()).map_err(|source| DocumentError {
                document: id.as_ref().to_owned(),
                source,
            })
        })
        .collect();

    let mut corpus = StructureCollector::new();
    for result in collected {
        corpus.merge(result?);
    }
    Ok(corpus.into_keys())
}

fn collect_document(bytes: &[u8]) -> Result<StructureCollector, ImportError> {
    let text = decode_document(bytes)?;
    let mut collector = StructureCollector::new();
    collect_structure(&text, &mut collector)?;
    Ok(collector)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StructureError;
    use crate::import::import_str;

    fn corpus() -> Vec<(String, Vec<u8>)> {
        (0..32)
            .map(|i| {
                let xml = format!("<text n=\"{i}\"><s><w>w{i}</w></s></text>");
                (format!("doc{i}"), xml.into_bytes())
            })
            .collect()
    }

    #[test]
    fn test_batch_matches_sequential_imports() {
        let docs = corpus();
        let results = import_batch(&docs, ImportConfig::default());

        assert_eq!(results.len(), docs.len());
        for ((_, bytes), result) in docs.iter().zip(results) {
            let xml = std::str::from_utf8(bytes).unwrap();
            assert_eq!(result.unwrap(), import_str(xml, ImportConfig::default()).unwrap());
        }
    }

    #[test]
    fn test_batch_failure_is_isolated() {
        let docs = vec![
            ("good", "<a>x</a>"),
            ("bad", "<a>x</b>"),
            ("also-good", "<b>y</b>"),
        ];
        let results = import_batch(&docs, ImportConfig::default());

        assert_eq!(results[0].as_ref().unwrap().text(), "x");
        assert_eq!(
            results[1].as_ref().unwrap_err(),
            &DocumentError {
                document: "bad".into(),
                source: ImportError::MalformedStructure(StructureError::UnmatchedEnd { name: "b".into() }),
            }
        );
        assert_eq!(results[2].as_ref().unwrap().text(), "y");
    }

    #[test]
    fn test_batch_applies_config_to_every_document() {
        let docs = vec![("one", "<a><b/></a>"), ("two", "<a/>")];
        let results = import_batch(&docs, ImportConfig::new().with_max_depth(1));

        assert!(matches!(
            results[0],
            Err(DocumentError {
                source: ImportError::LimitExceeded { .. },
                ..
            })
        ));
        assert!(results[1].is_ok());
    }

    #[test]
    fn test_corpus_keys_merged_in_input_order() {
        let docs = vec![
            ("1", "<text><w pos=\"NN\">a</w></text>"),
            ("2", "<text><s id=\"1\"/><w pos=\"VB\">b</w></text>"),
            ("3", "<p/>"),
        ];
        let keys = discover_corpus(&docs).unwrap();
        assert_eq!(keys, vec!["text", "w:pos", "s:id", "p"]);

        for _ in 0..5 {
            assert_eq!(discover_corpus(&docs).unwrap(), keys);
        }
    }

    #[test]
    fn test_corpus_reports_first_failing_document() {
        let docs = vec![
            ("ok", "<a/>"),
            ("first", "<a x=1/>"),
            ("second", "<<"),
        ];
        let err = discover_corpus(&docs).unwrap_err();
        assert_eq!(err.document, "first");
        assert_eq!(err.source.kind(), "parse_error");
    }
}
