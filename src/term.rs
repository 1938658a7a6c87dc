//! Elixir Term Conversion Utilities
//!
//! Converts imported documents and import errors to Elixir terms.

use rustler::{Atom, Encoder, Env, NewBinary, NifResult, Term};

use crate::error::{DocumentError, ImportError};
use crate::import::{AnnotationStore, AnnotationValue, ImportedDocument};

// Pre-defined atoms for efficiency - created once at compile time
rustler::atoms! {
    ok,
    error,
    text,
    structure,
    annotations,
    malformed_structure,
    parse_error,
    limit_exceeded,
}

/// `{:ok, %{text: binary, structure: [binary], annotations: %{binary => [value]}}}`
pub fn document_to_term<'a>(env: Env<'a>, doc: &ImportedDocument) -> NifResult<Term<'a>> {
    let pairs = [
        (text().encode(env), str_to_binary(env, doc.text())),
        (structure().encode(env), strings_to_term(env, &doc.structure)),
        (annotations().encode(env), annotations_to_term(env, &doc.annotations)?),
    ];
    let map = Term::map_from_pairs(env, &pairs)?;
    Ok((ok(), map).encode(env))
}

/// Annotation key to list of values
///
/// Spans become `{{start, depth}, {end, depth}}`, attribute values binaries.
pub fn annotations_to_term<'a>(env: Env<'a>, store: &AnnotationStore) -> NifResult<Term<'a>> {
    let mut pairs: Vec<(Term, Term)> = Vec::with_capacity(store.len());

    for (key, values) in store.iter() {
        let mut list = Term::list_new_empty(env);
        for value in values.iter().rev() {
            list = list.list_prepend(value_to_term(env, value));
        }
        pairs.push((str_to_binary(env, key), list));
    }

    Term::map_from_pairs(env, &pairs)
}

fn value_to_term<'a>(env: Env<'a>, value: &AnnotationValue) -> Term<'a> {
    match value {
        AnnotationValue::Span(span) => (
            (span.start.offset, span.start.depth),
            (span.end.offset, span.end.depth),
        )
            .encode(env),
        AnnotationValue::Attribute(value) => str_to_binary(env, value),
    }
}

/// `{:ok, [binary]}` for a list of keys
pub fn keys_to_term<'a>(env: Env<'a>, keys: &[String]) -> Term<'a> {
    (ok(), strings_to_term(env, keys)).encode(env)
}

/// `{:error, {kind, message}}`
pub fn error_to_term<'a>(env: Env<'a>, err: &ImportError) -> Term<'a> {
    (error(), (kind_atom(err), str_to_binary(env, &err.to_string()))).encode(env)
}

/// Like `error_to_term`, with the document id in the message
pub fn document_error_to_term<'a>(env: Env<'a>, err: &DocumentError) -> Term<'a> {
    (error(), (kind_atom(&err.source), str_to_binary(env, &err.to_string()))).encode(env)
}

fn kind_atom(err: &ImportError) -> Atom {
    match err {
        ImportError::MalformedStructure(_) => malformed_structure(),
        ImportError::Parse(_) => parse_error(),
        ImportError::LimitExceeded { .. } => limit_exceeded(),
    }
}

fn strings_to_term<'a>(env: Env<'a>, strings: &[String]) -> Term<'a> {
    let mut list = Term::list_new_empty(env);
    for s in strings.iter().rev() {
        list = list.list_prepend(str_to_binary(env, s));
    }
    list
}

/// Convert a string to a binary term (more efficient than .encode())
#[inline]
fn str_to_binary<'a>(env: Env<'a>, s: &str) -> Term<'a> {
    let bytes = s.as_bytes();
    let mut binary = NewBinary::new(env, bytes.len());
    binary.as_mut_slice().copy_from_slice(bytes);
    binary.into()
}
