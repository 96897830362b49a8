//! Structured extraction engine.
//!
//! Walks a [`SelectorSpec`] against a document and copies the matched text out
//! as an [`ExtractionResult`].
//!
//! Repeated groups always drop the first row matched by their `root` selector,
//! which is assumed to be a header. A table without a header row therefore
//! loses its first data row; pick a `root` selector that also matches the
//! header (or a placeholder) for such pages.

pub mod errors;
pub mod mode;
pub mod model;
pub mod normalize;

#[cfg(test)]
mod tests;

pub use errors::ExtractionError;
pub use mode::{ExtractMode, ModeKind};
pub use model::{ExtractionResult, FieldValue, Record};
pub use normalize::normalize_text;

use tracing::{debug, instrument};

use crate::{
    document::{DocumentModel, HtmlDocument},
    spec::{FieldSelector, GroupSelector, ROOT_KEY, SelectorSpec},
};

/// Rows at the start of every repeated group that are treated as headers.
const HEADER_ROWS: usize = 1;

/// A field whose selectors have all been compiled by the backend.
enum CompiledField<'s, S> {
    Scalar {
        source: &'s str,
        selector: S,
    },
    Group {
        root: S,
        columns: Vec<(&'s str, S)>,
    },
}

/// Extract every field of `spec` from `document`.
///
/// Every selector is compiled before anything is matched, so an invalid
/// selector is reported even when an earlier field would fail in strict mode.
/// Fields are independent of each other; the first failing field aborts the
/// whole extraction.
#[instrument(skip_all, fields(field_count = spec.len(), mode = ?mode))]
pub fn extract<D: DocumentModel>(
    document: &D,
    spec: &SelectorSpec,
    mode: ExtractMode,
) -> Result<ExtractionResult, ExtractionError> {
    let plan = compile_plan(document, spec)?;
    let mut result = ExtractionResult::default();

    for (name, field) in plan {
        let value = match field {
            CompiledField::Scalar { source, selector } => {
                FieldValue::Text(extract_scalar(document, name, source, &selector, mode)?)
            }
            CompiledField::Group { root, columns } => {
                FieldValue::Records(extract_group(document, name, &root, &columns, mode)?)
            }
        };
        result.insert(name.to_string(), value);
    }

    debug!("Extraction finished");
    Ok(result)
}

/// Decode `spec`, parse `html` and extract. The specification is validated
/// before the markup is looked at.
pub fn extract_bytes(
    html: &[u8],
    content_type: Option<&str>,
    spec: &[u8],
    mode: ExtractMode,
) -> Result<ExtractionResult, ExtractionError> {
    let spec = SelectorSpec::decode(spec)?;
    let document = HtmlDocument::parse(html, content_type)?;
    extract(&document, &spec, mode)
}

/// Extract from markup that is already text.
pub fn extract_html(
    html: &str,
    spec: &SelectorSpec,
    mode: ExtractMode,
) -> Result<ExtractionResult, ExtractionError> {
    extract(&HtmlDocument::parse_str(html), spec, mode)
}

fn compile_plan<'s, D: DocumentModel>(
    document: &D,
    spec: &'s SelectorSpec,
) -> Result<Vec<(&'s str, CompiledField<'s, D::Selector>)>, ExtractionError> {
    spec.fields()
        .iter()
        .map(|field| {
            let compiled = match &field.selector {
                FieldSelector::Scalar(selector) => CompiledField::Scalar {
                    source: selector.as_str(),
                    selector: compile(document, &field.name, None, selector)?,
                },
                FieldSelector::RepeatedGroup(group) => compile_group(document, &field.name, group)?,
            };
            Ok::<_, ExtractionError>((field.name.as_str(), compiled))
        })
        .collect()
}

fn compile_group<'s, D: DocumentModel>(
    document: &D,
    field: &str,
    group: &'s GroupSelector,
) -> Result<CompiledField<'s, D::Selector>, ExtractionError> {
    let root = compile(document, field, Some(ROOT_KEY), &group.root)?;
    let columns = group
        .columns
        .iter()
        .map(|column| {
            compile(document, field, Some(column.name.as_str()), &column.selector)
                .map(|compiled| (column.name.as_str(), compiled))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CompiledField::Group { root, columns })
}

fn extract_scalar<D: DocumentModel>(
    document: &D,
    field: &str,
    source: &str,
    selector: &D::Selector,
    mode: ExtractMode,
) -> Result<String, ExtractionError> {
    match document.select_first(selector, None) {
        Some(node) => Ok(normalize_text(&document.text(node))),
        None if mode.is_strict() => Err(ExtractionError::MissingRequiredField {
            field: field.to_string(),
            column: None,
            record: None,
        }),
        None => {
            debug!(field, selector = source, "Scalar selector matched nothing");
            Ok(String::new())
        }
    }
}

fn extract_group<D: DocumentModel>(
    document: &D,
    field: &str,
    root: &D::Selector,
    columns: &[(&str, D::Selector)],
    mode: ExtractMode,
) -> Result<Vec<Record>, ExtractionError> {
    let rows = document.select(root, None);
    let mut records = Vec::with_capacity(rows.len().saturating_sub(HEADER_ROWS));

    for (index, row) in rows.into_iter().skip(HEADER_ROWS).enumerate() {
        let mut record = Record::new();
        for (name, selector) in columns {
            let value = match document.select_first(selector, Some(row)) {
                Some(node) => normalize_text(&document.text(node)),
                None if mode.is_strict() => {
                    return Err(ExtractionError::MissingRequiredField {
                        field: field.to_string(),
                        column: Some(name.to_string()),
                        record: Some(index),
                    });
                }
                None => String::new(),
            };
            record.insert(name.to_string(), value);
        }
        records.push(record);
    }

    if records.is_empty() && mode.requires_records() {
        return Err(ExtractionError::NoRecordsFound {
            field: field.to_string(),
        });
    }

    debug!(field, records = records.len(), "Extracted repeated group");
    Ok(records)
}

fn compile<D: DocumentModel>(
    document: &D,
    field: &str,
    column: Option<&str>,
    selector: &str,
) -> Result<D::Selector, ExtractionError> {
    document
        .compile(selector)
        .map_err(|err| ExtractionError::SelectorEngineFailure {
            field: field.to_string(),
            column: column.map(str::to_string),
            selector: err.selector,
            reason: err.reason,
        })
}
