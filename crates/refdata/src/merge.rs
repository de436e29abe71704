//! Comparison and non-destructive merge of GPU specification tables.
//!
//! The on-disk table is read as raw JSON entries so that manual entries
//! (including ones the core would not accept) survive a merge untouched.
//! Fetched entries overwrite existing ones in place; new models go after
//! the existing ones; no key is ever removed.

use serde::Serialize;

use crate::extract::CatalogSpecs;

/// GPU specification table as stored on disk, entry bodies and key order
/// kept verbatim.
pub type RawSpecTable = serde_json::Map<String, serde_json::Value>;

/// A model whose TDP changed between the current table and the fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TdpChange {
    pub model: String,
    /// `None` when the current entry has no readable `tdp_watts`.
    pub old_tdp_watts: Option<u64>,
    pub new_tdp_watts: u32,
}

/// How a fetched table differs from the current one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SpecDiff {
    pub added: Vec<(String, u32)>,
    pub updated: Vec<TdpChange>,
    pub unchanged: Vec<String>,
}

impl SpecDiff {
    pub fn has_changes(&self) -> bool {
        !self.added.is_empty() || !self.updated.is_empty()
    }
}

/// Classify every fetched model as added, updated or unchanged.
pub fn diff_specs(current: &RawSpecTable, fetched: &CatalogSpecs) -> SpecDiff {
    let mut diff = SpecDiff::default();
    for (model, spec) in fetched {
        match current.get(model) {
            None => diff.added.push((model.clone(), spec.tdp_watts)),
            Some(existing) => {
                let old = existing.get("tdp_watts").and_then(serde_json::Value::as_u64);
                if old == Some(u64::from(spec.tdp_watts)) {
                    diff.unchanged.push(model.clone());
                } else {
                    diff.updated.push(TdpChange {
                        model: model.clone(),
                        old_tdp_watts: old,
                        new_tdp_watts: spec.tdp_watts,
                    });
                }
            }
        }
    }
    diff
}

/// Union of both tables, fetched entries winning on key collisions.
pub fn merge_specs(
    current: &RawSpecTable,
    fetched: &CatalogSpecs,
) -> Result<RawSpecTable, serde_json::Error> {
    let mut merged = current.clone();
    for (model, spec) in fetched {
        merged.insert(model.clone(), serde_json::to_value(spec)?);
    }
    Ok(merged)
}
