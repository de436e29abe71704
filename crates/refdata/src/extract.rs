//! Extraction of NVIDIA datacenter GPU specs from the raw catalog.

use indexmap::IndexMap;
use trainco2_core::reference::GpuSpec;

/// Extracted specs keyed by model, in catalog order.
pub type CatalogSpecs = IndexMap<String, GpuSpec>;

/// Datacenter models tracked in the GPU specification table.
pub const TARGET_MODELS: [&str; 10] = [
    "A100",
    "A100-80GB",
    "H100",
    "V100",
    "T4",
    "A10",
    "A40",
    "L4",
    "L40",
    "L40S",
];

/// Catalog field holding the thermal design power.
pub const TDP_FIELD: &str = "TDP (Watts)";
/// Catalog field holding the memory size.
pub const MEMORY_FIELD: &str = "Memory (GB)";

/// Memory size at or above which a model is promoted to its `-80GB` variant.
const LARGE_MEMORY_GB: u64 = 80;
const LARGE_MEMORY_SUFFIX: &str = "-80GB";

const VENDOR: &str = "NVIDIA";
const SOURCE_NOTE: &str = "Datacenter GPU - Updated from voidful/gpu-info-api";

/// Pick the tracked model a catalog product name refers to.
///
/// The longest target that occurs in `name` as a whole token wins, so
/// "A100 PCIe" is an A100 rather than an A10 and "RTX A4000" is not an A40.
pub fn match_target_model(name: &str) -> Option<&'static str> {
    TARGET_MODELS
        .iter()
        .copied()
        .filter(|target| contains_token(name, target))
        .max_by_key(|target| target.len())
}

fn contains_token(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + needle.len()..].chars().next();
        !before.is_some_and(|c| c.is_ascii_alphanumeric())
            && !after.is_some_and(|c| c.is_ascii_alphanumeric())
    })
}

/// Read a positive whole number from a catalog field.
///
/// Integers, floats (truncated) and numeric strings are accepted.
pub fn parse_whole_number(value: &serde_json::Value) -> Option<u64> {
    let number = match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 1.0).map(|f| f as u64)),
        serde_json::Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }?;
    (number > 0).then_some(number)
}

/// Extract the tracked datacenter GPUs from a raw catalog.
///
/// Entries are visited in document order. Entries that are not objects, do
/// not name a tracked model, or lack a usable TDP are skipped. The first
/// entry seen for a model wins, except that an entry with at least 80 GB
/// replaces an earlier one for an `-80GB` model.
pub fn extract_datacenter_gpus(catalog: &serde_json::Value) -> CatalogSpecs {
    let mut specs = CatalogSpecs::new();
    let Some(entries) = catalog.as_object() else {
        return specs;
    };

    for (product_name, info) in entries {
        let Some(info) = info.as_object() else {
            continue;
        };
        let Some(mut model) = match_target_model(product_name) else {
            continue;
        };
        let Some(tdp_watts) = info
            .get(TDP_FIELD)
            .and_then(parse_whole_number)
            .and_then(|tdp| u32::try_from(tdp).ok())
        else {
            continue;
        };
        let memory_gb = info.get(MEMORY_FIELD).and_then(parse_whole_number);
        let large_memory = memory_gb.is_some_and(|gb| gb >= LARGE_MEMORY_GB);

        if large_memory {
            let large = format!("{model}{LARGE_MEMORY_SUFFIX}");
            if let Some(target) = TARGET_MODELS.iter().copied().find(|t| *t == large) {
                model = target;
            }
        }

        let replaces_earlier = large_memory && model.ends_with(LARGE_MEMORY_SUFFIX);
        if specs.contains_key(model) && !replaces_earlier {
            continue;
        }
        specs.insert(model.to_string(), build_spec(model, tdp_watts, memory_gb));
    }

    specs
}

fn build_spec(model: &str, tdp_watts: u32, memory_gb: Option<u64>) -> GpuSpec {
    let mut spec = GpuSpec::new(tdp_watts);
    spec.extra.insert("name".into(), format!("{VENDOR} {model}").into());
    spec.extra.insert("vendor".into(), VENDOR.into());
    spec.extra.insert(
        "memory_gb".into(),
        memory_gb.map_or_else(|| "Unknown".into(), serde_json::Value::from),
    );
    spec.extra.insert("notes".into(), SOURCE_NOTE.into());
    spec
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
