use serde_yaml::{Mapping, Value};

/// Deep-merge `overlay` on top of `base`.
/// If both sides have a mapping for the same key, recurse.
/// Otherwise, `overlay`'s value wins.
pub fn deep_merge(mut base: Mapping, overlay: Mapping) -> Mapping {
    for (key, overlay_val) in overlay {
        match (base.remove(&key), overlay_val) {
            (Some(Value::Mapping(base_map)), Value::Mapping(overlay_map)) => {
                base.insert(key, Value::Mapping(deep_merge(base_map, overlay_map)));
            }
            (_, overlay_val) => {
                base.insert(key, overlay_val);
            }
        }
    }
    base
}

/// Merge two whole documents. Mappings are deep-merged and a null overlay
/// leaves the base as is; any other overlay document replaces the base.
pub fn merge_documents(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            Value::Mapping(deep_merge(base_map, overlay_map))
        }
        (base, Value::Null) => base,
        (_, overlay) => overlay,
    }
}
