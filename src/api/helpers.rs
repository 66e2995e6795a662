//! Shared helpers for WASM API operations
//!
//! Serialization across the JS boundary, optional arguments, and turning
//! Rust errors into `JsValue` messages that are also logged.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Display;
use wasm_bindgen::prelude::*;

// ============================================================================
// Serialization/Deserialization Helpers
// ============================================================================

/// Deserialize a value from JavaScript with automatic error handling
pub fn deserialize<T: DeserializeOwned>(value: JsValue, error_context: &str) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| js_error(error_context, e))
}

/// Deserialize an optional argument; `undefined` and `null` give the default
pub fn deserialize_or_default<T: DeserializeOwned + Default>(
    value: JsValue,
    error_context: &str,
) -> Result<T, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    deserialize(value, error_context)
}

/// Serialize a value to JavaScript with automatic error handling
///
/// Maps become plain objects, so JSON values cross the boundary unchanged.
pub fn serialize<T: Serialize>(value: &T, error_context: &str) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| js_error(error_context, e))
}

// ============================================================================
// Result Conversion Helpers
// ============================================================================

/// Log an error and wrap it for JavaScript
pub fn js_error(context: &str, error: impl Display) -> JsValue {
    let msg = format!("{}: {}", context, error);
    log::error!("{}", msg);
    JsValue::from_str(&msg)
}
