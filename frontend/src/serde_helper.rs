use serde::{Serialize, de::DeserializeOwned};
use wasm_bindgen::JsValue;

/// Error type for conversions between Rust values and `JsValue`
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serde-wasm-bindgen error: {0}")]
    SerdeWasmBindgen(#[from] serde_wasm_bindgen::Error),
    #[error("js error: {0:?}")]
    JsSys(JsValue),
}

/// Serialize a Rust data structure into a plain JS object
pub fn to_value<T: Serialize>(value: &T) -> Result<JsValue, Error> {
    // 输出普通对象与 JS number，支付组件按属性读取配置
    let serializer = serde_wasm_bindgen::Serializer::new()
        .serialize_maps_as_objects(true)
        .serialize_large_number_types_as_bigints(false);
    value.serialize(&serializer).map_err(Error::from)
}

/// Deserialize a JsValue into a Rust data structure
pub fn from_value<T: DeserializeOwned>(value: JsValue) -> Result<T, Error> {
    serde_wasm_bindgen::from_value(value).map_err(Error::from)
}

/// Set a property on a JS object, e.g. attaching a callback to an options object
pub fn set_property(target: &JsValue, key: &str, value: &JsValue) -> Result<(), Error> {
    js_sys::Reflect::set(target, &JsValue::from_str(key), value)
        .map(|_| ())
        .map_err(Error::JsSys)
}
