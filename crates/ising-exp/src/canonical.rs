use ising_core::{ErrorInfo, IsingError};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Serialises `value` as compact JSON with object keys in sorted order.
pub fn to_canonical_json_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, IsingError> {
    // serde_json's default map is ordered, so a round trip through Value sorts keys.
    let value = serde_json::to_value(value)
        .map_err(|err| IsingError::Serde(ErrorInfo::new("json-encode", err.to_string())))?;
    serde_json::to_vec(&value)
        .map_err(|err| IsingError::Serde(ErrorInfo::new("json-encode", err.to_string())))
}

/// Parses JSON bytes produced by [`to_canonical_json_bytes`].
pub fn from_json_slice<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, IsingError> {
    serde_json::from_slice(bytes)
        .map_err(|err| IsingError::Serde(ErrorInfo::new("json-decode", err.to_string())))
}
