use serde::de::DeserializeOwned;

use crate::data::{HttpReadOptions, HttpWriteOptions, OptionPayload};
use crate::error::{ErrorCode, Result};

/// An option shape that can be pulled out of an [`OptionPayload`].
pub trait FromPayload: DeserializeOwned + Sized {
    /// Take the typed variant, handing the payload back when it is some
    /// other variant.
    fn take_typed(payload: OptionPayload) -> std::result::Result<Self, OptionPayload>;
}

impl FromPayload for HttpReadOptions {
    fn take_typed(payload: OptionPayload) -> std::result::Result<Self, OptionPayload> {
        match payload {
            OptionPayload::HttpRead(options) => Ok(options),
            other => Err(other),
        }
    }
}

impl FromPayload for HttpWriteOptions {
    fn take_typed(payload: OptionPayload) -> std::result::Result<Self, OptionPayload> {
        match payload {
            OptionPayload::HttpWrite(options) => Ok(options),
            other => Err(other),
        }
    }
}

/// Normalize a payload into the shape `T`.
///
/// `None` and a JSON `null` both resolve to `Ok(None)`.
pub fn resolve<T: FromPayload>(payload: Option<OptionPayload>) -> Result<Option<T>> {
    let Some(payload) = payload else {
        return Ok(None);
    };

    let payload = match T::take_typed(payload) {
        Ok(options) => return Ok(Some(options)),
        Err(other) => other,
    };

    let parsed = match payload {
        OptionPayload::Json(text) => serde_json::from_str::<Option<T>>(&text),
        OptionPayload::JsonBytes(bytes) => serde_json::from_slice::<Option<T>>(&bytes),
        OptionPayload::Value(value) => serde_json::from_value::<Option<T>>(value),
        _ => return Err(ErrorCode::InvalidOption.error("unrecognized option content")),
    };

    parsed.map_err(|e| {
        let message = format!("failed to parse option content: {e}");
        ErrorCode::InvalidOption.with_source(e, message)
    })
}
