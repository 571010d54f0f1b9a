//! `serialize_with` helpers for request shapes.
//!
//! Blobs travel as standard (padded) base64 text and timestamps as epoch
//! seconds. Every helper takes the `Option` wrapper so it can sit next to
//! `skip_serializing_if = "Option::is_none"`.

use std::time::{SystemTime, UNIX_EPOCH};

use base64::Engine;
use bytes::Bytes;
use serde::Serializer;
use serde::ser::{Error as _, SerializeSeq};

fn encode(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// `Option<Bytes>` as base64 text.
pub fn blob<S: Serializer>(value: &Option<Bytes>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(bytes) => serializer.serialize_str(&encode(bytes)),
        None => serializer.serialize_none(),
    }
}

/// `Option<Vec<Bytes>>` as an array of base64 text.
pub fn blob_list<S: Serializer>(
    value: &Option<Vec<Bytes>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(list) => {
            let mut seq = serializer.serialize_seq(Some(list.len()))?;
            for bytes in list {
                seq.serialize_element(&encode(bytes))?;
            }
            seq.end()
        }
        None => serializer.serialize_none(),
    }
}

/// `Option<SystemTime>` as epoch seconds: an integer when there is no
/// sub-second part, otherwise a number with millisecond precision.
pub fn epoch_seconds<S: Serializer>(
    value: &Option<SystemTime>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let Some(time) = value else {
        return serializer.serialize_none();
    };
    match time.duration_since(UNIX_EPOCH) {
        Ok(since) if since.subsec_millis() == 0 => serializer.serialize_u64(since.as_secs()),
        Ok(since) => serializer.serialize_f64(since.as_millis() as f64 / 1000.0),
        Err(_) => Err(S::Error::custom("timestamp before the Unix epoch")),
    }
}
