// Response interpretation. The server answers with plain text, JSON or a
// bare number depending on the function, always with a 2xx status on
// success. Nothing in here looks at a body before the status was checked.

use serde::Deserialize;
use serde_json::Value;

use crate::album::Album;
use crate::dispatch::RawResponse;
use crate::error::{LycheeError, Result};

/// Succeeds iff the status is in `200..=299`.
pub fn check_status(res: &RawResponse) -> Result<()> {
    if (200..=299).contains(&res.status) {
        Ok(())
    } else {
        Err(LycheeError::Status { code: res.status })
    }
}

/// Body decoded as UTF-8 with surrounding whitespace removed. Invalid
/// sequences are replaced rather than rejected; the server's error pages
/// are not always clean.
pub fn body_as_text(res: &RawResponse) -> String {
    String::from_utf8_lossy(&res.body).trim().to_string()
}

pub fn body_as_json(res: &RawResponse) -> Result<Value> {
    Ok(serde_json::from_str(&body_as_text(res))?)
}

#[derive(Deserialize)]
struct AlbumsEnvelope {
    albums: Vec<AlbumEntry>,
}

#[derive(Deserialize)]
struct AlbumEntry {
    id: String,
    title: String,
    // "0" for open albums; anything else means a password is set.
    password: Value,
}

/// Decode the `albums` array of an `Albums::get` answer, keeping the
/// server's order.
pub fn decode_album_list(value: &Value) -> Result<Vec<Album>> {
    let envelope = AlbumsEnvelope::deserialize(value)
        .map_err(|e| LycheeError::Decode(format!("album list: {}", e)))?;

    Ok(envelope
        .albums
        .into_iter()
        .map(|entry| {
            let protected = entry.password != Value::String("0".into());
            Album::new(entry.id, entry.title, protected)
        })
        .collect())
}

/// True iff `s` is a base-10 integer: digits, optionally behind one
/// leading `-`. `Photo::add` answers with such a number on success and with
/// an error message otherwise.
pub fn is_integer(s: Option<&str>) -> bool {
    let Some(s) = s else {
        return false;
    };
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
