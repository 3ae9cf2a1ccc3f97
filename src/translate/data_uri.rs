//! Decode `data:` URIs into Anthropic base64 image sources.
//!
//! External URLs are not supported; they decode to `None` and the caller
//! decides whether that is an error.

use super::anthropic_types::ImageSource;

const DATA_PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64";

/// Decode `data:<media-type>;base64,<payload>` into an [`ImageSource`].
///
/// Returns `None` for anything that is not a `data:` URI, or a `data:` URI
/// without a payload separator.
pub fn decode(url: &str) -> Option<ImageSource> {
    if !url.starts_with(DATA_PREFIX) {
        return None;
    }

    let (header, payload) = url.split_once(',')?;
    let media_type = header.replace(DATA_PREFIX, "").replace(BASE64_MARKER, "");

    Some(ImageSource::base64(media_type, payload))
}
