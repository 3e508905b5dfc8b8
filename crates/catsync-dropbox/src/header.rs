//! Dropbox reads `Dropbox-API-Arg` as ASCII-only JSON; every non-ASCII
//! character must be sent as a `\uXXXX` escape.

/// Serializes `value` to JSON with all non-ASCII characters escaped.
pub(crate) fn header_safe_json<T>(value: &T) -> Result<String, serde_json::Error>
where
    T: serde::Serialize + ?Sized,
{
    let json = serde_json::to_string(value)?;
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{unit:04x}"));
            }
        }
    }
    Ok(out)
}
