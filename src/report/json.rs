use serde::Serialize;

/// Pretty-printed JSON with a trailing newline, the on-disk form of every view.
pub fn render_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    let mut out = serde_json::to_string_pretty(value)?;
    out.push('\n');
    Ok(out)
}
