/// Utility helpers for trackshelf

#[cfg(not(target_arch = "wasm32"))]
pub async fn delay_ms(ms: u64) {
    tokio::time::sleep(std::time::Duration::from_millis(ms)).await;
}

#[cfg(target_arch = "wasm32")]
pub async fn delay_ms(ms: u64) {
    gloo_timers::future::TimeoutFuture::new(ms.min(u32::MAX as u64) as u32).await;
}

/// Returns `None` for empty or whitespace-only text, otherwise the original value.
pub fn non_blank(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Mirrors the `^https?://` check used for cover image links.
pub fn has_http_prefix(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

/// Makes an opaque identifier safe to use as an element id and inside a script string.
/// ASCII letters, digits and `_` are kept; every other character becomes `-<hex>-`, so
/// distinct identifiers never share an element id.
pub fn dom_id<S: AsRef<str>>(s: S) -> String {
    let mut out = String::with_capacity(s.as_ref().len());

    for ch in s.as_ref().chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            out.push(ch);
        } else {
            out.push_str(&format!("-{:x}-", ch as u32));
        }
    }

    out
}
