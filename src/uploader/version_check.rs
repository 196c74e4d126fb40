/// Version of this uploader, compared against the one the share service publishes.
pub const CLIENT_VERSION: &str = "0.2";

/// Whether the server advertises a newer plugin than `client_version`.
///
/// Both sides are coerced to a single number and compared with `>`, so
/// multi-part versions do not order correctly: `"0.10"` reads as `0.1` and
/// is older than `"0.2"`, and `"1.2.3"` never compares newer. Only finite
/// decimal numbers count: `"inf"`, `"infinity"` and hex such as `"0x10"`
/// are never newer.
pub fn is_update_available(server_version: &str, client_version: &str) -> bool {
    match (coerce_number(server_version), coerce_number(client_version)) {
        (Some(server), Some(client)) => server > client,
        _ => false,
    }
}

fn coerce_number(version: &str) -> Option<f64> {
    let trimmed = version.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}
