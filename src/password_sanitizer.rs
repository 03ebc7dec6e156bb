use url::Url;

const REDACTED: &str = "[REDACTED]";

/// Sanitize a connection string by removing the password
///
/// Only `postgres://` and `postgresql://` URLs are rewritten; anything else
/// is returned unchanged.
pub fn sanitize_connection_url(connection: &str) -> String {
    if connection.starts_with("postgresql://") || connection.starts_with("postgres://") {
        if let Ok(parsed) = Url::parse(connection) {
            let mut sanitized = parsed.clone();
            if parsed.password().is_some() {
                let _ = sanitized.set_password(Some(REDACTED));
            }
            // URL-decode the marker so it stays readable in logs
            return sanitized.to_string().replace("%5BREDACTED%5D", REDACTED);
        }
        return connection.to_string();
    }

    connection.to_string()
}

/// Hide an API key entirely
pub fn sanitize_api_key(key: &str) -> String {
    if key.is_empty() {
        String::new()
    } else {
        REDACTED.to_string()
    }
}
