//! User-friendly error message formatting.
//!
//! Converts raw backend client errors into short text with an actionable
//! suggestion for the status bar.

/// Convert a technical error message to a user-friendly message with guidance.
///
/// Takes the raw error string and returns a tuple of (short_message, suggestion).
pub fn format_error_with_guidance(error: &str) -> (String, Option<String>) {
    let error_lower = error.to_lowercase();

    if error_lower.contains("not reachable") || error_lower.contains("connection refused") {
        return (
            "Backend not reachable".to_string(),
            Some("Check that the backend service is running and the URL is correct.".to_string()),
        );
    }

    if error_lower.contains("timed out") || error_lower.contains("timeout") {
        return (
            "Request timed out".to_string(),
            Some("The backend is slow to answer. It will be retried on the next refresh.".to_string()),
        );
    }

    if error_lower.contains("(404)") {
        return (
            "No data for this device".to_string(),
            Some("The device may not have reported any telemetry yet.".to_string()),
        );
    }

    if error_lower.contains("(500)") || error_lower.contains("(502)") || error_lower.contains("(503)") {
        return (
            "Backend error".to_string(),
            Some("The backend failed to answer. Check its logs.".to_string()),
        );
    }

    if error_lower.contains("error decoding") || error_lower.contains("decode") {
        return (
            "Unexpected response".to_string(),
            Some("The backend answered with data the dashboard cannot read.".to_string()),
        );
    }

    if error_lower.contains("invalid url") {
        return (
            "Invalid backend URL".to_string(),
            Some("Set it with 'tempdash config set-url <URL>' or --url.".to_string()),
        );
    }

    // Default - show original error, no suggestion
    (error.to_string(), None)
}

/// Single-line form for the status bar.
pub fn format_status_error(error: &str) -> String {
    match format_error_with_guidance(error) {
        (message, Some(hint)) => format!("{}. {}", message, hint),
        (message, None) => message,
    }
}
