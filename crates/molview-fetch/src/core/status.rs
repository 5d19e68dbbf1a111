use http::StatusCode;

/// Returns `true` if the response status yields a payload.
///
/// Every status from 200 through 399 inclusive counts as success; redirects
/// the client did not follow are accepted as they are.
///
/// # Examples
///
/// ```
/// use molview_fetch::core::is_success_status;
///
/// assert!(is_success_status(200));
/// assert!(is_success_status(304));
/// assert!(!is_success_status(404));
/// ```
pub fn is_success_status(status: u16) -> bool {
    (200..=399).contains(&status)
}

/// Status line text carried by a transfer failure, e.g. `"404 Not Found"`.
///
/// Uses the canonical reason phrase for the code; codes without one render
/// as the bare number.
pub fn status_reason(status: u16) -> String {
    match StatusCode::from_u16(status).ok().and_then(|code| code.canonical_reason()) {
        Some(phrase) => format!("{status} {phrase}"),
        None => status.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_range_bounds() {
        assert!(!is_success_status(199));
        assert!(is_success_status(200));
        assert!(is_success_status(204));
        assert!(is_success_status(302));
        assert!(is_success_status(399));
        assert!(!is_success_status(400));
    }

    #[test]
    fn test_failure_codes() {
        for code in [0, 100, 101, 400, 401, 403, 404, 429, 500, 502, 503, 600] {
            assert!(!is_success_status(code), "Code {} should fail", code);
        }
    }

    #[test]
    fn test_status_reason() {
        assert_eq!(status_reason(404), "404 Not Found");
        assert_eq!(status_reason(503), "503 Service Unavailable");
        assert_eq!(status_reason(418), "418 I'm a teapot");
        assert_eq!(status_reason(422), "422 Unprocessable Entity");
        assert_eq!(status_reason(451), "451 Unavailable For Legal Reasons");
        assert_eq!(status_reason(507), "507 Insufficient Storage");
        assert_eq!(status_reason(599), "599");
        assert_eq!(status_reason(0), "0");
    }
}
