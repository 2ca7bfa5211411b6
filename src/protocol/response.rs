//! Response validity classification.
//!
//! Decides whether a raw HTTP reply represents protocol-level success.
//! Three generations of remote ends are covered: legacy JSON Wire Protocol
//! servers reporting a numeric `status`, W3C servers reporting an `error`
//! code inside `value`, and Appium/vendor drivers mixing both.
//!
//! The rules are layered and evaluated in a fixed order; the first match
//! wins. Reordering them changes the result for ambiguous bodies.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde_json::Value;
use tracing::debug;

use super::capabilities::truthy;

// ============================================================================
// Constants
// ============================================================================

/// Legacy status code of the element-not-found family.
const STATUS_NO_SUCH_ELEMENT: i64 = 7;

/// Fixed message Appium uses for failed element lookups.
const APPIUM_ELEMENT_NOT_LOCATED: &str =
    "An element could not be located on the page using the given search parameters.";

/// W3C error code for a failed element lookup.
const NO_SUCH_ELEMENT: &str = "no such element";

// ============================================================================
// ResponseOutcome
// ============================================================================

/// Result of classifying a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseOutcome {
    /// The operation succeeded.
    Success,
    /// An element lookup found nothing; tolerated for lazy resolution.
    ElementMissing,
    /// The operation failed.
    Failure(FailureReason),
}

impl ResponseOutcome {
    /// Returns `true` for [`ResponseOutcome::Success`].
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Returns `true` unless the outcome is a failure.
    #[inline]
    #[must_use]
    pub fn is_tolerated(&self) -> bool {
        !matches!(self, Self::Failure(_))
    }
}

/// Why a reply was classified as a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// Body absent or without a `value` field.
    MissingBody,
    /// Legacy `status` field was non-zero.
    LegacyStatus(i64),
    /// `value` carried an error indicator.
    ResponseError(Option<String>),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingBody => f.write_str("missing body"),
            Self::LegacyStatus(status) => write!(f, "non-zero legacy status {status}"),
            Self::ResponseError(Some(error)) => write!(f, "response error: {error}"),
            Self::ResponseError(None) => f.write_str("response error"),
        }
    }
}

// ============================================================================
// Classification
// ============================================================================

/// Classifies a reply by status code and decoded body.
///
/// Never fails; failures are reported as [`ResponseOutcome::Failure`].
#[must_use]
pub fn classify(status_code: u16, body: Option<&Value>) -> ResponseOutcome {
    let Some(value) = body.and_then(|b| b.get("value")) else {
        debug!(status_code, "Request failed due to missing body");
        return ResponseOutcome::Failure(FailureReason::MissingBody);
    };
    // A `value` field implies the body is present.
    let body = body.unwrap_or(&Value::Null);

    let status = body.get("status").filter(|s| truthy(s));

    if status.and_then(Value::as_i64) == Some(STATUS_NO_SUCH_ELEMENT)
        && value
            .get("message")
            .and_then(Value::as_str)
            .is_some_and(is_element_not_found_message)
    {
        debug!(status_code, "Element lookup found nothing (legacy status)");
        return ResponseOutcome::ElementMissing;
    }

    if let Some(status) = status {
        let code = status.as_i64().unwrap_or(-1);
        debug!(status_code, legacy_status = code, "Request failed due to legacy status");
        return ResponseOutcome::Failure(FailureReason::LegacyStatus(code));
    }

    let has_error = ["error", "stackTrace", "stacktrace"]
        .iter()
        .any(|key| value.get(key).is_some_and(truthy));

    if status_code == 200 && !has_error {
        return ResponseOutcome::Success;
    }

    if status_code == 404 && value.get("error").and_then(Value::as_str) == Some(NO_SUCH_ELEMENT) {
        debug!(status_code, "Element lookup found nothing");
        return ResponseOutcome::ElementMissing;
    }

    if has_error {
        let error = value.get("error").and_then(Value::as_str).map(str::to_owned);
        debug!(status_code, error = ?error, "Request failed due to response error");
        return ResponseOutcome::Failure(FailureReason::ResponseError(error));
    }

    ResponseOutcome::Success
}

/// Matches the element-not-found phrasings of legacy and Appium drivers.
fn is_element_not_found_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.starts_with(NO_SUCH_ELEMENT)
        || message == APPIUM_ELEMENT_NOT_LOCATED
        || lower.starts_with("unable to find element")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    fn outcome(status_code: u16, body: Value) -> ResponseOutcome {
        classify(status_code, Some(&body))
    }

    #[test]
    fn test_missing_body() {
        assert_eq!(
            classify(200, None),
            ResponseOutcome::Failure(FailureReason::MissingBody)
        );
        assert_eq!(
            outcome(200, json!({ "status": 0 })),
            ResponseOutcome::Failure(FailureReason::MissingBody)
        );
        assert_eq!(
            outcome(200, json!("plain text")),
            ResponseOutcome::Failure(FailureReason::MissingBody)
        );
    }

    #[test]
    fn test_null_value_counts_as_present() {
        assert_eq!(outcome(200, json!({ "value": null })), ResponseOutcome::Success);
    }

    #[test]
    fn test_plain_success() {
        assert_eq!(outcome(200, json!({ "value": {} })), ResponseOutcome::Success);
    }

    #[test]
    fn test_200_with_error_fails() {
        assert_eq!(
            outcome(200, json!({ "value": { "error": "no such element" } })),
            ResponseOutcome::Failure(FailureReason::ResponseError(Some(
                "no such element".into()
            )))
        );
    }

    #[test]
    fn test_200_with_stacktrace_fails() {
        assert!(!outcome(200, json!({ "value": { "stacktrace": "at foo()" } })).is_tolerated());
        assert!(!outcome(200, json!({ "value": { "stackTrace": [1, 2] } })).is_tolerated());
    }

    #[test]
    fn test_404_no_such_element_is_tolerated() {
        assert_eq!(
            outcome(404, json!({ "value": { "error": "no such element" } })),
            ResponseOutcome::ElementMissing
        );
    }

    #[test]
    fn test_404_other_error_fails() {
        assert_eq!(
            outcome(404, json!({ "value": { "error": "no such window" } })),
            ResponseOutcome::Failure(FailureReason::ResponseError(Some("no such window".into())))
        );
    }

    #[test]
    fn test_404_alternate_phrasing_not_tolerated() {
        // Only the W3C code is tolerated on 404, not the legacy phrasings.
        assert!(
            !outcome(404, json!({ "value": { "error": "unable to find element" } })).is_tolerated()
        );
    }

    #[test]
    fn test_legacy_status_element_missing() {
        for message in [
            "No such element: xyz",
            "no such element",
            APPIUM_ELEMENT_NOT_LOCATED,
            "Unable to find element with css selector == #foo",
        ] {
            assert_eq!(
                outcome(500, json!({ "status": 7, "value": { "message": message } })),
                ResponseOutcome::ElementMissing,
                "message: {message}"
            );
        }
    }

    #[test]
    fn test_legacy_status_7_other_message_fails() {
        assert_eq!(
            outcome(500, json!({ "status": 7, "value": { "message": "something else" } })),
            ResponseOutcome::Failure(FailureReason::LegacyStatus(7))
        );
    }

    #[test]
    fn test_legacy_status_non_zero_fails() {
        assert_eq!(
            outcome(200, json!({ "status": 13, "value": { "message": "boom" } })),
            ResponseOutcome::Failure(FailureReason::LegacyStatus(13))
        );
    }

    #[test]
    fn test_legacy_status_zero_succeeds() {
        assert_eq!(
            outcome(200, json!({ "status": 0, "value": "ok" })),
            ResponseOutcome::Success
        );
    }

    #[test]
    fn test_non_200_without_error_succeeds() {
        assert_eq!(outcome(500, json!({ "value": {} })), ResponseOutcome::Success);
        assert_eq!(outcome(204, json!({ "value": null })), ResponseOutcome::Success);
    }

    #[test]
    fn test_failure_reason_display() {
        assert_eq!(FailureReason::MissingBody.to_string(), "missing body");
        assert_eq!(
            FailureReason::LegacyStatus(13).to_string(),
            "non-zero legacy status 13"
        );
        assert_eq!(FailureReason::ResponseError(None).to_string(), "response error");
    }
}
