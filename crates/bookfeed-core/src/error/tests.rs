use super::*;
use serde_json::json;

#[test]
fn test_transport_errors_are_retryable() {
    assert!(FeedError::connection("connection refused").is_retryable());
    assert!(FeedError::timeout(10_000).is_retryable());
}

#[test]
fn test_http_status_is_not_retryable() {
    let error = FeedError::http_status(503, "http://localhost/books", None);
    assert!(!error.is_retryable());
    assert_eq!(error.status_code(), Some(503));
    assert_eq!(error.error_code(), "FEED_HTTP");
}

#[test]
fn test_http_status_message_uses_body_message() {
    let error = FeedError::http_status(
        404,
        "http://localhost/books/42",
        Some(json!({"message": "Book not found"})),
    );
    assert_eq!(error.message(), "404 Not Found: Book not found");
    assert_eq!(error.details(), Some(&json!({"message": "Book not found"})));
    assert_eq!(error.context(), Some("http://localhost/books/42"));
}

#[test]
fn test_cancelled_is_not_retryable() {
    assert!(!FeedError::Cancelled.is_retryable());
    assert_eq!(FeedError::Cancelled.error_code(), "FEED_CANCELLED");
}

#[test]
fn test_json_conversion() {
    let parse_error = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
    let error: FeedError = parse_error.into();
    assert_eq!(error.error_code(), "FEED_JSON");
}

#[test]
fn test_stream_and_io_errors_carry_message_only() {
    let stream = FeedError::stream("Feed frame has no type");
    assert_eq!(stream.error_code(), "FEED_STREAM");
    assert_eq!(stream.message(), "Feed frame has no type");
    assert_eq!(stream.context(), None);

    let io: FeedError = std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
    assert_eq!(io.error_code(), "FEED_IO");
    assert_eq!(io.message(), "missing");
    assert_eq!(io.context(), None);
    assert!(!io.is_retryable());
}
