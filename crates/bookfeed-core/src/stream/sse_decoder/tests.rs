//! Tests for the feed decoder

use super::*;

#[test]
fn test_simple_event() {
    let mut decoder = SseDecoder::new();
    let events = decoder.feed(b"data: {\"type\":\"progress\",\"count\":3}\n\n");

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].data, "{\"type\":\"progress\",\"count\":3}");
    assert_eq!(events[0].event_type, None);
}

#[test]
fn test_event_with_type_and_id() {
    let mut decoder = SseDecoder::new();
    let events = decoder.feed(b"event: end\nid: 7\ndata: {\"total\":2}\n\n");

    assert_eq!(events, vec![SseEvent {
        event_type: Some("end".to_string()),
        data: "{\"total\":2}".to_string(),
        id: Some("7".to_string()),
    }]);
}

#[test]
fn test_event_split_across_chunks() {
    let mut decoder = SseDecoder::new();

    assert!(decoder.feed(b"event: item\ndata: {\"ty").is_empty());
    assert!(decoder.has_remaining());

    let events = decoder.feed(b"pe\":\"item\"}\n\n");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type.as_deref(), Some("item"));
    assert_eq!(events[0].data, "{\"type\":\"item\"}");
    assert!(!decoder.has_remaining());
}

#[test]
fn test_multibyte_utf8_split_across_chunks() {
    let mut decoder = SseDecoder::new();
    let frame = "data: {\"title\":\"Cien años\"}\n\n".as_bytes();
    let split = frame.iter().position(|&b| b == 0xC3).unwrap() + 1;

    assert!(decoder.feed(&frame[..split]).is_empty());
    let events = decoder.feed(&frame[split..]);
    assert_eq!(events[0].data, "{\"title\":\"Cien años\"}");
}

#[test]
fn test_crlf_line_endings() {
    let mut decoder = SseDecoder::new();
    let events = decoder.feed(b"data: first\r\n\r\ndata: second\r\n\r\n");

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].data, "first");
    assert_eq!(events[1].data, "second");
}

#[test]
fn test_multi_line_data() {
    let mut decoder = SseDecoder::new();
    let events = decoder.feed(b"data: line1\ndata: line2\n\n");
    assert_eq!(events[0].data, "line1\nline2");
}

#[test]
fn test_comments_and_keepalives_are_ignored() {
    let mut decoder = SseDecoder::new();
    let events = decoder.feed(b": keep-alive\n\n:\n\ndata: x\n\n");
    assert_eq!(events, vec![SseEvent::new("x")]);
}

#[test]
fn test_newline_delimited_json() {
    let mut decoder = SseDecoder::new();
    let events = decoder.feed(b"{\"type\":\"start\"}\n{\"type\":\"end\",\"total\":0}\n");

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].data, "{\"type\":\"start\"}");
    assert_eq!(events[1].data, "{\"type\":\"end\",\"total\":0}");
}

#[test]
fn test_finish_flushes_unterminated_event() {
    let mut decoder = SseDecoder::new();
    assert!(decoder.feed(b"data: tail").is_empty());

    let events = decoder.finish();
    assert_eq!(events, vec![SseEvent::new("tail")]);
    assert!(!decoder.has_remaining());
}

#[test]
fn test_clear_drops_partial_state() {
    let mut decoder = SseDecoder::new();
    decoder.feed(b"data: partial\n");
    decoder.clear();
    assert!(decoder.finish().is_empty());
}

#[test]
fn test_oversized_line_without_newline_is_discarded() {
    let mut decoder = SseDecoder::new().with_max_line_bytes(16);

    let events = decoder.feed(b"data: aaaaaaaaaaaaaaaaaaaa");
    assert!(events.is_empty());
    assert!(!decoder.has_remaining());

    // rest of the oversized line, then a normal event
    let events = decoder.feed(b"aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa\ndata: {\"a\":1}\n\n");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].data, "{\"a\":1}");
}

#[test]
fn test_oversized_complete_line_is_dropped() {
    let mut decoder = SseDecoder::new().with_max_line_bytes(16);
    let events = decoder.feed(b"data: {\"title\":\"far too long\"}\ndata: {\"b\":2}\n\n");

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].data, "{\"b\":2}");
}

#[test]
fn test_default_line_limit_bounds_buffer() {
    let mut decoder = SseDecoder::new();
    let chunk = vec![b'x'; 64 * 1024];
    for _ in 0..(MAX_LINE_BYTES / chunk.len() + 1) {
        assert!(decoder.feed(&chunk).is_empty());
    }
    assert!(decoder.pending.len() <= MAX_LINE_BYTES);
    assert!(decoder.finish().is_empty());
}
