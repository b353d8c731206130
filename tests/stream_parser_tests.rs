use uniadvisor::api::stream::{StreamParser, StreamRecord};

#[test]
fn test_fragmented_record_across_chunks() {
    let mut parser = StreamParser::new();

    let chunk1 = b"data: {\"content\":\"Hel";
    let records1 = parser.process(chunk1).expect("first chunk parse");
    assert!(records1.is_empty());

    let chunk2 = b"lo\"}\n";
    let records2 = parser.process(chunk2).expect("second chunk parse");
    assert_eq!(records2, vec![StreamRecord::Content("Hello".to_string())]);
}

#[test]
fn test_multiple_records_in_one_chunk() {
    let mut parser = StreamParser::new();

    let chunk = b"data: {\"content\":\"Hi\"}\ndata: {\"content\":\" there\"}\ndata: [DONE]\n";
    let records = parser.process(chunk).expect("chunk parse");
    assert_eq!(
        records,
        vec![
            StreamRecord::Content("Hi".to_string()),
            StreamRecord::Content(" there".to_string()),
            StreamRecord::Done,
        ]
    );
}

#[test]
fn test_error_payload_record() {
    let mut parser = StreamParser::new();

    let chunk = b"data: {\"error\":\"model overloaded\"}\n";
    let records = parser.process(chunk).expect("chunk parse");
    assert_eq!(
        records,
        vec![StreamRecord::Error("model overloaded".to_string())]
    );
}

#[test]
fn test_malformed_json_record_is_skipped() {
    let mut parser = StreamParser::new();

    let chunk = b"data: {not json}\ndata: {\"content\":\"ok\"}\n";
    let records = parser
        .process(chunk)
        .expect("parse errors must not fail the parser");
    assert_eq!(records, vec![StreamRecord::Content("ok".to_string())]);
}

#[test]
fn test_unrecognized_payload_shape_is_skipped() {
    let mut parser = StreamParser::new();

    let chunk = b"data: {\"usage\":{\"tokens\":12}}\ndata: [DONE]\n";
    let records = parser.process(chunk).expect("chunk parse");
    assert_eq!(records, vec![StreamRecord::Done]);
}

#[test]
fn test_non_data_lines_are_ignored() {
    let mut parser = StreamParser::new();

    let chunk = b": keepalive\nevent: ping\n\ndata: {\"content\":\"x\"}\n";
    let records = parser.process(chunk).expect("chunk parse");
    assert_eq!(records, vec![StreamRecord::Content("x".to_string())]);
}

#[test]
fn test_crlf_line_endings_are_tolerated() {
    let mut parser = StreamParser::new();

    let chunk = b"data: {\"content\":\"Hi\"}\r\ndata: [DONE]\r\n";
    let records = parser.process(chunk).expect("chunk parse");
    assert_eq!(
        records,
        vec![StreamRecord::Content("Hi".to_string()), StreamRecord::Done]
    );
}

#[test]
fn test_finish_decodes_record_without_trailing_newline() {
    let mut parser = StreamParser::new();

    let records = parser.process(b"data: {\"content\":\"tail\"}").unwrap();
    assert!(records.is_empty());
    assert_eq!(
        parser.finish(),
        Some(StreamRecord::Content("tail".to_string()))
    );
    assert_eq!(parser.finish(), None);
}

#[test]
fn test_flush_drains_unterminated_tail() {
    let mut parser = StreamParser::new();

    parser
        .process(b"data: {\"content\":\"partial")
        .expect("chunk parse");
    assert_eq!(parser.flush(), "data: {\"content\":\"partial");
    assert_eq!(parser.flush(), "");
}
