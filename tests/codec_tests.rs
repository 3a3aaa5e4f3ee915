//! Codec Tests
//!
//! Tests for command encoding and response decoding.

use std::io::Cursor;

use memlink::protocol::{
    decode_response, encode_command, read_response, write_command, Command, CommandType,
    Response, StatusCode, MAX_LINE_LENGTH,
};
use memlink::MemlinkError;

// =============================================================================
// Command Encoding Tests
// =============================================================================

#[test]
fn test_encode_get() {
    let cmd = Command::Get {
        key: "hello".to_string(),
    };
    assert_eq!(&encode_command(&cmd)[..], b"get hello\r\n");
}

#[test]
fn test_encode_set_defaults() {
    let cmd = Command::Set {
        key: "test".to_string(),
        flags: 0,
        exptime: 0,
        value: b"1".to_vec(),
    };
    assert_eq!(&encode_command(&cmd)[..], b"set test 0 0 1\r\n1\r\n");
}

#[test]
fn test_encode_add_with_flags_and_expiry() {
    let cmd = Command::Add {
        key: "foo1".to_string(),
        flags: 7,
        exptime: 600,
        value: b"10".to_vec(),
    };
    assert_eq!(&encode_command(&cmd)[..], b"add foo1 7 600 2\r\n10\r\n");
}

#[test]
fn test_encode_set_length_counts_bytes() {
    // 'é' is two bytes in UTF-8
    let cmd = Command::Set {
        key: "k".to_string(),
        flags: 0,
        exptime: 0,
        value: "é\r\n".as_bytes().to_vec(),
    };
    assert_eq!(&encode_command(&cmd)[..], "set k 0 0 4\r\né\r\n\r\n".as_bytes());
}

#[test]
fn test_encode_delete_flush_version() {
    let delete = Command::Delete {
        key: "gone".to_string(),
    };
    assert_eq!(&encode_command(&delete)[..], b"delete gone\r\n");
    assert_eq!(&encode_command(&Command::FlushAll)[..], b"flush_all\r\n");
    assert_eq!(&encode_command(&Command::Version)[..], b"version\r\n");
}

#[test]
fn test_command_accessors() {
    let cmd = Command::Delete {
        key: "k".to_string(),
    };
    assert_eq!(cmd.command_type(), CommandType::Delete);
    assert_eq!(cmd.key(), Some("k"));
    assert_eq!(Command::FlushAll.key(), None);
    assert_eq!(CommandType::FlushAll.name(), "flush_all");
}

// =============================================================================
// Response Decoding Tests
// =============================================================================

#[test]
fn test_decode_miss() {
    let decoded = decode_response(CommandType::Get, b"END\r\n").unwrap();
    assert_eq!(decoded, Response::Miss);
}

#[test]
fn test_decode_value() {
    let decoded = decode_response(CommandType::Get, b"VALUE test 3 5\r\nhello\r\nEND\r\n").unwrap();
    assert_eq!(
        decoded,
        Response::Value {
            key: "test".to_string(),
            flags: 3,
            data: b"hello".to_vec(),
        }
    );
}

#[test]
fn test_decode_value_containing_crlf() {
    let decoded = decode_response(CommandType::Get, b"VALUE k 0 5\r\na\r\nEN\r\nEND\r\n").unwrap();
    assert_eq!(decoded, Response::value("k", &b"a\r\nEN"[..]));
}

#[test]
fn test_decode_empty_value() {
    let decoded = decode_response(CommandType::Get, b"VALUE k 0 0\r\n\r\nEND\r\n").unwrap();
    assert_eq!(decoded, Response::value("k", Vec::<u8>::new()));
}

#[test]
fn test_decode_value_with_cas() {
    let decoded = decode_response(CommandType::Get, b"VALUE k 0 1 99\r\nx\r\nEND\r\n").unwrap();
    assert_eq!(decoded, Response::value("k", &b"x"[..]));
}

#[test]
fn test_decode_status_tokens() {
    let cases = [
        (CommandType::Set, "STORED\r\n", StatusCode::Success),
        (CommandType::Set, "NOT_STORED\r\n", StatusCode::NotStored),
        (CommandType::Add, "NOT_STORED\r\n", StatusCode::NotStored),
        (CommandType::Delete, "DELETED\r\n", StatusCode::Success),
        (CommandType::Delete, "NOT_FOUND\r\n", StatusCode::NotFound),
        (CommandType::FlushAll, "OK\r\n", StatusCode::Success),
        (CommandType::Set, "EXISTS\r\n", StatusCode::Exists),
    ];

    for (kind, line, expected) in cases {
        let decoded = decode_response(kind, line.as_bytes()).unwrap();
        assert_eq!(decoded, Response::Status(expected), "{:?}", line);
    }
}

#[test]
fn test_decode_unknown_status() {
    let decoded = decode_response(CommandType::Delete, b"WHO_KNOWS\r\n").unwrap();
    assert_eq!(decoded, Response::Status(StatusCode::Unknown));
}

#[test]
fn test_decode_error_lines() {
    for line in ["ERROR", "CLIENT_ERROR bad data chunk", "SERVER_ERROR out of memory"] {
        let bytes = format!("{}\r\n", line);
        for kind in [CommandType::Get, CommandType::Set, CommandType::Version] {
            let decoded = decode_response(kind, bytes.as_bytes()).unwrap();
            assert_eq!(decoded, Response::Error(line.to_string()));
            assert!(decoded.is_error());
        }
    }
}

#[test]
fn test_decode_version() {
    let decoded = decode_response(CommandType::Version, b"VERSION 1.6.21\r\n").unwrap();
    assert_eq!(decoded, Response::Version("1.6.21".to_string()));
}

// =============================================================================
// Error Handling Tests
// =============================================================================

fn assert_protocol_error(kind: CommandType, bytes: &[u8], needle: &str) {
    match decode_response(kind, bytes) {
        Err(MemlinkError::Protocol(msg)) => {
            assert!(msg.contains(needle), "{:?} does not mention {:?}", msg, needle)
        }
        other => panic!("expected protocol error for {:?}, got {:?}", bytes, other),
    }
}

#[test]
fn test_value_length_mismatch() {
    assert_protocol_error(CommandType::Get, b"VALUE k 0 2\r\nabc\r\nEND\r\n", "mismatch");
}

#[test]
fn test_truncated_value() {
    assert_protocol_error(CommandType::Get, b"VALUE k 0 10\r\nabc", "Truncated");
}

#[test]
fn test_missing_end() {
    assert_protocol_error(CommandType::Get, b"VALUE k 0 1\r\nx\r\nSTORED\r\n", "END");
}

#[test]
fn test_incomplete_response() {
    assert_protocol_error(CommandType::Set, b"STOR", "Incomplete");
    assert_protocol_error(CommandType::Get, b"", "Incomplete");
}

#[test]
fn test_trailing_data() {
    assert_protocol_error(CommandType::Delete, b"DELETED\r\nEXTRA\r\n", "Trailing");
}

#[test]
fn test_bad_value_header() {
    assert_protocol_error(CommandType::Get, b"VALUE k x 1\r\na\r\nEND\r\n", "flags");
    assert_protocol_error(CommandType::Get, b"VALUE k 0 -1\r\nEND\r\n", "length");
    assert_protocol_error(CommandType::Get, b"VALUE k 0 99999999\r\n", "too large");
    assert_protocol_error(CommandType::Get, b"STORED\r\n", "Unexpected response to get");
}

#[test]
fn test_bare_newline_rejected() {
    assert_protocol_error(CommandType::Set, b"STORED\n", "CRLF");
}

#[test]
fn test_overlong_line() {
    let mut bytes = vec![b'A'; MAX_LINE_LENGTH + 10];
    bytes.extend_from_slice(b"\r\n");
    assert_protocol_error(CommandType::Set, &bytes, "exceeds");
}

#[test]
fn test_version_without_prefix() {
    assert_protocol_error(CommandType::Version, b"OK\r\n", "version");
}

// =============================================================================
// Stream I/O Tests
// =============================================================================

#[test]
fn test_stream_multiple_responses() {
    let wire = b"STORED\r\nVALUE a 0 1\r\n1\r\nEND\r\nEND\r\nDELETED\r\nOK\r\n".to_vec();
    let mut cursor = Cursor::new(wire);

    let expected = [
        (CommandType::Set, Response::Status(StatusCode::Success)),
        (CommandType::Get, Response::value("a", &b"1"[..])),
        (CommandType::Get, Response::Miss),
        (CommandType::Delete, Response::Status(StatusCode::Success)),
        (CommandType::FlushAll, Response::Status(StatusCode::Success)),
    ];

    for (kind, response) in expected {
        assert_eq!(read_response(kind, &mut cursor).unwrap(), response);
    }
}

#[test]
fn test_stream_eof_is_io_error() {
    let mut cursor = Cursor::new(Vec::new());
    let result = read_response(CommandType::Get, &mut cursor);
    assert!(matches!(result, Err(MemlinkError::Io(_))));
}

#[test]
fn test_write_command() {
    let mut buffer = Vec::new();
    write_command(&mut buffer, &Command::FlushAll).unwrap();
    write_command(
        &mut buffer,
        &Command::Get {
            key: "k".to_string(),
        },
    )
    .unwrap();

    assert_eq!(buffer, b"flush_all\r\nget k\r\n");
}
