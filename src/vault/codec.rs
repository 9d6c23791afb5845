//! Reader and writer for the vault's on-disk JSON shape.
//!
//! The format is a flat JSON array of objects with a fixed set of keys:
//! `id`, `service`, `username`, `password`, `notes`, `createdAt`. The
//! shape never nests, so this module hand-rolls both directions instead
//! of pulling in a general JSON library.
//!
//! The writer produces a stable, 2-space-indented layout so saved files
//! diff cleanly. The reader is deliberately permissive: it scans for
//! balanced `{...}` object payloads between the first `[` and the end of
//! input, then pulls each named field out of the payload with an
//! independent per-field scan. Objects whose `id` or `service` is missing
//! or empty are skipped with a log line; an unreadable `createdAt` fails
//! the whole parse.

use chrono::NaiveDateTime;

use crate::errors::{PassVaultError, Result};
use crate::vault::record::Record;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
// Some writers drop the seconds when they are zero.
const TIMESTAMP_FORMAT_SHORT: &str = "%Y-%m-%dT%H:%M";

/// Serialize records to the vault's JSON array layout.
///
/// An empty slice serializes to the literal `[]`.
pub fn serialize_records(records: &[Record]) -> String {
    if records.is_empty() {
        return "[]".to_string();
    }

    let mut out = String::from("[\n");
    for (i, record) in records.iter().enumerate() {
        out.push_str("  {\n");
        push_field(&mut out, "id", &record.id, false);
        push_field(&mut out, "service", &record.service, false);
        push_field(&mut out, "username", &record.username, false);
        push_field(&mut out, "password", &record.password, false);
        push_field(&mut out, "notes", &record.notes, false);
        push_field(&mut out, "createdAt", &format_timestamp(&record.created_at), true);
        out.push_str("  }");
        if i + 1 < records.len() {
            out.push(',');
        }
        out.push('\n');
    }
    out.push(']');
    out
}

/// Parse vault text back into records.
///
/// Input with no array at all yields an empty list rather than an error;
/// the only hard failure is a record whose `createdAt` cannot be read.
pub fn parse_records(text: &str) -> Result<Vec<Record>> {
    let mut scanner = Scanner::new(text);
    if !scanner.seek_array_start() {
        return Ok(Vec::new());
    }

    let mut records = Vec::new();
    while let Some(object) = scanner.next_object() {
        if let Some(record) = record_from_object(object)? {
            records.push(record);
        }
    }
    Ok(records)
}

fn push_field(out: &mut String, key: &str, value: &str, last: bool) {
    out.push_str("    \"");
    out.push_str(key);
    out.push_str("\": \"");
    out.push_str(&escape(value));
    out.push('"');
    if !last {
        out.push(',');
    }
    out.push('\n');
}

fn record_from_object(object: &str) -> Result<Option<Record>> {
    // Required fields: absent and empty are the same defect here.
    let id = extract_string_field(object, "id").unwrap_or_default();
    if id.is_empty() {
        tracing::warn!("skipping vault object without an id");
        return Ok(None);
    }
    let service = extract_string_field(object, "service").unwrap_or_default();
    if service.is_empty() {
        tracing::warn!(id = %id, "skipping vault object without a service");
        return Ok(None);
    }

    let username = extract_string_field(object, "username").unwrap_or_default();
    let password = extract_string_field(object, "password").unwrap_or_default();
    let notes = extract_string_field(object, "notes").unwrap_or_default();

    let created_raw = extract_string_field(object, "createdAt")
        .ok_or_else(|| PassVaultError::InvalidTimestamp("createdAt missing".to_string()))?;
    let created_at = parse_timestamp(&created_raw)?;

    Ok(Some(Record {
        id,
        service,
        username,
        password,
        notes,
        created_at,
    }))
}

fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

fn parse_timestamp(text: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT_SHORT))
        .map_err(|_| PassVaultError::InvalidTimestamp(text.to_string()))
}

/// Cursor over the raw vault text.
///
/// All structural characters in the format are ASCII, so the scanner walks
/// bytes; every position it slices at is a `"`, `{` or `}` byte and
/// therefore a valid char boundary.
struct Scanner<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    /// Advance past the first `[`. Returns false when the input has none.
    fn seek_array_start(&mut self) -> bool {
        match self.text.find('[') {
            Some(idx) => {
                self.pos = idx + 1;
                true
            }
            None => false,
        }
    }

    /// Return the payload of the next balanced `{...}` object, without its
    /// braces. Anything between objects (whitespace, commas) is skipped; a
    /// `]` or the end of input ends the scan. An object left open by
    /// truncated input also ends the scan rather than looping forever.
    fn next_object(&mut self) -> Option<&'a str> {
        let bytes = self.text.as_bytes();

        while self.pos < bytes.len() {
            match bytes[self.pos] {
                b'{' => break,
                b']' => return None,
                _ => self.pos += 1,
            }
        }
        if self.pos >= bytes.len() {
            return None;
        }

        self.pos += 1;
        let start = self.pos;
        let mut depth = 1usize;
        let mut in_string = false;

        while self.pos < bytes.len() {
            let b = bytes[self.pos];
            if in_string {
                match b {
                    // An escape covers the next character; never treat it
                    // as a string or object boundary.
                    b'\\' => self.pos += 1,
                    b'"' => in_string = false,
                    _ => {}
                }
            } else {
                match b {
                    b'"' => in_string = true,
                    b'{' => depth += 1,
                    b'}' => {
                        depth -= 1;
                        if depth == 0 {
                            let end = self.pos;
                            self.pos += 1;
                            return Some(&self.text[start..end]);
                        }
                    }
                    _ => {}
                }
            }
            self.pos += 1;
        }
        None
    }
}

/// Pull one named string field out of an object payload.
///
/// Scans occurrences of `"key"` until one is followed by optional
/// whitespace, a colon, and a quoted value, then reads that value honoring
/// backslash escapes. Earlier occurrences are values that happen to equal
/// the key's name (a username of `password`, say) and must not win over
/// the key itself. Returns `None` when no occurrence is a real key.
fn extract_string_field(object: &str, key: &str) -> Option<String> {
    let bytes = object.as_bytes();
    let needle = format!("\"{key}\"");

    let mut search_from = 0;
    loop {
        let found = object[search_from..].find(&needle)? + search_from;
        search_from = found + 1;

        let mut pos = found + needle.len();
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos >= bytes.len() || bytes[pos] != b':' {
            continue;
        }
        pos += 1;
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos >= bytes.len() || bytes[pos] != b'"' {
            continue;
        }
        pos += 1;

        let start = pos;
        while pos < bytes.len() {
            match bytes[pos] {
                b'\\' => pos += 2,
                b'"' => return Some(unescape(&object[start..pos])),
                _ => pos += 1,
            }
        }
        return None;
    }
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

/// Reverse [`escape`]. Unknown escape sequences keep the escaped character
/// and drop the backslash; a trailing lone backslash is dropped.
fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
    }

    fn sample_record(id: &str) -> Record {
        Record {
            id: id.to_string(),
            service: "example.com".to_string(),
            username: "bob".to_string(),
            password: "hunter2".to_string(),
            notes: String::new(),
            created_at: sample_time(),
        }
    }

    #[test]
    fn empty_slice_serializes_to_bare_brackets() {
        assert_eq!(serialize_records(&[]), "[]");
    }

    #[test]
    fn empty_array_parses_to_no_records() {
        assert_eq!(parse_records("[]").unwrap(), Vec::new());
    }

    #[test]
    fn serialized_layout_is_stable() {
        let text = serialize_records(&[sample_record("a1")]);
        let expected = "[\n  {\n    \"id\": \"a1\",\n    \"service\": \"example.com\",\n    \"username\": \"bob\",\n    \"password\": \"hunter2\",\n    \"notes\": \"\",\n    \"createdAt\": \"2024-01-15T10:30:00\"\n  }\n]";
        assert_eq!(text, expected);
    }

    #[test]
    fn round_trip_preserves_every_field() {
        let records = vec![sample_record("a1"), {
            let mut r = sample_record("b2");
            r.service = "other.org".to_string();
            r.username = String::new();
            r.notes = "shared with team".to_string();
            r
        }];

        let parsed = parse_records(&serialize_records(&records)).unwrap();
        assert_eq!(parsed, records);
    }

    #[test]
    fn special_characters_survive_a_round_trip() {
        let mut record = sample_record("esc");
        record.password = "a\\b\"c\nd\te\rf".to_string();
        record.notes = "line one\nline two\t\"quoted\"".to_string();

        let parsed = parse_records(&serialize_records(&[record.clone()])).unwrap();
        assert_eq!(parsed[0].password, record.password);
        assert_eq!(parsed[0].notes, record.notes);
    }

    #[test]
    fn unicode_values_pass_through_unescaped() {
        let mut record = sample_record("uni");
        record.notes = "schloß ünïcode 密码".to_string();

        let text = serialize_records(&[record.clone()]);
        assert!(text.contains("schloß ünïcode 密码"));
        assert_eq!(parse_records(&text).unwrap()[0].notes, record.notes);
    }

    #[test]
    fn whitespace_between_tokens_is_tolerated() {
        let text = "  [ \n\n {  \"id\" :  \"x\" ,\n\"service\":\"s\",  \"createdAt\"  :\n\"2024-01-15T10:30:00\" } \n ] ";
        let parsed = parse_records(text).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].id, "x");
        assert_eq!(parsed[0].service, "s");
        assert_eq!(parsed[0].username, "");
        assert_eq!(parsed[0].password, "");
    }

    #[test]
    fn braces_inside_string_values_do_not_end_the_object() {
        let mut record = sample_record("br");
        record.notes = "a {nested} } brace".to_string();

        let parsed = parse_records(&serialize_records(&[record.clone()])).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].notes, record.notes);
    }

    #[test]
    fn missing_optional_fields_default_to_empty() {
        let text = r#"[{"id": "a", "service": "s", "password": "p", "createdAt": "2024-01-15T10:30:00"}]"#;
        let parsed = parse_records(text).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].username, "");
        assert_eq!(parsed[0].notes, "");
        assert_eq!(parsed[0].password, "p");
    }

    #[test]
    fn object_without_id_is_skipped() {
        let text = r#"[
            {"service": "s", "createdAt": "2024-01-15T10:30:00"},
            {"id": "b", "service": "t", "createdAt": "2024-01-15T10:30:00"}
        ]"#;
        let parsed = parse_records(text).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].id, "b");
    }

    #[test]
    fn object_without_service_is_skipped() {
        let text = r#"[{"id": "a", "createdAt": "2024-01-15T10:30:00"}]"#;
        assert_eq!(parse_records(text).unwrap(), Vec::new());
    }

    #[test]
    fn object_with_empty_id_is_skipped() {
        let text = r#"[
            {"id": "", "service": "s", "createdAt": "2024-01-15T10:30:00"},
            {"id": "b", "service": "t", "createdAt": "2024-01-15T10:30:00"}
        ]"#;
        let parsed = parse_records(text).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].id, "b");
    }

    #[test]
    fn object_with_empty_service_is_skipped() {
        let text = r#"[{"id": "a", "service": "", "createdAt": "2024-01-15T10:30:00"}]"#;
        assert_eq!(parse_records(text).unwrap(), Vec::new());
    }

    #[test]
    fn bad_timestamp_fails_the_whole_parse() {
        let text = r#"[
            {"id": "a", "service": "s", "createdAt": "2024-01-15T10:30:00"},
            {"id": "b", "service": "t", "createdAt": "not a date"}
        ]"#;
        assert!(matches!(
            parse_records(text),
            Err(PassVaultError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn missing_timestamp_fails_the_whole_parse() {
        let text = r#"[{"id": "a", "service": "s"}]"#;
        assert!(matches!(
            parse_records(text),
            Err(PassVaultError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn minute_precision_timestamps_are_accepted() {
        let text = r#"[{"id": "a", "service": "s", "createdAt": "2024-01-15T10:30"}]"#;
        let parsed = parse_records(text).unwrap();
        assert_eq!(parsed[0].created_at, sample_time());
    }

    #[test]
    fn fractional_second_timestamps_are_accepted() {
        let text = r#"[{"id": "a", "service": "s", "createdAt": "2024-01-15T10:30:00.250"}]"#;
        let parsed = parse_records(text).unwrap();
        assert_eq!(parsed[0].created_at.and_utc().timestamp_subsec_millis(), 250);
    }

    #[test]
    fn text_without_an_array_parses_to_no_records() {
        assert_eq!(parse_records("").unwrap(), Vec::new());
        assert_eq!(parse_records("not json at all").unwrap(), Vec::new());
        assert_eq!(parse_records("{\"id\": \"a\"}").unwrap(), Vec::new());
    }

    #[test]
    fn truncated_trailing_object_is_dropped() {
        let complete = serialize_records(&[sample_record("keep")]);
        let truncated = format!(
            "{}\n  {{\n    \"id\": \"lost\", \"service\": \"s",
            &complete[..complete.len() - 1]
        );

        let parsed = parse_records(&truncated).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].id, "keep");
    }

    #[test]
    fn unknown_escapes_drop_the_backslash() {
        let text = r#"[{"id": "a", "service": "s", "notes": "q\z", "createdAt": "2024-01-15T10:30:00"}]"#;
        let parsed = parse_records(text).unwrap();
        assert_eq!(parsed[0].notes, "qz");
    }

    #[test]
    fn escape_and_unescape_are_inverse_on_the_escapable_set() {
        let raw = "\\ \" \n \r \t mixed";
        assert_eq!(unescape(&escape(raw)), raw);
        assert_eq!(escape(raw), "\\\\ \\\" \\n \\r \\t mixed");
    }

    #[test]
    fn extract_ignores_keys_quoted_inside_values() {
        let object = r#""notes": "fake \"id\": \"evil\"", "id": "real""#;
        assert_eq!(extract_string_field(object, "id").unwrap(), "real");
    }

    #[test]
    fn extract_skips_values_that_equal_a_key_name() {
        let object = r#""username": "password", "password": "hunter2""#;
        assert_eq!(extract_string_field(object, "password").unwrap(), "hunter2");
    }

    #[test]
    fn username_equal_to_password_key_does_not_shadow_the_password() {
        let mut record = sample_record("dup");
        record.username = "password".to_string();

        let parsed = parse_records(&serialize_records(&[record.clone()])).unwrap();
        assert_eq!(parsed, vec![record]);
        assert_eq!(parsed[0].password, "hunter2");
    }

    #[test]
    fn username_equal_to_timestamp_key_does_not_break_the_parse() {
        let mut record = sample_record("ts");
        record.username = "createdAt".to_string();

        let parsed = parse_records(&serialize_records(&[record.clone()])).unwrap();
        assert_eq!(parsed, vec![record]);
    }
}
