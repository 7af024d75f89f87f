//! Line parser for NS2 wired trace files.
//!
//! Each line carries exactly twelve space-separated columns:
//!
//! ```text
//! event time from to type size flags flow_id src.port dst.port seq uid
//! r 1.3556 3 2 ack 40 ------- 1 3.0 0.0 15 201
//! ```
//!
//! Lines with a different column count are skipped. A numeric column that
//! fails to decode aborts the whole parse.

use super::schema::{Address, TraceEvent, TraceRecord};
use crate::utils::config::TRACE_FIELD_COUNT;
use crate::utils::error::ParseError;
use log::debug;
use std::fmt;
use std::io::BufRead;
use std::str::FromStr;

/// Column names, indexed by position in the line
const FIELD_NAMES: [&str; TRACE_FIELD_COUNT] = [
    "event",
    "time",
    "from_node",
    "to_node",
    "packet_type",
    "packet_size",
    "flags",
    "flow_id",
    "source_addr",
    "dest_addr",
    "sequence_num",
    "unique_packet_id",
];

/// Parse a whole trace already split into lines
///
/// **Public** - main entry point for parsing
///
/// # Arguments
/// * `lines` - Raw trace lines, in file order
///
/// # Returns
/// Every record decoded from a 12-field line, in input order
///
/// # Errors
/// * `ParseError::InvalidField` - first numeric column that failed to decode.
///   Records decoded before the failing line are discarded. A time that is
///   NaN, infinite or negative fails here, as do negative node ids and
///   packet sizes.
pub fn parse_trace<I, S>(lines: I) -> Result<Vec<TraceRecord>, ParseError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parser = TraceParser::default();
    for line in lines {
        parser.push(line.as_ref())?;
    }
    Ok(parser.finish())
}

/// Parse a trace from any buffered reader (file, upload body, stdin)
///
/// Trailing carriage returns are stripped so CRLF traces parse like LF ones.
///
/// # Errors
/// * `ParseError::Io` - the reader failed
/// * `ParseError::InvalidField` - see [`parse_trace`]
pub fn parse_trace_reader<R: BufRead>(reader: R) -> Result<Vec<TraceRecord>, ParseError> {
    let mut parser = TraceParser::default();
    for line in reader.lines() {
        let line = line?;
        parser.push(line.strip_suffix('\r').unwrap_or(&line))?;
    }
    Ok(parser.finish())
}

/// Parse a single trace line
///
/// # Arguments
/// * `line` - Raw line without its terminator
/// * `line_no` - 1-based line number, used in error messages
///
/// # Returns
/// `Ok(None)` when the line does not have exactly twelve columns
pub fn parse_line(line: &str, line_no: usize) -> Result<Option<TraceRecord>, ParseError> {
    Ok(decode_line(line, line_no)?.map(|(record, _)| record))
}

/// Accumulates records line by line and keeps parse statistics
#[derive(Debug, Default)]
struct TraceParser {
    records: Vec<TraceRecord>,
    line_no: usize,
    skipped: usize,
    unknown_events: usize,
}

impl TraceParser {
    fn push(&mut self, line: &str) -> Result<(), ParseError> {
        self.line_no += 1;
        match decode_line(line, self.line_no)? {
            Some((record, known_event)) => {
                if !known_event {
                    self.unknown_events += 1;
                }
                self.records.push(record);
            }
            None => self.skipped += 1,
        }
        Ok(())
    }

    fn finish(self) -> Vec<TraceRecord> {
        debug!(
            "Parsed {} records from {} lines ({} skipped)",
            self.records.len(),
            self.line_no,
            self.skipped
        );
        if self.unknown_events > 0 {
            debug!(
                "{} records had an unrecognised event code and were read as receive events",
                self.unknown_events
            );
        }
        self.records
    }
}

/// Decode one line, also reporting whether its event code was recognised
///
/// **Private** - shared by parse_line and TraceParser
fn decode_line(line: &str, line_no: usize) -> Result<Option<(TraceRecord, bool)>, ParseError> {
    let fields: Vec<&str> = line.split(' ').collect();
    if fields.len() != TRACE_FIELD_COUNT {
        return Ok(None);
    }

    // Unknown codes fall back to Receive
    let event = TraceEvent::from_code(fields[0]);
    let known_event = event.is_some();

    let record = TraceRecord {
        event: event.unwrap_or_default(),
        time: parse_time(&fields, line_no)?,
        from_node: parse_field(&fields, 2, line_no)?,
        to_node: parse_field(&fields, 3, line_no)?,
        packet_type: fields[4].to_string(),
        packet_size: parse_field(&fields, 5, line_no)?,
        flags: 0,
        flow_id: parse_field(&fields, 7, line_no)?,
        source_addr: parse_address(fields[8]),
        dest_addr: parse_address(fields[9]),
        sequence_num: parse_field(&fields, 10, line_no)?,
        unique_packet_id: parse_field(&fields, 11, line_no)?,
    };

    Ok(Some((record, known_event)))
}

/// Decode the time column, which must be finite and non-negative
///
/// **Private** - internal utility
fn parse_time(fields: &[&str], line_no: usize) -> Result<f64, ParseError> {
    let time: f64 = parse_field(fields, 1, line_no)?;
    if !time.is_finite() || time < 0.0 {
        return Err(ParseError::InvalidField {
            line: line_no,
            field: FIELD_NAMES[1],
            index: 1,
            value: fields[1].to_string(),
            reason: "time must be a finite, non-negative number".to_string(),
        });
    }
    Ok(time)
}

/// Decode a required numeric column
///
/// **Private** - internal utility
fn parse_field<T>(fields: &[&str], index: usize, line_no: usize) -> Result<T, ParseError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = fields[index];
    raw.parse::<T>().map_err(|e| ParseError::InvalidField {
        line: line_no,
        field: FIELD_NAMES[index],
        index,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

/// Decode an `address.port` column
///
/// Malformed or missing components become 0 instead of failing the record.
pub fn parse_address(raw: &str) -> Address {
    let mut parts = raw.split('.');
    let mut next_component = || {
        parts
            .next()
            .and_then(|part| part.parse::<i64>().ok())
            .unwrap_or(0)
    };
    let address = next_component();
    let port = next_component();
    Address { address, port }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TCP_RECEIVE: &str = "r 1.84471 2 3 tcp 1040 ------- 1 0.0 3.0 29 199";

    #[test]
    fn test_parse_line_all_fields() {
        let record = parse_line(TCP_RECEIVE, 1).unwrap().unwrap();

        assert_eq!(record.event, TraceEvent::Receive);
        assert_eq!(record.time, 1.84471);
        assert_eq!(record.from_node, 2);
        assert_eq!(record.to_node, 3);
        assert_eq!(record.packet_type, "tcp");
        assert_eq!(record.packet_size, 1040);
        assert_eq!(record.flags, 0);
        assert_eq!(record.flow_id, 1);
        assert_eq!(record.source_addr, Address { address: 0, port: 0 });
        assert_eq!(record.dest_addr, Address { address: 3, port: 0 });
        assert_eq!(record.sequence_num, 29);
        assert_eq!(record.unique_packet_id, 199);
    }

    #[test]
    fn test_wrong_field_count_is_skipped() {
        assert!(parse_line("", 1).unwrap().is_none());
        assert!(parse_line("r 1.0 0 1 tcp", 1).unwrap().is_none());
        // Double space produces an empty column, so 13 fields
        assert!(parse_line("r  1.0 0 1 tcp 1000 - 7 0.0 1.0 1 100", 1)
            .unwrap()
            .is_none());
        // Garbage in a short line is never an error
        assert!(parse_line("x y z", 1).unwrap().is_none());
    }

    #[test]
    fn test_unknown_event_defaults_to_receive() {
        let (record, known) = decode_line("h 1.0 0 1 tcp 1000 - 7 0.0 1.0 1 100", 1)
            .unwrap()
            .unwrap();
        assert_eq!(record.event, TraceEvent::Receive);
        assert!(!known);
    }

    #[test]
    fn test_bad_time_reports_field() {
        let err = parse_line("r abc 0 1 tcp 1000 - 7 0.0 1.0 1 100", 4).unwrap_err();
        match err {
            ParseError::InvalidField {
                line,
                field,
                index,
                value,
                ..
            } => {
                assert_eq!(line, 4);
                assert_eq!(field, "time");
                assert_eq!(index, 1);
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_finite_or_negative_time_rejected() {
        for raw in ["nan", "NaN", "inf", "-inf", "-1.0"] {
            let line = format!("r {} 0 1 tcp 1000 - 7 0.0 1.0 1 100", raw);
            match parse_line(&line, 2) {
                Err(ParseError::InvalidField { field, value, .. }) => {
                    assert_eq!(field, "time");
                    assert_eq!(value, raw);
                }
                other => panic!("expected time error for '{raw}', got {other:?}"),
            }
        }
    }

    #[test]
    fn test_negative_node_and_size_rejected() {
        let err = parse_line("r 1.0 -1 1 tcp 1000 - 7 0.0 1.0 1 100", 1).unwrap_err();
        assert!(matches!(err, ParseError::InvalidField { field: "from_node", .. }));

        let err = parse_line("r 1.0 0 1 tcp -40 - 7 0.0 1.0 1 100", 1).unwrap_err();
        assert!(matches!(err, ParseError::InvalidField { field: "packet_size", .. }));
    }

    #[test]
    fn test_flags_column_is_not_decoded() {
        let record = parse_line("r 1.0 0 1 tcp 1000 not-a-number 7 0.0 1.0 1 100", 1)
            .unwrap()
            .unwrap();
        assert_eq!(record.flags, 0);
    }

    #[test]
    fn test_parse_address_lenient() {
        assert_eq!(parse_address("4.2"), Address { address: 4, port: 2 });
        assert_eq!(parse_address("4"), Address { address: 4, port: 0 });
        assert_eq!(parse_address("x.7"), Address { address: 0, port: 7 });
        assert_eq!(parse_address(""), Address::default());
        assert_eq!(parse_address("1.2.3"), Address { address: 1, port: 2 });
    }

    #[test]
    fn test_parse_trace_reader_strips_crlf() {
        let input = "r 1.0 0 1 tcp 1000 - 7 0.0 1.0 1 100\r\nr 2.0 0 1 tcp 1000 - 7 0.0 1.0 2 101\r\n";
        let records = parse_trace_reader(input.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].unique_packet_id, 101);
    }
}
