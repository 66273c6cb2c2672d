//! Descriptor-driven console input.
//!
//! [`InputCollector`] walks a record kind's field descriptors in order, prompting for
//! every field that is not ignored and re-prompting until the typed value is valid.

use std::io::{self, BufRead, Write};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::debug;

use crate::schema::{FieldDescriptor, FieldType, FieldValue, Record};
use crate::{Error, Result};

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"];

/// Reads one line per prompt from `reader` and writes prompts and errors to `writer`.
pub struct InputCollector<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> InputCollector<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn writer(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }

    /// Builds a new `T` from console input, one field at a time.
    pub fn collect<T: Record>(&mut self) -> Result<T> {
        let mut record = T::default();

        for field in T::fields().iter().filter(|f| !f.ignore) {
            write!(self.writer, "{}: ", field.prompt)?;
            self.writer.flush()?;

            let value = loop {
                let raw = self.read_line()?;
                match try_parse_input(&raw, field) {
                    Ok(value) => break value,
                    Err(e) => {
                        debug!("Rejected input for {}: {}", field.name, e);
                        writeln!(self.writer)?;
                        writeln!(self.writer, "Error: Invalid input!")?;
                        writeln!(
                            self.writer,
                            "Please try a value that is {} as {}",
                            field.field_type.friendly_name(),
                            field.name
                        )?;
                        writeln!(self.writer)?;
                        write!(self.writer, "{}: ", field.name)?;
                        self.writer.flush()?;
                    }
                }
            };

            record.set_field_value(field.name, value)?;
        }

        Ok(record)
    }

    /// Reads one line without its terminator. End of input is an error.
    pub fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed while waiting for a value",
            )));
        }
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(line)
    }
}

/// Converts raw text into a value for `field`, applying the required and minimum checks.
///
/// Text that does not convert is [`Error::Parse`]; required-but-empty and
/// below-minimum input is [`Error::Validation`].
pub fn try_parse_input(raw: &str, field: &FieldDescriptor) -> Result<FieldValue> {
    if raw.is_empty() {
        if field.required {
            return Err(invalid(field));
        }
        return Ok(field.field_type.zero_value());
    }

    let value = parse_value(raw, &field.field_type).ok_or_else(|| {
        Error::Parse(format!(
            "{:?} is not {} for {}",
            raw,
            field.field_type.friendly_name(),
            field.name
        ))
    })?;

    if let FieldValue::Integer(n) = value {
        if n < field.min_value {
            return Err(invalid(field));
        }
    }

    Ok(value)
}

fn invalid(field: &FieldDescriptor) -> Error {
    Error::Validation {
        field: field.name.to_string(),
        expected: field.field_type.friendly_name(),
    }
}

fn parse_value(raw: &str, field_type: &FieldType) -> Option<FieldValue> {
    match field_type {
        FieldType::Text => Some(FieldValue::Text(raw.to_string())),
        FieldType::Integer => raw.trim().parse().ok().map(FieldValue::Integer),
        FieldType::Decimal => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(FieldValue::Decimal),
        FieldType::Boolean => parse_bool(raw.trim()).map(FieldValue::Boolean),
        FieldType::DateTime => parse_datetime(raw.trim()).map(FieldValue::DateTime),
        FieldType::List(inner) => raw
            .split(',')
            .map(|item| parse_value(item.trim(), inner))
            .collect::<Option<Vec<_>>>()
            .map(FieldValue::List),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Parses RFC 3339 (offset dropped, local clock time kept) or a naive date/time.
pub(crate) fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Player, Team};
    use std::io::Cursor;

    fn collector(input: &str) -> InputCollector<Cursor<Vec<u8>>, Vec<u8>> {
        InputCollector::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output(c: InputCollector<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(c.into_inner().1).unwrap()
    }

    #[test]
    fn test_collect_player() {
        let mut c = collector("Jane\nDoe\nRed\n10\n");
        let player: Player = c.collect().unwrap();
        assert_eq!(player.first_name, "Jane");
        assert_eq!(player.last_name, "Doe");
        assert_eq!(player.team, "Red");
        assert_eq!(player.age, 10);
        assert_eq!(player.player_id, 0);

        let out = output(c);
        assert_eq!(out, "First Name: Last Name: Team: Age: ");
    }

    #[test]
    fn test_age_below_minimum_reprompts() {
        let mut c = collector("Jane\nDoe\nRed\n0\n1\n");
        let player: Player = c.collect().unwrap();
        assert_eq!(player.age, 1);

        let out = output(c);
        assert!(out.contains("Error: Invalid input!"));
        assert!(out.contains("Please try a value that is a number as Age"));
        assert!(out.ends_with("\nAge: "));
    }

    #[test]
    fn test_required_empty_reprompts() {
        let mut c = collector("\n\nJane\nDoe\nRed\n12\n");
        let player: Player = c.collect().unwrap();
        assert_eq!(player.first_name, "Jane");

        let out = output(c);
        assert_eq!(out.matches("Error: Invalid input!").count(), 2);
        assert!(out.contains("Please try a value that is text only as FirstName"));
    }

    #[test]
    fn test_non_numeric_reprompts() {
        let mut c = collector("Jane\nDoe\nRed\nten\n 11 \n");
        let player: Player = c.collect().unwrap();
        assert_eq!(player.age, 11);
    }

    #[test]
    fn test_optional_empty_is_zero_value() {
        let mut c = collector("\n");
        let team: Team = c.collect().unwrap();
        assert_eq!(team.team_name, "");
        assert_eq!(output(c), "TeamName: ");
    }

    #[test]
    fn test_crlf_is_stripped() {
        let mut c = collector("Blue\r\n");
        let team: Team = c.collect().unwrap();
        assert_eq!(team.team_name, "Blue");
    }

    #[test]
    fn test_end_of_input_is_error() {
        let mut c = collector("Jane\n");
        let res = c.collect::<Player>();
        assert!(matches!(res, Err(Error::Io(e)) if e.kind() == io::ErrorKind::UnexpectedEof));
    }

    #[test]
    fn test_parse_optional_integer() {
        let field = FieldDescriptor::new("Count", FieldType::Integer).with_min_value(5);
        assert_eq!(try_parse_input("", &field).unwrap(), FieldValue::Integer(0));
        assert!(try_parse_input("4", &field).is_err());
        assert_eq!(try_parse_input("5", &field).unwrap(), FieldValue::Integer(5));
    }

    #[test]
    fn test_parse_boolean() {
        let field = FieldDescriptor::new("Active", FieldType::Boolean).required();
        assert_eq!(try_parse_input("True", &field).unwrap(), FieldValue::Boolean(true));
        assert_eq!(try_parse_input("false", &field).unwrap(), FieldValue::Boolean(false));
        let err = try_parse_input("yes", &field).unwrap_err();
        assert!(matches!(err, Error::Parse(msg) if msg.contains("either true or false")));
    }

    #[test]
    fn test_parse_decimal() {
        let field = FieldDescriptor::new("Height", FieldType::Decimal);
        assert_eq!(try_parse_input("1.75", &field).unwrap(), FieldValue::Decimal(1.75));
        assert!(try_parse_input("NaN", &field).is_err());
    }

    #[test]
    fn test_parse_datetime_formats() {
        let field = FieldDescriptor::new("When", FieldType::DateTime);
        let expected = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(try_parse_input("2024-03-09", &field).unwrap(), FieldValue::DateTime(expected));

        let with_time = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(14, 5, 0)
            .unwrap();
        assert_eq!(
            try_parse_input("2024-03-09 14:05:00", &field).unwrap(),
            FieldValue::DateTime(with_time)
        );
        assert_eq!(
            try_parse_input("2024-03-09T14:05:00+02:00", &field).unwrap(),
            FieldValue::DateTime(with_time)
        );
        assert!(try_parse_input("March 9th", &field).is_err());
    }

    #[test]
    fn test_parse_list() {
        let field = FieldDescriptor::new("Scores", FieldType::List(&FieldType::Integer));
        assert_eq!(
            try_parse_input("1, 2,3", &field).unwrap(),
            FieldValue::List(vec![
                FieldValue::Integer(1),
                FieldValue::Integer(2),
                FieldValue::Integer(3)
            ])
        );
        let err = try_parse_input("1,two", &field).unwrap_err();
        assert!(matches!(err, Error::Parse(msg) if msg.contains("List<a number>")));
    }

    #[test]
    fn test_failure_kinds() {
        let age = FieldDescriptor::new("Age", FieldType::Integer)
            .required()
            .with_min_value(1);

        let empty = try_parse_input("", &age).unwrap_err();
        assert!(matches!(empty, Error::Validation { field, expected } if field == "Age" && expected == "a number"));

        let below = try_parse_input("0", &age).unwrap_err();
        assert!(matches!(below, Error::Validation { .. }));

        let garbage = try_parse_input("ten", &age).unwrap_err();
        assert!(matches!(garbage, Error::Parse(msg) if msg.contains("Age")));
    }

    #[test]
    fn test_parse_datetime_fraction_and_offset() {
        let dt = parse_datetime("2019-05-03T10:20:30.1234567-04:00").unwrap();
        assert_eq!(dt.format("%Y-%m-%d %H:%M:%S%.9f").to_string(), "2019-05-03 10:20:30.123456700");
        let naive = parse_datetime("2019-05-03T10:20:30.1234567").unwrap();
        assert_eq!(naive, dt);
    }
}
