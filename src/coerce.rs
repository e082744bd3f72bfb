//! Lenient field coercion for loosely typed backend payloads.
//!
//! Every raw value crosses into the canonical model through one of these
//! helpers. Numeric helpers never fail; a value that cannot be read is simply
//! absent. Text helpers only fail when the JSON type is structurally wrong
//! (an object or array where a name is expected).

use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case},
    character::complete::multispace0,
    combinator::{eof, opt},
    number::complete::double,
    IResult, Parser,
};
use serde_json::Value;

use crate::error::FieldError;

/// First alias present on the record with a non-null value.
pub fn field<'a>(record: &'a Value, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|key| record.get(*key))
        .find(|v| !v.is_null())
}

/// Read a number from a JSON number or a numeric string.
pub fn number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_number(s),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

pub fn number_field(record: &Value, aliases: &[&str]) -> Option<f64> {
    field(record, aliases).and_then(number)
}

/// Non-blank string value kept verbatim apart from surrounding whitespace.
pub fn string_field(record: &Value, aliases: &[&str]) -> Option<String> {
    field(record, aliases)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Raw string value, untouched. Blank strings count as absent.
pub fn raw_string_field(record: &Value, aliases: &[&str]) -> Option<String> {
    field(record, aliases)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

/// Parse a numeric string.
///
/// `"7.2"`, `" 7.2 "` and `"7.2 pH"` all read as 7.2. The number must make up
/// the whole string apart from one trailing unit; `"0x10"` and `"7.2abc"` are
/// rejected. A single comma with no dot is taken as the decimal separator.
pub fn parse_number(input: &str) -> Option<f64> {
    let normalized;
    let mut s = input.trim();
    if s.matches(',').count() == 1 && !s.contains('.') {
        normalized = s.replacen(',', ".", 1);
        s = &normalized;
    }
    match whole_number(s) {
        Ok((_, n)) if n.is_finite() => Some(n),
        _ => None,
    }
}

fn whole_number(input: &str) -> IResult<&str, f64> {
    let (input, _) = multispace0(input)?;
    let (input, n) = double(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = opt(unit).parse(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = eof(input)?;
    Ok((input, n))
}

fn unit(input: &str) -> IResult<&str, &str> {
    alt((
        tag("°C"),
        tag_no_case("ntu"),
        tag_no_case("ph"),
        tag("µS/cm"),
        tag("mS/cm"),
        tag("%"),
    ))
    .parse(input)
}

/// Read display text. Numbers are rendered, blank strings count as absent.
pub fn text(value: &Value, field: &'static str) -> Result<Option<String>, FieldError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => {
            let s = s.trim();
            Ok((!s.is_empty()).then(|| s.to_string()))
        }
        Value::Number(n) => Ok(Some(n.to_string())),
        _ => Err(FieldError {
            field,
            expected: "string or number",
        }),
    }
}

pub fn text_field(
    record: &Value,
    aliases: &[&'static str],
) -> Result<Option<String>, FieldError> {
    for key in aliases {
        match record.get(*key) {
            None | Some(Value::Null) => continue,
            Some(value) => return text(value, *key),
        }
    }
    Ok(None)
}

/// Read a boolean indicator in any of the shapes the backend emits.
pub fn flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|n| n != 0.0),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "1" | "true" | "sim" | "online" | "ativo" | "conectado" => Some(true),
            "0" | "false" | "nao" | "não" | "offline" | "inativo" | "desconectado" => {
                Some(false)
            }
            _ => None,
        },
        _ => None,
    }
}

pub fn flag_field(record: &Value, aliases: &[&str]) -> Option<bool> {
    aliases
        .iter()
        .filter_map(|key| record.get(*key))
        .find_map(flag)
}

/// Round and clamp to 0..=100.
pub fn percent(value: &Value) -> Option<u8> {
    number(value).map(|n| n.round().clamp(0.0, 100.0) as u8)
}

/// Non-negative whole count; negative values clamp to zero.
pub fn count(value: &Value) -> Option<u32> {
    number(value).map(|n| n.trunc().clamp(0.0, u32::MAX as f64) as u32)
}
