//! Value-level helpers used by the column transforms.

use std::fmt;

use chrono::format::{
    Fixed, Item, Numeric, Pad, ParseResult, Parsed, StrftimeItems, parse, parse_and_remainder,
};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Result, ScrubberError};

/// RFC 5322 address pattern (emailregex.com), anchored at both ends.
///
/// Case-sensitive: upper-case local parts and domains do not match.
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r#"^(?:(?:[a-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-z0-9!#$%&'*+/=?^_`{|}~-]+)*"#,
        r#"|"(?:[\x01-\x08\x0b\x0c\x0e-\x1f\x21\x23-\x5b\x5d-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])*")"#,
        r#"@(?:(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z0-9](?:[a-z0-9-]*[a-z0-9])?"#,
        r#"|\[(?:(?:(2(5[0-5]|[0-4][0-9])|1[0-9][0-9]|[1-9]?[0-9]))\.){3}"#,
        r#"(?:(2(5[0-5]|[0-4][0-9])|1[0-9][0-9]|[1-9]?[0-9])|[a-z0-9-]*[a-z0-9]:"#,
        r#"(?:[\x01-\x08\x0b\x0c\x0e-\x1f\x21-\x5a\x53-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])+)\]))$"#,
    ))
    .unwrap()
});

/// Check whether a value is an email address.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

/// Convert a column name to camelCase.
///
/// Names containing a space are split on whitespace; the first word is
/// lowercased entirely and the remaining words are appended unchanged.
/// Names without a space only get their first character lowercased.
pub fn camel_case(name: &str) -> String {
    if name.contains(' ') {
        let mut words = name.split_whitespace();
        let first = words.next().map(str::to_lowercase).unwrap_or_default();
        std::iter::once(first)
            .chain(words.map(str::to_string))
            .collect()
    } else {
        lowercase_first(name)
    }
}

fn lowercase_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(c) => c.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Reformats date strings: parse with one strftime pattern, read the result
/// as UTC, shift it into a target timezone and render with another pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateConverter {
    parse_format: String,
    render_format: String,
}

impl DateConverter {
    /// Create a converter, rejecting format strings with unknown specifiers.
    pub fn new(parse_format: impl Into<String>, render_format: impl Into<String>) -> Result<Self> {
        let parse_format = parse_format.into();
        let render_format = render_format.into();
        check_format(&parse_format)?;
        check_format(&render_format)?;
        Ok(Self {
            parse_format,
            render_format,
        })
    }

    pub fn parse_format(&self) -> &str {
        &self.parse_format
    }

    pub fn render_format(&self) -> &str {
        &self.render_format
    }

    /// Parse `value` as a UTC wall-clock time.
    ///
    /// The parse pattern follows `strptime`: fields it leaves out default to
    /// 1900-01-01 00:00:00, `%f` reads one to six fraction digits and `%z`
    /// also accepts `Z`. An explicit offset in the input is ignored; the wall
    /// time is always read as UTC.
    pub fn parse(&self, value: &str) -> Result<DateTime<Utc>> {
        let naive =
            strptime(value, &self.parse_format).map_err(|source| ScrubberError::DateParse {
                value: value.to_string(),
                format: self.parse_format.clone(),
                source,
            })?;
        Ok(Utc.from_utc_datetime(&naive))
    }

    /// Convert one value into `tz` and render it.
    ///
    /// `%f` in the render pattern prints microseconds (six digits).
    pub fn convert<Tz>(&self, value: &str, tz: &Tz) -> Result<String>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let utc = self.parse(value)?;
        Ok(utc
            .with_timezone(tz)
            .format(&strftime_pattern(&self.render_format))
            .to_string())
    }
}

fn strptime(value: &str, format: &str) -> ParseResult<NaiveDateTime> {
    let mut parsed = Parsed::new();
    let mut rest = value;
    let mut pending: Vec<Item<'_>> = Vec::new();

    for item in StrftimeItems::new(format) {
        match item {
            Item::Numeric(Numeric::Nanosecond, _) => {
                rest = parse_and_remainder(&mut parsed, rest, pending.drain(..))?;
                rest = parse_fraction(&mut parsed, rest)?;
            }
            Item::Fixed(Fixed::TimezoneOffset) => {
                pending.push(Item::Fixed(Fixed::TimezoneOffsetZ))
            }
            Item::Fixed(Fixed::TimezoneOffsetColon) => {
                pending.push(Item::Fixed(Fixed::TimezoneOffsetColonZ))
            }
            other => pending.push(other),
        }
    }
    parse(&mut parsed, rest, pending.into_iter())?;

    fill_defaults(&mut parsed);
    let date = parsed.to_naive_date()?;
    let time = parsed.to_naive_time()?;
    Ok(date.and_time(time))
}

/// Read one to six digits as a fraction of a second.
fn parse_fraction<'s>(parsed: &mut Parsed, s: &'s str) -> ParseResult<&'s str> {
    let digits = s.bytes().take(6).take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        // No digits: let chrono report the missing number.
        let item = Item::Numeric(Numeric::Nanosecond, Pad::Zero);
        return parse_and_remainder(parsed, s, std::iter::once(item));
    }

    let (fraction, rest) = s.split_at(digits);
    let value = fraction
        .bytes()
        .fold(0i64, |acc, b| acc * 10 + i64::from(b - b'0'));
    parsed.set_nanosecond(value * 10i64.pow(9 - digits as u32))?;
    Ok(rest)
}

/// Fill the fields `strptime` defaults: year 1900, January, day 1, midnight.
fn fill_defaults(parsed: &mut Parsed) {
    let week_based = parsed.week_from_sun.is_some()
        || parsed.week_from_mon.is_some()
        || parsed.isoweek.is_some();

    if parsed.year.is_none() && parsed.year_div_100.is_none() && parsed.isoyear.is_none() {
        // Two-digit years pivot at 69, as strptime does.
        parsed.year = Some(match parsed.year_mod_100 {
            Some(r @ 0..=68) => 2000 + r,
            Some(r) => 1900 + r,
            None => 1900,
        });
    }

    if !week_based {
        // Weekday names are only used to resolve week numbers.
        parsed.weekday = None;
        if parsed.ordinal.is_none() {
            parsed.month.get_or_insert(1);
            parsed.day.get_or_insert(1);
        }
    }

    if parsed.hour_mod_12.is_none() {
        // An AM/PM marker without an hour is ignored.
        parsed.hour_div_12 = Some(0);
        parsed.hour_mod_12 = Some(0);
    } else {
        parsed.hour_div_12.get_or_insert(0);
    }
    parsed.minute.get_or_insert(0);
    parsed.second.get_or_insert(0);
}

/// Rewrite `%f` (microseconds in `strftime`) to chrono's `%6f`.
fn strftime_pattern(format: &str) -> String {
    let mut out = String::with_capacity(format.len() + 2);
    let mut chars = format.chars();
    while let Some(c) = chars.next() {
        out.push(c);
        if c == '%' {
            match chars.next() {
                Some('f') => out.push_str("6f"),
                Some(next) => out.push(next),
                None => {}
            }
        }
    }
    out
}

fn check_format(format: &str) -> Result<()> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(ScrubberError::InvalidDateFormat {
            format: format.to_string(),
        });
    }
    Ok(())
}
