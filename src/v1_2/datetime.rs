/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::v1_2::entities::DATE_TIME;
use crate::v1_2::errors::ZenfolioError;
use crate::v1_2::object::{FieldMap, ObjectValue, TypedObject};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

pub(crate) const VALUE_FIELD: &str = "Value";

/// Creates a `DateTime` object holding the timestamp
pub fn date_time(ts: NaiveDateTime) -> Result<TypedObject, ZenfolioError> {
    let mut source = FieldMap::new();
    source.insert(VALUE_FIELD.to_string(), ObjectValue::Timestamp(ts));
    TypedObject::from_sources(DATE_TIME, [source])
}

/// Parses `YYYY-MM-DD HH:MM:SS`.
///
/// The year takes four or more digits, the other groups two or more. Text after the seconds is
/// ignored.
pub fn parse_timestamp(text: &str) -> Result<NaiveDateTime, ZenfolioError> {
    let err = || ZenfolioError::DateTimeParse(text.to_string());

    let mut groups = [0i64; 6];
    let mut rest = text;
    let layout = [
        (4, Some('-')),
        (2, Some('-')),
        (2, Some(' ')),
        (2, Some(':')),
        (2, Some(':')),
        (2, None),
    ];
    for (group, (min_digits, separator)) in groups.iter_mut().zip(layout) {
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits < min_digits {
            return Err(err());
        }
        *group = rest[..digits].parse().map_err(|_| err())?;
        rest = &rest[digits..];
        if let Some(separator) = separator {
            rest = rest.strip_prefix(separator).ok_or_else(err)?;
        }
    }

    let [year, month, day, hour, minute, second] = groups;
    let small = |v: i64| u32::try_from(v).map_err(|_| err());
    NaiveDate::from_ymd_opt(
        i32::try_from(year).map_err(|_| err())?,
        small(month)?,
        small(day)?,
    )
    .and_then(|date| date.and_hms_opt(small(hour).ok()?, small(minute).ok()?, small(second).ok()?))
    .ok_or_else(err)
}

/// Formats as zero padded `YYYY-MM-DD HH:MM:SS`
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
        ts.year(),
        ts.month(),
        ts.day(),
        ts.hour(),
        ts.minute(),
        ts.second()
    )
}

// Normalizes what gets stored in a DateTime's Value field
pub(crate) fn coerce(value: ObjectValue) -> Result<ObjectValue, ZenfolioError> {
    match value {
        ObjectValue::Null | ObjectValue::Timestamp(_) => Ok(value),
        ObjectValue::String(s) => Ok(ObjectValue::Timestamp(parse_timestamp(&s)?)),
        other => Err(ZenfolioError::DateTimeParse(other.to_string())),
    }
}
