//! `YYYY-MM-DD` serde for `time::Date`. Stored rows serialize through the
//! top-level functions; payloads deserialize through [`option`]. Input may
//! also be a full RFC 3339 timestamp, in which case only its date part is kept.

use serde::{ser::Error as _, Serializer};
use time::{format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime};

pub fn parse(text: &str) -> Result<Date, time::error::Parse> {
    let text = text.trim();
    Date::parse(text, format_description!("[year]-[month]-[day]"))
        .or_else(|e| OffsetDateTime::parse(text, &Rfc3339).map(|t| t.date()).map_err(|_| e))
}

pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
    let text = date
        .format(format_description!("[year]-[month]-[day]"))
        .map_err(S::Error::custom)?;
    serializer.serialize_str(&text)
}

/// Absent, `null` and `""` all mean "no date".
pub mod option {
    use serde::{de::Error as _, Deserialize, Deserializer};
    use time::Date;

    use super::parse;

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Date>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(text) if !text.trim().is_empty() => parse(&text).map(Some).map_err(D::Error::custom),
            _ => Ok(None),
        }
    }
}
