use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

pub type AnnouncementId = i64;

pub const DEFAULT_TITLE: &str = "Untitled";
pub const SEED_TITLE: &str = "Welcome to Announcements";
pub const SEED_CONTENT: &str = "This is your first announcement. Edit it from the admin panel.";

/// A single announcement as stored on disk and returned over HTTP.
///
/// Field names are camelCase on the wire; `updatedAt` is omitted until the
/// record has been updated at least once.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: AnnouncementId,
    pub title: String,
    pub content: String,
    #[serde(with = "timestamp")]
    pub date: DateTime<Utc>,
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "timestamp::option")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Create/update payload. Every field is optional; `null` and values of the
/// wrong JSON type count as "not supplied".
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct AnnouncementInput {
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "lenient::boolean")]
    pub active: Option<bool>,
}

impl AnnouncementInput {
    /// Build a fresh record, falling back to `"Untitled"`, `""` and `true`.
    pub fn into_announcement(self, id: AnnouncementId, now: DateTime<Utc>) -> Announcement {
        Announcement {
            id,
            title: self.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            content: self.content.unwrap_or_default(),
            date: now,
            active: self.active.unwrap_or(true),
            updated_at: None,
        }
    }

    /// Overwrite only the supplied fields; `updated_at` is always bumped.
    pub fn apply_to(self, existing: &mut Announcement, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            existing.title = title;
        }
        if let Some(content) = self.content {
            existing.content = content;
        }
        if let Some(active) = self.active {
            existing.active = active;
        }
        existing.updated_at = Some(now);
    }
}

/// `max(id) + 1`, or `1` for an empty collection.
///
/// A stored id of `i64::MAX` leaves no larger id to hand out; that is a
/// storage-level failure, never a wrap-around.
pub fn next_id(items: &[Announcement]) -> Result<AnnouncementId, ServiceError> {
    match items.iter().map(|a| a.id).max() {
        None => Ok(1),
        Some(max) => max
            .checked_add(1)
            .ok_or_else(|| ServiceError::Storage(format!("id space exhausted after {max}"))),
    }
}

/// Read the leading integer of a path identifier, `parseInt`-style.
///
/// Leading whitespace, an optional sign and a `0x` prefix are accepted, and
/// parsing stops at the first non-digit (`"1.5"` and `"1abc"` are both `1`).
/// No digits at all, or a value outside `i64`, never matches a record.
pub fn parse_id(raw: &str) -> Result<AnnouncementId, ServiceError> {
    let s = raw.trim_start();
    let (negative, s) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let (radix, s) = match s.get(..2) {
        Some("0x") | Some("0X") => (16, &s[2..]),
        _ => (10, s),
    };
    let end = s.find(|c: char| !c.is_digit(radix)).unwrap_or(s.len());
    let digits = &s[..end];
    if digits.is_empty() {
        return Err(ServiceError::NotFound);
    }
    let signed = if negative { format!("-{digits}") } else { digits.to_string() };
    AnnouncementId::from_str_radix(&signed, radix).map_err(|_| ServiceError::NotFound)
}

/// Collection written on first startup when no data file exists.
pub fn seed_collection(now: DateTime<Utc>) -> Vec<Announcement> {
    vec![Announcement {
        id: 1,
        title: SEED_TITLE.to_string(),
        content: SEED_CONTENT.to_string(),
        date: now,
        active: true,
        updated_at: None,
    }]
}

/// ISO-8601 UTC timestamps with millisecond precision (`2024-05-01T10:00:00.000Z`).
pub mod timestamp {
    use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Current time truncated to what survives a serialize/parse cycle.
    pub fn now() -> DateTime<Utc> {
        Utc::now().trunc_subsecs(3)
    }

    pub fn format(dt: &DateTime<Utc>) -> String {
        dt.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn parse(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        DateTime::parse_from_rfc3339(raw).map(|dt| dt.with_timezone(&Utc))
    }

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format(dt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(dt: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error> {
            match dt {
                Some(dt) => s.serialize_some(&format(dt)),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DateTime<Utc>>, D::Error> {
            match Option::<String>::deserialize(d)? {
                Some(raw) => parse(&raw).map(Some).map_err(serde::de::Error::custom),
                None => Ok(None),
            }
        }
    }
}

mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Option::<Value>::deserialize(d)? {
            Some(Value::String(s)) => Some(s),
            _ => None,
        })
    }

    pub fn boolean<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
        Ok(match Option::<Value>::deserialize(d)? {
            Some(Value::Bool(b)) => Some(b),
            _ => None,
        })
    }
}
