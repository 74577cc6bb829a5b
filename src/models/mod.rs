//! Data models exchanged with the library API

pub mod book;
pub mod loan;
pub mod member;

// Re-export commonly used types
pub use book::{Book, NewBook};
pub use loan::{IssueLoan, Loan, LoanStatus, ReturnLoan};
pub use member::{Member, NewMember};

/// Alert text for a form with an empty required field
pub const FILL_ALL_FIELDS: &str = "Fill all fields";

/// Parse the leading integer of a form value the way browser forms do
/// (`parseInt(value, 10)`): leading whitespace, an optional sign, then digits.
/// Anything after the digits is ignored. Unlike the browser, a value that does not fit
/// in an `i64` gives `None`.
pub fn parse_id(value: &str) -> Option<i64> {
    let trimmed = value.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_len = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
    if digits_len == 0 {
        return None;
    }
    let magnitude: i64 = rest[..digits_len].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Number of copies entered in the add-book form; unparseable, empty, zero or out of range
/// means 1
pub fn parse_copies(value: &str) -> i64 {
    match parse_id(value) {
        Some(0) | None => 1,
        Some(n) => n,
    }
}

/// Serde helpers for API timestamps.
///
/// The backend emits naive ISO 8601 (`2024-03-01T10:15:00.123456`) in UTC; RFC 3339 with an
/// offset is accepted too and normalised to UTC.
pub(crate) mod timestamp {
    use chrono::{DateTime, NaiveDateTime};
    use serde::{de, Deserialize, Deserializer, Serializer};

    const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

    pub fn parse(raw: &str) -> Option<NaiveDateTime> {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.naive_utc())
            .or_else(|_| NaiveDateTime::parse_from_str(raw, NAIVE_FORMAT))
            .ok()
    }

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(NAIVE_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp: {}", raw)))
    }

    pub mod option {
        use chrono::NaiveDateTime;
        use serde::{de, Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<NaiveDateTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(dt) => super::serialize(dt, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveDateTime>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) => super::parse(&raw)
                    .map(Some)
                    .ok_or_else(|| de::Error::custom(format!("invalid timestamp: {}", raw))),
                None => Ok(None),
            }
        }
    }
}
