//! Epoch-seconds timestamp codec
//!
//! Serde `with`-modules encoding `DateTime<Utc>` as seconds since the Unix
//! epoch. Decoding also accepts documents written by an older format: a
//! human-readable timestamp string (RFC 3339, `%Y-%m-%d %H:%M:%S`, or a bare
//! date), and, for the optional variant, an explicit null.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::Deserialize;

/// Accepted wire representations of a timestamp
#[derive(Deserialize)]
#[serde(untagged)]
enum TimeRepr {
    Seconds(i64),
    SecondsFloat(f64),
    Text(String),
}

impl TimeRepr {
    fn into_datetime(self) -> Result<DateTime<Utc>, String> {
        match self {
            TimeRepr::Seconds(secs) => DateTime::from_timestamp(secs, 0)
                .ok_or_else(|| format!("timestamp {} out of range", secs)),
            TimeRepr::SecondsFloat(secs) => {
                DateTime::from_timestamp_millis((secs * 1000.0).round() as i64)
                    .ok_or_else(|| format!("timestamp {} out of range", secs))
            }
            TimeRepr::Text(text) => parse_legacy(&text),
        }
    }
}

/// Parse a timestamp string written by the older human-readable format
fn parse_legacy(text: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Ok(naive.and_utc());
    }

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }

    Err(format!("unrecognized timestamp '{}'", text))
}

/// Encode/decode a required timestamp as epoch seconds
pub mod unix_seconds {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(value.timestamp())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        TimeRepr::deserialize(deserializer)?
            .into_datetime()
            .map_err(serde::de::Error::custom)
    }
}

/// Encode/decode an optional timestamp as epoch seconds or null
pub mod unix_seconds_opt {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_i64(dt.timestamp()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<TimeRepr>::deserialize(deserializer)? {
            Some(repr) => repr
                .into_datetime()
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Debug, Serialize, Deserialize)]
    struct Stamp {
        #[serde(with = "unix_seconds")]
        at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    struct MaybeStamp {
        #[serde(with = "unix_seconds_opt")]
        at: Option<DateTime<Utc>>,
    }

    fn instant(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn test_encodes_epoch_seconds() {
        let json = serde_json::to_string(&Stamp { at: instant(10) }).unwrap();
        assert_eq!(json, r#"{"at":10}"#);
    }

    #[test]
    fn test_decodes_epoch_seconds() {
        let stamp: Stamp = serde_json::from_str(r#"{"at":10}"#).unwrap();
        assert_eq!(stamp.at, instant(10));
    }

    #[test]
    fn test_decodes_fractional_seconds() {
        let stamp: Stamp = serde_json::from_str(r#"{"at":10.5}"#).unwrap();
        assert_eq!(stamp.at, DateTime::from_timestamp_millis(10_500).unwrap());
    }

    #[test]
    fn test_decodes_bare_date() {
        let stamp: Stamp = serde_json::from_str(r#"{"at":"2020-01-01"}"#).unwrap();
        assert_eq!(stamp.at, "2020-01-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap());
    }

    #[test]
    fn test_decodes_rfc3339() {
        let stamp: Stamp = serde_json::from_str(r#"{"at":"2020-06-01T12:30:00Z"}"#).unwrap();
        assert_eq!(stamp.at, "2020-06-01T12:30:00Z".parse::<DateTime<Utc>>().unwrap());
    }

    #[test]
    fn test_decodes_space_separated_datetime() {
        let stamp: Stamp = serde_json::from_str(r#"{"at":"2020-06-01 12:30:00"}"#).unwrap();
        assert_eq!(stamp.at, "2020-06-01T12:30:00Z".parse::<DateTime<Utc>>().unwrap());
    }

    #[test]
    fn test_rejects_garbage_for_required_target() {
        let result: Result<Stamp, _> = serde_json::from_str(r#"{"at":"not a date"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_null_accepted_for_optional_target() {
        let stamp: MaybeStamp = serde_json::from_str(r#"{"at":null}"#).unwrap();
        assert!(stamp.at.is_none());
    }

    #[test]
    fn test_optional_round_trip() {
        let json = serde_json::to_string(&MaybeStamp { at: Some(instant(10)) }).unwrap();
        assert_eq!(json, r#"{"at":10}"#);

        let stamp: MaybeStamp = serde_json::from_str(&json).unwrap();
        assert_eq!(stamp.at, Some(instant(10)));
    }
}
