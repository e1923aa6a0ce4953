use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses a backend timestamp. Offsets are honoured; naive values are UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Short month + year label, e.g. `May 2024`.
pub fn month_label(at: &DateTime<Utc>) -> String {
    at.format("%b %Y").to_string()
}

/// Serde adapter for timestamps that may or may not carry an offset.
pub mod timestamp {
    use super::parse_timestamp;
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid timestamp: {}", raw)))
    }

    pub mod option {
        use super::super::parse_timestamp;
        use chrono::{DateTime, Utc};
        use serde::{de, Deserialize, Deserializer, Serializer};

        pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(value) => serializer.serialize_str(&value.to_rfc3339()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) => parse_timestamp(&raw)
                    .map(Some)
                    .ok_or_else(|| de::Error::custom(format!("invalid timestamp: {}", raw))),
                None => Ok(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_rfc3339_with_offset_into_utc() {
        let parsed = parse_timestamp("2024-05-01T02:30:00+03:00").unwrap();
        assert_eq!(parsed.day(), 30);
        assert_eq!(parsed.month(), 4);
        assert_eq!(parsed.hour(), 23);
    }

    #[test]
    fn parses_naive_values_as_utc() {
        let parsed = parse_timestamp("2024-05-01T10:00:00.123456").unwrap();
        assert_eq!(parsed.hour(), 10);
        assert_eq!(parsed.nanosecond(), 123_456_000);

        let spaced = parse_timestamp("2024-05-01 10:00:00").unwrap();
        assert_eq!(spaced.minute(), 0);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn month_label_uses_short_month_and_year() {
        let at = parse_timestamp("2024-05-17T08:00:00Z").unwrap();
        assert_eq!(month_label(&at), "May 2024");
    }
}
