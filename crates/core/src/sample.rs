use crate::error::{MonitorError, Result};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

/// One accepted throughput measurement.
///
/// Rates are in megabits per second and are always finite and non-negative;
/// the only way to obtain a `Sample` is through [`Sample::new`] (or
/// deserialization, which goes through the same check).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "SampleRecord", try_from = "SampleRecord")]
pub struct Sample {
    timestamp:     DateTime<Local>,
    download_mbps: f64,
    upload_mbps:   f64,
}

impl Sample {
    pub fn new(timestamp: DateTime<Local>, download_mbps: f64, upload_mbps: f64) -> Result<Self> {
        check_rate("download", download_mbps)?;
        check_rate("upload", upload_mbps)?;
        Ok(Self {
            timestamp,
            download_mbps,
            upload_mbps,
        })
    }

    /// Build a sample stamped with the current local time.
    pub fn now(download_mbps: f64, upload_mbps: f64) -> Result<Self> {
        Self::new(Local::now(), download_mbps, upload_mbps)
    }

    #[must_use]
    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    #[must_use]
    pub fn download_mbps(&self) -> f64 {
        self.download_mbps
    }

    #[must_use]
    pub fn upload_mbps(&self) -> f64 {
        self.upload_mbps
    }
}

fn check_rate(direction: &str, mbps: f64) -> Result<()> {
    if mbps.is_finite() && mbps >= 0.0 {
        Ok(())
    } else {
        Err(MonitorError::InvalidSample(format!(
            "{direction} rate must be a finite, non-negative number (got {mbps})"
        )))
    }
}

/// On-disk shape of a sample: `{ "timestamp", "download", "upload" }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SampleRecord {
    timestamp: String,
    download:  f64,
    upload:    f64,
}

impl From<Sample> for SampleRecord {
    fn from(sample: Sample) -> Self {
        Self {
            timestamp: sample.timestamp.to_rfc3339(),
            download:  sample.download_mbps,
            upload:    sample.upload_mbps,
        }
    }
}

impl TryFrom<SampleRecord> for Sample {
    type Error = MonitorError;

    fn try_from(record: SampleRecord) -> Result<Self> {
        let timestamp = parse_timestamp(&record.timestamp)?;
        Sample::new(timestamp, record.download, record.upload)
    }
}

/// Parse an RFC 3339 timestamp, or an offset-less ISO-8601 one in local time.
///
/// Logs written by older versions carry no UTC offset
/// (`2024-05-01T12:34:56.123456`).
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Local>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Local));
    }

    let naive: NaiveDateTime = raw
        .parse()
        .map_err(|e| MonitorError::InvalidSample(format!("bad timestamp '{raw}': {e}")))?;

    Ok(resolve_naive(&Local, &naive))
}

/// Place a wall-clock time in `tz`.  Ambiguous times take the earlier
/// instant; times skipped by a DST gap are read as UTC so one odd record
/// cannot invalidate a whole log.
fn resolve_naive<Tz: TimeZone>(tz: &Tz, naive: &NaiveDateTime) -> DateTime<Tz> {
    tz.from_local_datetime(naive)
        .earliest()
        .unwrap_or_else(|| tz.from_utc_datetime(naive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, LocalResult, NaiveDate};

    #[test]
    fn rejects_negative_and_non_finite_rates() {
        assert!(Sample::now(-0.1, 1.0).is_err());
        assert!(Sample::now(1.0, f64::NAN).is_err());
        assert!(Sample::now(f64::INFINITY, 1.0).is_err());
        assert!(Sample::now(0.0, 0.0).is_ok());
    }

    #[test]
    fn serializes_with_persisted_field_names() {
        let sample = Sample::now(94.5, 12.25).unwrap();
        let json = serde_json::to_value(sample).unwrap();
        assert_eq!(json["download"], 94.5);
        assert_eq!(json["upload"], 12.25);
        assert!(json["timestamp"].is_string());

        let back: Sample = serde_json::from_value(json).unwrap();
        assert_eq!(back, sample);
    }

    #[test]
    fn accepts_offsetless_timestamps() {
        let json = r#"{"timestamp":"2024-05-01T12:34:56.123456","download":50.0,"upload":5.0}"#;
        let sample: Sample = serde_json::from_str(json).unwrap();
        assert_eq!(
            sample.timestamp().naive_local().to_string(),
            "2024-05-01 12:34:56.123456"
        );
    }

    #[test]
    fn deserialization_rejects_negative_rates() {
        let json = r#"{"timestamp":"2024-05-01T12:00:00+00:00","download":-1.0,"upload":5.0}"#;
        assert!(serde_json::from_str::<Sample>(json).is_err());
    }

    /// UTC+1 that skips 02:00..03:00 on 2024-03-31.
    #[derive(Debug, Clone)]
    struct SpringForward;

    impl TimeZone for SpringForward {
        type Offset = FixedOffset;

        fn from_offset(_: &FixedOffset) -> Self {
            SpringForward
        }

        fn offset_from_local_date(&self, _: &NaiveDate) -> LocalResult<FixedOffset> {
            LocalResult::Single(Self::offset())
        }

        fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
            let gap = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap().and_hms_opt(2, 0, 0).unwrap();
            if *local >= gap && *local < gap + chrono::Duration::hours(1) {
                LocalResult::None
            } else {
                LocalResult::Single(Self::offset())
            }
        }

        fn offset_from_utc_date(&self, _: &NaiveDate) -> FixedOffset {
            Self::offset()
        }

        fn offset_from_utc_datetime(&self, _: &NaiveDateTime) -> FixedOffset {
            Self::offset()
        }
    }

    impl SpringForward {
        fn offset() -> FixedOffset {
            FixedOffset::east_opt(3600).unwrap()
        }
    }

    #[test]
    fn time_in_dst_gap_is_read_as_utc() {
        let skipped: NaiveDateTime = "2024-03-31T02:30:00".parse().unwrap();
        let resolved = resolve_naive(&SpringForward, &skipped);
        assert_eq!(resolved.naive_utc(), skipped);

        let normal: NaiveDateTime = "2024-03-31T04:30:00".parse().unwrap();
        assert_eq!(resolve_naive(&SpringForward, &normal).naive_local(), normal);
    }

    #[test]
    fn parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("yesterday at noon").is_err());
    }
}
