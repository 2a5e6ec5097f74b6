use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::types::mta_stop_monitoring_response::MonitoredCall;

/// Civil timezone every arrival is measured and displayed in.
pub const EASTERN: Tz = chrono_tz::America::New_York;

#[derive(Debug)]
pub struct ArrivalError {
    pub value: String,
    pub source: chrono::ParseError,
}

impl std::fmt::Display for ArrivalError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Invalid timestamp '{}': {}", self.value, self.source)
    }
}

impl std::error::Error for ArrivalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

#[derive(Debug, PartialEq)]
pub enum ArrivalStatus {
    ArrivingNow,
    UnderOneMinute,
    MinutesAway { minutes: i64, at: DateTime<Tz> },
    Scheduled { at: DateTime<Tz> },
}

impl std::fmt::Display for ArrivalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ArrivalStatus::ArrivingNow => write!(f, "Arriving now (or just departed)"),
            ArrivalStatus::UnderOneMinute => write!(f, "< 1 minute away"),
            ArrivalStatus::MinutesAway { minutes, at } => {
                write!(f, "{} min away (at {})", minutes, at.format("%I:%M %p"))
            }
            ArrivalStatus::Scheduled { at } => {
                write!(f, "Scheduled for {} (no live data)", at.format("%I:%M %p"))
            }
        }
    }
}

/// Whole minutes from `now` until `arrival`, rounded towards the past so that any
/// instant already gone is negative.
pub fn minutes_away<A: TimeZone, B: TimeZone>(now: &DateTime<A>, arrival: &DateTime<B>) -> i64 {
    let delta = arrival.with_timezone(&Utc) - now.with_timezone(&Utc);
    delta.num_milliseconds().div_euclid(60_000)
}

pub fn parse_timestamp(value: &str) -> Result<DateTime<Tz>, ArrivalError> {
    DateTime::parse_from_rfc3339(value)
        .map(|d| d.with_timezone(&EASTERN))
        .map_err(|source| ArrivalError {
            value: value.to_string(),
            source,
        })
}

/// Live estimate when BusTime has one, otherwise the timetable time. Empty strings
/// count as absent.
pub fn arrival_status(
    call: &MonitoredCall,
    now: &DateTime<Tz>,
) -> Result<Option<ArrivalStatus>, ArrivalError> {
    let present = |t: &Option<String>| {
        t.as_deref()
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
    };

    if let Some(expected) = present(&call.ExpectedArrivalTime) {
        let at = parse_timestamp(&expected)?;
        let status = match minutes_away(now, &at) {
            m if m < 0 => ArrivalStatus::ArrivingNow,
            0 => ArrivalStatus::UnderOneMinute,
            minutes => ArrivalStatus::MinutesAway { minutes, at },
        };
        return Ok(Some(status));
    }

    match present(&call.AimedArrivalTime) {
        Some(aimed) => Ok(Some(ArrivalStatus::Scheduled {
            at: parse_timestamp(&aimed)?,
        })),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use crate::types::mta_stop_monitoring_response::{Distances, MonitoredCallExtensions};

    use super::*;

    fn noon() -> DateTime<Tz> {
        EASTERN.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap()
    }

    fn call(expected: Option<&str>, aimed: Option<&str>) -> MonitoredCall {
        MonitoredCall {
            ExpectedArrivalTime: expected.map(str::to_string),
            AimedArrivalTime: aimed.map(str::to_string),
            Extensions: MonitoredCallExtensions {
                Distances: Distances {
                    PresentableDistance: "1 stop away".to_string(),
                    DistanceFromCall: 300.0,
                },
            },
        }
    }

    #[test]
    fn minutes_are_truncated_not_rounded() {
        let arrival = EASTERN.with_ymd_and_hms(2024, 1, 2, 12, 5, 30).unwrap();

        assert_eq!(minutes_away(&noon(), &arrival), 5);
    }

    #[test]
    fn minutes_compare_across_offsets() {
        let arrival = DateTime::parse_from_rfc3339("2024-01-02T17:10:59Z").unwrap();

        assert_eq!(minutes_away(&noon(), &arrival), 10);
    }

    #[test]
    fn just_departed_is_negative() {
        let arrival = noon() - chrono::Duration::seconds(20);

        assert_eq!(minutes_away(&noon(), &arrival), -1);
    }

    #[test]
    fn past_expected_arrival_is_arriving_now() {
        let status = arrival_status(&call(Some("2024-01-02T11:59:40-05:00"), None), &noon());

        assert_eq!(status.unwrap(), Some(ArrivalStatus::ArrivingNow));
        assert_eq!(
            ArrivalStatus::ArrivingNow.to_string(),
            "Arriving now (or just departed)"
        );
    }

    #[test]
    fn under_a_minute() {
        let status = arrival_status(&call(Some("2024-01-02T12:00:45.500-05:00"), None), &noon())
            .unwrap()
            .unwrap();

        assert_eq!(status, ArrivalStatus::UnderOneMinute);
        assert_eq!(status.to_string(), "< 1 minute away");
    }

    #[test]
    fn minutes_away_shows_local_clock_time() {
        let status = arrival_status(&call(Some("2024-01-02T17:05:30Z"), None), &noon())
            .unwrap()
            .unwrap();

        assert_eq!(status.to_string(), "5 min away (at 12:05 PM)");
    }

    #[test]
    fn falls_back_to_aimed_time() {
        let status = arrival_status(
            &call(Some(""), Some("2024-01-02T13:15:00.000-05:00")),
            &noon(),
        )
        .unwrap()
        .unwrap();

        assert_eq!(status.to_string(), "Scheduled for 01:15 PM (no live data)");
    }

    #[test]
    fn no_timestamps_no_status() {
        let status = arrival_status(&call(None, Some("")), &noon()).unwrap();

        assert!(status.is_none());
    }

    #[test]
    fn bad_timestamp_is_reported() {
        let err = arrival_status(&call(Some("soon"), None), &noon()).unwrap_err();

        assert!(err.to_string().starts_with("Invalid timestamp 'soon'"));
    }
}
