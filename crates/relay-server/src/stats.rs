//! In-memory request statistics for the admin API.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, TimeZone, Utc};
use parking_lot::Mutex;
use serde::Serialize;

/// Per-minute buckets older than this are dropped.
const RETENTION_MINUTES: i64 = 7 * 24 * 60;

/// Minutes shown by the detailed distribution.
const DISTRIBUTION_MINUTES: i64 = 60;

const TOP_ENDPOINTS: usize = 10;

/// Look-back period accepted by `GET /manage/stats?time=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeRange {
    FiveMinutes,
    FifteenMinutes,
    #[default]
    ThirtyMinutes,
    OneHour,
    SixHours,
    TwelveHours,
    OneDay,
    ThreeDays,
    SevenDays,
}

impl TimeRange {
    pub fn minutes(&self) -> i64 {
        match self {
            Self::FiveMinutes => 5,
            Self::FifteenMinutes => 15,
            Self::ThirtyMinutes => 30,
            Self::OneHour => 60,
            Self::SixHours => 6 * 60,
            Self::TwelveHours => 12 * 60,
            Self::OneDay => 24 * 60,
            Self::ThreeDays => 3 * 24 * 60,
            Self::SevenDays => 7 * 24 * 60,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::FiveMinutes => "5m",
            Self::FifteenMinutes => "15m",
            Self::ThirtyMinutes => "30m",
            Self::OneHour => "1h",
            Self::SixHours => "6h",
            Self::TwelveHours => "12h",
            Self::OneDay => "1d",
            Self::ThreeDays => "3d",
            Self::SevenDays => "7d",
        }
    }

    /// Parses a label, falling back to the default for anything unknown.
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.parse().ok()).unwrap_or_default()
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "5m" => Ok(Self::FiveMinutes),
            "15m" => Ok(Self::FifteenMinutes),
            "30m" => Ok(Self::ThirtyMinutes),
            "1h" => Ok(Self::OneHour),
            "6h" => Ok(Self::SixHours),
            "12h" => Ok(Self::TwelveHours),
            "1d" => Ok(Self::OneDay),
            "3d" => Ok(Self::ThreeDays),
            "7d" => Ok(Self::SevenDays),
            other => Err(format!("unknown time range '{}'", other)),
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointCount {
    pub endpoint: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MinuteCount {
    pub time: DateTime<Utc>,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub total: u64,
    pub in_period: u64,
    pub period: TimeRangeLabel,
    pub top_endpoints: Vec<EndpointCount>,
    pub start_time: DateTime<Utc>,
}

/// Serializes a [`TimeRange`] as its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRangeLabel(pub TimeRange);

impl Serialize for TimeRangeLabel {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0.label())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedStats {
    pub total_requests: u64,
    pub start_time: DateTime<Utc>,
    pub last_reset: DateTime<Utc>,
    pub endpoint_stats: Vec<EndpointCount>,
    pub time_distribution: Vec<MinuteCount>,
}

#[derive(Debug)]
struct Counters {
    total: u64,
    by_minute: BTreeMap<i64, u64>,
    by_endpoint: HashMap<String, u64>,
    started_at: DateTime<Utc>,
    last_reset: DateTime<Utc>,
}

impl Counters {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            total: 0,
            by_minute: BTreeMap::new(),
            by_endpoint: HashMap::new(),
            started_at: now,
            last_reset: now,
        }
    }
}

/// Request counters: a total, per-minute buckets and per-endpoint counts.
#[derive(Debug)]
pub struct RequestStats {
    counters: Mutex<Counters>,
}

impl Default for RequestStats {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestStats {
    pub fn new() -> Self {
        Self {
            counters: Mutex::new(Counters::new(Utc::now())),
        }
    }

    pub fn record(&self, endpoint: &str) {
        self.record_at(endpoint, Utc::now());
    }

    pub fn record_at(&self, endpoint: &str, now: DateTime<Utc>) {
        let minute = minute_of(now);
        let mut c = self.counters.lock();

        c.total += 1;
        *c.by_minute.entry(minute).or_default() += 1;
        *c.by_endpoint.entry(endpoint.to_string()).or_default() += 1;

        let cutoff = minute - RETENTION_MINUTES;
        while let Some((&oldest, _)) = c.by_minute.first_key_value() {
            if oldest >= cutoff {
                break;
            }
            c.by_minute.remove(&oldest);
        }
    }

    pub fn total(&self) -> u64 {
        self.counters.lock().total
    }

    pub fn summary(&self, range: TimeRange) -> StatsSummary {
        self.summary_at(range, Utc::now())
    }

    pub fn summary_at(&self, range: TimeRange, now: DateTime<Utc>) -> StatsSummary {
        let c = self.counters.lock();
        let end = minute_of(now);
        let start = minute_of(now - Duration::minutes(range.minutes()));

        let in_period = c.by_minute.range(start..=end).map(|(_, n)| n).sum();

        let mut endpoints = sorted_endpoints(&c.by_endpoint);
        endpoints.truncate(TOP_ENDPOINTS);

        StatsSummary {
            total: c.total,
            in_period,
            period: TimeRangeLabel(range),
            top_endpoints: endpoints,
            start_time: c.started_at,
        }
    }

    pub fn detailed(&self) -> DetailedStats {
        self.detailed_at(Utc::now())
    }

    /// All endpoint counts plus the last hour, oldest minute first.
    pub fn detailed_at(&self, now: DateTime<Utc>) -> DetailedStats {
        let c = self.counters.lock();
        let end = minute_of(now);

        let time_distribution = (0..DISTRIBUTION_MINUTES)
            .rev()
            .map(|ago| {
                let minute = end - ago;
                MinuteCount {
                    time: Utc
                        .timestamp_opt(minute * 60, 0)
                        .single()
                        .unwrap_or(now),
                    count: c.by_minute.get(&minute).copied().unwrap_or(0),
                }
            })
            .collect();

        DetailedStats {
            total_requests: c.total,
            start_time: c.started_at,
            last_reset: c.last_reset,
            endpoint_stats: sorted_endpoints(&c.by_endpoint),
            time_distribution,
        }
    }

    /// Clears every counter and returns the previous total.
    pub fn reset(&self) -> u64 {
        let mut c = self.counters.lock();
        let previous = c.total;
        let started_at = c.started_at;
        *c = Counters::new(Utc::now());
        c.started_at = started_at;
        previous
    }
}

fn minute_of(at: DateTime<Utc>) -> i64 {
    at.timestamp().div_euclid(60)
}

/// Endpoint counts, busiest first, ties by name.
fn sorted_endpoints(by_endpoint: &HashMap<String, u64>) -> Vec<EndpointCount> {
    let mut endpoints: Vec<EndpointCount> = by_endpoint
        .iter()
        .map(|(endpoint, &count)| EndpointCount {
            endpoint: endpoint.clone(),
            count,
        })
        .collect();
    endpoints.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.endpoint.cmp(&b.endpoint)));
    endpoints
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(minutes: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_699_999_980 + minutes * 60, 0).unwrap()
    }

    #[test]
    fn time_range_parsing() {
        assert_eq!("1h".parse::<TimeRange>().unwrap(), TimeRange::OneHour);
        assert_eq!(TimeRange::parse_or_default(Some("2y")), TimeRange::ThirtyMinutes);
        assert_eq!(TimeRange::parse_or_default(None), TimeRange::ThirtyMinutes);
        assert_eq!(TimeRange::SevenDays.to_string(), "7d");
    }

    #[test]
    fn summary_counts_only_the_period() {
        let stats = RequestStats::new();
        stats.record_at("/search/youtube", at(0));
        stats.record_at("/search/youtube", at(20));
        stats.record_at("/api/d/tiktok", at(28));

        let summary = stats.summary_at(TimeRange::FiveMinutes, at(30));
        assert_eq!(summary.total, 3);
        assert_eq!(summary.in_period, 1);

        let summary = stats.summary_at(TimeRange::OneHour, at(30));
        assert_eq!(summary.in_period, 3);
        assert_eq!(summary.top_endpoints[0].endpoint, "/search/youtube");
        assert_eq!(summary.top_endpoints[0].count, 2);
    }

    #[test]
    fn top_endpoints_are_capped() {
        let stats = RequestStats::new();
        for i in 0..15 {
            stats.record_at(&format!("/e/{}", i), at(0));
        }

        let summary = stats.summary_at(TimeRange::OneHour, at(1));
        assert_eq!(summary.top_endpoints.len(), TOP_ENDPOINTS);
        assert_eq!(stats.detailed_at(at(1)).endpoint_stats.len(), 15);
    }

    #[test]
    fn detailed_distribution_covers_last_hour() {
        let stats = RequestStats::new();
        stats.record_at("/a", at(100));
        stats.record_at("/a", at(100));
        stats.record_at("/a", at(30));

        let detailed = stats.detailed_at(at(100));
        assert_eq!(detailed.time_distribution.len(), 60);
        assert_eq!(detailed.time_distribution.last().unwrap().count, 2);
        assert_eq!(detailed.time_distribution.first().unwrap().time, at(41));
        assert_eq!(detailed.total_requests, 3);
    }

    #[test]
    fn old_buckets_are_pruned() {
        let stats = RequestStats::new();
        stats.record_at("/a", at(0));
        stats.record_at("/a", at(RETENTION_MINUTES + 5));

        let summary = stats.summary_at(TimeRange::SevenDays, at(RETENTION_MINUTES + 5));
        assert_eq!(summary.total, 2);
        assert_eq!(summary.in_period, 1);
        assert_eq!(stats.counters.lock().by_minute.len(), 1);
    }

    #[test]
    fn reset_returns_previous_total() {
        let stats = RequestStats::new();
        stats.record("/a");
        stats.record("/b");

        assert_eq!(stats.reset(), 2);
        assert_eq!(stats.total(), 0);
        assert!(stats.detailed().endpoint_stats.is_empty());
    }
}
