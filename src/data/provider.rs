use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use tracing::debug;

use crate::data::models::{Candle, CandleData};
use crate::error::ProviderError;

/// Optional time window for a fetch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Source of candle data. Market-data acquisition itself lives outside the
/// analysis core; this trait is the narrow contract the core consumes.
#[async_trait]
pub trait CandleProvider: Send + Sync {
    async fn fetch(
        &self,
        symbol: &str,
        interval: &str,
        range: Option<TimeRange>,
    ) -> Result<CandleData, ProviderError>;
}

/// Provider backed by a local CSV export.
///
/// Expected columns: `timestamp,open,high,low,close,volume` with an
/// optional header row. Timestamps may be unix seconds, unix milliseconds,
/// RFC 3339 or `YYYY-MM-DD`.
pub struct CsvFileProvider {
    path: PathBuf,
}

impl CsvFileProvider {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl CandleProvider for CsvFileProvider {
    async fn fetch(
        &self,
        symbol: &str,
        interval: &str,
        range: Option<TimeRange>,
    ) -> Result<CandleData, ProviderError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let mut data = parse_csv(&content, symbol, interval)?;

        if let Some(range) = range {
            let keep: Vec<Candle> = iter_candles(&data)
                .filter(|c| c.time >= range.start && c.time <= range.end)
                .collect();
            data = CandleData::from_candles(symbol, interval, keep);
        }

        debug!(
            symbol,
            interval,
            candles = data.len(),
            "loaded candle data from {}",
            self.path.display()
        );
        Ok(data)
    }
}

fn iter_candles(data: &CandleData) -> impl Iterator<Item = Candle> + '_ {
    (0..data.len()).map(|i| Candle {
        time: data.time[i],
        open: data.open[i],
        high: data.high[i],
        low: data.low[i],
        close: data.close[i],
        volume: data.volume[i],
    })
}

/// Parse CSV content into a candle series. Separated from the provider so
/// it can be exercised without touching the filesystem.
pub fn parse_csv(
    content: &str,
    symbol: &str,
    interval: &str,
) -> Result<CandleData, ProviderError> {
    let mut data = CandleData::new(symbol, interval);

    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        // Skip a header row
        if line_no == 0 && line.to_ascii_lowercase().contains("open") {
            continue;
        }

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() < 6 {
            return Err(ProviderError::Malformed {
                line: line_no + 1,
                reason: format!("expected 6 columns, got {}", fields.len()),
            });
        }

        let time = parse_timestamp(fields[0]).ok_or_else(|| ProviderError::Malformed {
            line: line_no + 1,
            reason: format!("unrecognized timestamp '{}'", fields[0]),
        })?;

        let mut numbers = [0.0f64; 5];
        for (slot, field) in numbers.iter_mut().zip(&fields[1..6]) {
            *slot = field.parse().map_err(|_| ProviderError::Malformed {
                line: line_no + 1,
                reason: format!("unparsable number '{field}'"),
            })?;
        }

        data.push(Candle {
            time,
            open: numbers[0],
            high: numbers[1],
            low: numbers[2],
            close: numbers[3],
            volume: numbers[4],
        });
    }

    Ok(data)
}

fn parse_timestamp(field: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = field.parse::<i64>() {
        // Millisecond epochs are 13 digits for any modern date
        return if ts >= 100_000_000_000 {
            Utc.timestamp_millis_opt(ts).single()
        } else {
            Utc.timestamp_opt(ts, 0).single()
        };
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(field) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(field, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_header_and_rows() {
        let content = "timestamp,open,high,low,close,volume\n\
                       2024-01-02,100.0,105.0,99.0,104.0,1200\n\
                       2024-01-03,104.0,108.0,103.0,107.5,1500\n";
        let data = parse_csv(content, "TEST", "1d").unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data.close, vec![104.0, 107.5]);
        assert!(data.validate().is_ok());
    }

    #[test]
    fn parses_epoch_seconds_and_millis() {
        let content = "1704153600,1,2,0.5,1.5,10\n1704240000000,1.5,2.5,1.0,2.0,20\n";
        let data = parse_csv(content, "TEST", "1d").unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data.time[0].timestamp(), 1_704_153_600);
        assert_eq!(data.time[1].timestamp(), 1_704_240_000);
    }

    #[test]
    fn rejects_short_rows() {
        let err = parse_csv("2024-01-02,1,2,0.5\n", "TEST", "1d").unwrap_err();
        assert!(matches!(err, ProviderError::Malformed { line: 1, .. }));
    }
}
