use super::TemperatureSource;
use crate::models::Reading;
use std::time::Duration;

pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(500);

/// Reads plain-text millidegree values from files such as
/// `/sys/class/thermal/thermal_zone0/temp` or 1-wire `temperature` nodes.
pub struct FileTemperatureSource {
    timeout: Duration,
}

impl FileTemperatureSource {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn parse(content: &str) -> Option<Reading> {
        let token = content.split_whitespace().next()?;
        token.parse::<i64>().ok().map(Reading::from_millidegrees)
    }
}

impl Default for FileTemperatureSource {
    fn default() -> Self {
        Self::new(DEFAULT_READ_TIMEOUT)
    }
}

impl TemperatureSource for FileTemperatureSource {
    async fn read(&self, source_id: &str) -> Reading {
        let content =
            match tokio::time::timeout(self.timeout, tokio::fs::read_to_string(source_id)).await {
                Ok(Ok(content)) => content,
                Ok(Err(e)) => {
                    tracing::debug!(source = source_id, error = %e, "Sensor read failed");
                    return Reading::Unavailable;
                }
                Err(_) => {
                    tracing::debug!(
                        source = source_id,
                        timeout_ms = self.timeout.as_millis() as u64,
                        "Sensor read timed out"
                    );
                    return Reading::Unavailable;
                }
            };

        match Self::parse(&content) {
            Some(reading) => reading,
            None => {
                tracing::debug!(
                    source = source_id,
                    raw = %content.trim(),
                    "Malformed sensor value"
                );
                Reading::Unavailable
            }
        }
    }
}
