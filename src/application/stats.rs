use crate::domain::model::TranslationStatistics;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

const WINDOW: usize = 100;

#[derive(Default)]
struct Inner {
    ai: u64,
    dictionary: u64,
    latencies: VecDeque<u64>,
}

/// In-memory counters for single-table translations. Best effort, reset on restart.
#[derive(Default)]
pub struct RollingStats {
    inner: Mutex<Inner>,
}

impl RollingStats {
    pub fn record(&self, ai_generated: bool, latency: Duration) {
        // a poisoned lock only loses statistics
        let Ok(mut inner) = self.inner.lock() else {
            return;
        };
        if ai_generated {
            inner.ai += 1;
        } else {
            inner.dictionary += 1;
        }
        if inner.latencies.len() == WINDOW {
            inner.latencies.pop_front();
        }
        inner.latencies.push_back(latency.as_millis() as u64);
    }

    pub fn snapshot(&self) -> TranslationStatistics {
        let Ok(inner) = self.inner.lock() else {
            return TranslationStatistics::default();
        };
        let samples = inner.latencies.len();
        let average_latency_ms = if samples == 0 {
            0.0
        } else {
            inner.latencies.iter().sum::<u64>() as f64 / samples as f64
        };
        TranslationStatistics {
            ai_translations: inner.ai,
            dictionary_translations: inner.dictionary,
            average_latency_ms,
            samples,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_keeps_last_hundred() {
        let stats = RollingStats::default();
        for _ in 0..50 {
            stats.record(true, Duration::from_millis(1000));
        }
        for _ in 0..100 {
            stats.record(false, Duration::from_millis(10));
        }
        let snap = stats.snapshot();
        assert_eq!(snap.ai_translations, 50);
        assert_eq!(snap.dictionary_translations, 100);
        assert_eq!(snap.samples, 100);
        assert!((snap.average_latency_ms - 10.0).abs() < f64::EPSILON);
    }
}
