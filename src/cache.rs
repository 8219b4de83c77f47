//! Per-sign, per-day forecast cache.
//!
//! The cache is an ordinary owned value: build one at startup and hand it to
//! the engine (tests build a fresh one each). Entries are keyed by sign and
//! calendar day in a fixed UTC offset. Nothing is evicted; yesterday's keys
//! are simply never asked for again.
//!
//! Two concurrent misses on the same key both compute and both store; the
//! later store wins. The lock is only held for the lookup and the insert,
//! never across the computation.

use crate::error::ForecastError;
use crate::utils::today_in;
use crate::zodiac::ZodiacSign;
use chrono::{FixedOffset, NaiveDate};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub sign: ZodiacSign,
    pub day: NaiveDate,
}

impl CacheKey {
    pub fn new(sign: ZodiacSign, day: NaiveDate) -> Self {
        Self { sign, day }
    }
}

#[derive(Debug)]
pub struct DailyCache {
    offset: FixedOffset,
    entries: Mutex<HashMap<CacheKey, String>>,
}

impl DailyCache {
    /// An empty cache whose days roll over at midnight in `offset`.
    pub fn new(offset: FixedOffset) -> Self {
        Self {
            offset,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Today's date in the cache's offset.
    pub fn today(&self) -> NaiveDate {
        today_in(self.offset)
    }

    pub fn key_for_today(&self, sign: ZodiacSign) -> CacheKey {
        CacheKey::new(sign, self.today())
    }

    pub fn get(&self, key: &CacheKey) -> Result<Option<String>, ForecastError> {
        let entries = self.entries.lock().map_err(|_| ForecastError::CachePoisoned)?;
        Ok(entries.get(key).cloned())
    }

    pub fn len(&self) -> Result<usize, ForecastError> {
        let entries = self.entries.lock().map_err(|_| ForecastError::CachePoisoned)?;
        Ok(entries.len())
    }

    pub fn is_empty(&self) -> Result<bool, ForecastError> {
        Ok(self.len()? == 0)
    }

    /// Return today's entry for `sign`, computing and storing it on a miss.
    pub async fn get_or_compute<F, Fut>(
        &self,
        sign: ZodiacSign,
        compute: F,
    ) -> Result<String, ForecastError>
    where
        F: FnOnce(CacheKey) -> Fut,
        Fut: Future<Output = Result<String, ForecastError>>,
    {
        self.get_or_compute_for(self.key_for_today(sign), compute).await
    }

    /// Return the entry for `key`, computing and storing it on a miss.
    ///
    /// `compute` runs at most once per call and only on a miss. If it fails,
    /// nothing is stored and the error is returned as is.
    pub async fn get_or_compute_for<F, Fut>(
        &self,
        key: CacheKey,
        compute: F,
    ) -> Result<String, ForecastError>
    where
        F: FnOnce(CacheKey) -> Fut,
        Fut: Future<Output = Result<String, ForecastError>>,
    {
        if let Some(hit) = self.get(&key)? {
            debug!(sign = %key.sign, day = %key.day, "Cache hit");
            return Ok(hit);
        }

        let value = compute(key).await?;

        let mut entries = self.entries.lock().map_err(|_| ForecastError::CachePoisoned)?;
        entries.insert(key, value.clone());
        info!(sign = %key.sign, day = %key.day, entries = entries.len(), "Cached forecast");
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::offset_from_minutes;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn cache() -> DailyCache {
        DailyCache::new(offset_from_minutes(180))
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    #[tokio::test]
    async fn test_hit_skips_compute() {
        let cache = cache();
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let key = CacheKey::new(ZodiacSign::Leo, day(16));

        for _ in 0..3 {
            let value = cache
                .get_or_compute_for(key, move |_| async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok("прогноз".to_string())
                })
                .await
                .unwrap();
            assert_eq!(value, "прогноз");
        }
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_keys_are_per_sign_and_day() {
        let cache = cache();
        for (sign, d) in [(ZodiacSign::Leo, 16), (ZodiacSign::Virgo, 16), (ZodiacSign::Leo, 17)] {
            let value = cache
                .get_or_compute_for(CacheKey::new(sign, day(d)), |key| async move {
                    Ok(format!("{}-{}", key.sign, key.day))
                })
                .await
                .unwrap();
            assert_eq!(value, format!("{sign}-{}", day(d)));
        }
        assert_eq!(cache.len().unwrap(), 3);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache = cache();
        let key = CacheKey::new(ZodiacSign::Aries, day(16));

        let err = cache
            .get_or_compute_for(key, |_| async { Err(ForecastError::Template(std::fmt::Error)) })
            .await
            .unwrap_err();
        assert!(matches!(err, ForecastError::Template(_)));
        assert!(cache.is_empty().unwrap());

        let value = cache
            .get_or_compute_for(key, |_| async { Ok("второй раз".to_string()) })
            .await
            .unwrap();
        assert_eq!(value, "второй раз");
    }

    #[tokio::test]
    async fn test_today_key_uses_offset() {
        let cache = cache();
        let value = cache
            .get_or_compute(ZodiacSign::Gemini, |key| async move {
                assert_eq!(key.day, cache_today());
                Ok("x".to_string())
            })
            .await
            .unwrap();
        assert_eq!(value, "x");
        assert!(cache.get(&cache.key_for_today(ZodiacSign::Gemini)).unwrap().is_some());

        fn cache_today() -> NaiveDate {
            today_in(offset_from_minutes(180))
        }
    }

    #[tokio::test]
    async fn test_concurrent_misses_store_one_value() {
        let cache = Arc::new(cache());
        let key = CacheKey::new(ZodiacSign::Libra, day(16));
        let (a, b) = tokio::join!(
            cache.get_or_compute_for(key, |_| async {
                tokio::task::yield_now().await;
                Ok("A".to_string())
            }),
            cache.get_or_compute_for(key, |_| async {
                tokio::task::yield_now().await;
                Ok("B".to_string())
            }),
        );
        assert!(a.is_ok() && b.is_ok());
        assert_eq!(cache.len().unwrap(), 1);
        let stored = cache.get(&key).unwrap().unwrap();
        assert!(stored == "A" || stored == "B");
    }

    #[test]
    fn test_poisoned_lock_is_fatal() {
        let cache = Arc::new(cache());
        let poisoner = Arc::clone(&cache);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.entries.lock().unwrap();
            panic!("poison the cache");
        })
        .join();
        assert!(matches!(cache.len(), Err(ForecastError::CachePoisoned)));
    }
}
