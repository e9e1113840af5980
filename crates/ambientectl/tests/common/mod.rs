//! Shared test doubles.
#![allow(dead_code)]

use ambiente_shared::{FetchError, Reading, SensorKey};
use ambientectl::fetcher::DataFetcher;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Fetcher serving a settable batch, or failing with an HTTP status
pub struct FakeFetcher {
    batch: Mutex<Result<Vec<Reading>, u16>>,
    delay: Duration,
    calls: AtomicUsize,
}

impl FakeFetcher {
    pub fn new(readings: Vec<Reading>) -> Self {
        Self {
            batch: Mutex::new(Ok(readings)),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(status: u16) -> Self {
        let fetcher = Self::new(Vec::new());
        fetcher.fail_with(status);
        fetcher
    }

    /// Each fetch suspends for `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn set_batch(&self, readings: Vec<Reading>) {
        *self.batch.lock().unwrap() = Ok(readings);
    }

    pub fn fail_with(&self, status: u16) {
        *self.batch.lock().unwrap() = Err(status);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DataFetcher for FakeFetcher {
    async fn try_fetch(&self) -> Result<Vec<Reading>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let batch = self.batch.lock().unwrap().clone();
        batch.map_err(FetchError::Status)
    }
}

/// `[{ts:1000,device:"A",sensors:{temp:21}}, {ts:2000,device:"B",sensors:{temp:22,hum:40}}]`
pub fn two_readings() -> Vec<Reading> {
    vec![
        Reading::new(1000)
            .with_device("A")
            .with_sensor(SensorKey::Temp, 21.0),
        Reading::new(2000)
            .with_device("B")
            .with_sensor(SensorKey::Temp, 22.0)
            .with_sensor(SensorKey::Hum, 40.0),
    ]
}
