use std::time::Duration;

use async_trait::async_trait;

/// Source of the cosmetic delays used by animations.
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self, duration: Duration);
}

/// Waits on the tokio timer.
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
pub use recording::RecordingPacer;

#[cfg(test)]
mod recording {
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::Pacer;

    /// Records requested pauses instead of sleeping.
    #[derive(Default)]
    pub struct RecordingPacer {
        pauses: Mutex<Vec<Duration>>,
    }

    impl RecordingPacer {
        pub fn pauses(&self) -> Vec<Duration> {
            self.pauses.lock().unwrap().clone()
        }

        pub fn total(&self) -> Duration {
            self.pauses().iter().sum()
        }
    }

    #[async_trait]
    impl Pacer for RecordingPacer {
        async fn pause(&self, duration: Duration) {
            self.pauses.lock().unwrap().push(duration);
        }
    }
}
