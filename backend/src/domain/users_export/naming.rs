//! Timestamped export file names.
//!
//! Names carry a one-second timestamp. A name already present in the
//! artifact store is regenerated after a short wait, up to a fixed number of
//! attempts. Two requests in the same second can still pick the same name
//! between the check and the create.

use std::sync::Arc;
use std::time::Duration;

use mockable::Clock;
use tracing::debug;

use crate::domain::ports::ExportArtifactStore;

use super::ExportError;

/// Common prefix of every export file.
pub const EXPORT_FILE_PREFIX: &str = "users_export_";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Retry budget for finding a free name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamingPolicy {
    pub attempts: u32,
    pub retry_delay: Duration,
}

impl Default for NamingPolicy {
    fn default() -> Self {
        Self {
            attempts: 40,
            retry_delay: Duration::from_millis(50),
        }
    }
}

/// Generates export file names from a clock.
#[derive(Clone)]
pub struct ExportFileNamer {
    clock: Arc<dyn Clock>,
    policy: NamingPolicy,
}

impl ExportFileNamer {
    pub fn new(clock: Arc<dyn Clock>, policy: NamingPolicy) -> Self {
        Self { clock, policy }
    }

    /// Name for the current second, e.g. `users_export_2019-12-11_09-30-00.csv`.
    pub fn candidate(&self) -> String {
        format!(
            "{EXPORT_FILE_PREFIX}{}.csv",
            self.clock.utc().format(TIMESTAMP_FORMAT)
        )
    }

    /// Find a name not yet present in `store`.
    ///
    /// # Errors
    /// Returns [`ExportError::Artifact`] when the store cannot be probed and
    /// [`ExportError::NamesExhausted`] when every attempt collided.
    pub async fn free_name(&self, store: &dyn ExportArtifactStore) -> Result<String, ExportError> {
        let attempts = self.policy.attempts.max(1);
        for attempt in 1..=attempts {
            let name = self.candidate();
            if !store.exists(&name)? {
                return Ok(name);
            }
            debug!(file = %name, attempt, "export file name taken; retrying");
            if attempt < attempts && !self.policy.retry_delay.is_zero() {
                tokio::time::sleep(self.policy.retry_delay).await;
            }
        }
        Err(ExportError::NamesExhausted { attempts })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{ExportArtifactError, MockExportArtifactStore};
    use chrono::{DateTime, Local, TimeZone, Utc};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Returns the queued instants in order, repeating the last one.
    struct SequenceClock(Mutex<VecDeque<DateTime<Utc>>>);

    impl SequenceClock {
        fn new(seconds: &[u32]) -> Arc<dyn Clock> {
            let instants = seconds
                .iter()
                .map(|s| {
                    Utc.with_ymd_and_hms(2019, 12, 11, 9, 30, *s)
                        .single()
                        .expect("valid instant")
                })
                .collect();
            Arc::new(Self(Mutex::new(instants)))
        }
    }

    impl Clock for SequenceClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            let mut queue = self.0.lock().expect("clock lock");
            if queue.len() > 1 {
                queue.pop_front().expect("non-empty queue")
            } else {
                *queue.front().expect("clock has an instant")
            }
        }
    }

    fn no_wait(attempts: u32) -> NamingPolicy {
        NamingPolicy {
            attempts,
            retry_delay: Duration::ZERO,
        }
    }

    #[test]
    fn candidate_embeds_second_resolution_timestamp() {
        let namer = ExportFileNamer::new(SequenceClock::new(&[5]), no_wait(1));
        assert_eq!(namer.candidate(), "users_export_2019-12-11_09-30-05.csv");
    }

    #[tokio::test]
    async fn free_name_skips_existing_files() {
        let namer = ExportFileNamer::new(SequenceClock::new(&[0, 0, 1]), no_wait(5));
        let mut store = MockExportArtifactStore::new();
        store
            .expect_exists()
            .returning(|name| Ok(name.ends_with("09-30-00.csv")));

        let name = namer.free_name(&store).await.expect("free name");
        assert_eq!(name, "users_export_2019-12-11_09-30-01.csv");
    }

    #[tokio::test]
    async fn free_name_gives_up_after_the_budget() {
        let namer = ExportFileNamer::new(SequenceClock::new(&[0]), no_wait(3));
        let mut store = MockExportArtifactStore::new();
        store.expect_exists().times(3).returning(|_| Ok(true));

        let err = namer.free_name(&store).await.expect_err("exhausted");
        assert!(matches!(err, ExportError::NamesExhausted { attempts: 3 }));
    }

    #[tokio::test]
    async fn probe_failures_are_fatal() {
        let namer = ExportFileNamer::new(SequenceClock::new(&[0]), no_wait(3));
        let mut store = MockExportArtifactStore::new();
        store
            .expect_exists()
            .times(1)
            .returning(|name| Err(ExportArtifactError::io(name, "permission denied")));

        let err = namer.free_name(&store).await.expect_err("probe failure");
        assert!(matches!(err, ExportError::Artifact(_)));
    }
}
