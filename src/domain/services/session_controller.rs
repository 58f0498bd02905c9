#[cfg(test)]
#[path = "session_controller_test.rs"]
mod tests;

use std::sync::Arc;

use chrono::DateTime;
use chrono::FixedOffset;
use chrono::Local;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::domain::models::SessionError;
use crate::domain::models::SessionInput;
use crate::domain::models::SessionRecord;
use crate::domain::models::TrackerBox;
use crate::infrastructure::storage::LogWriter;

pub type Clock = Box<dyn Fn() -> DateTime<FixedOffset> + Send + Sync>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
pub enum SessionState {
    Idle,
    AwaitingRemoteAndSignal,
    Finalizing,
    Persisted,
    Aborted,
}

/// Runs one session: self assigns the issue while timing until `stop` is
/// cancelled, then appends the finished record to the host log.
///
/// The remote call and the stop signal progress independently. A failed
/// assignment aborts straight away without waiting for the signal. A stop
/// that arrives before the assignment resolves still waits for it, since the
/// request cannot be taken back once sent. Nothing here times out or retries.
pub struct SessionController {
    tracker: TrackerBox,
    writer: LogWriter,
    clock: Clock,
    state: SessionState,
}

impl SessionController {
    pub fn new(tracker: TrackerBox, writer: LogWriter) -> SessionController {
        return SessionController {
            tracker,
            writer,
            clock: Box::new(|| return DateTime::<FixedOffset>::from(Local::now())),
            state: SessionState::Idle,
        };
    }

    #[cfg(test)]
    pub fn with_clock(mut self, clock: Clock) -> SessionController {
        self.clock = clock;
        return self;
    }

    pub fn state(&self) -> SessionState {
        return self.state;
    }

    fn transition(&mut self, next: SessionState) {
        tracing::debug!(from = %self.state, to = %next, "Session state");
        self.state = next;
    }

    pub async fn run(
        &mut self,
        input: SessionInput,
        stop: CancellationToken,
    ) -> Result<SessionRecord, SessionError> {
        match self.drive(input, stop).await {
            Ok(record) => {
                self.transition(SessionState::Persisted);
                return Ok(record);
            }
            Err(err) => {
                tracing::error!(error = %err, "Session aborted");
                self.transition(SessionState::Aborted);
                return Err(err);
            }
        }
    }

    async fn drive(
        &mut self,
        input: SessionInput,
        stop: CancellationToken,
    ) -> Result<SessionRecord, SessionError> {
        let mut record = SessionRecord::new(&input.project_id, input.issue_id, (self.clock)());
        let started = Instant::now();
        self.transition(SessionState::AwaitingRemoteAndSignal);

        let tracker = Arc::clone(&self.tracker);
        let project_id = input.project_id.clone();
        let issue_id = input.issue_id;
        let mut remote = tokio::spawn(async move {
            return tracker.self_assign(issue_id, &project_id).await;
        });

        // Remote first, so a failure that is ready alongside the signal is
        // the one reported.
        let settled = tokio::select! {
            biased;

            res = &mut remote => Some(res),
            _ = stop.cancelled() => None,
        };

        let (assignment, elapsed) = match settled {
            Some(res) => {
                let assignment = res??;
                tracing::info!(issue_id, "Issue assigned, waiting for stop signal");
                stop.cancelled().await;
                (assignment, started.elapsed())
            }
            None => {
                let elapsed = started.elapsed();
                tracing::info!(
                    issue_id,
                    "Stop received before assignment finished, waiting for it"
                );
                (remote.await??, elapsed)
            }
        };

        self.transition(SessionState::Finalizing);
        record.apply_assignment(assignment, &input);
        record.finalize(elapsed);
        tracing::info!(
            issue_id,
            spent_hours = record.spent_hours,
            "Session finished"
        );

        self.writer.append(&record).await?;

        return Ok(record);
    }
}
