//! Bounded-retry driver that swipes to the last item and requests a new one.

use tokio::time::sleep;

use crate::host::{ControlHandle, SwipeControl};

use super::model::{SwipeFailure, SwipePhase, SwipeProgress, SwipeReport, SwipeTimings};

/// Drives the host's advance control to the last swipe of the last message,
/// then fires once more to generate a fresh swipe.
///
/// ```text
/// Idle -> Seeking -> Verifying -> (Forcing) -> Committing -> Done
///   \________\___________\___________\______________________> Failed
/// ```
///
/// Every reading is taken fresh from the host; nothing is carried over from a
/// previous run, so re-running after a failure is safe.
pub struct SwipeMachine<'a> {
    control: &'a dyn SwipeControl,
    timings: SwipeTimings,
    report: SwipeReport,
}

impl<'a> SwipeMachine<'a> {
    pub fn new(control: &'a dyn SwipeControl, timings: SwipeTimings) -> Self {
        Self {
            control,
            timings,
            report: SwipeReport::new(),
        }
    }

    /// Runs the machine to completion.
    pub async fn run(mut self) -> SwipeReport {
        match self.drive().await {
            Ok(()) => {
                self.enter(SwipePhase::Done);
                tracing::debug!(
                    triggers = self.report.total_triggers(),
                    forced = self.report.was_forced(),
                    "swipe completed"
                );
            }
            Err(failure) => {
                tracing::warn!(
                    phase = ?self.report.phases.last(),
                    %failure,
                    "swipe failed"
                );
                self.enter(SwipePhase::Failed);
                self.report.failure = Some(failure);
            }
        }
        self.report
    }

    async fn drive(&mut self) -> Result<(), SwipeFailure> {
        let control = self
            .control
            .locate_advance_control()
            .await
            .map_err(|e| SwipeFailure::Host(e.to_string()))?
            .ok_or(SwipeFailure::ControlMissing)?;

        let initial = self.read().await?;
        self.report.initial = Some(initial);

        self.enter(SwipePhase::Seeking);
        let clicks = initial.remaining();
        self.report.seek_triggers = self.fire_batch(&control, clicks).await?;
        if clicks > 0 {
            sleep(self.timings.settle_delay).await;
        }

        self.enter(SwipePhase::Verifying);
        let latest = self.verify().await?;

        if latest.is_at_last() {
            self.report.last_seen = Some(latest);
        } else {
            self.force(&control, latest).await?;
        }

        self.enter(SwipePhase::Committing);
        self.fire(&control).await?;
        self.report.commit_triggers = 1;
        sleep(self.timings.settle_delay).await;

        Ok(())
    }

    /// Re-reads until the last swipe is observed or the attempt budget is
    /// spent. Returns the latest reading either way.
    ///
    /// At least one fresh read is taken even with a zero budget: the reading
    /// from before the seek batch is never reused.
    async fn verify(&mut self) -> Result<SwipeProgress, SwipeFailure> {
        let budget = self.timings.max_verify_attempts.max(1);
        let mut attempt = 1;

        loop {
            self.report.verify_attempts = attempt;
            let latest = self.read().await?;
            if latest.is_at_last() || attempt >= budget {
                return Ok(latest);
            }
            tracing::debug!(
                attempt,
                current = latest.current_index,
                total = latest.total_count,
                "not on last swipe yet"
            );
            sleep(self.timings.verify_delay).await;
            attempt += 1;
        }
    }

    /// Closes the remaining gap of the latest reading with extra triggers.
    /// Does not loop: the follow-up read is diagnostic only.
    async fn force(
        &mut self,
        control: &ControlHandle,
        latest: SwipeProgress,
    ) -> Result<(), SwipeFailure> {
        self.enter(SwipePhase::Forcing {
            attempt: self.report.verify_attempts,
        });

        let gap = latest.remaining();
        self.report.forced_triggers = self.fire_batch(control, gap).await?;
        sleep(self.timings.settle_delay).await;

        match self.read().await {
            Ok(after) => {
                tracing::debug!(
                    forced = gap,
                    current = after.current_index,
                    total = after.total_count,
                    "state after forcing"
                );
                self.report.last_seen = Some(after);
            }
            Err(failure) => {
                tracing::warn!(%failure, "could not read state after forcing");
                self.report.last_seen = Some(latest);
            }
        }

        Ok(())
    }

    async fn fire_batch(
        &mut self,
        control: &ControlHandle,
        count: usize,
    ) -> Result<usize, SwipeFailure> {
        for _ in 0..count {
            self.fire(control).await?;
            sleep(self.timings.click_interval).await;
        }
        Ok(count)
    }

    async fn fire(&self, control: &ControlHandle) -> Result<(), SwipeFailure> {
        self.control
            .fire_advance_trigger(control)
            .await
            .map_err(|e| SwipeFailure::Host(e.to_string()))
    }

    async fn read(&self) -> Result<SwipeProgress, SwipeFailure> {
        let state = self
            .control
            .read_last_message_state()
            .await
            .map_err(|e| SwipeFailure::Host(e.to_string()))?;
        SwipeProgress::from_state(state)
    }

    fn enter(&mut self, phase: SwipePhase) {
        tracing::trace!(?phase, "swipe phase");
        self.report.phases.push(phase);
    }
}

/// Runs a [`SwipeMachine`] and reduces the outcome to the boolean callers act on.
pub async fn swipe_to_latest_and_regenerate(
    control: &dyn SwipeControl,
    timings: SwipeTimings,
) -> bool {
    SwipeMachine::new(control, timings).run().await.succeeded()
}
