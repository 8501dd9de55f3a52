//! The countdown state machine and its driving task.
//!
//! One task per announced countdown. The task recomputes its own sleep
//! interval each tick instead of cancelling and re-registering itself, so
//! the Coarse→Fine cadence switch is a plain flag flip; the flag guarantees
//! the switch happens at most once and never reverses.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tempo_core::{
    message::{MessageMetadata, OutgoingMessage},
    traits::Channel,
};
use tracing::{error, info};

/// Tick interval while more than [`FINE_THRESHOLD_SECS`] remain.
pub(super) const COARSE_TICK_SECS: u64 = 5;
/// Tick interval for the final stretch.
pub(super) const FINE_TICK_SECS: u64 = 1;
/// Remaining-seconds boundary where the cadence switches Coarse→Fine.
pub(super) const FINE_THRESHOLD_SECS: i64 = 10;
/// Added to the requested duration to compensate scheduling latency.
pub(super) const SCHEDULING_SLACK_SECS: i64 = 1;

/// State for one active countdown, owned by its task.
pub(super) struct TimerJob {
    /// Chat hosting the countdown message.
    pub group_target: String,
    /// The countdown message being edited in place.
    pub message_id: String,
    /// Absolute deadline (start + duration + slack).
    pub finish_time: DateTime<Utc>,
    /// Chat of the triggering message, for the terminal reply.
    pub source_target: String,
    /// The triggering message itself.
    pub source_message_id: String,
    /// Text delivered when the countdown elapses.
    pub answer: String,
    /// Set once when the cadence switches to Fine.
    pub changed_interval: bool,
}

/// Label shown on the countdown control.
pub(super) fn button_label(remaining_secs: i64) -> String {
    format!("{} sec", remaining_secs.max(0))
}

/// Tick interval at announce time: Coarse only when the whole countdown
/// starts above the threshold.
pub(super) fn initial_tick_secs(duration_secs: u64) -> u64 {
    if duration_secs as i64 > FINE_THRESHOLD_SECS {
        COARSE_TICK_SECS
    } else {
        FINE_TICK_SECS
    }
}

/// What a single tick should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum TickAction {
    /// Flip to Fine cadence; no edit this tick.
    SwitchToFine,
    /// Edit the control label and keep ticking.
    Update { label: String },
    /// Edit the label, deliver the terminal reply, stop.
    Finish { label: String },
}

/// Decide the action for one tick.
///
/// `remaining_secs` is the whole-second clamp of `finish_time - now`;
/// `finished` is `now >= finish_time` (kept separate because a sub-second
/// remainder clamps to 0 before the deadline has actually passed).
pub(super) fn plan_tick(remaining_secs: i64, finished: bool, changed_interval: bool) -> TickAction {
    if remaining_secs <= FINE_THRESHOLD_SECS && !changed_interval {
        return TickAction::SwitchToFine;
    }
    let label = button_label(remaining_secs);
    if finished {
        TickAction::Finish { label }
    } else {
        TickAction::Update { label }
    }
}

/// Drive one countdown to completion.
///
/// Edit failures are logged and swallowed; the countdown keeps going.
/// The terminal reply is sent exactly once — the loop exits right after.
pub(super) async fn countdown_loop(
    channel: Arc<dyn Channel>,
    mut job: TimerJob,
    initial_tick_secs: u64,
) {
    let mut tick_secs = initial_tick_secs;

    loop {
        tokio::time::sleep(std::time::Duration::from_secs(tick_secs)).await;

        let now = Utc::now();
        let remaining = (job.finish_time - now).num_seconds();
        let finished = now >= job.finish_time;

        match plan_tick(remaining, finished, job.changed_interval) {
            TickAction::SwitchToFine => {
                job.changed_interval = true;
                tick_secs = FINE_TICK_SECS;
            }
            TickAction::Update { label } => {
                if let Err(e) = channel
                    .update_countdown(&job.group_target, &job.message_id, &label)
                    .await
                {
                    error!("failed to update countdown {}: {e}", job.message_id);
                }
            }
            TickAction::Finish { label } => {
                if let Err(e) = channel
                    .update_countdown(&job.group_target, &job.message_id, &label)
                    .await
                {
                    error!("failed to update countdown {}: {e}", job.message_id);
                }

                let reply = OutgoingMessage {
                    text: job.answer.clone(),
                    metadata: MessageMetadata::default(),
                    reply_target: Some(job.source_target.clone()),
                    reply_to: Some(job.source_message_id.clone()),
                };
                if let Err(e) = channel.send(reply).await {
                    error!(
                        "failed to deliver terminal reply for countdown {}: {e}",
                        job.message_id
                    );
                }

                info!("countdown {} finished", job.message_id);
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_tick_coarse_above_threshold() {
        assert_eq!(initial_tick_secs(30), COARSE_TICK_SECS);
        assert_eq!(initial_tick_secs(11), COARSE_TICK_SECS);
    }

    #[test]
    fn test_initial_tick_fine_at_or_below_threshold() {
        assert_eq!(initial_tick_secs(10), FINE_TICK_SECS);
        assert_eq!(initial_tick_secs(5), FINE_TICK_SECS);
        assert_eq!(initial_tick_secs(1), FINE_TICK_SECS);
    }

    #[test]
    fn test_button_label_clamps_at_zero() {
        assert_eq!(button_label(30), "30 sec");
        assert_eq!(button_label(0), "0 sec");
        assert_eq!(button_label(-3), "0 sec");
    }

    #[test]
    fn test_tick_updates_while_running() {
        assert_eq!(
            plan_tick(26, false, false),
            TickAction::Update {
                label: "26 sec".into()
            }
        );
    }

    #[test]
    fn test_tick_switches_at_threshold() {
        assert_eq!(plan_tick(10, false, false), TickAction::SwitchToFine);
        assert_eq!(plan_tick(6, false, false), TickAction::SwitchToFine);
    }

    #[test]
    fn test_tick_never_switches_twice() {
        assert_eq!(
            plan_tick(6, false, true),
            TickAction::Update {
                label: "6 sec".into()
            }
        );
    }

    #[test]
    fn test_sub_second_remainder_is_not_terminal() {
        // 0 whole seconds left but the deadline has not passed yet.
        assert_eq!(
            plan_tick(0, false, true),
            TickAction::Update {
                label: "0 sec".into()
            }
        );
    }

    #[test]
    fn test_tick_finishes_at_deadline() {
        assert_eq!(
            plan_tick(0, true, true),
            TickAction::Finish {
                label: "0 sec".into()
            }
        );
        // Late ticks clamp the label.
        assert_eq!(
            plan_tick(-4, true, true),
            TickAction::Finish {
                label: "0 sec".into()
            }
        );
    }

    /// Replays a 30-second countdown against a virtual clock: Coarse ticks
    /// while remaining > 10, exactly one switch to Fine, never back, and
    /// exactly one terminal action.
    #[test]
    fn test_cadence_over_full_countdown() {
        let deadline = 30 + SCHEDULING_SLACK_SECS;
        let mut now = 0i64;
        let mut tick_secs = initial_tick_secs(30) as i64;
        let mut changed = false;
        let mut switches = 0;
        let mut finishes = 0;
        let mut labels: Vec<String> = Vec::new();
        let mut coarse_ticks = 0;

        loop {
            now += tick_secs;
            let remaining = deadline - now;
            let finished = now >= deadline;

            match plan_tick(remaining, finished, changed) {
                TickAction::SwitchToFine => {
                    assert!(!changed, "switched more than once");
                    changed = true;
                    switches += 1;
                    tick_secs = FINE_TICK_SECS as i64;
                }
                TickAction::Update { label } => {
                    if !changed {
                        assert_eq!(tick_secs, COARSE_TICK_SECS as i64);
                        assert!(remaining > FINE_THRESHOLD_SECS);
                        coarse_ticks += 1;
                    }
                    labels.push(label);
                }
                TickAction::Finish { label } => {
                    labels.push(label);
                    finishes += 1;
                    break;
                }
            }
        }

        assert_eq!(switches, 1);
        assert_eq!(finishes, 1);
        assert!(coarse_ticks > 0);
        assert_eq!(labels.last().unwrap(), "0 sec");

        // Labels are strictly decreasing.
        let secs: Vec<i64> = labels
            .iter()
            .map(|l| l.trim_end_matches(" sec").parse().unwrap())
            .collect();
        for pair in secs.windows(2) {
            assert!(pair[0] > pair[1], "labels must decrease: {secs:?}");
        }
    }

    /// A 5-second countdown starts at Fine cadence and still performs its
    /// single cadence switch before the first edit.
    #[test]
    fn test_short_countdown_is_fine_from_the_start() {
        let deadline = 5 + SCHEDULING_SLACK_SECS;
        let mut now = 0i64;
        let tick_secs = initial_tick_secs(5) as i64;
        assert_eq!(tick_secs, FINE_TICK_SECS as i64);

        let mut changed = false;
        let mut finishes = 0;

        loop {
            now += tick_secs;
            let remaining = deadline - now;
            match plan_tick(remaining, now >= deadline, changed) {
                TickAction::SwitchToFine => changed = true,
                TickAction::Update { .. } => {}
                TickAction::Finish { .. } => {
                    finishes += 1;
                    break;
                }
            }
        }

        assert!(changed);
        assert_eq!(finishes, 1);
    }
}
