//! Cooperative scheduler loop.
//!
//! Control follows whatever task id the last step returned, so traversal
//! order comes from priorities and packet deliveries rather than list
//! position. The loop only ends when a `hold` at the tail of the task list
//! yields no successor.

use crate::error::SchedError;
use crate::work_area::WorkArea;

/// Step counts for one scheduler run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScheduleStats {
    /// Task behaviors invoked.
    pub runs: u64,
    /// Tasks passed over because they were holding or waiting.
    pub skips: u64,
}

/// Run tasks from the head of the task list until none is left to run.
pub fn schedule(wa: &mut WorkArea) -> Result<ScheduleStats, SchedError> {
    let mut stats = ScheduleStats::default();
    let mut current = wa.task_list;
    while let Some(id) = current {
        let task = wa.find_task(id)?;
        if task.state.is_holding_or_waiting() {
            current = task.link;
            stats.skips += 1;
        } else {
            wa.tracer.trace(id);
            current = wa.run_task(id)?;
            stats.runs += 1;
        }
    }
    Ok(stats)
}
