use crate::types::{PacketId, TaskId};

/// Invariant violations in the task graph. Any of these means the graph was
/// built wrong; the run cannot continue.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedError {
    #[error("FATAL: no task registered with id {0}")]
    UnknownTask(TaskId),

    #[error("FATAL: task id {0} does not fit the task table")]
    TaskIdOutOfRange(TaskId),

    #[error("FATAL: task id {0} registered twice")]
    DuplicateTask(TaskId),

    /// A task's record was still checked out when its behavior was invoked.
    #[error("FATAL: task {0} has no record to run with")]
    MissingRecord(TaskId),

    /// A queue or record points at a packet that is not in the arena.
    #[error("FATAL: packet {0} is not in the packet arena")]
    DanglingPacket(PacketId),
}

impl SchedError {
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SchedError::UnknownTask(_)
                | SchedError::TaskIdOutOfRange(_)
                | SchedError::DuplicateTask(_)
                | SchedError::MissingRecord(_)
                | SchedError::DanglingPacket(_)
        )
    }
}
