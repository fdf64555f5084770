//! Run-scoped registry of tasks, packets, and counters.

use crate::error::SchedError;
use crate::logging::Tracer;
use crate::packet::PacketArena;
use crate::records::TaskRecord;
use crate::task::Task;
use crate::task_state::TaskState;
use crate::types::{IterationReport, PacketId, Priority, TASK_TAB_SIZE, TaskId};

/// Everything one scheduler run mutates.
///
/// Tasks are indexed by id in `task_tab` and also chained through
/// `Task::link` starting at `task_list`, newest first. Both views always name
/// the same tasks.
#[derive(Debug)]
pub struct WorkArea {
    task_tab: Vec<Option<Task>>,
    pub task_list: Option<TaskId>,
    pub hold_count: u64,
    pub qpkt_count: u64,
    pub packets: PacketArena,
    pub tracer: Tracer,
}

impl WorkArea {
    pub fn new() -> Self {
        Self::with_tracing(false)
    }

    pub fn with_tracing(enabled: bool) -> Self {
        Self {
            task_tab: vec![None; TASK_TAB_SIZE],
            task_list: None,
            hold_count: 0,
            qpkt_count: 0,
            packets: PacketArena::new(),
            tracer: Tracer::new(enabled),
        }
    }

    /// Forget all tasks and packets and zero the counters. Tracing mode and
    /// any buffered trace output survive.
    pub fn reset(&mut self) {
        self.task_tab.iter_mut().for_each(|slot| *slot = None);
        self.task_list = None;
        self.hold_count = 0;
        self.qpkt_count = 0;
        self.packets.clear();
    }

    /// Register a task and push it onto the front of the task list.
    pub fn create_task(
        &mut self,
        id: TaskId,
        priority: Priority,
        input: Option<PacketId>,
        state: TaskState,
        record: TaskRecord,
    ) -> Result<TaskId, SchedError> {
        let slot = self
            .task_tab
            .get_mut(id)
            .ok_or(SchedError::TaskIdOutOfRange(id))?;
        if slot.is_some() {
            return Err(SchedError::DuplicateTask(id));
        }
        *slot = Some(Task::new(id, priority, input, state, record, self.task_list));
        self.task_list = Some(id);
        Ok(id)
    }

    pub fn find_task(&self, id: TaskId) -> Result<&Task, SchedError> {
        self.task_tab
            .get(id)
            .ok_or(SchedError::TaskIdOutOfRange(id))?
            .as_ref()
            .ok_or(SchedError::UnknownTask(id))
    }

    pub fn find_task_mut(&mut self, id: TaskId) -> Result<&mut Task, SchedError> {
        self.task_tab
            .get_mut(id)
            .ok_or(SchedError::TaskIdOutOfRange(id))?
            .as_mut()
            .ok_or(SchedError::UnknownTask(id))
    }

    /// Ids in task-list order, following each task's link.
    pub fn task_ids(&self) -> Result<Vec<TaskId>, SchedError> {
        let mut ids = Vec::new();
        let mut cursor = self.task_list;
        while let Some(id) = cursor {
            ids.push(id);
            cursor = self.find_task(id)?.link;
        }
        Ok(ids)
    }

    pub fn report(&self) -> IterationReport {
        IterationReport {
            hold_count: self.hold_count,
            qpkt_count: self.qpkt_count,
        }
    }
}

impl Default for WorkArea {
    fn default() -> Self {
        Self::new()
    }
}
