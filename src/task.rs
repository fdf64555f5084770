//! Task control blocks and the lifecycle operations shared by every kind.
//!
//! Operations live on [`WorkArea`] because each one may touch another task,
//! the packet arena, or the run counters. Each returns the id of the task the
//! scheduler should look at next; that return value is the only way control
//! moves between tasks.

use crate::behavior;
use crate::error::SchedError;
use crate::records::TaskRecord;
use crate::task_state::TaskState;
use crate::types::{PacketId, Priority, TaskId};
use crate::work_area::WorkArea;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub priority: Priority,
    /// Head of the pending-packet queue.
    pub input: Option<PacketId>,
    pub state: TaskState,
    /// Kind-specific data; `None` only while the task's behavior is running.
    pub record: Option<TaskRecord>,
    /// Next task in creation order. Not an ownership edge.
    pub link: Option<TaskId>,
}

impl Task {
    pub fn new(
        id: TaskId,
        priority: Priority,
        input: Option<PacketId>,
        state: TaskState,
        record: TaskRecord,
        link: Option<TaskId>,
    ) -> Self {
        Self {
            id,
            priority,
            input,
            state,
            record: Some(record),
            link,
        }
    }
}

impl WorkArea {
    /// Deliver `packet` to `target` on behalf of `caller`.
    ///
    /// An idle input queue takes the packet as its sole entry and marks the
    /// target packet-pending; if the target outranks the caller it runs next.
    /// A busy queue just grows, and the caller keeps running.
    pub fn add_packet(
        &mut self,
        target: TaskId,
        packet: PacketId,
        caller: TaskId,
    ) -> Result<TaskId, SchedError> {
        let caller_priority = self.find_task(caller)?.priority;
        let task = self.find_task_mut(target)?;
        let input = task.input;
        match input {
            None => {
                task.input = Some(packet);
                task.state.packet_pending = true;
                if task.priority > caller_priority {
                    return Ok(target);
                }
            }
            Some(head) => {
                self.packets.append_to(packet, Some(head))?;
            }
        }
        Ok(caller)
    }

    /// Run one step of task `id`, popping its next packet if it is waiting
    /// with one.
    pub fn run_task(&mut self, id: TaskId) -> Result<Option<TaskId>, SchedError> {
        let task = self.find_task(id)?;
        let message = match (task.state.is_waiting_with_packet(), task.input) {
            (true, Some(head)) => {
                let next = self.packets.get_mut(head)?.link.take();
                let task = self.find_task_mut(id)?;
                task.input = next;
                if next.is_none() {
                    task.state.running();
                } else {
                    task.state.packet_pending();
                }
                Some(head)
            }
            _ => None,
        };
        behavior::dispatch(self, id, message)
    }

    pub fn wait_task(&mut self, id: TaskId) -> Result<TaskId, SchedError> {
        self.find_task_mut(id)?.state.task_waiting = true;
        Ok(id)
    }

    /// Suspend `id` and hand the scheduler the next task in creation order.
    /// When the last task in the list holds, this yields `None` and the
    /// scheduler stops.
    pub fn hold(&mut self, id: TaskId) -> Result<Option<TaskId>, SchedError> {
        self.hold_count += 1;
        let task = self.find_task_mut(id)?;
        task.state.task_holding = true;
        Ok(task.link)
    }

    /// Wake `target` and continue with whichever of it and `id` has the
    /// higher priority; ties keep `id`.
    pub fn release(&mut self, id: TaskId, target: TaskId) -> Result<TaskId, SchedError> {
        let own_priority = self.find_task(id)?.priority;
        let task = self.find_task_mut(target)?;
        task.state.task_holding = false;
        if task.priority > own_priority {
            Ok(target)
        } else {
            Ok(id)
        }
    }

    /// Send `packet` from `id` to the task named in the packet's `ident`.
    /// The packet is re-stamped with the sender's id on the way.
    pub fn qpkt(&mut self, id: TaskId, packet: PacketId) -> Result<TaskId, SchedError> {
        let destination = self.packets.get(packet)?.ident;
        self.find_task(destination)?;
        self.qpkt_count += 1;
        let p = self.packets.get_mut(packet)?;
        p.link = None;
        p.ident = id;
        self.add_packet(destination, packet, id)
    }
}
