//! Kind-specific task behaviors.
//!
//! Each behavior consumes the message `run_task` popped (if any), updates its
//! record, and names the task to run next.

use crate::error::SchedError;
use crate::records::{
    DeviceRecord, HandlerRecord, IdleAction, IdleRecord, TaskRecord, WorkerRecord,
};
use crate::types::{BUFSIZE, PacketId, PacketKind, TaskId};
use crate::work_area::WorkArea;

/// Run the behavior of task `id` with `message`.
///
/// The record is checked out of the task for the duration of the call and put
/// back afterwards, including when the behavior fails.
pub(crate) fn dispatch(
    wa: &mut WorkArea,
    id: TaskId,
    message: Option<PacketId>,
) -> Result<Option<TaskId>, SchedError> {
    let mut record = wa
        .find_task_mut(id)?
        .record
        .take()
        .ok_or(SchedError::MissingRecord(id))?;
    let next = match &mut record {
        TaskRecord::Device(device) => run_device(wa, id, device, message),
        TaskRecord::Idle(idle) => run_idle(wa, id, idle),
        TaskRecord::Handler(handler) => run_handler(wa, id, handler, message),
        TaskRecord::Worker(worker) => run_worker(wa, id, worker, message),
    };
    wa.find_task_mut(id)?.record = Some(record);
    next
}

fn run_device(
    wa: &mut WorkArea,
    id: TaskId,
    device: &mut DeviceRecord,
    message: Option<PacketId>,
) -> Result<Option<TaskId>, SchedError> {
    let Some(packet) = message else {
        return match device.pending.take() {
            Some(pending) => wa.qpkt(id, pending).map(Some),
            None => wa.wait_task(id).map(Some),
        };
    };
    device.pending = Some(packet);
    if wa.tracer.is_enabled() {
        let datum = wa.packets.get(packet)?.datum;
        match u8::try_from(datum) {
            Ok(byte) => wa.tracer.trace(char::from(byte)),
            Err(_) => wa.tracer.trace(datum),
        }
    }
    wa.hold(id)
}

fn run_idle(
    wa: &mut WorkArea,
    id: TaskId,
    idle: &mut IdleRecord,
) -> Result<Option<TaskId>, SchedError> {
    match idle.step() {
        IdleAction::Hold => wa.hold(id),
        IdleAction::Release(device) => wa.release(id, device).map(Some),
    }
}

fn run_handler(
    wa: &mut WorkArea,
    id: TaskId,
    handler: &mut HandlerRecord,
    message: Option<PacketId>,
) -> Result<Option<TaskId>, SchedError> {
    if let Some(packet) = message {
        let kind = wa.packets.get(packet)?.kind;
        match kind {
            PacketKind::Work => handler.work_in_add(&mut wa.packets, packet)?,
            PacketKind::Device => handler.device_in_add(&mut wa.packets, packet)?,
        };
    }

    let Some(work) = handler.work_in else {
        return wa.wait_task(id).map(Some);
    };
    let count = wa.packets.get(work)?.datum;
    let Some(index) = usize::try_from(count).ok().filter(|&i| i < BUFSIZE) else {
        // Buffer fully copied out: send the work packet back to the worker.
        handler.work_in = wa.packets.get(work)?.link;
        return wa.qpkt(id, work).map(Some);
    };

    let Some(device) = handler.device_in else {
        return wa.wait_task(id).map(Some);
    };
    handler.device_in = wa.packets.get(device)?.link;
    let byte = wa.packets.get(work)?.data[index];
    wa.packets.get_mut(device)?.datum = byte;
    wa.packets.get_mut(work)?.datum = count + 1;
    wa.qpkt(id, device).map(Some)
}

fn run_worker(
    wa: &mut WorkArea,
    id: TaskId,
    worker: &mut WorkerRecord,
    message: Option<PacketId>,
) -> Result<Option<TaskId>, SchedError> {
    let Some(packet) = message else {
        return wa.wait_task(id).map(Some);
    };
    let destination = worker.flip_destination();
    let p = wa.packets.get_mut(packet)?;
    p.ident = destination;
    p.datum = 0;
    for slot in p.data.iter_mut() {
        *slot = worker.next_byte();
    }
    wa.qpkt(id, packet).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::Packet;
    use crate::task_state::TaskState;
    use crate::types::{DEVICE_A, HANDLER_A, HANDLER_B, WORKER};

    fn waiting() -> TaskState {
        *TaskState::default().waiting()
    }

    fn device_area() -> WorkArea {
        let mut wa = WorkArea::with_tracing(true);
        wa.create_task(
            HANDLER_A,
            2000,
            None,
            waiting(),
            TaskRecord::Handler(HandlerRecord::default()),
        )
        .expect("handler");
        wa.create_task(
            DEVICE_A,
            4000,
            None,
            waiting(),
            TaskRecord::Device(DeviceRecord::default()),
        )
        .expect("device");
        wa
    }

    #[test]
    fn device_parks_message_then_forwards_it() {
        let mut wa = device_area();
        let mut p = Packet::new(None, HANDLER_A, PacketKind::Device);
        p.datum = i64::from(b'Q');
        let p = wa.packets.insert(p);

        assert_eq!(dispatch(&mut wa, DEVICE_A, Some(p)), Ok(Some(HANDLER_A)));
        assert_eq!(wa.hold_count, 1);
        assert_eq!(wa.tracer.take(), "\nQ");
        assert_eq!(
            wa.find_task(DEVICE_A).expect("device").record,
            Some(TaskRecord::Device(DeviceRecord { pending: Some(p) }))
        );

        // Next run sends the parked packet on; the handler has lower priority
        // so the device keeps control.
        assert_eq!(dispatch(&mut wa, DEVICE_A, None), Ok(Some(DEVICE_A)));
        assert_eq!(wa.qpkt_count, 1);
        assert_eq!(wa.find_task(HANDLER_A).expect("handler").input, Some(p));

        // Nothing parked any more: the device waits.
        assert_eq!(dispatch(&mut wa, DEVICE_A, None), Ok(Some(DEVICE_A)));
        assert!(wa.find_task(DEVICE_A).expect("device").state.is_task_waiting());
    }

    #[test]
    fn handler_copies_one_byte_per_device_packet() {
        let mut wa = device_area();
        let mut work = Packet::new(None, HANDLER_A, PacketKind::Work);
        work.data = [65, 66, 67, 68];
        let work = wa.packets.insert(work);
        let dev = wa.packets.insert(Packet::new(None, DEVICE_A, PacketKind::Device));

        // Work alone is not enough.
        assert_eq!(dispatch(&mut wa, HANDLER_A, Some(work)), Ok(Some(HANDLER_A)));
        assert!(wa.find_task(HANDLER_A).expect("handler").state.is_task_waiting());
        assert_eq!(wa.qpkt_count, 0);

        // The device packet picks up data[0] and goes to the device, which
        // outranks the handler.
        assert_eq!(dispatch(&mut wa, HANDLER_A, Some(dev)), Ok(Some(DEVICE_A)));
        assert_eq!(wa.packets.get(dev).expect("dev").datum, 65);
        assert_eq!(wa.packets.get(dev).expect("dev").ident, HANDLER_A);
        assert_eq!(wa.packets.get(work).expect("work").datum, 1);
        assert_eq!(wa.find_task(DEVICE_A).expect("device").input, Some(dev));
    }

    #[test]
    fn handler_returns_exhausted_work_packet() {
        let mut wa = device_area();
        wa.create_task(
            WORKER,
            1000,
            None,
            waiting(),
            TaskRecord::Worker(WorkerRecord::new()),
        )
        .expect("worker");
        let mut work = Packet::new(None, WORKER, PacketKind::Work);
        work.datum = BUFSIZE as i64;
        let work = wa.packets.insert(work);

        assert_eq!(dispatch(&mut wa, HANDLER_A, Some(work)), Ok(Some(HANDLER_A)));
        assert_eq!(wa.find_task(WORKER).expect("worker").input, Some(work));
        let Some(TaskRecord::Handler(handler)) = &wa.find_task(HANDLER_A).expect("handler").record
        else {
            panic!("handler record missing");
        };
        assert_eq!(handler.work_in, None);
    }

    #[test]
    fn worker_fills_buffer_and_alternates_handlers() {
        let mut wa = WorkArea::new();
        for (id, prio) in [(HANDLER_A, 2000), (HANDLER_B, 3000)] {
            wa.create_task(id, prio, None, waiting(), TaskRecord::Handler(HandlerRecord::default()))
                .expect("handler");
        }
        wa.create_task(WORKER, 1000, None, waiting(), TaskRecord::Worker(WorkerRecord::new()))
            .expect("worker");
        let p = wa.packets.insert(Packet::new(None, 0, PacketKind::Work));

        assert_eq!(dispatch(&mut wa, WORKER, Some(p)), Ok(Some(HANDLER_B)));
        let packet = wa.packets.get(p).expect("packet");
        assert_eq!(packet.data, [65, 66, 67, 68]);
        assert_eq!(packet.datum, 0);
        assert_eq!(packet.ident, WORKER);
        assert_eq!(wa.find_task(HANDLER_B).expect("handler b").input, Some(p));
    }

    #[test]
    fn worker_without_message_waits() {
        let mut wa = WorkArea::new();
        let running = *TaskState::default().running();
        wa.create_task(WORKER, 1000, None, running, TaskRecord::Worker(WorkerRecord::new()))
            .expect("worker");
        assert_eq!(dispatch(&mut wa, WORKER, None), Ok(Some(WORKER)));
        assert!(wa.find_task(WORKER).expect("worker").state.is_task_waiting());
    }

    #[test]
    fn record_is_restored_after_failure() {
        let mut wa = WorkArea::new();
        wa.create_task(WORKER, 1000, None, waiting(), TaskRecord::Worker(WorkerRecord::new()))
            .expect("worker");
        let p = wa.packets.insert(Packet::new(None, 0, PacketKind::Work));
        assert_eq!(
            dispatch(&mut wa, WORKER, Some(p)),
            Err(SchedError::UnknownTask(HANDLER_B))
        );
        assert!(wa.find_task(WORKER).expect("worker").record.is_some());
    }
}
