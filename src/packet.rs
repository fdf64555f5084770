//! Packets and the arena that owns them.
//!
//! Queues are intrusive: a queue is just the id of its head packet, and each
//! packet's `link` names the next one. The arena owns every packet for the
//! whole run; moving a packet between queues only rewrites links.

use slab::Slab;

use crate::error::SchedError;
use crate::types::{BUFSIZE, PacketId, PacketKind, TaskId};

/// Unit of work or data exchanged between tasks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Packet {
    /// Next packet in whichever queue holds this one.
    pub link: Option<PacketId>,
    /// Destination task while queued for delivery, sender once delivered.
    pub ident: TaskId,
    pub kind: PacketKind,
    /// Scalar payload; a buffer index for work packets, a byte for device packets.
    pub datum: i64,
    pub data: [i64; BUFSIZE],
}

impl Packet {
    pub fn new(link: Option<PacketId>, ident: TaskId, kind: PacketKind) -> Self {
        Self {
            link,
            ident,
            kind,
            datum: 0,
            data: [0; BUFSIZE],
        }
    }
}

/// Owner of every packet created during one iteration.
#[derive(Debug, Default)]
pub struct PacketArena {
    slab: Slab<Packet>,
}

impl PacketArena {
    pub fn new() -> Self {
        Self { slab: Slab::new() }
    }

    /// Store a packet and return its handle.
    pub fn insert(&mut self, packet: Packet) -> PacketId {
        self.slab.insert(packet)
    }

    pub fn get(&self, id: PacketId) -> Result<&Packet, SchedError> {
        self.slab.get(id).ok_or(SchedError::DanglingPacket(id))
    }

    pub fn get_mut(&mut self, id: PacketId) -> Result<&mut Packet, SchedError> {
        self.slab.get_mut(id).ok_or(SchedError::DanglingPacket(id))
    }

    /// Number of packets alive in the arena.
    pub fn len(&self) -> usize {
        self.slab.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slab.is_empty()
    }

    /// Drop every packet; used when the work area is reset.
    pub fn clear(&mut self) {
        self.slab.clear();
    }

    /// Append `packet` to the queue starting at `head` and return the
    /// queue's head afterwards.
    ///
    /// The packet's own link is cleared first, so a packet that still points
    /// into its previous queue never drags that tail along. An empty queue
    /// makes the packet the new head; otherwise the original head is returned
    /// unchanged.
    pub fn append_to(
        &mut self,
        packet: PacketId,
        head: Option<PacketId>,
    ) -> Result<PacketId, SchedError> {
        self.get_mut(packet)?.link = None;
        let Some(head) = head else {
            return Ok(packet);
        };
        let mut tail = head;
        while let Some(next) = self.get(tail)?.link {
            tail = next;
        }
        self.get_mut(tail)?.link = Some(packet);
        Ok(head)
    }

    /// Length of the queue starting at `head`.
    pub fn queue_len(&self, head: Option<PacketId>) -> Result<usize, SchedError> {
        let mut len = 0;
        let mut cursor = head;
        while let Some(id) = cursor {
            len += 1;
            cursor = self.get(id)?.link;
        }
        Ok(len)
    }

    /// Ids of the queue starting at `head`, front to back.
    pub fn queue_ids(&self, head: Option<PacketId>) -> Result<Vec<PacketId>, SchedError> {
        let mut ids = Vec::new();
        let mut cursor = head;
        while let Some(id) = cursor {
            ids.push(id);
            cursor = self.get(id)?.link;
        }
        Ok(ids)
    }
}
