use crate::elevator_controller::state::ElevatorState;

use crossbeam_channel as cbc;
use log::{debug, warn};
use serde;

/// Everything the controller tells the presentation side.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ElevatorEvent {
    #[serde(rename_all = "camelCase")]
    CallReceived { floor: u8 },
    #[serde(rename_all = "camelCase")]
    MoveStarted {
        elevator_id: u8,
        origin_floor: u8,
        destination_floor: u8,
        travel_duration_ms: u64,
    },
    /// `elapsed_secs` is measured between trip start and the moment the
    /// arrival timer actually fired.
    #[serde(rename_all = "camelCase")]
    Arrived {
        elevator_id: u8,
        floor: u8,
        elapsed_secs: f64,
    },
    #[serde(rename_all = "camelCase")]
    Departed { elevator_id: u8, floor: u8 },
    Snapshot {
        elevators: Vec<ElevatorState>,
        pending: Vec<u8>,
    },
}

impl ElevatorEvent {
    pub fn elevator_id(&self) -> Option<u8> {
        match self {
            ElevatorEvent::MoveStarted { elevator_id, .. }
            | ElevatorEvent::Arrived { elevator_id, .. }
            | ElevatorEvent::Departed { elevator_id, .. } => Some(*elevator_id),
            ElevatorEvent::CallReceived { .. } | ElevatorEvent::Snapshot { .. } => None,
        }
    }
}

/// Outgoing side of the presentation channel. A presentation that has gone
/// away never stalls the controller.
#[derive(Debug, Clone)]
pub struct EventSink {
    event_tx: cbc::Sender<ElevatorEvent>,
}

impl EventSink {
    pub fn new(event_tx: cbc::Sender<ElevatorEvent>) -> Self {
        Self { event_tx }
    }

    pub fn emit(&self, event: ElevatorEvent) {
        debug!("event: {:?}", event);
        if let Err(cbc::SendError(event)) = self.event_tx.send(event) {
            warn!("presentation disconnected, dropping {:?}", event);
        }
    }
}
