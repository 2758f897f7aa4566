use crate::distributor::distributor::DispatchError;
use crate::distributor::events::{ElevatorEvent, EventSink};
use crate::elevator_controller::state::{Behaviour, ElevatorState};
use crate::elevator_controller::trip::Trip;
use crate::timer::timer_queue::TimerQueue;

use log::{info, trace, warn};
use std::collections::HashMap;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TripPhase {
    Arrival,
    DoorClose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TripTimer {
    elevator_id: u8,
    phase: TripPhase,
}

#[derive(Debug, Clone, Copy)]
struct ActiveTrip {
    trip: Trip,
    started_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripProgress {
    Arrived(u8),
    Completed(u8),
}

/// Drives each trip through travel, door hold and release. Trips of
/// different elevators overlap freely; a started trip always runs to the end.
#[derive(Default)]
pub struct MovementScheduler {
    timers: TimerQueue<TripTimer>,
    trips: HashMap<u8, ActiveTrip>,
}

impl MovementScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_trip(
        &mut self,
        trip: Trip,
        elevator: &mut ElevatorState,
        now: Instant,
        events: &EventSink,
    ) -> Result<(), DispatchError> {
        if self.trips.contains_key(&trip.elevator_id) {
            return Err(DispatchError::ElevatorBusy(trip.elevator_id));
        }

        elevator.behaviour = Behaviour::Moving;
        info!(
            "elevator {} moving {} from floor {} to {} ({} ms)",
            trip.elevator_id,
            trip.direction().to_string(),
            trip.origin_floor,
            trip.destination_floor,
            trip.travel_duration_ms()
        );
        events.emit(ElevatorEvent::MoveStarted {
            elevator_id: trip.elevator_id,
            origin_floor: trip.origin_floor,
            destination_floor: trip.destination_floor,
            travel_duration_ms: trip.travel_duration_ms(),
        });

        self.timers.schedule(
            now + trip.travel_duration,
            TripTimer {
                elevator_id: trip.elevator_id,
                phase: TripPhase::Arrival,
            },
        );
        self.trips.insert(trip.elevator_id, ActiveTrip { trip, started_at: now });
        Ok(())
    }

    /// Fires the earliest timer due at `now`, if any. Call repeatedly until
    /// it returns `None`.
    pub fn fire_next_due(
        &mut self,
        now: Instant,
        fleet: &mut [ElevatorState],
        events: &EventSink,
    ) -> Option<TripProgress> {
        loop {
            let timer = self.timers.pop_due(now)?;
            trace!("timer fired: {:?}", timer);

            let Some(active) = self.trips.get(&timer.elevator_id).copied() else {
                warn!("timer for elevator {} without a trip", timer.elevator_id);
                continue;
            };
            let Some(elevator) = fleet.get_mut(timer.elevator_id as usize) else {
                warn!("timer for unknown elevator {}", timer.elevator_id);
                self.trips.remove(&timer.elevator_id);
                continue;
            };

            let trip = active.trip;
            return Some(match timer.phase {
                TripPhase::Arrival => {
                    let elapsed_secs = now.saturating_duration_since(active.started_at).as_secs_f64();
                    elevator.behaviour = Behaviour::DoorOpen;
                    info!(
                        "elevator {} arrived at floor {} after {:.2}s",
                        trip.elevator_id, trip.destination_floor, elapsed_secs
                    );
                    events.emit(ElevatorEvent::Arrived {
                        elevator_id: trip.elevator_id,
                        floor: trip.destination_floor,
                        elapsed_secs,
                    });
                    self.timers.schedule(
                        now + trip.door_open_duration,
                        TripTimer {
                            elevator_id: trip.elevator_id,
                            phase: TripPhase::DoorClose,
                        },
                    );
                    TripProgress::Arrived(trip.elevator_id)
                }
                TripPhase::DoorClose => {
                    elevator.behaviour = Behaviour::DoorClosing;
                    events.emit(ElevatorEvent::Departed {
                        elevator_id: trip.elevator_id,
                        floor: trip.destination_floor,
                    });
                    self.trips.remove(&trip.elevator_id);
                    TripProgress::Completed(trip.elevator_id)
                }
            });
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    pub fn trips_in_flight(&self) -> usize {
        self.trips.len()
    }

    pub fn has_trip(&self, elevator_id: u8) -> bool {
        self.trips.contains_key(&elevator_id)
    }

    /// Forgets every trip and pending timer. Returns the number of timers
    /// that will never fire.
    pub fn cancel_all(&mut self) -> usize {
        self.trips.clear();
        self.timers.clear()
    }
}
