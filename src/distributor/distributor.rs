use crate::config::config::Config;
use crate::cost_function::cost_function;
use crate::distributor::events::{ElevatorEvent, EventSink};
use crate::distributor::request_queue::RequestQueue;
use crate::elevator_controller::movement::{MovementScheduler, TripProgress};
use crate::elevator_controller::state::{self, ElevatorState, Fleet};
use crate::elevator_controller::trip::Trip;

use log::{debug, info};
use std::time::Instant;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("floor {floor} is outside the building (0..{num_floors})")]
    FloorOutOfRange { floor: u8, num_floors: u8 },
    #[error("no elevator with id {0}")]
    UnknownElevator(u8),
    #[error("elevator {0} already has a trip in progress")]
    ElevatorBusy(u8),
}

/// Owns the fleet and the backlog, and decides which car serves which call.
///
/// The dispatcher never polls. The backlog only moves when a call comes in
/// or a trip completes, and each of those triggers a single dispatch attempt.
pub struct Dispatcher {
    config: Config,
    fleet: Fleet,
    queue: RequestQueue,
    scheduler: MovementScheduler,
    events: EventSink,
}

impl Dispatcher {
    pub fn new(config: Config, events: EventSink) -> Self {
        let fleet = state::init_fleet(config.num_elevators);
        Self {
            config,
            fleet,
            queue: RequestQueue::init(),
            scheduler: MovementScheduler::new(),
            events,
        }
    }

    pub fn on_call_requested(&mut self, floor: u8, now: Instant) -> Result<(), DispatchError> {
        if !self.config.is_valid_floor(floor) {
            return Err(DispatchError::FloorOutOfRange {
                floor,
                num_floors: self.config.num_floors,
            });
        }

        debug!("call from floor {}", floor);
        self.events.emit(ElevatorEvent::CallReceived { floor });
        self.queue.enqueue(floor);
        self.try_dispatch_next(now)
    }

    pub fn try_dispatch_next(&mut self, now: Instant) -> Result<(), DispatchError> {
        let Some(floor) = self.queue.dequeue_next() else {
            return Ok(());
        };

        match cost_function::find_nearest_idle_elevator(&self.fleet, floor) {
            Some(elevator_id) => {
                let elevator = self
                    .fleet
                    .get_mut(elevator_id as usize)
                    .ok_or(DispatchError::UnknownElevator(elevator_id))?;
                let trip = Trip::new(elevator_id, elevator.floor, floor, &self.config);
                elevator.assign(floor);
                info!("elevator {} assigned to floor {}", elevator_id, floor);
                self.scheduler.begin_trip(trip, elevator, now, &self.events)
            }
            None => {
                // Back of the line, so saturation cycles through every
                // waiting floor instead of retrying the same one.
                debug!("no idle elevator for floor {}, requeued ({} waiting)", floor, self.queue.len() + 1);
                self.queue.enqueue(floor);
                Ok(())
            }
        }
    }

    pub fn on_trip_completed(&mut self, elevator_id: u8, now: Instant) -> Result<(), DispatchError> {
        let elevator = self
            .fleet
            .get_mut(elevator_id as usize)
            .ok_or(DispatchError::UnknownElevator(elevator_id))?;
        elevator.release();
        debug!("elevator {} idle at floor {}", elevator_id, elevator.floor);
        self.try_dispatch_next(now)
    }

    /// Runs every timer due at `now`, in deadline order.
    pub fn on_timers_due(&mut self, now: Instant) -> Result<(), DispatchError> {
        while let Some(progress) = self.scheduler.fire_next_due(now, &mut self.fleet, &self.events) {
            if let TripProgress::Completed(elevator_id) = progress {
                self.on_trip_completed(elevator_id, now)?;
            }
        }
        Ok(())
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_empty() && self.scheduler.trips_in_flight() == 0
    }

    pub fn fleet(&self) -> &[ElevatorState] {
        &self.fleet
    }

    pub fn pending(&self) -> Vec<u8> {
        self.queue.iter().copied().collect()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn snapshot(&self) {
        self.events.emit(ElevatorEvent::Snapshot {
            elevators: self.fleet.clone(),
            pending: self.pending(),
        });
    }

    /// Invalidates every pending timer so nothing fires against the fleet
    /// after teardown. Returns the number of timers dropped.
    pub fn shutdown(&mut self) -> usize {
        let dropped = self.scheduler.cancel_all();
        info!(
            "dispatcher shut down: {} timers dropped, {} calls left waiting",
            dropped,
            self.queue.len()
        );
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elevator_controller::state::Behaviour;
    use crossbeam_channel as cbc;
    use std::time::Duration;

    fn dispatcher(num_elevators: u8) -> (Dispatcher, cbc::Receiver<ElevatorEvent>) {
        let (event_tx, event_rx) = cbc::unbounded();
        let config = Config {
            num_elevators,
            ..Config::default()
        };
        (Dispatcher::new(config, EventSink::new(event_tx)), event_rx)
    }

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    /// Fires timers one deadline at a time until `until`.
    fn run_until(dispatcher: &mut Dispatcher, until: Instant) {
        while let Some(deadline) = dispatcher.next_deadline() {
            if deadline > until {
                break;
            }
            dispatcher.on_timers_due(deadline).unwrap();
        }
    }

    fn assigned_trips(event_rx: &cbc::Receiver<ElevatorEvent>) -> Vec<(u8, u8)> {
        event_rx
            .try_iter()
            .filter_map(|event| match event {
                ElevatorEvent::MoveStarted { elevator_id, destination_floor, .. } => Some((elevator_id, destination_floor)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn two_calls_two_elevators_end_to_end() {
        let (mut dispatcher, event_rx) = dispatcher(2);
        let start = Instant::now();

        dispatcher.on_call_requested(5, start).unwrap();
        assert!(dispatcher.fleet()[0].busy);
        assert_eq!(dispatcher.fleet()[0].floor, 5);

        dispatcher.on_call_requested(3, start).unwrap();
        assert!(dispatcher.fleet()[1].busy);
        assert_eq!(dispatcher.fleet()[1].floor, 3);
        assert!(dispatcher.pending().is_empty());

        // Elevator 1: 1500 ms travel + 4000 ms hold.
        run_until(&mut dispatcher, start + ms(5500));
        assert!(dispatcher.fleet()[0].busy);
        assert!(!dispatcher.fleet()[1].busy);

        // Elevator 0: 2500 ms travel + 4000 ms hold.
        run_until(&mut dispatcher, start + ms(6499));
        assert!(dispatcher.fleet()[0].busy);
        run_until(&mut dispatcher, start + ms(6500));
        assert!(!dispatcher.fleet()[0].busy);
        assert_eq!(dispatcher.fleet()[0].behaviour, Behaviour::Idle);
        assert!(dispatcher.is_idle());
        assert_eq!(dispatcher.next_deadline(), None);

        assert_eq!(assigned_trips(&event_rx), vec![(0, 5), (1, 3)]);
    }

    #[test]
    fn lifecycle_events_arrive_in_order() {
        let (mut dispatcher, event_rx) = dispatcher(1);
        let start = Instant::now();
        dispatcher.on_call_requested(2, start).unwrap();
        run_until(&mut dispatcher, start + ms(10_000));

        let kinds: Vec<&'static str> = event_rx
            .try_iter()
            .map(|event| match event {
                ElevatorEvent::CallReceived { .. } => "call",
                ElevatorEvent::MoveStarted { .. } => "move",
                ElevatorEvent::Arrived { .. } => "arrived",
                ElevatorEvent::Departed { .. } => "departed",
                ElevatorEvent::Snapshot { .. } => "snapshot",
            })
            .collect();
        assert_eq!(kinds, vec!["call", "move", "arrived", "departed"]);
    }

    #[test]
    fn nearest_idle_elevator_serves_the_call() {
        let (mut dispatcher, event_rx) = dispatcher(2);
        let start = Instant::now();

        dispatcher.on_call_requested(2, start).unwrap();
        dispatcher.on_call_requested(7, start).unwrap();
        run_until(&mut dispatcher, start + ms(60_000));
        assert_eq!(dispatcher.fleet()[0].floor, 2);
        assert_eq!(dispatcher.fleet()[1].floor, 7);
        let _ = event_rx.try_iter().count();

        // Distance 2 from elevator 1 beats distance 3 from elevator 0.
        dispatcher.on_call_requested(5, start + ms(60_000)).unwrap();
        assert_eq!(assigned_trips(&event_rx), vec![(1, 5)]);
    }

    #[test]
    fn call_waits_until_the_only_elevator_frees() {
        let (mut dispatcher, event_rx) = dispatcher(1);
        let start = Instant::now();

        dispatcher.on_call_requested(1, start).unwrap();
        dispatcher.on_call_requested(3, start).unwrap();
        assert_eq!(dispatcher.pending(), vec![3]);

        // 500 ms travel + 4000 ms hold, then floor 3 is picked up.
        run_until(&mut dispatcher, start + ms(4500));
        assert!(dispatcher.pending().is_empty());
        assert_eq!(dispatcher.fleet()[0].floor, 3);
        assert_eq!(assigned_trips(&event_rx), vec![(0, 1), (0, 3)]);
    }

    #[test]
    fn saturated_dispatch_requeues_at_the_tail() {
        let (mut dispatcher, event_rx) = dispatcher(1);
        let start = Instant::now();

        dispatcher.on_call_requested(0, start).unwrap();
        dispatcher.on_call_requested(3, start).unwrap();
        assert_eq!(dispatcher.pending(), vec![3]);

        // Enqueues 8, then the attempt pops 3 and puts it behind 8.
        dispatcher.on_call_requested(8, start).unwrap();
        assert_eq!(dispatcher.pending(), vec![8, 3]);

        run_until(&mut dispatcher, start + ms(4000));
        assert_eq!(dispatcher.pending(), vec![3]);

        run_until(&mut dispatcher, start + ms(60_000));
        assert!(dispatcher.is_idle());
        assert_eq!(assigned_trips(&event_rx), vec![(0, 0), (0, 8), (0, 3)]);
    }

    #[test]
    fn repeated_call_to_same_floor_runs_a_full_door_cycle() {
        let (mut dispatcher, event_rx) = dispatcher(1);
        let start = Instant::now();
        dispatcher.on_call_requested(4, start).unwrap();
        run_until(&mut dispatcher, start + ms(6000));
        assert!(dispatcher.is_idle());
        let _ = event_rx.try_iter().count();

        let again = start + ms(10_000);
        dispatcher.on_call_requested(4, again).unwrap();
        match event_rx.try_recv().unwrap() {
            ElevatorEvent::CallReceived { floor } => assert_eq!(floor, 4),
            other => panic!("unexpected event {:?}", other),
        }
        match event_rx.try_recv().unwrap() {
            ElevatorEvent::MoveStarted { travel_duration_ms, .. } => assert_eq!(travel_duration_ms, 0),
            other => panic!("unexpected event {:?}", other),
        }

        dispatcher.on_timers_due(again).unwrap();
        assert_eq!(dispatcher.fleet()[0].behaviour, Behaviour::DoorOpen);
        run_until(&mut dispatcher, again + ms(3999));
        assert!(dispatcher.fleet()[0].busy);
        run_until(&mut dispatcher, again + ms(4000));
        assert!(!dispatcher.fleet()[0].busy);
    }

    #[test]
    fn duplicate_calls_are_served_independently() {
        let (mut dispatcher, event_rx) = dispatcher(1);
        let start = Instant::now();
        dispatcher.on_call_requested(6, start).unwrap();
        dispatcher.on_call_requested(6, start).unwrap();
        assert_eq!(dispatcher.pending(), vec![6]);

        run_until(&mut dispatcher, start + ms(60_000));
        assert_eq!(assigned_trips(&event_rx), vec![(0, 6), (0, 6)]);
    }

    #[test]
    fn every_floor_is_eventually_served_for_any_fleet_size() {
        for num_elevators in 1..=5u8 {
            let (mut dispatcher, event_rx) = dispatcher(num_elevators);
            let start = Instant::now();
            for floor in 0..dispatcher.config().num_floors {
                dispatcher.on_call_requested(floor, start).unwrap();
            }
            run_until(&mut dispatcher, start + Duration::from_secs(600));
            assert!(dispatcher.is_idle(), "fleet of {} left work behind", num_elevators);

            let mut served: Vec<u8> = assigned_trips(&event_rx).into_iter().map(|(_, floor)| floor).collect();
            served.sort();
            assert_eq!(served, (0..10).collect::<Vec<u8>>());
        }
    }

    #[test]
    fn out_of_range_floor_is_rejected_and_not_queued() {
        let (mut dispatcher, event_rx) = dispatcher(1);
        let result = dispatcher.on_call_requested(10, Instant::now());
        assert_eq!(result, Err(DispatchError::FloorOutOfRange { floor: 10, num_floors: 10 }));
        assert!(dispatcher.is_idle());
        assert!(event_rx.try_recv().is_err());
    }

    #[test]
    fn completing_unknown_elevator_is_an_error() {
        let (mut dispatcher, _event_rx) = dispatcher(1);
        assert_eq!(
            dispatcher.on_trip_completed(4, Instant::now()),
            Err(DispatchError::UnknownElevator(4))
        );
    }

    #[test]
    fn snapshot_reports_fleet_and_backlog() {
        let (mut dispatcher, event_rx) = dispatcher(1);
        let start = Instant::now();
        dispatcher.on_call_requested(2, start).unwrap();
        dispatcher.on_call_requested(5, start).unwrap();
        let _ = event_rx.try_iter().count();

        dispatcher.snapshot();
        match event_rx.try_recv().unwrap() {
            ElevatorEvent::Snapshot { elevators, pending } => {
                assert_eq!(elevators.len(), 1);
                assert_eq!(elevators[0].floor, 2);
                assert_eq!(pending, vec![5]);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn shutdown_drops_pending_timers() {
        let (mut dispatcher, _event_rx) = dispatcher(2);
        let start = Instant::now();
        dispatcher.on_call_requested(3, start).unwrap();
        dispatcher.on_call_requested(4, start).unwrap();

        assert_eq!(dispatcher.shutdown(), 2);
        assert_eq!(dispatcher.next_deadline(), None);
        dispatcher.on_timers_due(start + Duration::from_secs(60)).unwrap();
        assert!(dispatcher.fleet().iter().all(|elevator| elevator.busy));
    }
}
