use crate::config::config::Config;
use crate::elevator_controller::direction::Direction;

use std::time::Duration;

/// A single assignment in flight: travel, door hold, then release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trip {
    pub elevator_id: u8,
    pub origin_floor: u8,
    pub destination_floor: u8,
    pub travel_duration: Duration,
    pub door_open_duration: Duration,
}

impl Trip {
    pub fn new(elevator_id: u8, origin_floor: u8, destination_floor: u8, config: &Config) -> Self {
        let distance = origin_floor.abs_diff(destination_floor) as u32;
        Self {
            elevator_id,
            origin_floor,
            destination_floor,
            travel_duration: config.floor_travel_duration() * distance,
            door_open_duration: config.door_open_duration(),
        }
    }

    pub fn direction(&self) -> Direction {
        Direction::between(self.origin_floor, self.destination_floor)
    }

    pub fn travel_duration_ms(&self) -> u64 {
        self.travel_duration.as_millis() as u64
    }
}
