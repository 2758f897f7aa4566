use std::cmp::Ordering;

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, Eq, PartialEq)]
pub enum Direction {
    Up,
    Down,
    Stationary,
}

impl Direction {
    pub fn between(origin_floor: u8, destination_floor: u8) -> Self {
        match destination_floor.cmp(&origin_floor) {
            Ordering::Greater => Direction::Up,
            Ordering::Less => Direction::Down,
            Ordering::Equal => Direction::Stationary,
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Stationary => Direction::Stationary,
        }
    }

    pub fn to_string(&self) -> String {
        match self {
            Direction::Up => "up".to_string(),
            Direction::Down => "down".to_string(),
            Direction::Stationary => "stop".to_string(),
        }
    }
}
