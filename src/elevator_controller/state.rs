use serde;

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behaviour {
    Idle,
    Moving,
    DoorOpen,
    DoorClosing,
}

impl Behaviour {
    pub fn to_string(&self) -> String {
        match self {
            Behaviour::Idle => "idle".to_string(),
            Behaviour::Moving => "moving".to_string(),
            Behaviour::DoorOpen => "doorOpen".to_string(),
            Behaviour::DoorClosing => "doorClosing".to_string(),
        }
    }
}

/// One car of the fleet. `floor` is the floor the car was last sent to, not
/// its position along the shaft; while moving it already holds the target.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElevatorState {
    pub id: u8,
    pub floor: u8,
    pub busy: bool,
    pub behaviour: Behaviour,
}

impl ElevatorState {
    pub fn init(id: u8) -> Self {
        Self {
            id,
            floor: 0,
            busy: false,
            behaviour: Behaviour::Idle,
        }
    }

    pub fn is_idle(&self) -> bool {
        !self.busy
    }

    pub fn assign(&mut self, target_floor: u8) {
        self.busy = true;
        self.floor = target_floor;
    }

    pub fn release(&mut self) {
        self.busy = false;
        self.behaviour = Behaviour::Idle;
    }
}

pub type Fleet = Vec<ElevatorState>;

pub fn init_fleet(num_elevators: u8) -> Fleet {
    (0..num_elevators).map(ElevatorState::init).collect()
}
