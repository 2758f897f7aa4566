use std::collections::VecDeque;

/// Floors waiting for an elevator, served front to back.
#[derive(Debug, Clone, Default)]
pub struct RequestQueue {
    floors: VecDeque<u8>,
}

impl RequestQueue {
    pub fn init() -> Self {
        Self {
            floors: VecDeque::new(),
        }
    }

    pub fn enqueue(&mut self, floor: u8) {
        self.floors.push_back(floor);
    }

    pub fn dequeue_next(&mut self) -> Option<u8> {
        self.floors.pop_front()
    }

    pub fn len(&self) -> usize {
        self.floors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.floors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &u8> {
        self.floors.iter()
    }
}
