use crate::config::config::Config;
use crate::config::fetch_arguments::OutputFormat;
use crate::distributor::events::ElevatorEvent;
use crate::elevator_controller::state::ElevatorState;

use crossbeam_channel as cbc;
use log::warn;
use std::fmt::Write as _;
use std::io::{self, Write};

/// What a floor's call control shows.
#[derive(Debug, Clone, PartialEq)]
pub struct FloorButton {
    pub waiting: bool,
    pub last_arrival_secs: Option<f64>,
}

/// Terminal stand-in for the building page: one row per floor with its
/// call button, and a vertical offset per car.
#[derive(Debug, Clone)]
pub struct FloorPanel {
    pixels_per_floor: u32,
    buttons: Vec<FloorButton>,
    car_offsets_px: Vec<i64>,
}

impl FloorPanel {
    pub fn new(config: &Config) -> Self {
        Self {
            pixels_per_floor: config.pixels_per_floor,
            buttons: vec![
                FloorButton {
                    waiting: false,
                    last_arrival_secs: None,
                };
                config.num_floors as usize
            ],
            car_offsets_px: vec![0; config.num_elevators as usize],
        }
    }

    pub fn button(&self, floor: u8) -> Option<&FloorButton> {
        self.buttons.get(floor as usize)
    }

    pub fn car_offset_px(&self, elevator_id: u8) -> Option<i64> {
        self.car_offsets_px.get(elevator_id as usize).copied()
    }

    /// Applies an event to the panel and returns the line to print, if any.
    pub fn apply(&mut self, event: &ElevatorEvent) -> Option<String> {
        match event {
            ElevatorEvent::CallReceived { floor } => {
                let button = self.buttons.get_mut(*floor as usize)?;
                button.waiting = true;
                button.last_arrival_secs = None;
                Some(format!("floor {}: waiting", floor))
            }
            ElevatorEvent::MoveStarted {
                elevator_id,
                origin_floor,
                destination_floor,
                travel_duration_ms,
            } => {
                let offset = -(*destination_floor as i64) * self.pixels_per_floor as i64;
                if let Some(car) = self.car_offsets_px.get_mut(*elevator_id as usize) {
                    *car = offset;
                }
                Some(format!(
                    "elevator {}: floor {} -> {} in {} ms (translateY {}px)",
                    elevator_id, origin_floor, destination_floor, travel_duration_ms, offset
                ))
            }
            ElevatorEvent::Arrived {
                elevator_id,
                floor,
                elapsed_secs,
            } => {
                if let Some(button) = self.buttons.get_mut(*floor as usize) {
                    button.last_arrival_secs = Some(*elapsed_secs);
                }
                Some(format!(
                    "elevator {}: *ding* doors open at floor {}, Arrival Time: {:.2}s",
                    elevator_id, floor, elapsed_secs
                ))
            }
            ElevatorEvent::Departed { elevator_id, floor } => {
                if let Some(button) = self.buttons.get_mut(*floor as usize) {
                    button.waiting = false;
                }
                Some(format!("elevator {}: doors closed at floor {}", elevator_id, floor))
            }
            ElevatorEvent::Snapshot { elevators, pending } => Some(self.render(elevators, pending)),
        }
    }

    /// Top floor first, like the building page.
    pub fn render(&self, elevators: &[ElevatorState], pending: &[u8]) -> String {
        let mut table = String::new();
        for (floor, button) in self.buttons.iter().enumerate().rev() {
            let label = if button.waiting { "Waiting" } else { "Call" };
            let _ = write!(table, "{:>3} [{:^7}]", floor, label);
            for elevator in elevators {
                let car = if elevator.floor as usize == floor {
                    format!("[{:>2}]", elevator.id)
                } else {
                    " .. ".to_string()
                };
                let _ = write!(table, " {}", car);
            }
            if let Some(secs) = button.last_arrival_secs {
                let _ = write!(table, "  Arrival Time: {:.2}s", secs);
            }
            table.push('\n');
        }
        for elevator in elevators {
            let _ = writeln!(
                table,
                "elevator {}: floor {}, {}",
                elevator.id,
                elevator.floor,
                elevator.behaviour.to_string()
            );
        }
        let _ = write!(table, "pending: {:?}", pending);
        table
    }
}

/// Prints every event until the controller hangs up.
pub fn console<W: Write>(
    config: &Config,
    event_rx: cbc::Receiver<ElevatorEvent>,
    format: OutputFormat,
    mut out: W,
) -> io::Result<()> {
    let mut panel = FloorPanel::new(config);

    for event in event_rx.iter() {
        let line = match format {
            OutputFormat::Text => panel.apply(&event),
            OutputFormat::Json => match serde_json::to_string(&event) {
                Ok(json) => Some(json),
                Err(e) => {
                    warn!("failed to serialize {:?}: {}", event, e);
                    None
                }
            },
        };
        if let Some(line) = line {
            writeln!(out, "{}", line)?;
            out.flush()?;
        }
    }
    Ok(())
}
