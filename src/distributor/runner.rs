use crate::distributor::distributor::Dispatcher;
use crate::input::call_buttons::ControlInput;

use crossbeam_channel as cbc;
use log::{info, warn};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// Input closed and every call was served.
    Drained,
    /// Shutdown requested; pending timers were dropped.
    Shutdown,
}

/// Drives the dispatcher in real time until input closes and the building is
/// idle, or until a shutdown arrives.
pub fn run(dispatcher: &mut Dispatcher, input_rx: cbc::Receiver<ControlInput>) -> ExitReason {
    let mut input_rx = input_rx;
    let mut input_open = true;

    loop {
        if !input_open && dispatcher.is_idle() {
            info!("input closed and all calls served");
            return ExitReason::Drained;
        }

        let timer = match dispatcher.next_deadline() {
            Some(deadline) => cbc::at(deadline),
            None => cbc::never(),
        };

        cbc::select! {
            recv(input_rx) -> input_message => {
                match input_message {
                    Ok(ControlInput::Call(floor)) => {
                        if let Err(e) = dispatcher.on_call_requested(floor, Instant::now()) {
                            warn!("call rejected: {}", e);
                        }
                    },
                    Ok(ControlInput::Status) => {
                        dispatcher.snapshot();
                    },
                    Ok(ControlInput::Shutdown) => {
                        dispatcher.shutdown();
                        return ExitReason::Shutdown;
                    },
                    Err(_) => {
                        input_open = false;
                    }
                }
            },
            recv(timer) -> _ => {
                if let Err(e) = dispatcher.on_timers_due(Instant::now()) {
                    warn!("timer handling failed: {}", e);
                }
            }
        }

        if !input_open {
            input_rx = cbc::never();
        }
    }
}
