use elevator_dispatch::config::fetch_arguments;
use elevator_dispatch::distributor::distributor::Dispatcher;
use elevator_dispatch::distributor::events::{ElevatorEvent, EventSink};
use elevator_dispatch::distributor::runner;
use elevator_dispatch::input::call_buttons::{self, ControlInput};
use elevator_dispatch::presentation::console;

use crossbeam_channel as cbc;
use log::{error, info};
use std::io;
use std::process::exit;
use std::thread::spawn;


fn main() {
    let args = fetch_arguments::fetch_command_line_arguments();

    env_logger::Builder::new()
        .filter_level(args.log_level)
        .init();

    let config = match args.to_config() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            exit(2);
        }
    };
    info!(
        "{} floors, {} elevators, {} ms per floor, doors open {} ms",
        config.num_floors, config.num_elevators, config.floor_travel_ms, config.door_open_ms
    );

    let (event_tx, event_rx) = cbc::unbounded::<ElevatorEvent>();
    let (input_tx, input_rx) = cbc::unbounded::<ControlInput>();

    let presentation = {
        let config = config.clone();
        let output = args.output;
        spawn(move || console::console(&config, event_rx, output, io::stdout()))
    };

    for floor in &args.script {
        let _ = input_tx.send(ControlInput::Call(*floor));
    }

    if args.no_stdin {
        drop(input_tx);
    } else {
        spawn(move || call_buttons::call_buttons(io::stdin().lock(), input_tx));
    }

    let mut dispatcher = Dispatcher::new(config, EventSink::new(event_tx));
    let reason = runner::run(&mut dispatcher, input_rx);
    info!("controller stopped: {:?}", reason);
    drop(dispatcher);

    match presentation.join() {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            error!("presentation failed: {}", e);
            exit(1);
        }
        Err(_) => {
            error!("presentation thread panicked");
            exit(1);
        }
    }
}
