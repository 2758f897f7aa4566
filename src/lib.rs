pub mod config {
    pub mod config;
    pub mod fetch_arguments;
}

pub mod cost_function {
    pub mod cost_function;
}

pub mod elevator_controller {
    pub mod direction;
    pub mod movement;
    pub mod state;
    pub mod trip;
}

pub mod distributor {
    pub mod distributor;
    pub mod events;
    pub mod request_queue;
    pub mod runner;
}

pub mod timer {
    pub mod timer_queue;
}

pub mod input {
    pub mod call_buttons;
}

pub mod presentation {
    pub mod console;
}
