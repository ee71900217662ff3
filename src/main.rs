/* 3rd party libraries */
use clap::{CommandFactory, ErrorKind, Parser};
use crossbeam_channel as cbc;
use log::{error, info};
use std::io::{self, BufRead};
use std::process;

/* Custom libraries */
use elevator_sim::cli::{self, Args, Printer};
use elevator_sim::unwrap_or_exit;
use elevator_sim::{Config, Elevator, EventKind};

/* Main */
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // Load the arguments and configuration
    let args = Args::parse();
    let config = unwrap_or_exit!(Config::load_or_default(&args.config));
    let params = match args.params(&config.cli) {
        Ok(params) => params,
        Err(message) => Args::command().error(ErrorKind::InvalidValue, message).exit(),
    };

    // Create the elevator and print every event it emits
    let elevator = unwrap_or_exit!(Elevator::new(params, &config.engine));
    let printer = Printer::new(io::stdout(), args.output_format());
    for event in EventKind::ALL {
        let printer = printer.clone();
        elevator.subscribe_to(event, move |kind, floor| printer.event(kind, floor));
    }

    // Start the elevator module
    let (terminate_tx, terminate_rx) = cbc::unbounded::<()>();
    let elevator_thread = unwrap_or_exit!(elevator.start(terminate_rx));
    info!("Elevator started with {:?}", params);

    // Feed stdin to the elevator until EOF
    for line in io::stdin().lock().lines() {
        let line = unwrap_or_exit!(line);
        if !elevator.is_running() {
            break;
        }
        let reply = cli::handle_line(&elevator, &line);
        unwrap_or_exit!(printer.reply(&reply));
    }

    let _ = terminate_tx.send(());
    match elevator_thread.join() {
        Ok(Ok(())) => (),
        Ok(Err(e)) => {
            error!("ERROR: {}", e);
            process::exit(1);
        }
        Err(_) => {
            error!("ERROR: elevator thread panicked");
            process::exit(1);
        }
    }
}
