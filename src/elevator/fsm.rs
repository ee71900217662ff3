use crate::config::{CallbackFailure, EngineConfig};
use crate::elevator::engine::{lock, Shared};
use crate::elevator::timer::Sleeper;
use crate::shared::{Direction, ElevatorError, EventKind};
use crossbeam_channel as cbc;
use log::{debug, error, info, warn};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

/**
 * Control loop of a single elevator.
 *
 * The `ElevatorFSM` (Finite State Machine) picks the next target from the
 * request queue, drives the cabin one floor at a time and runs the door cycle
 * on arrival. Each pass through the loop performs exactly one step:
 *
 * 1. When idle, the head of the queue becomes `next_floor` and sets the direction.
 * 2. At `next_floor`: visit it, then go idle.
 * 3. Heading down through a requested floor: visit it and keep the target.
 * 4. Otherwise, while moving: drive one floor.
 * 5. Nothing to do: wait for a new request.
 *
 * Only downward travel makes intermediate stops. A request above the cabin
 * while it is heading up is served after the current target.
 *
 * # Fields
 * - `shared`:              Queue, state and observers shared with the `Elevator` handle.
 * - `sleeper`:             Provides the drive and door delays.
 * - `terminate_rx`:        Stops the loop on message or disconnect.
 * - `travel_time`:         Time to drive one floor.
 * - `door_open_time`:      Time the doors stay open on a visit.
 * - `idle_timeout`:        Longest idle wait before checking `terminate_rx` again.
 * - `callback_failure`:    Whether a failing callback ends the loop.
 */
pub struct ElevatorFSM {
    shared: Arc<Shared>,
    sleeper: Arc<dyn Sleeper>,
    terminate_rx: cbc::Receiver<()>,
    travel_time: Duration,
    door_open_time: Duration,
    idle_timeout: Duration,
    callback_failure: CallbackFailure,
}

#[derive(Debug, PartialEq)]
enum Step {
    Arrive(i32),
    Stopover(i32),
    Drive(Direction),
    Wait,
}

impl ElevatorFSM {
    pub(crate) fn new(
        config: &EngineConfig,
        travel_time: Duration,
        door_open_time: Duration,
        sleeper: Arc<dyn Sleeper>,
        shared: Arc<Shared>,
        terminate_rx: cbc::Receiver<()>,
    ) -> ElevatorFSM {
        ElevatorFSM {
            shared,
            sleeper,
            terminate_rx,
            travel_time,
            door_open_time,
            idle_timeout: config.idle_timeout(),
            callback_failure: config.callback_failure,
        }
    }

    pub fn run(self) -> Result<(), ElevatorError> {
        info!(
            "Elevator control loop started at floor {}",
            lock(&self.shared.state).floor
        );

        let result = self.control_loop();
        self.shared.running.store(false, Ordering::SeqCst);

        match &result {
            Ok(()) => info!("Elevator control loop stopped"),
            Err(e) => error!("Elevator control loop terminated: {}", e),
        }
        result
    }

    fn control_loop(&self) -> Result<(), ElevatorError> {
        loop {
            match self.terminate_rx.try_recv() {
                Err(cbc::TryRecvError::Empty) => (),
                _ => return Ok(()),
            }

            match self.next_step() {
                Step::Arrive(floor) => {
                    self.visit_floor(floor)?;
                    let mut state = lock(&self.shared.state);
                    state.next_floor = None;
                    state.direction = Direction::Stop;
                }
                Step::Stopover(floor) => {
                    debug!("Intermediate stop at floor {}", floor);
                    self.visit_floor(floor)?;
                }
                Step::Drive(direction) => self.drive(direction)?,
                Step::Wait => {
                    cbc::select! {
                        recv(self.shared.wake_rx) -> _ => (),
                        recv(self.terminate_rx) -> _ => return Ok(()),
                        default(self.idle_timeout) => (),
                    }
                }
            }
        }
    }

    /// Decides what the loop does next. Purges the visited floor from the queue
    /// before returning a visit.
    fn next_step(&self) -> Step {
        let mut state = lock(&self.shared.state);

        if state.is_idle() {
            if let Some(target) = state.pending_floors.pop_front() {
                state.next_floor = Some(target);
                state.direction = Direction::towards(state.floor, target);
                debug!(
                    "Heading {:?} from floor {} to floor {}",
                    state.direction, state.floor, target
                );
            }
        }

        let floor = state.floor;
        if state.next_floor == Some(floor) {
            state.purge(floor);
            Step::Arrive(floor)
        } else if state.direction == Direction::Down && state.pending_floors.contains(&floor) {
            state.purge(floor);
            Step::Stopover(floor)
        } else if state.direction != Direction::Stop {
            Step::Drive(state.direction)
        } else {
            Step::Wait
        }
    }

    fn drive(&self, direction: Direction) -> Result<(), ElevatorError> {
        self.sleeper.sleep(self.travel_time);

        let floor = {
            let mut state = lock(&self.shared.state);
            state.floor += direction.sign();
            state.floor
        };
        self.emit(EventKind::PassedFloor, floor)
    }

    fn visit_floor(&self, floor: i32) -> Result<(), ElevatorError> {
        self.emit(EventKind::OpenedDoors, floor)?;
        self.sleeper.sleep(self.door_open_time);
        self.emit(EventKind::ClosedDoors, floor)
    }

    fn emit(&self, event: EventKind, floor: i32) -> Result<(), ElevatorError> {
        let callback = lock(&self.shared.observers).get(&event).cloned();
        let Some(callback) = callback else {
            return Ok(());
        };

        match callback(event, floor) {
            Ok(()) => Ok(()),
            Err(source) => match self.callback_failure {
                CallbackFailure::Stop => Err(ElevatorError::Callback {
                    event,
                    floor,
                    source,
                }),
                CallbackFailure::Log => {
                    warn!("Callback for {} at floor {} failed: {}", event, floor, source);
                    Ok(())
                }
            },
        }
    }
}
