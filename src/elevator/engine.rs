/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::debug;
use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{Builder, JoinHandle};
use std::time::Duration;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::config::{EngineConfig, ElevatorParams};
use crate::elevator::fsm::ElevatorFSM;
use crate::elevator::timer::{Sleeper, ThreadSleeper};
use crate::shared::{ElevatorError, ElevatorState, EventKind, RequestSource};

/// Observer invoked on the control-loop thread with the event and the floor it happened at.
pub type Callback = Arc<dyn Fn(EventKind, i32) -> io::Result<()> + Send + Sync>;

/// State shared between the `Elevator` handle and its control loop.
pub(crate) struct Shared {
    pub(crate) state: Mutex<ElevatorState>,
    pub(crate) observers: Mutex<HashMap<EventKind, Callback>>,
    pub(crate) wake_tx: cbc::Sender<()>,
    pub(crate) wake_rx: cbc::Receiver<()>,
    pub(crate) running: AtomicBool,
}

/// Locks a mutex, recovering the data if a previous holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/**
 * Handle to a single simulated elevator.
 *
 * The handle owns the request queue and the observer table. `start` spawns the
 * control loop (`ElevatorFSM`) on its own thread; `request_floor`, `perform`
 * and `subscribe` may be called from any thread while it runs and never wait
 * for the cabin to move.
 *
 * Callbacks run synchronously on the control-loop thread, so a slow callback
 * stalls the cabin. Callbacks are invoked without any lock held.
 */
#[derive(Clone)]
pub struct Elevator {
    params: ElevatorParams,
    engine: EngineConfig,
    travel_time: Duration,
    door_open_time: Duration,
    sleeper: Arc<dyn Sleeper>,
    shared: Arc<Shared>,
}

impl Elevator {
    pub fn new(params: ElevatorParams, engine: &EngineConfig) -> Result<Elevator, ElevatorError> {
        Elevator::with_sleeper(params, engine, Arc::new(ThreadSleeper))
    }

    /// Builds an elevator whose drive and door delays go through `sleeper`.
    pub fn with_sleeper(
        params: ElevatorParams,
        engine: &EngineConfig,
        sleeper: Arc<dyn Sleeper>,
    ) -> Result<Elevator, ElevatorError> {
        params.validate()?;
        let travel_time = params.travel_time()?;
        let door_open_time = params.door_open_duration()?;

        // One pending wake-up is enough to get an idle loop going again
        let (wake_tx, wake_rx) = cbc::bounded::<()>(1);

        Ok(Elevator {
            params,
            engine: engine.clone(),
            travel_time,
            door_open_time,
            sleeper,
            shared: Arc::new(Shared {
                state: Mutex::new(ElevatorState::new()),
                observers: Mutex::new(HashMap::new()),
                wake_tx,
                wake_rx,
                running: AtomicBool::new(false),
            }),
        })
    }

    pub fn params(&self) -> &ElevatorParams {
        &self.params
    }

    /// Registers `callback` for the event called `event`, replacing any earlier one.
    pub fn subscribe<F>(&self, event: &str, callback: F) -> Result<(), ElevatorError>
    where
        F: Fn(EventKind, i32) -> io::Result<()> + Send + Sync + 'static,
    {
        let event: EventKind = event.parse()?;
        self.subscribe_to(event, callback);
        Ok(())
    }

    pub fn subscribe_to<F>(&self, event: EventKind, callback: F)
    where
        F: Fn(EventKind, i32) -> io::Result<()> + Send + Sync + 'static,
    {
        if lock(&self.shared.observers)
            .insert(event, Arc::new(callback))
            .is_some()
        {
            debug!("Replaced subscriber for {}", event);
        }
    }

    pub fn has_subscriber(&self, event: EventKind) -> bool {
        lock(&self.shared.observers).contains_key(&event)
    }

    /// Runs the named action (`inside` or `outside`) for `floor`.
    pub fn perform(&self, action: &str, floor: i32) -> Result<(), ElevatorError> {
        let source: RequestSource = action.parse()?;
        self.request_floor(source, floor);
        Ok(())
    }

    /// Queues `floor`. The floor is not range-checked.
    pub fn request_floor(&self, source: RequestSource, floor: i32) {
        lock(&self.shared.state).pending_floors.push_back(floor);
        debug!("Floor {} requested from {} panel", floor, source.as_str());

        // A full channel already holds a wake-up for the loop
        let _ = self.shared.wake_tx.try_send(());
    }

    pub fn state(&self) -> ElevatorState {
        lock(&self.shared.state).clone()
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }

    /// Spawns the control loop. It runs until `terminate_rx` receives a message
    /// or its sender is dropped, and is checked once per step.
    pub fn start(
        &self,
        terminate_rx: cbc::Receiver<()>,
    ) -> Result<JoinHandle<Result<(), ElevatorError>>, ElevatorError> {
        if self
            .shared
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(ElevatorError::AlreadyRunning);
        }

        let fsm = ElevatorFSM::new(
            &self.engine,
            self.travel_time,
            self.door_open_time,
            Arc::clone(&self.sleeper),
            Arc::clone(&self.shared),
            terminate_rx,
        );

        let elevator_fsm_thread = Builder::new().name("elevator_fsm".into());
        elevator_fsm_thread.spawn(move || fsm.run()).map_err(|e| {
            self.shared.running.store(false, Ordering::SeqCst);
            ElevatorError::Spawn(e)
        })
    }
}
