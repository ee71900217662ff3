/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::ElevatorError;

/***************************************/
/*       Public data structures        */
/***************************************/

/// Travel direction of the cabin. `Stop` means idle or deciding.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Stop,
}

impl Direction {
    /// Direction needed to get from `from` to `to`.
    pub fn towards(from: i32, to: i32) -> Direction {
        if to < from {
            Direction::Down
        } else if to > from {
            Direction::Up
        } else {
            Direction::Stop
        }
    }

    /// Floor delta of one drive step.
    pub fn sign(&self) -> i32 {
        match *self {
            Direction::Up => 1,
            Direction::Down => -1,
            Direction::Stop => 0,
        }
    }
}

/// Lifecycle events an observer can subscribe to.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    PassedFloor,
    OpenedDoors,
    ClosedDoors,
}

impl EventKind {
    pub const ALL: [EventKind; 3] = [
        EventKind::PassedFloor,
        EventKind::OpenedDoors,
        EventKind::ClosedDoors,
    ];

    pub fn as_str(&self) -> &'static str {
        match *self {
            EventKind::PassedFloor => "passed_floor",
            EventKind::OpenedDoors => "opened_doors",
            EventKind::ClosedDoors => "closed_doors",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = ElevatorError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .into_iter()
            .find(|event| event.as_str() == name)
            .ok_or_else(|| ElevatorError::UnsupportedAction(name.to_string()))
    }
}

/// Panel a floor button was pressed on. Both have the same effect on the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestSource {
    Inside,
    Outside,
}

impl RequestSource {
    pub fn as_str(&self) -> &'static str {
        match *self {
            RequestSource::Inside => "inside",
            RequestSource::Outside => "outside",
        }
    }
}

impl FromStr for RequestSource {
    type Err = ElevatorError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "inside" => Ok(RequestSource::Inside),
            "outside" => Ok(RequestSource::Outside),
            _ => Err(ElevatorError::UnsupportedAction(name.to_string())),
        }
    }
}

/**
 * Snapshot of the elevator's mutable state.
 *
 * # Fields
 * - `floor`:           Floor the cabin is at, starting at 1.
 * - `direction`:       Current travel direction, `Stop` when idle.
 * - `next_floor`:      Floor being traveled toward, `None` when idle.
 * - `pending_floors`:  Requested floors in arrival order. May hold duplicates.
 */
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ElevatorState {
    pub floor: i32,
    pub direction: Direction,
    pub next_floor: Option<i32>,
    pub pending_floors: VecDeque<i32>,
}

impl ElevatorState {
    pub fn new() -> ElevatorState {
        ElevatorState {
            floor: 1,
            direction: Direction::Stop,
            next_floor: None,
            pending_floors: VecDeque::new(),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.direction == Direction::Stop && self.next_floor.is_none()
    }

    /// Removes every request for `floor`, returning how many were dropped.
    pub fn purge(&mut self, floor: i32) -> usize {
        let before = self.pending_floors.len();
        self.pending_floors.retain(|&pending| pending != floor);
        before - self.pending_floors.len()
    }
}

impl Default for ElevatorState {
    fn default() -> Self {
        ElevatorState::new()
    }
}

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_towards() {
        assert_eq!(Direction::towards(3, 1), Direction::Down);
        assert_eq!(Direction::towards(3, 5), Direction::Up);
        assert_eq!(Direction::towards(3, 3), Direction::Stop);
    }

    #[test]
    fn test_event_kind_names() {
        for event in EventKind::ALL {
            assert_eq!(event.as_str().parse::<EventKind>().unwrap(), event);
        }

        match "some_other_event".parse::<EventKind>() {
            Err(ElevatorError::UnsupportedAction(name)) => assert_eq!(name, "some_other_event"),
            other => panic!("Expected UnsupportedAction, got {:?}", other),
        }
    }

    #[test]
    fn test_request_source_names() {
        assert_eq!("inside".parse::<RequestSource>().unwrap(), RequestSource::Inside);
        assert_eq!("outside".parse::<RequestSource>().unwrap(), RequestSource::Outside);
        assert!("Inside".parse::<RequestSource>().is_err());
    }

    #[test]
    fn test_purge_removes_all_duplicates() {
        let mut state = ElevatorState::new();
        state.pending_floors.extend([3, 2, 3, 4, 3]);

        assert_eq!(state.purge(3), 3);
        assert_eq!(state.pending_floors, VecDeque::from(vec![2, 4]));
        assert_eq!(state.purge(7), 0);
    }

    #[test]
    fn test_state_serializes_to_json() {
        let mut state = ElevatorState::new();
        state.direction = Direction::Up;
        state.next_floor = Some(4);
        state.pending_floors.push_back(2);

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "floor": 1,
                "direction": "up",
                "next_floor": 4,
                "pending_floors": [2],
            })
        );
    }
}
