use crate::shared::InputError;

/// One parsed input line: an action name and a floor within range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub action: String,
    pub floor: i32,
}

/// Parses `"<action> <floor>"`. Anything but exactly two tokens, blank lines
/// included, is a format error.
///
/// The action is not checked here; the elevator decides whether it supports it.
pub fn parse_line(line: &str, n_floors: u32) -> Result<Request, InputError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let (action, floor) = match tokens.as_slice() {
        [action, floor] => (*action, *floor),
        _ => return Err(InputError::Format),
    };

    let floor: i32 = floor.parse().map_err(|_| InputError::Format)?;
    if floor < 1 || i64::from(floor) > i64::from(n_floors) {
        return Err(InputError::FloorOutOfRange {
            min: 1,
            max: n_floors,
        });
    }

    Ok(Request {
        action: action.to_string(),
        floor,
    })
}
