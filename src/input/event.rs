/// Discrete, edge-triggered commands forwarded into the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputEvent {
    MoveLeft,
    MoveLeftStop,
    MoveRight,
    MoveRightStop,
    RotateCw,
    SoftDropStart,
    SoftDropStop,
    TogglePause,
}

impl InputEvent {
    /// The release that ends a held key, if this event starts one.
    pub fn release(self) -> Option<InputEvent> {
        match self {
            InputEvent::MoveLeft => Some(InputEvent::MoveLeftStop),
            InputEvent::MoveRight => Some(InputEvent::MoveRightStop),
            InputEvent::SoftDropStart => Some(InputEvent::SoftDropStop),
            _ => None,
        }
    }
}

/// Keys the engine remembers as held between a press and its release.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub left: bool,
    pub right: bool,
    pub down: bool,
}
