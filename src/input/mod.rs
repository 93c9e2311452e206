pub mod event;
pub mod handler;

pub use event::InputEvent;
pub use handler::{handle_input, InputState};
