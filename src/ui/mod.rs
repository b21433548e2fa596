/// Frontend: terminal renderer, keyboard input, page state, timers,
/// and the sound engine.

pub mod app;
pub mod input;
pub mod renderer;
pub mod sound;
pub mod timer;
