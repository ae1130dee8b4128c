pub mod engine;
pub mod events;
pub mod notify;

pub use engine::*;
pub use events::*;
pub use notify::*;
