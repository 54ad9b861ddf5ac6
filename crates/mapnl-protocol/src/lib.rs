pub mod actions;
pub mod interpretation;
pub mod providers;

pub use actions::*;
pub use interpretation::*;
pub use providers::*;
