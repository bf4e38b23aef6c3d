pub mod condition;
pub mod rule;
pub mod sample;

pub use condition::*;
pub use rule::*;
pub use sample::*;
