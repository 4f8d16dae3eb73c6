pub mod lifecycle;
pub mod provider;

pub use lifecycle::*;
pub use provider::*;
