pub mod debounce;
pub mod error;
pub mod logging;

pub use debounce::Debouncer;
pub use error::*;
