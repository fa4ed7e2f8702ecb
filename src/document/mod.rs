//! Async document orchestration: collaborator traits, the debounced
//! trigger abstraction, and the return session.

mod debounce;
mod session;
mod traits;

pub use debounce::*;
pub use session::*;
pub use traits::*;
