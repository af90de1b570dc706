pub mod state;
pub mod demo;

pub use state::{assemble, build_state, build_state_with_repository, AppState};
