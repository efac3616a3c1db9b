pub mod handle_race;
pub mod horse;
pub mod race;
pub mod round;
pub mod state_handler;
pub mod store;
