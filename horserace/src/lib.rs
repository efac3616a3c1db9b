//! Race state store and round simulator for a multi-round horse race program.
//!
//! A program is built in three steps: generate a pool of horses, generate a schedule of rounds
//! (one per configured distance), then run the rounds one after another. The [`RaceStore`] owns
//! all of that state and exposes read-only projections for views.
//!
//! ```no_run
//! use horserace::core::handle_race::handle_program;
//! use horserace::{RaceStore, StoreConfig};
//!
//! let mut store = RaceStore::new(StoreConfig::default()).unwrap();
//! store.generate_program().unwrap();
//! let results = handle_program(&mut store, 0.1, false, None).unwrap();
//! assert_eq!(results.len(), store.schedule().len());
//! ```

pub mod core;
pub mod error;
pub mod interfaces;
pub mod post;
pub mod pre;

pub use crate::core::horse::Horse;
pub use crate::core::round::Round;
pub use crate::core::state_handler::State;
pub use crate::core::store::RaceStore;
pub use crate::error::StoreError;
pub use crate::post::race_result::RoundResult;
pub use crate::pre::read_store_config::StoreConfig;
