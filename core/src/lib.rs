//! # Race Admin Core
//!
//! Race lifecycle state machine for the race demo admin service.
//!
//! This crate owns the rules: which transitions are allowed, in what order
//! state is written and events are posted, and which downstream failures are
//! surfaced versus swallowed. All I/O goes through the traits in
//! [`environment`], so the controller runs unchanged against flat files and
//! HTTP clients in production and in-memory doubles in tests.
//!
//! ## Example
//!
//! ```ignore
//! use race_admin_core::{RaceController, RaceEnvironment, DemoZone, parse_car_list};
//!
//! let controller = RaceController::new(
//!     DemoZone::new("MADRID"),
//!     parse_car_list("Thermo,Skull"),
//!     env,
//! );
//!
//! let outcome = controller.operate("start").await?;
//! assert_eq!(outcome.message, "Race started");
//! ```

pub mod environment;
pub mod error;
pub mod lifecycle;
pub mod state;
pub mod types;

// Re-export commonly used types
pub use environment::{
    BoxFuture, Clock, EventNotifier, IotSync, RaceEnvironment, RaceEvent, ScheduleChecker,
    StateKey, StateStore, SyncOutcome, SystemClock,
};
pub use error::{ErrorKind, NotifyError, RaceError, StoreError, SyncError};
pub use lifecycle::RaceController;
pub use state::RaceStateStore;
pub use types::{parse_car_list, parse_count, CarId, DemoZone, RaceId, RaceOp, RaceOutcome, RaceStatus};
