//! Domain layer: entities, the business-day calendar, the clock abstraction and
//! repository traits.
//!
//! # Architecture
//!
//! - [`entities`] - Data passed between pipeline stages
//! - [`repositories`] - Persistence trait definitions
//! - [`calendar`] - Weekend and holiday rules
//! - [`clock`] - Injectable "now"
//!
//! The domain layer depends on nothing in `infrastructure` or `application`.

pub mod calendar;
pub mod clock;
pub mod entities;
pub mod repositories;

pub use calendar::BusinessDayCalendar;
pub use clock::{Clock, FixedClock, SystemClock};
