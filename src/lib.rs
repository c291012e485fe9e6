//! Gross-pay calculators for hourly work: a weekly time sheet with
//! per-day clock times, a multi-project daily sheet and a monthly estimate,
//! plus the plumbing that keeps the weekly sheet in a remote store and on
//! the device.

#[macro_use]
extern crate lazy_static;

pub mod api;
pub mod client;
pub mod config;
pub mod daily;
pub mod db;
pub mod entry;
pub mod error;
pub mod reconcile;
pub mod schema;
pub mod session;
pub mod storage;
pub mod telemetry;
pub mod time;
pub mod totals;
pub mod week;

pub use entry::{Day, TimeEntry};
pub use error::{Error, Result};
pub use time::AmPm;
