//! Saturday doubles sign-up and court scheduling.
//!
//! The core is [`schedule::ScheduleGenerator`], which deals a roster of
//! `4 * courts` players into four sessions so no two players partner twice.
//! Around it sit the sign-up roster, a date-keyed event store, text/CSV
//! rendering and the actix-web front end.

pub mod auth;
pub mod config;
pub mod display;
pub mod error;
pub mod form;
pub mod logging;
pub mod roster;
pub mod schedule;
pub mod store;
pub mod web;
