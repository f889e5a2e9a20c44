//! geohunt - a single-active-region landmark hunt
//!
//! Walks an ordered catalog of circular landmarks one at a time. Exactly
//! one landmark is registered with the external geofencing backend, an
//! Enter of that region durably advances progress, and the next landmark
//! replaces it.

pub mod catalog;
pub mod cli;
pub mod crash_point;
pub mod hunt;
pub mod monitor;
pub mod notification;
pub mod progress;
