//! Sensor models producing correlation reports from ground-truth contacts.
//!
//! # Sensors
//! - [`rf::RfSensor`] — full-kinematic reports with a range-law SNR
//! - [`ir::IrSensor`] — angle-only reports; closely-spaced contacts are
//!   merged into a single centroid return

pub mod contact;
pub mod ir;
pub mod rf;

pub use contact::Contact;
pub use ir::{IrSensor, IrSensorParams};
pub use rf::{RfSensor, RfSensorParams};
