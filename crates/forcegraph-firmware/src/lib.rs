//! ESP32-S3 firmware-specific modules for the force sensor grapher
//!
//! This crate contains the hardware glue that cannot compile on desktop
//! targets: the on-chip flash region holding the calibration constant, the
//! HX711 load cell adapter and the push button.

#![no_std]

pub mod button;
pub mod flash_region;
pub mod load_cell;
