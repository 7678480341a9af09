//! Hardware-independent core library for the force sensor grapher
//!
//! This crate contains all platform-agnostic logic of the load-cell grapher:
//! the wear-leveled calibration store, the bounded sample window and its
//! autoscaling scroll chart, signal conditioning, the calibration routine and
//! the control-loop context that ties them together.
//!
//! It is `#![no_std]` without an allocator so it compiles on embedded targets
//! (ESP32-S3) and desktop hosts (for the simulator and tests) alike.

#![no_std]

pub mod app_state;
pub mod calibration;
pub mod chart;
pub mod config;
pub mod controller;
pub mod input;
pub mod sensors;
pub mod storage;
