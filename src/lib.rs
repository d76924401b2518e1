//! Tickscope - RTOS scheduler trace reconstruction
//!
//! This library normalizes loosely structured scheduler trace logs (task
//! switches, queue operations, task lifecycle events, tick increments) into
//! canonical events, and reconstructs three views from them: CPU occupancy,
//! task lifecycles, and classified blocking intervals. Rendering is left to
//! the consumer; the views are plain data.

pub mod cli;
pub mod config;
pub mod csv_output;
pub mod error;
pub mod event;
pub mod filter;
pub mod json_output;
pub mod normalize;
pub mod reconstruct;
pub mod report;
pub mod stream;
pub mod text_output;
