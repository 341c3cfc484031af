//! Collectors for the four reported metrics.
//!
//! Each collector composes the text extractor and field parser for one
//! /proc source and returns a typed result.

pub mod cpu;
pub mod diskstats;
pub mod memory;
pub mod netdev;
