//! Grid Router Library
//!
//! Least-cost routing over a one-way city grid whose travel costs change
//! with the hour of day.

pub mod routing;
