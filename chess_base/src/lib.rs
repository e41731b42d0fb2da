//! # Base types for chessington
//!
//! This is an auxiliary crate for `chessington`, which contains the plain value types: squares,
//! players, square sets and board geometry. It was split from the main crate, so everything declared
//! here is free of any board or piece logic.
//!
//! Normally you don't want to use this crate directly. Use `chessington` instead.

pub mod bitboard;
pub mod geometry;
pub mod types;
