// SPDX-License-Identifier: MIT

//!
//! Multi-format, era-aware date parsing for timeline feeds.
//!
//! Timeline feeds carry dates in wildly mixed shapes: ISO-8601 with or
//! without separators, bare years, `AD`/`BC` era markers, negative years.
//! This crate normalizes all of them into a single comparable [`Instant`]
//! through one of three interchangeable strategies ([`parse_iso8601`],
//! [`parse_gregorian`] and [`parse_hybrid`], selectable at runtime via
//! [`Strategy`]), and places raw feed records as timeline [`Event`]s.
//!
//! Malformed input is expected, not exceptional: every parse function is
//! total and signals failure with `None`, so a batch loader can skip bad
//! records without unwinding.  All types are plain values; the whole crate
//! is pure and synchronous and can be used from any number of threads.
//!

mod instant;
mod item;
mod parse;

pub use instant::*;
pub use item::*;
pub use parse::*;
