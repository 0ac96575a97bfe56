//! Functional units.
//!
//! This module contains the instruction cache: replacement logic, tag and
//! data storage, the refill controller and the disabled-cache bypass.

/// Set-associative instruction cache with matrix pseudo-LRU replacement.
pub mod cache;
