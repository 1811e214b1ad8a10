//! Wire and domain types shared between the dashboard core and its front ends.

pub mod domain;
pub mod error;
pub mod protocol;
