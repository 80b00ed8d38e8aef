//! Extension contracts grown alongside the core gateway.

pub mod session_end;

pub use session_end::*;
