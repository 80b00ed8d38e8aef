//! Credentials domain: session identifiers, expiry claims, and token pairs.

pub mod claims;
pub mod session;
pub mod token;

pub use claims::*;
pub use session::*;
pub use token::*;
