//! Gateway token handling

mod token;

pub use token::{Claims, TokenService};
