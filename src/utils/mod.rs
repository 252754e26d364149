pub mod maths;

pub use maths::{FibLevel, fibonacci_levels, pct_change};
