//! A keyboard-driven calculator.
//!
//! [`calculator`] holds the display-free core: the expression buffer rules
//! and the evaluator. [`session`] ties them into the interactive state
//! machine that talks to a display and an error-recovery timer.

pub mod calculator;
pub mod config;
pub mod error;
pub mod session;

pub use error::CalcError;
