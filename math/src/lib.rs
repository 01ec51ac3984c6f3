#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub use measurements;

pub mod common;
pub mod spline;
pub mod temperature;
