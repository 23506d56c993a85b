pub mod config;
pub mod error;
pub mod platform;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
