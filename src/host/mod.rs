//! Host-side helpers that shell out to external programs

pub mod public_ip;

pub use public_ip::{public_ip, run_with_timeout};
