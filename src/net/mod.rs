//! Network address helpers.

mod address;

pub use address::{is_valid_ip, is_valid_ipv4, is_valid_ipv6};

#[cfg(test)]
pub(crate) use address::{INVALID_ADDRESSES, VALID_ADDRESSES};
