//! Utility modules

pub mod cidr;

pub use cidr::{parse_cidr, CidrRange};
