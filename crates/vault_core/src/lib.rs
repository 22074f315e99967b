#![forbid(unsafe_code)]

pub mod dashboard;
pub mod receipt;
pub mod risk;
pub mod session;
pub mod wizard;
