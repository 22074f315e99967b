#![forbid(unsafe_code)]

pub mod config;
pub mod dashboard_view;
pub mod onboarding;
pub mod price_feed;
pub mod session_store;
pub mod wallet;
