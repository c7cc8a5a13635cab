//! Route tables

pub mod anonymization;
pub mod extended;
pub mod health;
