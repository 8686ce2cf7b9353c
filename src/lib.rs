//! Tandem - Two-Role Business Transaction Coordination Engine
//!
//! This crate implements the DEMO transaction pattern: an initiator and an
//! executor jointly produce one result by exchanging a strictly ordered
//! sequence of typed coordination facts, including four parallel cancellation
//! sub-protocols.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
