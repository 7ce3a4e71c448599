//! Core types shared across apidelta facilities
//!
//! This crate provides the canonical field keys and event names used by the
//! logging facility, so every component emits the same structured schema.

pub mod schema;
