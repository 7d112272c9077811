//! Skill Coach - Conversational soft-skills trainer backend
//!
//! This crate answers chat-transport events: it walks a user through a short
//! diagnostic, serves training cases for a chosen skill and evaluates free
//! text answers, using a language model when one is configured and static
//! content with keyword heuristics otherwise.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
