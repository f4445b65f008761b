//! SenseAI chat backend.
//!
//! Answers health questions with conservative canned replies from a static
//! rule table, deferring to a generative model only when no rule applies.

pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
