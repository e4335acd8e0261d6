// SPDX-License-Identifier: MIT

//! Natural-language check engine
//!
//! - [check] - parsing, evaluation, retrying and reporting of checks
//! - [operators] - the built-in operator keywords
//! - [runtime] - an in-process host with keyword registry and variables
//! - [config] - engine configuration

pub mod check;
pub mod config;
pub mod operators;
pub mod runtime;
