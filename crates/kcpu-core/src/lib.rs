//! Core data structures for kcpu.
//!
//! This crate contains:
//! - The instrumented operand [`Stack`] with configurable integrity checks
//! - The ANSI [`Colors`] palette shared by the dump and trace renderers

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod colors;
pub mod stack;


pub use colors::{Colors, Painted};
pub use stack::{SecurityLevel, Stack, StackConfig, StackError, StackValue};
