//! Umlweld Core Types and Definitions
//!
//! This crate provides the foundational types for the umlweld class-diagram
//! toolchain. It includes:
//!
//! - **Model**: The in-memory representation of a parsed diagram
//!   ([`model::Diagram`] and its child entities)
//! - **Normalization**: Line-ending and blank-line canonicalization applied
//!   before parsing and after rendering ([`normalize::normalize`])
//! - **Rendering**: Pure per-node text rendering primitives shared by every
//!   reconstruction strategy ([`render`] module)

pub mod model;
pub mod normalize;
pub mod render;
