//! Shared foundational types used across the Prism shader cache.
//!
//! This crate provides the pipeline-stage tag, the compilation target profile,
//! and the 128-bit content digest that cache keys are built from.

#![warn(missing_docs)]

pub mod hash;
pub mod kind;
pub mod profile;

pub use hash::ContentHash;
pub use kind::{ShaderKind, UnknownShaderKind};
pub use profile::{FeatureLevel, ParseFeatureLevelError, TargetProfile};
