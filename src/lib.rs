//! ObsFlow Rust Library
//!
//! Este crate actúa como la fachada de ObsFlow:
//! - Re-exporta `obs_domain` con los tipos de valor compartidos.
//! - Re-exporta `obs_core` con el motor neutral de secuencias.
//! - Re-exporta `obs_longslit` con el modo long-slit concreto.
//!
//! Puede usarse desde `main.rs` o por otros crates/clientes.

pub use obs_core as core;
pub use obs_domain as domain;
pub use obs_longslit as longslit;
