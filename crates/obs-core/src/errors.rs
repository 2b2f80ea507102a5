//! Errores del motor: configuración y smart-gcal.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errores de configuración, fatales para la construcción del generador.
/// Se devuelven como valores al construir, nunca se lanzan.
#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum GeneratorError {
    #[error("invalid exposure time: must be positive")]
    InvalidExposureTime,
    #[error("expected {expected} offset positions, got {actual}")]
    WrongOffsetCount { expected: usize, actual: usize },
    #[error("a single cycle ({cycle_seconds} s) exceeds the maximum science block ({max_seconds} s)")]
    CycleTooLong { cycle_seconds: u64, max_seconds: u64 },
}

/// Error recuperable por átomo: falta un mapeo en la tabla smart-gcal.
#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum SmartGcalError {
    #[error("no smart gcal mapping for key {key}")]
    MissingMapping { key: String },
}
