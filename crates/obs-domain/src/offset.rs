//! Offsets de apuntado del telescopio.
//!
//! Se representan en micro-segundos de arco enteros (µas) en los ejes `p` y
//! `q`. La representación entera conserva `Eq`/`Hash` exactos, que el motor
//! necesita para comparar pasos por valor durante el replay.

use serde::{Deserialize, Serialize};
use std::fmt;

const UAS_PER_ARCSEC: f64 = 1_000_000.0;

/// Offset de apuntado (p, q) en micro-segundos de arco.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Offset {
    p_uas: i64,
    q_uas: i64,
}

impl Offset {
    pub const ZERO: Offset = Offset { p_uas: 0, q_uas: 0 };

    pub fn from_uas(p_uas: i64, q_uas: i64) -> Self {
        Offset { p_uas, q_uas }
    }

    /// Construye desde segundos de arco, redondeando al µas más cercano.
    pub fn from_arcsec(p: f64, q: f64) -> Self {
        Offset {
            p_uas: (p * UAS_PER_ARCSEC).round() as i64,
            q_uas: (q * UAS_PER_ARCSEC).round() as i64,
        }
    }

    pub fn p_uas(&self) -> i64 {
        self.p_uas
    }

    pub fn q_uas(&self) -> i64 {
        self.q_uas
    }

    pub fn p_arcsec(&self) -> f64 {
        self.p_uas as f64 / UAS_PER_ARCSEC
    }

    pub fn q_arcsec(&self) -> f64 {
        self.q_uas as f64 / UAS_PER_ARCSEC
    }

    /// Distancia euclidiana a otro offset, en µas. Usada por los modelos de
    /// costo para estimar el tiempo de un movimiento de telescopio.
    pub fn distance_uas(&self, other: &Offset) -> f64 {
        let dp = (self.p_uas - other.p_uas) as f64;
        let dq = (self.q_uas - other.q_uas) as f64;
        (dp * dp + dq * dq).sqrt()
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(p: {:.3}\", q: {:.3}\")", self.p_arcsec(), self.q_arcsec())
    }
}

/// Estado de guiado asociado a un offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GuideState {
    Enabled,
    Disabled,
}

impl Default for GuideState {
    fn default() -> Self {
        GuideState::Enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_arcsec_rounds_to_nearest_uas() {
        let o = Offset::from_arcsec(1.0000004, -2.0);
        assert_eq!(o.p_uas(), 1_000_000);
        assert_eq!(o.q_uas(), -2_000_000);
    }

    #[test]
    fn distance_is_euclidean() {
        let a = Offset::from_uas(0, 0);
        let b = Offset::from_uas(3_000_000, 4_000_000);
        assert_eq!(a.distance_uas(&b), 5_000_000.0);
    }
}
