//! Configuración estática y dinámica del espectrógrafo long-slit.
//!
//! `LongslitStatic` es inmutable por observación y se valida al construirse
//! (los errores de configuración son valores, nunca panics). De ella se
//! derivan las configuraciones dinámicas de cada paso: imagen de
//! adquisición, centrado en rendija, ajuste fino y exposición de ciencia.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use obs_core::GeneratorError;
use obs_domain::Offset;

/// Redes de difracción disponibles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grating {
    B480,
    R831,
    R150,
}

impl Grating {
    pub const ALL: [Grating; 3] = [Grating::B480, Grating::R831, Grating::R150];
}

/// Filtros de bloqueo de orden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Filter {
    Clear,
    GG455,
    OG515,
    RG610,
}

impl Filter {
    pub const ALL: [Filter; 4] = [Filter::Clear, Filter::GG455, Filter::OG515, Filter::RG610];
}

/// Unidades de plano focal (rendijas, ancho en segundos de arco).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Fpu {
    LongSlit025,
    LongSlit050,
    LongSlit100,
}

impl Fpu {
    pub const ALL: [Fpu; 3] = [Fpu::LongSlit025, Fpu::LongSlit050, Fpu::LongSlit100];
}

/// Modo de lectura del detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReadoutMode {
    Fast,
    Slow,
}

/// Exposición de la imagen de campo completo de adquisición.
pub const ACQ_IMAGE_EXPOSURE: Duration = Duration::from_secs(10);
/// Exposición de la imagen a través de la rendija.
pub const ACQ_SLIT_EXPOSURE: Duration = Duration::from_secs(20);
/// Exposición del paso de ajuste fino.
pub const ACQ_FINE_EXPOSURE: Duration = Duration::from_secs(40);
/// Dither espacial por defecto a lo largo de la rendija (q), en µas.
pub const DEFAULT_DITHER_Q_UAS: i64 = 15_000_000;

/// Configuración dinámica de un paso long-slit. Se compara por valor durante
/// el replay.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LongslitDynamic {
    pub exposure: Duration,
    pub grating: Option<Grating>,
    pub filter: Option<Filter>,
    pub fpu: Option<Fpu>,
    pub readout: ReadoutMode,
}

/// Configuración estática long-slit, fija durante toda la observación.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LongslitStatic {
    grating: Grating,
    filter: Option<Filter>,
    fpu: Fpu,
    exposure: Duration,
    exposure_count: u32,
    readout: ReadoutMode,
    dither_q_uas: i64,
    explicit_offsets: Option<Vec<Offset>>,
}

impl LongslitStatic {
    /// Valida y construye. Errores de configuración: exposición
    /// no positiva y cantidad incorrecta de offsets explícitos (se esperan
    /// exactamente los dos puntos A y B del patrón).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        grating: Grating,
        filter: Option<Filter>,
        fpu: Fpu,
        exposure: Duration,
        exposure_count: u32,
        readout: ReadoutMode,
        dither_q_uas: i64,
        explicit_offsets: Option<Vec<Offset>>,
    ) -> Result<Self, GeneratorError> {
        if exposure.is_zero() {
            return Err(GeneratorError::InvalidExposureTime);
        }
        if let Some(offsets) = &explicit_offsets {
            if offsets.len() != 2 {
                return Err(GeneratorError::WrongOffsetCount {
                    expected: 2,
                    actual: offsets.len(),
                });
            }
        }
        Ok(LongslitStatic {
            grating,
            filter,
            fpu,
            exposure,
            exposure_count,
            readout,
            dither_q_uas,
            explicit_offsets,
        })
    }

    pub fn grating(&self) -> Grating {
        self.grating
    }

    pub fn filter(&self) -> Option<Filter> {
        self.filter
    }

    pub fn fpu(&self) -> Fpu {
        self.fpu
    }

    pub fn exposure(&self) -> Duration {
        self.exposure
    }

    pub fn exposure_count(&self) -> u32 {
        self.exposure_count
    }

    pub fn readout(&self) -> ReadoutMode {
        self.readout
    }

    /// Filtro usado durante la adquisición: el de la observación, o `Clear`.
    fn acquisition_filter(&self) -> Filter {
        self.filter.unwrap_or(Filter::Clear)
    }

    /// Imagen de campo completo: sin red, sin rendija, lectura rápida.
    pub fn acquisition_image(&self) -> LongslitDynamic {
        LongslitDynamic {
            exposure: ACQ_IMAGE_EXPOSURE,
            grating: None,
            filter: Some(self.acquisition_filter()),
            fpu: None,
            readout: ReadoutMode::Fast,
        }
    }

    /// Imagen a través de la rendija, todavía sin red.
    pub fn acquisition_slit(&self) -> LongslitDynamic {
        LongslitDynamic {
            exposure: ACQ_SLIT_EXPOSURE,
            grating: None,
            filter: Some(self.acquisition_filter()),
            fpu: Some(self.fpu),
            readout: ReadoutMode::Fast,
        }
    }

    /// Ajuste fino: igual que la rendija pero con exposición de verificación.
    pub fn acquisition_fine(&self) -> LongslitDynamic {
        LongslitDynamic {
            exposure: ACQ_FINE_EXPOSURE,
            grating: None,
            filter: Some(self.acquisition_filter()),
            fpu: Some(self.fpu),
            readout: ReadoutMode::Fast,
        }
    }

    /// Configuración de ciencia: red y rendija de la observación.
    pub fn science_dynamic(&self) -> LongslitDynamic {
        LongslitDynamic {
            exposure: self.exposure,
            grating: Some(self.grating),
            filter: self.filter,
            fpu: Some(self.fpu),
            readout: self.readout,
        }
    }

    /// Offsets del ciclo ABBA: los dos puntos explícitos si se configuraron,
    /// o el dither simétrico (0, ±q) por defecto.
    pub fn cycle_offsets(&self) -> [Offset; 4] {
        let (a, b) = match &self.explicit_offsets {
            Some(offsets) => (offsets[0], offsets[1]),
            None => (
                Offset::from_uas(0, self.dither_q_uas),
                Offset::from_uas(0, -self.dither_q_uas),
            ),
        };
        [a, b, b, a]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Result<LongslitStatic, GeneratorError> {
        LongslitStatic::new(
            Grating::R831,
            Some(Filter::GG455),
            Fpu::LongSlit050,
            Duration::from_secs(300),
            16,
            ReadoutMode::Slow,
            DEFAULT_DITHER_Q_UAS,
            None,
        )
    }

    #[test]
    fn zero_exposure_is_a_configuration_error() {
        let r = LongslitStatic::new(
            Grating::R831,
            None,
            Fpu::LongSlit050,
            Duration::ZERO,
            16,
            ReadoutMode::Slow,
            DEFAULT_DITHER_Q_UAS,
            None,
        );
        assert_eq!(r.unwrap_err(), GeneratorError::InvalidExposureTime);
    }

    #[test]
    fn explicit_offsets_must_be_exactly_two() {
        let r = LongslitStatic::new(
            Grating::R831,
            None,
            Fpu::LongSlit050,
            Duration::from_secs(300),
            16,
            ReadoutMode::Slow,
            DEFAULT_DITHER_Q_UAS,
            Some(vec![Offset::ZERO]),
        );
        assert_eq!(
            r.unwrap_err(),
            GeneratorError::WrongOffsetCount {
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn abba_pattern_mirrors_the_two_positions() {
        let cfg = base().expect("valid config");
        let [a, b, c, d] = cfg.cycle_offsets();
        assert_eq!(a, d);
        assert_eq!(b, c);
        assert_eq!(a.q_uas(), -b.q_uas());
    }
}
