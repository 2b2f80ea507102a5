//! Modelo de costo temporal del espectrógrafo long-slit.
//!
//! Implementa el calculador neutro de obs-core con la tabla de constantes
//! del instrumento: lectura del detector, escritura, y los deltas que
//! dependen del estado acumulado (cambios de filtro/red/rendija, movimiento
//! de offset, cambio de configuración de lámpara).

use std::time::Duration;

use obs_core::{EstimatorState, SetupTime, TimeEstimateCalculator};
use obs_domain::{ProtoStep, StepConfig};

use crate::config::{LongslitDynamic, LongslitStatic, ReadoutMode};

const READOUT_FAST: Duration = Duration::from_secs(8);
const READOUT_SLOW: Duration = Duration::from_secs(25);
const WRITE: Duration = Duration::from_secs(10);
const FILTER_CHANGE: Duration = Duration::from_secs(50);
const GRATING_CHANGE: Duration = Duration::from_secs(90);
const FPU_CHANGE: Duration = Duration::from_secs(95);
const OFFSET_CONSTANT: Duration = Duration::from_secs(7);
/// Segundos adicionales por segundo de arco de movimiento.
const OFFSET_RATE_SEC_PER_ARCSEC: f64 = 0.0625;
const GCAL_CHANGE: Duration = Duration::from_secs(15);

const SETUP_FULL: Duration = Duration::from_secs(16 * 60);
const SETUP_REACQUISITION: Duration = Duration::from_secs(5 * 60);

/// Calculador de estimaciones long-slit. Sin estado propio: todo lo variable
/// entra por el memo del estimador.
#[derive(Debug, Clone, Copy, Default)]
pub struct LongslitCost;

fn readout(mode: ReadoutMode) -> Duration {
    match mode {
        ReadoutMode::Fast => READOUT_FAST,
        ReadoutMode::Slow => READOUT_SLOW,
    }
}

impl TimeEstimateCalculator<LongslitStatic, LongslitDynamic> for LongslitCost {
    fn setup_time(&self, _static_config: &LongslitStatic) -> SetupTime {
        SetupTime {
            full: SETUP_FULL,
            reacquisition: SETUP_REACQUISITION,
        }
    }

    fn estimate_step(
        &self,
        _static_config: &LongslitStatic,
        state: &EstimatorState<LongslitDynamic>,
        next: &ProtoStep<LongslitDynamic>,
    ) -> Duration {
        let mut total = next.instrument.exposure + readout(next.instrument.readout) + WRITE;

        if let Some(prev) = state.last_step() {
            if prev.instrument.filter != next.instrument.filter {
                total += FILTER_CHANGE;
            }
            if prev.instrument.grating != next.instrument.grating {
                total += GRATING_CHANGE;
            }
            if prev.instrument.fpu != next.instrument.fpu {
                total += FPU_CHANGE;
            }
            if prev.offset != next.offset {
                let arcsec = prev.offset.distance_uas(&next.offset) / 1_000_000.0;
                total += OFFSET_CONSTANT
                    + Duration::from_secs_f64(arcsec * OFFSET_RATE_SEC_PER_ARCSEC);
            }
        }

        if let StepConfig::Gcal(g) = &next.step_config {
            if state.last_gcal() != Some(g) {
                total += GCAL_CHANGE;
            }
        }

        total
    }
}
