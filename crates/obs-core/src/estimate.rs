//! Cálculo de estimaciones de tiempo por paso.
//!
//! El costo de un paso depende del estado acumulado previo (cambios de
//! filtro, movimientos de offset, lámpara encendida). Ese estado se reduce al
//! memo mínimo [`EstimatorState`]: la última configuración de lámpara vista y
//! el último paso ejecutado. El memo se enhebra como acumulador explícito a
//! través de un fold — el mismo fold sirve para un paso o para una lista, y
//! es el único mecanismo de estimación en todo el motor.

use std::time::Duration;

use obs_domain::{GcalConfig, ProtoStep, StepConfig};

/// Sobrecosto de preparación del instrumento, estático por instrumento.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetupTime {
    /// Preparación completa (apuntado + configuración desde cero).
    pub full: Duration,
    /// Re-adquisición tras una interrupción corta.
    pub reacquisition: Duration,
}

/// Memo mínimo para estimar el costo del *siguiente* paso.
///
/// Se reinicia a vacío cuando la secuencia recomienza desde cero (límite de
/// visita).
#[derive(Debug, Clone, PartialEq)]
pub struct EstimatorState<D> {
    last_gcal: Option<GcalConfig>,
    last_step: Option<ProtoStep<D>>,
}

impl<D> EstimatorState<D> {
    pub fn empty() -> Self {
        EstimatorState {
            last_gcal: None,
            last_step: None,
        }
    }

    pub fn last_gcal(&self) -> Option<&GcalConfig> {
        self.last_gcal.as_ref()
    }

    pub fn last_step(&self) -> Option<&ProtoStep<D>> {
        self.last_step.as_ref()
    }
}

impl<D: Clone> EstimatorState<D> {
    /// Actualización funcional: si el paso es de lámpara, recuerda su
    /// configuración; siempre recuerda el paso en sí.
    pub fn next(&self, step: &ProtoStep<D>) -> Self {
        let last_gcal = match &step.step_config {
            StepConfig::Gcal(g) => Some(*g),
            _ => self.last_gcal,
        };
        EstimatorState {
            last_gcal,
            last_step: Some(step.clone()),
        }
    }
}

impl<D> Default for EstimatorState<D> {
    fn default() -> Self {
        EstimatorState::empty()
    }
}

/// Costo de pasos para un instrumento concreto.
///
/// Implementaciones deben ser puras respecto a (static, estado previo, paso):
/// el motor sólo fija la *forma* de la dependencia, no las tablas de costo.
pub trait TimeEstimateCalculator<S, D> {
    /// Sobrecosto de preparación, independiente de la historia.
    fn setup_time(&self, static_config: &S) -> SetupTime;

    /// Duración estimada del próximo paso dado el memo acumulado.
    fn estimate_step(
        &self,
        static_config: &S,
        state: &EstimatorState<D>,
        next: &ProtoStep<D>,
    ) -> Duration;
}

/// Fold de estimación sobre una lista de pasos.
///
/// Devuelve el memo final (para enhebrar en el átomo siguiente), la duración
/// de cada paso en orden, y el total. Aplicado a una lista de uno equivale a
/// una sola llamada a `estimate_step` + `next`.
pub fn estimate_total<S, D, C>(
    calculator: &C,
    static_config: &S,
    state: EstimatorState<D>,
    steps: &[ProtoStep<D>],
) -> (EstimatorState<D>, Vec<Duration>, Duration)
where
    D: Clone,
    C: TimeEstimateCalculator<S, D> + ?Sized,
{
    let mut current = state;
    let mut durations = Vec::with_capacity(steps.len());
    let mut total = Duration::ZERO;
    for step in steps {
        let d = calculator.estimate_step(static_config, &current, step);
        current = current.next(step);
        total += d;
        durations.push(d);
    }
    (current, durations, total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use obs_domain::{GcalLamp, GcalShutter, GuideState, Offset};

    struct FlatCost;

    impl TimeEstimateCalculator<(), u8> for FlatCost {
        fn setup_time(&self, _static_config: &()) -> SetupTime {
            SetupTime {
                full: Duration::from_secs(960),
                reacquisition: Duration::from_secs(300),
            }
        }

        fn estimate_step(
            &self,
            _static_config: &(),
            state: &EstimatorState<u8>,
            _next: &ProtoStep<u8>,
        ) -> Duration {
            // 10 s el primer paso, 1 s los siguientes: hace observable el
            // enhebrado del memo en los tests.
            if state.last_step().is_none() {
                Duration::from_secs(10)
            } else {
                Duration::from_secs(1)
            }
        }
    }

    #[test]
    fn fold_threads_state_across_steps() {
        let steps = vec![
            ProtoStep::science(0u8, Offset::ZERO, GuideState::Enabled),
            ProtoStep::science(1u8, Offset::ZERO, GuideState::Enabled),
            ProtoStep::science(2u8, Offset::ZERO, GuideState::Enabled),
        ];
        let (state, durations, total) =
            estimate_total(&FlatCost, &(), EstimatorState::empty(), &steps);
        assert_eq!(durations, vec![
            Duration::from_secs(10),
            Duration::from_secs(1),
            Duration::from_secs(1)
        ]);
        assert_eq!(total, Duration::from_secs(12));
        assert_eq!(state.last_step().unwrap().instrument, 2u8);
    }

    #[test]
    fn memo_remembers_last_gcal_config() {
        let gcal = GcalConfig {
            lamp: GcalLamp::ArcLamp,
            shutter: GcalShutter::Closed,
        };
        let state = EstimatorState::empty()
            .next(&ProtoStep::gcal(0u8, gcal))
            .next(&ProtoStep::science(1u8, Offset::ZERO, GuideState::Enabled));
        // La lámpara persiste aunque el último paso sea de ciencia.
        assert_eq!(state.last_gcal(), Some(&gcal));
        assert_eq!(state.last_step().unwrap().instrument, 1u8);
    }
}
