//! Pasos y átomos sin ejecutar (`ProtoStep`, `ProtoAtom`).
//!
//! Rol en el flujo:
//! - Los generadores de secuencia producen `ProtoAtom<ProtoStep<D>>` sin
//!   identidad; el Atom Builder del motor les asigna ids deterministas.
//! - Un `ProtoStep` se compara por valor (`D: PartialEq`): el replay de la
//!   historia decide "dónde estamos" comparando contenido, nunca ids.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::offset::{GuideState, Offset};

/// Lámpara de calibración.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GcalLamp {
    ArcLamp,
    FlatLamp,
}

/// Obturador de la unidad de calibración.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GcalShutter {
    Open,
    Closed,
}

/// Configuración concreta de calibración (lámpara + obturador).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GcalConfig {
    pub lamp: GcalLamp,
    pub shutter: GcalShutter,
}

/// Tipo de calibración abstracta a resolver vía smart-gcal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SmartGcalType {
    Arc,
    Flat,
}

/// Etiqueta del tipo de paso.
///
/// `SmartGcal` es un marcador: "insertar aquí la calibración apropiada". Se
/// resuelve después, mediante una tabla externa, a uno o más pasos `Gcal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepConfig {
    Science,
    Gcal(GcalConfig),
    SmartGcal(SmartGcalType),
    Dark,
    Bias,
}

impl StepConfig {
    pub fn is_smart_gcal(&self) -> bool {
        matches!(self, StepConfig::SmartGcal(_))
    }

    pub fn gcal(&self) -> Option<&GcalConfig> {
        match self {
            StepConfig::Gcal(g) => Some(g),
            _ => None,
        }
    }
}

/// Clase de observación del paso (determina a qué presupuesto de tiempo carga).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObserveClass {
    Science,
    Acquisition,
    NightCal,
    DayCal,
}

/// Punto de interrupción solicitado antes de ejecutar el paso.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Breakpoint {
    Enabled,
    Disabled,
}

impl Default for Breakpoint {
    fn default() -> Self {
        Breakpoint::Disabled
    }
}

/// Un paso sin ejecutar: configuración dinámica del instrumento más el
/// contexto de telescopio. Sin identidad propia.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProtoStep<D> {
    pub instrument: D,
    pub step_config: StepConfig,
    pub observe_class: ObserveClass,
    pub offset: Offset,
    pub guide: GuideState,
    pub breakpoint: Breakpoint,
}

impl<D> ProtoStep<D> {
    /// Paso de ciencia en el offset dado, guiado activo.
    pub fn science(instrument: D, offset: Offset, guide: GuideState) -> Self {
        ProtoStep {
            instrument,
            step_config: StepConfig::Science,
            observe_class: ObserveClass::Science,
            offset,
            guide,
            breakpoint: Breakpoint::Disabled,
        }
    }

    /// Paso de adquisición (imagen/centrado) en el offset dado.
    pub fn acquisition(instrument: D, offset: Offset) -> Self {
        ProtoStep {
            instrument,
            step_config: StepConfig::Science,
            observe_class: ObserveClass::Acquisition,
            offset,
            guide: GuideState::Enabled,
            breakpoint: Breakpoint::Disabled,
        }
    }

    /// Paso de calibración concreto (lámpara conocida). Sin guiado.
    pub fn gcal(instrument: D, gcal: GcalConfig) -> Self {
        ProtoStep {
            instrument,
            step_config: StepConfig::Gcal(gcal),
            observe_class: ObserveClass::NightCal,
            offset: Offset::ZERO,
            guide: GuideState::Disabled,
            breakpoint: Breakpoint::Disabled,
        }
    }

    /// Marcador de calibración a expandir vía smart-gcal.
    pub fn smart_gcal(instrument: D, kind: SmartGcalType) -> Self {
        ProtoStep {
            instrument,
            step_config: StepConfig::SmartGcal(kind),
            observe_class: ObserveClass::NightCal,
            offset: Offset::ZERO,
            guide: GuideState::Disabled,
            breakpoint: Breakpoint::Disabled,
        }
    }
}

/// Un átomo sin construir: descripción opcional y lista no vacía de pasos.
///
/// La no-vacuidad se garantiza por construcción: `new` recibe el primer paso
/// por separado. `from_vec` valida una lista ya armada.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtoAtom<S> {
    description: Option<String>,
    steps: Vec<S>,
}

impl<S> ProtoAtom<S> {
    pub fn new(description: Option<String>, first: S, rest: Vec<S>) -> Self {
        let mut steps = Vec::with_capacity(1 + rest.len());
        steps.push(first);
        steps.extend(rest);
        ProtoAtom { description, steps }
    }

    /// Átomo de un solo paso.
    pub fn single(description: Option<String>, step: S) -> Self {
        ProtoAtom::new(description, step, Vec::new())
    }

    /// Valida que la lista no esté vacía.
    pub fn from_vec(description: Option<String>, steps: Vec<S>) -> Result<Self, DomainError> {
        if steps.is_empty() {
            return Err(DomainError::ValidationError(
                "an atom requires at least one step".to_string(),
            ));
        }
        Ok(ProtoAtom { description, steps })
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn steps(&self) -> &[S] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        // Nunca por construcción; presente por convención de la API.
        self.steps.is_empty()
    }

    pub fn into_parts(self) -> (Option<String>, Vec<S>) {
        (self.description, self.steps)
    }
}
