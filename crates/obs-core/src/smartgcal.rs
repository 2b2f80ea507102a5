//! Expansión de calibraciones smart-gcal.
//!
//! Un paso `SmartGcal` es un marcador: "insertar aquí la calibración
//! apropiada". La expansión lo resuelve contra una tabla externa indexada por
//! la configuración actual del instrumento, produciendo uno o más pasos
//! `Gcal` concretos, o un error descriptivo si no hay mapeo.
//!
//! Los errores se aíslan por átomo: un átomo con un marcador sin mapeo
//! produce `Err` para ese átomo; sus hermanos en la secuencia siguen
//! expandiéndose con normalidad.

use obs_domain::{GcalConfig, ProtoAtom, ProtoStep, SmartGcalType, StepConfig};

use crate::errors::SmartGcalError;

/// Tabla de búsqueda externa de calibraciones.
///
/// La clave se deriva de los campos de configuración del instrumento (red de
/// difracción, filtro, FPU…); cada instrumento define la suya.
pub trait SmartGcalLookup<D> {
    /// Pasos de calibración concretos para el marcador dado, en orden.
    fn lookup(&self, kind: SmartGcalType, instrument: &D) -> Option<Vec<GcalConfig>>;

    /// Descripción legible de la clave, para el mensaje de error.
    fn key_description(&self, kind: SmartGcalType, instrument: &D) -> String;
}

/// Expande un paso: los concretos pasan sin cambio como singleton; los
/// marcadores se resuelven vía la tabla o fallan con la clave faltante.
pub fn expand_step<D, L>(lookup: &L, step: &ProtoStep<D>) -> Result<Vec<ProtoStep<D>>, SmartGcalError>
where
    D: Clone,
    L: SmartGcalLookup<D> + ?Sized,
{
    match step.step_config {
        StepConfig::SmartGcal(kind) => match lookup.lookup(kind, &step.instrument) {
            Some(configs) => Ok(configs
                .into_iter()
                .map(|g| ProtoStep {
                    instrument: step.instrument.clone(),
                    step_config: StepConfig::Gcal(g),
                    observe_class: step.observe_class,
                    offset: step.offset,
                    guide: step.guide,
                    breakpoint: step.breakpoint,
                })
                .collect()),
            None => Err(SmartGcalError::MissingMapping {
                key: lookup.key_description(kind, &step.instrument),
            }),
        },
        _ => Ok(vec![step.clone()]),
    }
}

/// Expande los pasos de un átomo, cortocircuitando en el primer fallo dentro
/// del átomo.
pub fn expand_atom<D, L>(
    lookup: &L,
    atom: &ProtoAtom<ProtoStep<D>>,
) -> Result<ProtoAtom<ProtoStep<D>>, SmartGcalError>
where
    D: Clone,
    L: SmartGcalLookup<D> + ?Sized,
{
    let mut expanded = Vec::with_capacity(atom.len());
    for step in atom.steps() {
        expanded.extend(expand_step(lookup, step)?);
    }
    // La expansión nunca vacía un átomo no vacío (1 -> N, N >= 1), así que
    // from_vec no puede fallar aquí.
    ProtoAtom::from_vec(atom.description().map(str::to_string), expanded).map_err(|_| {
        unreachable!("expansion of a non-empty atom cannot produce an empty step list")
    })
}

/// Levanta la expansión sobre un stream de átomos: cada átomo produce su
/// propio `Result`, los fallos no detienen el pipeline.
pub fn expand_sequence<'a, D, L, I>(
    lookup: &'a L,
    atoms: I,
) -> impl Iterator<Item = Result<ProtoAtom<ProtoStep<D>>, SmartGcalError>> + 'a
where
    D: Clone + 'a,
    L: SmartGcalLookup<D> + ?Sized,
    I: Iterator<Item = ProtoAtom<ProtoStep<D>>> + 'a,
{
    atoms.map(move |atom| expand_atom(lookup, &atom))
}
