//! Constantes del motor de secuencias.
//!
//! Este módulo agrupa los límites temporales que gobiernan la partición de la
//! secuencia de ciencia en bloques. Cambiarlos re-particiona las secuencias
//! generadas, pero no afecta la estabilidad de los identificadores (que
//! dependen sólo de namespace e índices).

use std::time::Duration;

/// Duración máxima de un bloque de ciencia (una visita de ciclos). Al
/// alcanzarla, el bloque se cierra con un átomo de calibración.
pub const MAX_SCIENCE_BLOCK: Duration = Duration::from_secs(3 * 60 * 60);

/// Período máximo entre calibraciones dentro de un bloque. Si el tiempo de
/// ciencia acumulado lo excede, se inserta una calibración a mitad de bloque.
pub const GCAL_PERIOD: Duration = Duration::from_secs(90 * 60);
