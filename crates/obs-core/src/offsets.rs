//! Generadores de offsets de apuntado.
//!
//! Cinco estrategias para producir las posiciones de telescopio de una
//! secuencia: lista enumerada, grilla uniforme, dispersión aleatoria con
//! semilla, espiral con semilla, o ninguna. Todas devuelven pares
//! `(Offset, GuideState)` recortados a exactamente el conteo pedido; un
//! conteo no positivo produce una lista vacía sin tocar el RNG.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use obs_domain::{GuideState, Offset};

/// Ángulo áureo en radianes; separa puntos consecutivos de la espiral.
const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

/// Estrategia de generación de offsets.
///
/// `Random` y `Spiral` son reproducibles: misma semilla, misma secuencia.
/// La semilla cero es el default convencional cuando no se especifica.
#[derive(Debug, Clone, PartialEq)]
pub enum OffsetGenerator {
    /// No genera offsets, sin importar el conteo pedido.
    NoGenerator,
    /// Cicla la lista fija, repitiendo hasta satisfacer el conteo. Cada valor
    /// trae su propio estado de guiado explícito.
    Enumerated { values: Vec<(Offset, GuideState)> },
    /// Grilla casi cuadrada entre dos esquinas.
    Uniform { corner_a: Offset, corner_b: Offset },
    /// Dispersión aleatoria dentro de `size` alrededor de `center`.
    Random {
        size: Offset,
        center: Offset,
        seed: u64,
    },
    /// Patrón espiral dentro de `size` alrededor de `center`.
    Spiral {
        size: Offset,
        center: Offset,
        seed: u64,
    },
}

impl OffsetGenerator {
    /// Dispersión aleatoria con la semilla convencional cero.
    pub fn random(size: Offset, center: Offset) -> Self {
        OffsetGenerator::Random {
            size,
            center,
            seed: 0,
        }
    }

    /// Espiral con la semilla convencional cero.
    pub fn spiral(size: Offset, center: Offset) -> Self {
        OffsetGenerator::Spiral {
            size,
            center,
            seed: 0,
        }
    }

    /// Produce exactamente `count` pares (offset, guiado); vacío si
    /// `count <= 0` o si la estrategia es `NoGenerator`.
    pub fn generate(&self, count: i32) -> Vec<(Offset, GuideState)> {
        if count <= 0 {
            return Vec::new();
        }
        let count = count as usize;
        match self {
            OffsetGenerator::NoGenerator => Vec::new(),
            OffsetGenerator::Enumerated { values } => {
                if values.is_empty() {
                    return Vec::new();
                }
                values.iter().cycle().take(count).copied().collect()
            }
            OffsetGenerator::Uniform { corner_a, corner_b } => {
                uniform_grid(*corner_a, *corner_b, count)
            }
            OffsetGenerator::Random { size, center, seed } => {
                random_scatter(*size, *center, *seed, count)
            }
            OffsetGenerator::Spiral { size, center, seed } => {
                spiral(*size, *center, *seed, count)
            }
        }
    }
}

/// Paso de muestreo sobre un eje: extensión/(n-1) cuando n > 2, extensión
/// completa en caso contrario.
fn axis_step(extent: f64, n: usize) -> f64 {
    if n > 2 {
        extent / (n as f64 - 1.0)
    } else {
        extent
    }
}

/// Grilla casi cuadrada entre dos esquinas (inclusive), row-major desde la
/// esquina de mayor coordenada en cada eje, descendiendo, recortada a `count`.
fn uniform_grid(corner_a: Offset, corner_b: Offset, count: usize) -> Vec<(Offset, GuideState)> {
    let w = (corner_a.p_uas() - corner_b.p_uas()).abs() as f64;
    let h = (corner_a.q_uas() - corner_b.q_uas()).abs() as f64;

    let (rows, cols) = if h == 0.0 {
        (1usize, count)
    } else {
        let cols = ((count as f64 * w / h).sqrt().round() as usize).max(1);
        let rows = (count.div_ceil(cols)).max(1);
        let cols = count.div_ceil(rows);
        (rows, cols)
    };

    let start_p = corner_a.p_uas().max(corner_b.p_uas()) as f64;
    let start_q = corner_a.q_uas().max(corner_b.q_uas()) as f64;
    let step_p = axis_step(w, cols);
    let step_q = axis_step(h, rows);

    let mut points = Vec::with_capacity(count);
    'outer: for row in 0..rows {
        for col in 0..cols {
            if points.len() == count {
                break 'outer;
            }
            let p = start_p - col as f64 * step_p;
            let q = start_q - row as f64 * step_q;
            points.push((
                Offset::from_uas(p.round() as i64, q.round() as i64),
                GuideState::Enabled,
            ));
        }
    }
    points
}

fn random_scatter(size: Offset, center: Offset, seed: u64, count: usize) -> Vec<(Offset, GuideState)> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let fp: f64 = rng.random::<f64>() - 0.5;
            let fq: f64 = rng.random::<f64>() - 0.5;
            let p = center.p_uas() as f64 + fp * size.p_uas() as f64;
            let q = center.q_uas() as f64 + fq * size.q_uas() as f64;
            (
                Offset::from_uas(p.round() as i64, q.round() as i64),
                GuideState::Enabled,
            )
        })
        .collect()
}

/// Espiral de ángulo áureo con fase inicial derivada de la semilla: radios
/// crecientes hacia el borde de `size`, densidad aproximadamente uniforme.
fn spiral(size: Offset, center: Offset, seed: u64, count: usize) -> Vec<(Offset, GuideState)> {
    let mut rng = StdRng::seed_from_u64(seed);
    let phase: f64 = rng.random::<f64>() * std::f64::consts::TAU;
    (0..count)
        .map(|i| {
            let frac = ((i as f64) + 0.5) / count as f64;
            let radial = frac.sqrt();
            let theta = phase + i as f64 * GOLDEN_ANGLE;
            let p = center.p_uas() as f64 + radial * theta.cos() * size.p_uas() as f64 / 2.0;
            let q = center.q_uas() as f64 + radial * theta.sin() * size.q_uas() as f64 / 2.0;
            (
                Offset::from_uas(p.round() as i64, q.round() as i64),
                GuideState::Enabled,
            )
        })
        .collect()
}
