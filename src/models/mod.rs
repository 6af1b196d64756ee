// src/models/mod.rs

pub mod articulo;
pub mod carga;
pub mod conteo;
pub mod estadisticas;
pub mod maquina;

pub use articulo::*;
pub use carga::*;
pub use conteo::*;
pub use estadisticas::*;
pub use maquina::*;

use serde::{Deserialize, Serialize};

// ==================== EMPRESA ====================

/// Business unit. The whole dashboard is scoped by exactly these two values;
/// the wire format carries them verbatim ("Telecom" / "Pago Online").
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum Empresa {
    #[serde(rename = "Telecom")]
    #[strum(serialize = "Telecom")]
    Telecom,
    #[serde(rename = "Pago Online")]
    #[strum(serialize = "Pago Online")]
    PagoOnline,
}

impl Default for Empresa {
    fn default() -> Self {
        Empresa::Telecom
    }
}
