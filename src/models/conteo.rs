// src/models/conteo.rs
use super::Empresa;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

// ==================== CONTEO ====================

/// Point-in-time cup count for one machine. Pure log: no stock interaction.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Conteo {
    pub id: i64,
    pub maquina_id: i64,
    pub cantidad_vasos: i64,
    #[serde(default)]
    pub observaciones: Option<String>,
    pub fecha: DateTime<Utc>,
    #[serde(default)]
    pub maquina_nombre: Option<String>,
    #[serde(default)]
    pub edificio: Option<String>,
    #[serde(default)]
    pub empresa: Option<Empresa>,
}

#[derive(Debug, Serialize, Validate, Clone)]
pub struct NuevoConteo {
    pub maquina_id: i64,
    #[validate(range(min = 1, message = "El conteo debe ser mayor a 0"))]
    pub cantidad_vasos: i64,
    pub observaciones: Option<String>,
    pub empresa: Empresa,
}

#[derive(Debug, Serialize, Validate, Clone)]
pub struct ActualizarConteo {
    #[validate(range(min = 1, message = "El conteo debe ser mayor a 0"))]
    pub cantidad_vasos: i64,
    pub observaciones: Option<String>,
}
