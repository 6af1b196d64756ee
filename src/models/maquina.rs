// src/models/maquina.rs
use super::Empresa;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

// ==================== MAQUINA ====================

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Maquina {
    pub id: i64,
    pub nombre: String,
    pub edificio: String,
    #[serde(default)]
    pub ubicacion: Option<String>,
    pub empresa: Empresa,
    /// Free-form status owned by the backend ("activa", "mantenimiento", ...).
    #[serde(default)]
    pub estado: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Maquina {
    /// Whether the machine matches a free-text search over name, building,
    /// business unit and location.
    pub fn coincide_busqueda(&self, termino: &str) -> bool {
        let termino = termino.to_lowercase();
        self.nombre.to_lowercase().contains(&termino)
            || self.edificio.to_lowercase().contains(&termino)
            || self.empresa.to_string().to_lowercase().contains(&termino)
            || self
                .ubicacion
                .as_deref()
                .map(|u| u.to_lowercase().contains(&termino))
                .unwrap_or(false)
    }
}

/// Body shared by `POST /api/maquinas` and `PUT /api/maquinas/:id`; the form
/// submits the same shape for both.
#[derive(Debug, Serialize, Validate, Clone)]
pub struct DatosMaquina {
    #[validate(length(min = 1, max = 255, message = "El nombre debe tener entre 1 y 255 caracteres"))]
    pub nombre: String,

    #[validate(length(min = 1, max = 255, message = "El edificio debe tener entre 1 y 255 caracteres"))]
    pub edificio: String,

    #[validate(length(max = 255, message = "La ubicación no puede superar los 255 caracteres"))]
    pub ubicacion: Option<String>,

    pub empresa: Empresa,
}
