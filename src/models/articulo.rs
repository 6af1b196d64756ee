// src/models/articulo.rs
use super::Empresa;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

// ==================== ARTICULO ====================

/// Consumable stock item. `disponibles` is computed by the backend as
/// `cantidad - utilizados` on every mutation.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Articulo {
    pub id: i64,
    pub nombre: String,
    pub cantidad: i64,
    pub utilizados: i64,
    pub disponibles: i64,
    #[serde(default)]
    pub simbolo: Option<String>,
    #[serde(default)]
    pub empresa: Option<Empresa>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Stock badge thresholds.
pub const UMBRAL_STOCK_BAJO: i64 = 2;
pub const UMBRAL_STOCK_ALTO: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NivelStock {
    Bajo,
    Medio,
    Alto,
}

impl NivelStock {
    pub fn etiqueta(&self) -> &'static str {
        match self {
            NivelStock::Bajo => "Stock bajo",
            NivelStock::Medio => "Stock medio",
            NivelStock::Alto => "Stock alto",
        }
    }
}

impl Articulo {
    /// Available units as shown to the operator; never negative even if the
    /// raw fields disagree.
    pub fn disponibles_visibles(&self) -> i64 {
        self.disponibles.max(0)
    }

    pub fn nivel_stock(&self) -> NivelStock {
        let disponibles = self.disponibles_visibles();
        if disponibles <= UMBRAL_STOCK_BAJO {
            NivelStock::Bajo
        } else if disponibles >= UMBRAL_STOCK_ALTO {
            NivelStock::Alto
        } else {
            NivelStock::Medio
        }
    }
}

#[derive(Debug, Serialize, Validate, Clone)]
pub struct NuevoArticulo {
    #[validate(length(min = 1, max = 255, message = "El nombre debe tener entre 1 y 255 caracteres"))]
    pub nombre: String,

    #[validate(range(min = 1, message = "La cantidad debe ser mayor a 0"))]
    pub cantidad: i64,

    #[validate(length(max = 10, message = "El símbolo no puede superar los 10 caracteres"))]
    pub simbolo: Option<String>,

    pub empresa: Empresa,
}

/// Full replacement body for `PUT /api/articulos/:id`; the edit form always
/// submits every field.
#[derive(Debug, Serialize, Validate, Clone)]
pub struct ActualizarArticulo {
    #[validate(length(min = 1, max = 255, message = "El nombre debe tener entre 1 y 255 caracteres"))]
    pub nombre: String,

    #[validate(range(min = 1, message = "La cantidad debe ser mayor a 0"))]
    pub cantidad: i64,

    #[validate(range(min = 0, message = "La cantidad utilizada no puede ser negativa"))]
    pub utilizados: i64,

    #[validate(length(max = 10, message = "El símbolo no puede superar los 10 caracteres"))]
    pub simbolo: Option<String>,

    pub empresa: Empresa,
}

/// Body for `POST /api/articulos/:id/utilizar`.
#[derive(Debug, Serialize, Validate, Clone)]
pub struct UtilizarArticulo {
    #[serde(rename = "cantidadUtilizada")]
    #[validate(range(min = 1, message = "La cantidad debe ser mayor a 0"))]
    pub cantidad_utilizada: i64,
}
