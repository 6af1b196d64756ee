// src/models/carga.rs
use super::Empresa;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

// ==================== CARGA ====================

/// One load line item as the backend stores it. The denormalized display
/// fields are only present on list/detail reads, not on the create response.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Carga {
    pub id: i64,
    pub maquina_id: i64,
    pub articulo_id: i64,
    pub cantidad_cargada: i64,
    #[serde(default)]
    pub fecha_carga: String,
    #[serde(default)]
    pub usuario: Option<String>,
    #[serde(default)]
    pub observaciones: Option<String>,
    #[serde(default)]
    pub maquina_nombre: Option<String>,
    #[serde(default)]
    pub edificio: Option<String>,
    #[serde(default)]
    pub ubicacion: Option<String>,
    #[serde(default)]
    pub empresa: Option<Empresa>,
    #[serde(default)]
    pub articulo_nombre: Option<String>,
    #[serde(default)]
    pub articulo_simbolo: Option<String>,
}

/// A user-facing load operation: every line item sharing machine, calendar
/// date and operator, pre-aggregated by the backend. `id` is the
/// representative line-item id the delete endpoint accepts.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CargaAgrupada {
    pub id: i64,
    pub maquina_id: i64,
    #[serde(default)]
    pub usuario: Option<String>,
    #[serde(default)]
    pub observaciones: Option<String>,
    /// Calendar date used as the grouping key and the detail-lookup path segment.
    pub fecha: NaiveDate,
    pub fecha_carga: String,
    pub maquina_nombre: String,
    pub edificio: String,
    #[serde(default)]
    pub ubicacion: Option<String>,
    pub empresa: Empresa,
    pub total_productos: i64,
    pub total_cantidad: i64,
    #[serde(default)]
    pub productos_detalle: String,
}

/// Line-item breakdown of one grouped load.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DetalleCarga {
    pub id: i64,
    pub articulo_id: i64,
    pub cantidad_cargada: i64,
    pub fecha_carga: String,
    pub articulo_nombre: String,
    #[serde(default)]
    pub articulo_simbolo: Option<String>,
}

/// Body for `POST /api/cargas`.
#[derive(Debug, Serialize, Validate, Clone)]
pub struct NuevaCarga {
    pub maquina_id: i64,
    pub articulo_id: i64,
    #[validate(range(min = 1, message = "La cantidad debe ser mayor a 0"))]
    pub cantidad_cargada: i64,
    pub usuario: Option<String>,
    pub observaciones: Option<String>,
}

// ==================== FILTROS ====================

/// Query filters for the grouped load list. Filtering always re-issues a
/// fresh fetch; there is no client-side narrowing for this view.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FiltrosCarga {
    pub maquina_id: Option<i64>,
    pub articulo_id: Option<i64>,
    pub fecha_desde: Option<NaiveDate>,
    pub fecha_hasta: Option<NaiveDate>,
}

impl FiltrosCarga {
    pub fn esta_vacio(&self) -> bool {
        *self == FiltrosCarga::default()
    }

    pub fn limpiar(&mut self) {
        *self = FiltrosCarga::default();
    }

    /// Renders the set filters as query parameters, omitting unset ones.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(id) = self.maquina_id {
            params.push(("maquina_id", id.to_string()));
        }
        if let Some(id) = self.articulo_id {
            params.push(("articulo_id", id.to_string()));
        }
        if let Some(desde) = self.fecha_desde {
            params.push(("fecha_desde", desde.format("%Y-%m-%d").to_string()));
        }
        if let Some(hasta) = self.fecha_hasta {
            params.push(("fecha_hasta", hasta.format("%Y-%m-%d").to_string()));
        }
        params
    }
}
