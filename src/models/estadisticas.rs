// src/models/estadisticas.rs
//! Backend-aggregated statistics payloads. The statistics endpoints predate
//! the rest of the API and answer in camelCase.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tendencia {
    Subida,
    Bajada,
    #[default]
    Estable,
}

impl Tendencia {
    pub fn etiqueta(&self) -> &'static str {
        match self {
            Tendencia::Subida => "en subida",
            Tendencia::Bajada => "en bajada",
            Tendencia::Estable => "estable",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct EstadisticasGenerales {
    pub total_vasos_hoy: i64,
    pub total_vasos_semana: i64,
    pub total_vasos_mes: i64,
    #[serde(default)]
    pub maquina_mas_usada: String,
    pub promedio_vasos_por_dia: f64,
    #[serde(default)]
    pub tendencia_consumo: Tendencia,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EstadisticasMaquina {
    pub maquina_id: i64,
    pub maquina_nombre: String,
    pub edificio: String,
    #[serde(default)]
    pub ubicacion: Option<String>,
    #[serde(rename = "totalVasos")]
    pub total_vasos: i64,
    #[serde(rename = "ultimoConteo", default)]
    pub ultimo_conteo: Option<String>,
    #[serde(rename = "promedioHora")]
    pub promedio_hora: f64,
}

/// One bar of a consumption chart; `fecha` doubles as the label for series
/// that are not keyed by date.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DatoGrafico {
    pub fecha: String,
    pub cantidad: i64,
    #[serde(default)]
    pub maquina_nombre: Option<String>,
    #[serde(default)]
    pub maquina_id: Option<i64>,
}

impl DatoGrafico {
    pub fn etiqueta(&self) -> &str {
        self.maquina_nombre.as_deref().unwrap_or(&self.fecha)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct DatosConsumo {
    pub consumo_por_dia: Vec<DatoGrafico>,
    pub consumo_por_maquina: Vec<DatoGrafico>,
    pub tendencia_semanal: Vec<DatoGrafico>,
    pub comparativa_mensual: Vec<DatoGrafico>,
}
