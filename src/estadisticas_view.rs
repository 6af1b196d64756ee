// src/estadisticas_view.rs - Read-only statistics and consumption charts
use chrono::{Duration, NaiveDate, Utc};
use std::sync::Arc;

use crate::api::VendingApi;
use crate::error::ApiResult;
use crate::models::*;

/// Default width of the per-machine date filter.
const DIAS_RANGO_DEFECTO: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangoFechas {
    pub desde: NaiveDate,
    pub hasta: NaiveDate,
}

impl RangoFechas {
    pub fn ultimos_dias(dias: i64, hasta: NaiveDate) -> Self {
        Self {
            desde: hasta - Duration::days(dias),
            hasta,
        }
    }

    fn por_defecto() -> Self {
        Self::ultimos_dias(DIAS_RANGO_DEFECTO, Utc::now().date_naive())
    }
}

/// Which of the four backend series is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VistaGrafico {
    Dia,
    Maquina,
    Tendencia,
    Comparativa,
}

impl VistaGrafico {
    pub fn titulo(&self) -> &'static str {
        match self {
            VistaGrafico::Dia => "Consumo por Día",
            VistaGrafico::Maquina => "Consumo por Máquina",
            VistaGrafico::Tendencia => "Tendencia Semanal",
            VistaGrafico::Comparativa => "Comparativa Mensual",
        }
    }

    pub fn nombre_archivo(&self) -> &'static str {
        match self {
            VistaGrafico::Dia => "consumo-por-dia.csv",
            VistaGrafico::Maquina => "consumo-por-maquina.csv",
            VistaGrafico::Tendencia => "tendencia-semanal.csv",
            VistaGrafico::Comparativa => "comparativa-mensual.csv",
        }
    }
}

// ==================== HELPERS DE SERIES ====================

pub fn maximo(datos: &[DatoGrafico]) -> Option<&DatoGrafico> {
    datos.iter().max_by_key(|d| d.cantidad)
}

pub fn minimo(datos: &[DatoGrafico]) -> Option<&DatoGrafico> {
    datos.iter().min_by_key(|d| d.cantidad)
}

pub fn promedio(datos: &[DatoGrafico]) -> f64 {
    if datos.is_empty() {
        return 0.0;
    }
    datos.iter().map(|d| d.cantidad).sum::<i64>() as f64 / datos.len() as f64
}

// ==================== VISTA ====================

/// State container for the statistics view. Everything shown here is computed
/// by the backend; the client only picks ranges and renders.
pub struct EstadisticasView {
    api: Arc<dyn VendingApi>,
    empresa: Empresa,
    pub rango: RangoFechas,
    generales: EstadisticasGenerales,
    por_maquina: Vec<EstadisticasMaquina>,
    consumo: DatosConsumo,
}

impl EstadisticasView {
    pub fn nuevo(api: Arc<dyn VendingApi>, empresa: Empresa) -> Self {
        Self {
            api,
            empresa,
            rango: RangoFechas::por_defecto(),
            generales: EstadisticasGenerales::default(),
            por_maquina: Vec::new(),
            consumo: DatosConsumo::default(),
        }
    }

    pub fn generales(&self) -> &EstadisticasGenerales {
        &self.generales
    }

    pub fn por_maquina(&self) -> &[EstadisticasMaquina] {
        &self.por_maquina
    }

    pub fn consumo(&self) -> &DatosConsumo {
        &self.consumo
    }

    pub fn serie(&self, vista: VistaGrafico) -> &[DatoGrafico] {
        match vista {
            VistaGrafico::Dia => &self.consumo.consumo_por_dia,
            VistaGrafico::Maquina => &self.consumo.consumo_por_maquina,
            VistaGrafico::Tendencia => &self.consumo.tendencia_semanal,
            VistaGrafico::Comparativa => &self.consumo.comparativa_mensual,
        }
    }

    pub async fn refrescar(&mut self) -> ApiResult<()> {
        self.generales = self.api.estadisticas_generales(self.empresa).await?;
        self.por_maquina = self
            .api
            .estadisticas_maquinas(self.empresa, self.rango.desde, self.rango.hasta)
            .await?;
        Ok(())
    }

    pub async fn refrescar_graficos(&mut self) -> ApiResult<()> {
        self.consumo = self
            .api
            .datos_consumo(self.empresa, self.rango.desde, self.rango.hasta)
            .await?;
        Ok(())
    }

    pub async fn aplicar_rango(&mut self, rango: RangoFechas) -> ApiResult<()> {
        self.rango = rango;
        self.refrescar().await?;
        self.refrescar_graficos().await
    }
}
