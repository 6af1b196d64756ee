// src/api/mod.rs
//! Data-fetching boundary of the dashboard. Every view talks to the backend
//! exclusively through [`VendingApi`], so tests can swap in a fake backend.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::ApiResult;
use crate::models::{
    ActualizarArticulo, ActualizarConteo, Articulo, Carga, CargaAgrupada, Conteo, DatosConsumo,
    DatosMaquina, DetalleCarga, Empresa, EstadisticasGenerales, EstadisticasMaquina, FiltrosCarga,
    Maquina, NuevaCarga, NuevoArticulo, NuevoConteo, UtilizarArticulo,
};

pub mod http;
pub use http::HttpApi;

#[cfg(test)]
pub mod fake;

#[async_trait]
pub trait VendingApi: Send + Sync {
    // ==================== ARTICULOS ====================

    async fn listar_articulos(&self, empresa: Empresa) -> ApiResult<Vec<Articulo>>;
    async fn crear_articulo(&self, data: &NuevoArticulo) -> ApiResult<Articulo>;
    async fn actualizar_articulo(&self, id: i64, data: &ActualizarArticulo) -> ApiResult<Articulo>;
    async fn eliminar_articulo(&self, id: i64) -> ApiResult<()>;
    /// `POST /api/articulos/:id/utilizar`: decrements available stock.
    async fn utilizar_articulo(&self, id: i64, data: &UtilizarArticulo) -> ApiResult<Articulo>;

    // ==================== MAQUINAS ====================

    /// `empresa: None` means the all-units view.
    async fn listar_maquinas(
        &self,
        empresa: Option<Empresa>,
        edificio: Option<&str>,
    ) -> ApiResult<Vec<Maquina>>;
    async fn listar_edificios(&self, empresa: Option<Empresa>) -> ApiResult<Vec<String>>;
    async fn crear_maquina(&self, data: &DatosMaquina) -> ApiResult<Maquina>;
    async fn actualizar_maquina(&self, id: i64, data: &DatosMaquina) -> ApiResult<Maquina>;
    async fn eliminar_maquina(&self, id: i64) -> ApiResult<()>;

    // ==================== CARGAS ====================

    async fn listar_cargas_agrupadas(
        &self,
        empresa: Empresa,
        filtros: &FiltrosCarga,
    ) -> ApiResult<Vec<CargaAgrupada>>;
    /// Line items of one grouped load, keyed by (machine, date, operator).
    async fn detalles_carga(
        &self,
        maquina_id: i64,
        fecha: NaiveDate,
        usuario: Option<&str>,
    ) -> ApiResult<Vec<DetalleCarga>>;
    async fn crear_carga(&self, data: &NuevaCarga) -> ApiResult<Carga>;
    /// Deleting a load makes the backend restore the article's stock.
    async fn eliminar_carga(&self, id: i64) -> ApiResult<()>;

    // ==================== CONTEOS ====================

    async fn listar_ultimos_conteos(&self, empresa: Empresa, limit: u32) -> ApiResult<Vec<Conteo>>;
    async fn crear_conteo(&self, data: &NuevoConteo) -> ApiResult<Conteo>;
    async fn actualizar_conteo(&self, id: i64, data: &ActualizarConteo) -> ApiResult<Conteo>;
    async fn eliminar_conteo(&self, id: i64) -> ApiResult<()>;

    // ==================== ESTADISTICAS ====================

    async fn estadisticas_generales(&self, empresa: Empresa) -> ApiResult<EstadisticasGenerales>;
    async fn estadisticas_maquinas(
        &self,
        empresa: Empresa,
        desde: NaiveDate,
        hasta: NaiveDate,
    ) -> ApiResult<Vec<EstadisticasMaquina>>;
    async fn datos_consumo(
        &self,
        empresa: Empresa,
        desde: NaiveDate,
        hasta: NaiveDate,
    ) -> ApiResult<DatosConsumo>;
}
