// src/articulos_view.rs - Stock ledger view
use std::sync::Arc;
use validator::Validate;

use crate::api::VendingApi;
use crate::error::{ApiError, ApiResult};
use crate::models::*;
use crate::validator::{FieldValidator, ValidationResult};

/// State container for the article list. Holds the last fetched snapshot and
/// re-fetches after every mutation so the backend stays the single source of
/// truth for `disponibles`.
pub struct ArticulosView {
    api: Arc<dyn VendingApi>,
    empresa: Empresa,
    articulos: Vec<Articulo>,
}

impl ArticulosView {
    pub fn nuevo(api: Arc<dyn VendingApi>, empresa: Empresa) -> Self {
        Self {
            api,
            empresa,
            articulos: Vec::new(),
        }
    }

    pub fn empresa(&self) -> Empresa {
        self.empresa
    }

    pub fn articulos(&self) -> &[Articulo] {
        &self.articulos
    }

    pub async fn cargar(&mut self) -> ApiResult<()> {
        self.refrescar().await
    }

    pub async fn refrescar(&mut self) -> ApiResult<()> {
        self.articulos = self.api.listar_articulos(self.empresa).await?;
        Ok(())
    }

    pub async fn cambiar_empresa(&mut self, empresa: Empresa) -> ApiResult<()> {
        self.empresa = empresa;
        self.refrescar().await
    }

    pub async fn crear(&mut self, data: NuevoArticulo) -> ApiResult<Articulo> {
        if data.validate().is_err() {
            return Err(ApiError::articulo_invalido());
        }

        let articulo = self.api.crear_articulo(&data).await?;
        log::info!("Artículo '{}' creado", articulo.nombre);
        self.refrescar().await?;
        Ok(articulo)
    }

    pub async fn actualizar(&mut self, id: i64, data: ActualizarArticulo) -> ApiResult<Articulo> {
        let mut resultado = ValidationResult::new();
        if let Err(e) = FieldValidator::not_empty(&data.nombre, "nombre") {
            resultado.add_error("nombre", e);
        }
        if let Err(e) = FieldValidator::range(data.cantidad, "cantidad", Some(1), None) {
            resultado.add_error("cantidad", e);
        }
        if let Err(e) =
            FieldValidator::range(data.utilizados, "utilizados", Some(0), Some(data.cantidad))
        {
            resultado.add_error("utilizados", e);
        }
        resultado.into_result()?;

        let articulo = self.api.actualizar_articulo(id, &data).await?;
        self.refrescar().await?;
        Ok(articulo)
    }

    pub async fn eliminar(&mut self, id: i64) -> ApiResult<()> {
        self.api.eliminar_articulo(id).await?;
        log::info!("Artículo {} eliminado", id);
        self.refrescar().await
    }

    /// Records consumption against an article. The requested quantity is
    /// checked against the last-known available stock before any request.
    pub async fn utilizar(&mut self, id: i64, cantidad: i64) -> ApiResult<Articulo> {
        let peticion = UtilizarArticulo { cantidad_utilizada: cantidad };
        peticion.validate()?;

        if let Some(articulo) = self.articulos.iter().find(|a| a.id == id) {
            if cantidad > articulo.disponibles_visibles() {
                return Err(ApiError::stock_insuficiente(&articulo.nombre));
            }
        }

        let articulo = self.api.utilizar_articulo(id, &peticion).await?;
        self.refrescar().await?;
        Ok(articulo)
    }
}
