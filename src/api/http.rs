// src/api/http.rs
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::VendingApi;
use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::models::*;

/// HTTP implementation of [`VendingApi`] against the configured backend.
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ApiError::Config(format!("No se pudo crear el cliente HTTP: {}", e)))?;

        Ok(Self::with_client(&config.base_url, client))
    }

    /// Injection point for tests and callers that already own a client.
    pub fn with_client(base_url: &str, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Reads a JSON body, mapping non-success statuses to the message the
    /// backend put in the error body.
    async fn leer<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::from_response(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn leer_vacio(response: Response) -> ApiResult<()> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::from_response(status.as_u16(), &body));
        }

        Ok(())
    }
}

#[async_trait]
impl VendingApi for HttpApi {
    // ==================== ARTICULOS ====================

    async fn listar_articulos(&self, empresa: Empresa) -> ApiResult<Vec<Articulo>> {
        let response = self
            .client
            .get(self.url("/api/articulos"))
            .query(&[("empresa", empresa.to_string())])
            .send()
            .await?;
        Self::leer(response).await
    }

    async fn crear_articulo(&self, data: &NuevoArticulo) -> ApiResult<Articulo> {
        let response = self
            .client
            .post(self.url("/api/articulos"))
            .json(data)
            .send()
            .await?;
        Self::leer(response).await
    }

    async fn actualizar_articulo(&self, id: i64, data: &ActualizarArticulo) -> ApiResult<Articulo> {
        let response = self
            .client
            .put(self.url(&format!("/api/articulos/{}", id)))
            .json(data)
            .send()
            .await?;
        Self::leer(response).await
    }

    async fn eliminar_articulo(&self, id: i64) -> ApiResult<()> {
        let response = self
            .client
            .delete(self.url(&format!("/api/articulos/{}", id)))
            .send()
            .await?;
        Self::leer_vacio(response).await
    }

    async fn utilizar_articulo(&self, id: i64, data: &UtilizarArticulo) -> ApiResult<Articulo> {
        let response = self
            .client
            .post(self.url(&format!("/api/articulos/{}/utilizar", id)))
            .json(data)
            .send()
            .await?;
        Self::leer(response).await
    }

    // ==================== MAQUINAS ====================

    async fn listar_maquinas(
        &self,
        empresa: Option<Empresa>,
        edificio: Option<&str>,
    ) -> ApiResult<Vec<Maquina>> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(empresa) = empresa {
            params.push(("empresa", empresa.to_string()));
        }
        if let Some(edificio) = edificio {
            params.push(("edificio", edificio.to_string()));
        }

        let response = self
            .client
            .get(self.url("/api/maquinas"))
            .query(&params)
            .send()
            .await?;
        Self::leer(response).await
    }

    async fn listar_edificios(&self, empresa: Option<Empresa>) -> ApiResult<Vec<String>> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(empresa) = empresa {
            params.push(("empresa", empresa.to_string()));
        }

        let response = self
            .client
            .get(self.url("/api/maquinas/edificios"))
            .query(&params)
            .send()
            .await?;
        Self::leer(response).await
    }

    async fn crear_maquina(&self, data: &DatosMaquina) -> ApiResult<Maquina> {
        let response = self
            .client
            .post(self.url("/api/maquinas"))
            .json(data)
            .send()
            .await?;
        Self::leer(response).await
    }

    async fn actualizar_maquina(&self, id: i64, data: &DatosMaquina) -> ApiResult<Maquina> {
        let response = self
            .client
            .put(self.url(&format!("/api/maquinas/{}", id)))
            .json(data)
            .send()
            .await?;
        Self::leer(response).await
    }

    async fn eliminar_maquina(&self, id: i64) -> ApiResult<()> {
        let response = self
            .client
            .delete(self.url(&format!("/api/maquinas/{}", id)))
            .send()
            .await?;
        Self::leer_vacio(response).await
    }

    // ==================== CARGAS ====================

    async fn listar_cargas_agrupadas(
        &self,
        empresa: Empresa,
        filtros: &FiltrosCarga,
    ) -> ApiResult<Vec<CargaAgrupada>> {
        let mut params = vec![("empresa", empresa.to_string())];
        params.extend(filtros.query_params());

        let response = self
            .client
            .get(self.url("/api/cargas/agrupadas"))
            .query(&params)
            .send()
            .await?;
        Self::leer(response).await
    }

    async fn detalles_carga(
        &self,
        maquina_id: i64,
        fecha: NaiveDate,
        usuario: Option<&str>,
    ) -> ApiResult<Vec<DetalleCarga>> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(usuario) = usuario {
            params.push(("usuario", usuario.to_string()));
        }

        let response = self
            .client
            .get(self.url(&format!(
                "/api/cargas/detalles/{}/{}",
                maquina_id,
                fecha.format("%Y-%m-%d")
            )))
            .query(&params)
            .send()
            .await?;
        Self::leer(response).await
    }

    async fn crear_carga(&self, data: &NuevaCarga) -> ApiResult<Carga> {
        let response = self
            .client
            .post(self.url("/api/cargas"))
            .json(data)
            .send()
            .await?;
        Self::leer(response).await
    }

    async fn eliminar_carga(&self, id: i64) -> ApiResult<()> {
        let response = self
            .client
            .delete(self.url(&format!("/api/cargas/{}", id)))
            .send()
            .await?;
        Self::leer_vacio(response).await
    }

    // ==================== CONTEOS ====================

    async fn listar_ultimos_conteos(&self, empresa: Empresa, limit: u32) -> ApiResult<Vec<Conteo>> {
        let response = self
            .client
            .get(self.url("/api/conteos/ultimos"))
            .query(&[
                ("empresa", empresa.to_string()),
                ("limit", limit.to_string()),
            ])
            .send()
            .await?;
        Self::leer(response).await
    }

    async fn crear_conteo(&self, data: &NuevoConteo) -> ApiResult<Conteo> {
        let response = self
            .client
            .post(self.url("/api/conteos"))
            .json(data)
            .send()
            .await?;
        Self::leer(response).await
    }

    async fn actualizar_conteo(&self, id: i64, data: &ActualizarConteo) -> ApiResult<Conteo> {
        let response = self
            .client
            .put(self.url(&format!("/api/conteos/{}", id)))
            .json(data)
            .send()
            .await?;
        Self::leer(response).await
    }

    async fn eliminar_conteo(&self, id: i64) -> ApiResult<()> {
        let response = self
            .client
            .delete(self.url(&format!("/api/conteos/{}", id)))
            .send()
            .await?;
        Self::leer_vacio(response).await
    }

    // ==================== ESTADISTICAS ====================

    async fn estadisticas_generales(&self, empresa: Empresa) -> ApiResult<EstadisticasGenerales> {
        let response = self
            .client
            .get(self.url("/api/estadisticas/generales"))
            .query(&[("empresa", empresa.to_string())])
            .send()
            .await?;
        Self::leer(response).await
    }

    async fn estadisticas_maquinas(
        &self,
        empresa: Empresa,
        desde: NaiveDate,
        hasta: NaiveDate,
    ) -> ApiResult<Vec<EstadisticasMaquina>> {
        let response = self
            .client
            .get(self.url("/api/estadisticas/maquinas"))
            .query(&[
                ("empresa", empresa.to_string()),
                ("desde", desde.format("%Y-%m-%d").to_string()),
                ("hasta", hasta.format("%Y-%m-%d").to_string()),
            ])
            .send()
            .await?;
        Self::leer(response).await
    }

    async fn datos_consumo(
        &self,
        empresa: Empresa,
        desde: NaiveDate,
        hasta: NaiveDate,
    ) -> ApiResult<DatosConsumo> {
        let response = self
            .client
            .get(self.url("/api/estadisticas/graficos"))
            .query(&[
                ("empresa", empresa.to_string()),
                ("desde", desde.format("%Y-%m-%d").to_string()),
                ("hasta", hasta.format("%Y-%m-%d").to_string()),
            ])
            .send()
            .await?;
        Self::leer(response).await
    }
}
