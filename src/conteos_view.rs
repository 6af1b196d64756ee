// src/conteos_view.rs - Manual cup counter view
use std::sync::Arc;
use validator::Validate;

use crate::api::VendingApi;
use crate::error::{ApiError, ApiResult};
use crate::models::*;

/// How many recent counts the panel shows.
pub const LIMITE_ULTIMOS: u32 = 5;

pub type NotificadorConteo = Box<dyn Fn() + Send + Sync>;

/// State container for manual cup counts. Independent ledger: no stock
/// interaction, just a log per machine.
pub struct ConteosView {
    api: Arc<dyn VendingApi>,
    empresa: Empresa,
    maquinas: Vec<Maquina>,
    ultimos: Vec<Conteo>,
    on_conteo_realizado: Option<NotificadorConteo>,
}

impl ConteosView {
    pub fn nuevo(api: Arc<dyn VendingApi>, empresa: Empresa) -> Self {
        Self {
            api,
            empresa,
            maquinas: Vec::new(),
            ultimos: Vec::new(),
            on_conteo_realizado: None,
        }
    }

    /// Callback fired after any count mutation, so the statistics view can
    /// re-fetch its aggregates.
    pub fn al_realizar_conteo(&mut self, notificador: NotificadorConteo) {
        self.on_conteo_realizado = Some(notificador);
    }

    pub fn maquinas(&self) -> &[Maquina] {
        &self.maquinas
    }

    pub fn ultimos(&self) -> &[Conteo] {
        &self.ultimos
    }

    pub async fn cargar(&mut self) -> ApiResult<()> {
        self.maquinas = self.api.listar_maquinas(Some(self.empresa), None).await?;
        self.refrescar_ultimos().await
    }

    pub async fn refrescar_ultimos(&mut self) -> ApiResult<()> {
        self.ultimos = self
            .api
            .listar_ultimos_conteos(self.empresa, LIMITE_ULTIMOS)
            .await?;
        Ok(())
    }

    pub async fn cambiar_empresa(&mut self, empresa: Empresa) -> ApiResult<()> {
        self.empresa = empresa;
        self.cargar().await
    }

    pub async fn guardar(
        &mut self,
        maquina_id: Option<i64>,
        cantidad_vasos: i64,
        observaciones: &str,
    ) -> ApiResult<Conteo> {
        let maquina_id = maquina_id.ok_or_else(ApiError::maquina_sin_seleccionar)?;
        if cantidad_vasos <= 0 {
            return Err(ApiError::conteo_vacio());
        }

        let observaciones = match observaciones.trim() {
            "" => None,
            o => Some(o.to_string()),
        };
        let conteo = self
            .api
            .crear_conteo(&NuevoConteo {
                maquina_id,
                cantidad_vasos,
                observaciones,
                empresa: self.empresa,
            })
            .await?;
        log::info!("Conteo guardado: {} vasos", cantidad_vasos);

        self.refrescar_ultimos().await?;
        self.notificar();
        Ok(conteo)
    }

    pub async fn editar(&mut self, id: i64, data: ActualizarConteo) -> ApiResult<Conteo> {
        data.validate()?;

        let conteo = self.api.actualizar_conteo(id, &data).await?;
        self.refrescar_ultimos().await?;
        self.notificar();
        Ok(conteo)
    }

    pub async fn eliminar(&mut self, id: i64) -> ApiResult<()> {
        self.api.eliminar_conteo(id).await?;
        self.refrescar_ultimos().await?;
        self.notificar();
        Ok(())
    }

    fn notificar(&self) {
        if let Some(notificador) = &self.on_conteo_realizado {
            notificador();
        }
    }
}
