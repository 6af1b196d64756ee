// src/cargas_view.rs - Load workflow: multi-product draft, validation, fan-out
use futures::future;
use std::sync::Arc;

use crate::api::VendingApi;
use crate::error::{ApiError, ApiResult};
use crate::models::*;

// ==================== FORMULARIO ====================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineaCarga {
    pub articulo_id: Option<i64>,
    pub cantidad_cargada: i64,
}

impl LineaCarga {
    /// A line takes part in the submission once it names an article and a
    /// positive quantity; anything else is an untouched draft row.
    pub fn es_valida(&self) -> bool {
        self.articulo_id.is_some() && self.cantidad_cargada > 0
    }
}

/// Editable draft of one load operation. Always holds at least one line;
/// discarded on successful submit or explicit cancel.
#[derive(Debug, Clone)]
pub struct FormularioCarga {
    pub maquina_id: Option<i64>,
    pub usuario: String,
    pub observaciones: String,
    productos: Vec<LineaCarga>,
}

impl Default for FormularioCarga {
    fn default() -> Self {
        Self::nuevo()
    }
}

impl FormularioCarga {
    pub fn nuevo() -> Self {
        Self {
            maquina_id: None,
            usuario: String::new(),
            observaciones: String::new(),
            productos: vec![LineaCarga::default()],
        }
    }

    pub fn productos(&self) -> &[LineaCarga] {
        &self.productos
    }

    pub fn agregar_producto(&mut self) {
        self.productos.push(LineaCarga::default());
    }

    /// Removes a line. The sequence never becomes empty: removing the last
    /// remaining line is a no-op.
    pub fn quitar_producto(&mut self, indice: usize) {
        if self.productos.len() > 1 && indice < self.productos.len() {
            self.productos.remove(indice);
        }
    }

    pub fn establecer_articulo(&mut self, indice: usize, articulo_id: Option<i64>) {
        if let Some(linea) = self.productos.get_mut(indice) {
            linea.articulo_id = articulo_id;
        }
    }

    pub fn establecer_cantidad(&mut self, indice: usize, cantidad: i64) {
        if let Some(linea) = self.productos.get_mut(indice) {
            linea.cantidad_cargada = cantidad;
        }
    }

    pub fn lineas_validas(&self) -> Vec<&LineaCarga> {
        self.productos.iter().filter(|l| l.es_valida()).collect()
    }

    pub fn reiniciar(&mut self) {
        *self = Self::nuevo();
    }
}

// ==================== RESULTADO DEL LOTE ====================

/// Per-item outcome of the concurrent fan-out. The backend offers no
/// transaction across the line items of one operation, so a partial failure
/// leaves the successful ones in place; nothing here rolls them back.
#[derive(Debug)]
pub struct ResultadoLote {
    pub resultados: Vec<(NuevaCarga, ApiResult<Carga>)>,
}

impl ResultadoLote {
    pub fn exito_total(&self) -> bool {
        self.resultados.iter().all(|(_, r)| r.is_ok())
    }

    pub fn exitosas(&self) -> usize {
        self.resultados.iter().filter(|(_, r)| r.is_ok()).count()
    }

    pub fn fallidas(&self) -> usize {
        self.resultados.len() - self.exitosas()
    }

    /// The generic user-facing message for a partial failure.
    pub fn error_usuario(&self) -> Option<ApiError> {
        if self.exito_total() {
            None
        } else {
            Some(ApiError::cargas_parciales())
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResumenCargas {
    pub total_cargas: usize,
    pub total_articulos: i64,
}

// ==================== VISTA ====================

pub type NotificadorStock = Box<dyn Fn() + Send + Sync>;

/// State container for the load workflow view. Owns its own snapshots of
/// loads, machines and articles; consistency with the backend is kept by
/// re-fetching after every mutation, never by local merging.
pub struct CargasView {
    api: Arc<dyn VendingApi>,
    empresa: Empresa,
    pub filtros: FiltrosCarga,
    pub formulario: FormularioCarga,
    cargas: Vec<CargaAgrupada>,
    maquinas: Vec<Maquina>,
    articulos: Vec<Articulo>,
    on_stock_actualizado: Option<NotificadorStock>,
}

impl CargasView {
    pub fn nuevo(api: Arc<dyn VendingApi>, empresa: Empresa) -> Self {
        Self {
            api,
            empresa,
            filtros: FiltrosCarga::default(),
            formulario: FormularioCarga::nuevo(),
            cargas: Vec::new(),
            maquinas: Vec::new(),
            articulos: Vec::new(),
            on_stock_actualizado: None,
        }
    }

    /// Registers the sibling-stock callback invoked after any mutation that
    /// changes article stock, so the stock ledger can re-fetch itself.
    pub fn al_actualizar_stock(&mut self, notificador: NotificadorStock) {
        self.on_stock_actualizado = Some(notificador);
    }

    pub fn empresa(&self) -> Empresa {
        self.empresa
    }

    pub fn cargas(&self) -> &[CargaAgrupada] {
        &self.cargas
    }

    pub fn maquinas(&self) -> &[Maquina] {
        &self.maquinas
    }

    pub fn articulos(&self) -> &[Articulo] {
        &self.articulos
    }

    pub fn resumen(&self) -> ResumenCargas {
        ResumenCargas {
            total_cargas: self.cargas.len(),
            total_articulos: self.cargas.iter().map(|c| c.total_cantidad).sum(),
        }
    }

    // ==================== FETCH ====================

    /// Initial load: grouped loads plus the machine and article caches the
    /// form and the validation need.
    pub async fn cargar(&mut self) -> ApiResult<()> {
        self.refrescar_cargas().await?;
        self.maquinas = self.api.listar_maquinas(Some(self.empresa), None).await?;
        self.refrescar_articulos().await?;
        Ok(())
    }

    pub async fn refrescar_cargas(&mut self) -> ApiResult<()> {
        self.cargas = self
            .api
            .listar_cargas_agrupadas(self.empresa, &self.filtros)
            .await?;
        Ok(())
    }

    pub async fn refrescar_articulos(&mut self) -> ApiResult<()> {
        self.articulos = self.api.listar_articulos(self.empresa).await?;
        Ok(())
    }

    pub async fn cambiar_empresa(&mut self, empresa: Empresa) -> ApiResult<()> {
        self.empresa = empresa;
        self.cargar().await
    }

    /// Filtering is always a fresh fetch for this view.
    pub async fn aplicar_filtros(&mut self, filtros: FiltrosCarga) -> ApiResult<()> {
        self.filtros = filtros;
        self.refrescar_cargas().await
    }

    pub async fn limpiar_filtros(&mut self) -> ApiResult<()> {
        self.filtros.limpiar();
        self.refrescar_cargas().await
    }

    // ==================== REGISTRO ====================

    /// Local precondition check. On any violation the whole operation is
    /// aborted before a single request goes out.
    fn validar_formulario(&self) -> ApiResult<Vec<NuevaCarga>> {
        let lineas = self.formulario.lineas_validas();
        let maquina_id = match self.formulario.maquina_id {
            Some(id) if !lineas.is_empty() => id,
            _ => return Err(ApiError::seleccion_incompleta()),
        };

        let usuario = match self.formulario.usuario.trim() {
            "" => None,
            u => Some(u.to_string()),
        };
        let observaciones = match self.formulario.observaciones.trim() {
            "" => None,
            o => Some(o.to_string()),
        };

        let mut peticiones = Vec::with_capacity(lineas.len());
        for linea in lineas {
            let articulo_id = linea.articulo_id.unwrap_or_default();
            let articulo = self.articulos.iter().find(|a| a.id == articulo_id);
            match articulo {
                None => return Err(ApiError::stock_insuficiente("el artículo seleccionado")),
                Some(a) if a.disponibles_visibles() < linea.cantidad_cargada => {
                    return Err(ApiError::stock_insuficiente(&a.nombre));
                }
                Some(_) => {}
            }

            peticiones.push(NuevaCarga {
                maquina_id,
                articulo_id,
                cantidad_cargada: linea.cantidad_cargada,
                usuario: usuario.clone(),
                observaciones: observaciones.clone(),
            });
        }

        Ok(peticiones)
    }

    /// Submits the draft: one creation request per valid line, issued
    /// concurrently and awaited until every one settles. On full success the
    /// draft resets, both lists re-fetch and the sibling stock view is
    /// notified; on partial failure the draft stays put and the per-item
    /// outcomes are returned for inspection.
    pub async fn registrar(&mut self) -> ApiResult<ResultadoLote> {
        let peticiones = self.validar_formulario()?;

        log::info!(
            "Registrando {} carga(s) en la máquina {}",
            peticiones.len(),
            peticiones[0].maquina_id
        );

        let resultados = future::join_all(peticiones.iter().map(|p| self.api.crear_carga(p))).await;
        let lote = ResultadoLote {
            resultados: peticiones.into_iter().zip(resultados).collect(),
        };

        if lote.exito_total() {
            self.formulario.reiniciar();
            self.refrescar_cargas().await?;
            self.refrescar_articulos().await?;
            self.notificar_stock();
        } else {
            // Successful siblings stay registered; the next refetch will
            // surface whatever state the backend ended up with.
            log::error!(
                "Fallaron {} de {} cargas del lote",
                lote.fallidas(),
                lote.resultados.len()
            );
        }

        Ok(lote)
    }

    // ==================== ELIMINAR / DETALLES ====================

    /// Reverses a recorded load. The backend restores the article's stock;
    /// both local lists re-fetch to pick that up.
    pub async fn eliminar(&mut self, id: i64) -> ApiResult<()> {
        self.api.eliminar_carga(id).await?;
        log::info!("Carga {} eliminada, stock revertido", id);

        self.refrescar_cargas().await?;
        self.refrescar_articulos().await?;
        self.notificar_stock();
        Ok(())
    }

    pub async fn ver_detalles(&self, carga: &CargaAgrupada) -> ApiResult<Vec<DetalleCarga>> {
        self.api
            .detalles_carga(carga.maquina_id, carga.fecha, carga.usuario.as_deref())
            .await
    }

    fn notificar_stock(&self) {
        if let Some(notificador) = &self.on_stock_actualizado {
            notificador();
        }
    }
}
