// src/api/fake.rs
//! In-memory backend for view tests. Mimics the two behaviors the real
//! backend owns that the views depend on: creating a load decrements the
//! article's available stock, deleting a load restores it. Every call is
//! appended to a log so tests can assert the mutate-then-refetch sequence.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::sync::Mutex;

use super::VendingApi;
use crate::error::{ApiError, ApiResult};
use crate::models::*;

const FECHA_FAKE: &str = "2025-05-01";

#[derive(Default)]
struct EstadoFake {
    articulos: Vec<Articulo>,
    maquinas: Vec<Maquina>,
    cargas: Vec<Carga>,
    conteos: Vec<Conteo>,
    siguiente_id: i64,
    /// Article ids whose load creation should fail with a server error.
    fallos_carga: HashSet<i64>,
}

pub struct FakeApi {
    estado: Mutex<EstadoFake>,
    llamadas: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            estado: Mutex::new(EstadoFake {
                siguiente_id: 100,
                ..Default::default()
            }),
            llamadas: Mutex::new(Vec::new()),
        }
    }

    pub fn agregar_articulo(&self, id: i64, nombre: &str, cantidad: i64, utilizados: i64) {
        let mut estado = self.estado.lock().unwrap();
        estado.articulos.push(Articulo {
            id,
            nombre: nombre.to_string(),
            cantidad,
            utilizados,
            disponibles: cantidad - utilizados,
            simbolo: None,
            empresa: Some(Empresa::Telecom),
            created_at: None,
            updated_at: None,
        });
    }

    pub fn agregar_maquina(&self, id: i64, nombre: &str, edificio: &str) {
        let mut estado = self.estado.lock().unwrap();
        estado.maquinas.push(Maquina {
            id,
            nombre: nombre.to_string(),
            edificio: edificio.to_string(),
            ubicacion: None,
            empresa: Empresa::Telecom,
            estado: "activa".to_string(),
            created_at: None,
            updated_at: None,
        });
    }

    /// Makes `crear_carga` fail for the given article, simulating a partial
    /// fan-out failure.
    pub fn fallar_carga_de(&self, articulo_id: i64) {
        self.estado.lock().unwrap().fallos_carga.insert(articulo_id);
    }

    pub fn articulo(&self, id: i64) -> Option<Articulo> {
        self.estado
            .lock()
            .unwrap()
            .articulos
            .iter()
            .find(|a| a.id == id)
            .cloned()
    }

    pub fn llamadas(&self) -> Vec<String> {
        self.llamadas.lock().unwrap().clone()
    }

    pub fn limpiar_llamadas(&self) {
        self.llamadas.lock().unwrap().clear();
    }

    fn registrar(&self, llamada: impl Into<String>) {
        self.llamadas.lock().unwrap().push(llamada.into());
    }

    fn fecha_fake() -> NaiveDate {
        FECHA_FAKE.parse().unwrap()
    }
}

#[async_trait]
impl VendingApi for FakeApi {
    // ==================== ARTICULOS ====================

    async fn listar_articulos(&self, empresa: Empresa) -> ApiResult<Vec<Articulo>> {
        self.registrar("GET articulos");
        let estado = self.estado.lock().unwrap();
        Ok(estado
            .articulos
            .iter()
            .filter(|a| a.empresa.map(|e| e == empresa).unwrap_or(true))
            .cloned()
            .collect())
    }

    async fn crear_articulo(&self, data: &NuevoArticulo) -> ApiResult<Articulo> {
        self.registrar("POST articulos");
        let mut estado = self.estado.lock().unwrap();
        estado.siguiente_id += 1;
        let articulo = Articulo {
            id: estado.siguiente_id,
            nombre: data.nombre.clone(),
            cantidad: data.cantidad,
            utilizados: 0,
            disponibles: data.cantidad,
            simbolo: data.simbolo.clone(),
            empresa: Some(data.empresa),
            created_at: None,
            updated_at: None,
        };
        estado.articulos.push(articulo.clone());
        Ok(articulo)
    }

    async fn actualizar_articulo(&self, id: i64, data: &ActualizarArticulo) -> ApiResult<Articulo> {
        self.registrar(format!("PUT articulos/{}", id));
        let mut estado = self.estado.lock().unwrap();
        let articulo = estado
            .articulos
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(ApiError::Api { status: 404, message: "Artículo no encontrado".to_string() })?;
        articulo.nombre = data.nombre.clone();
        articulo.cantidad = data.cantidad;
        articulo.utilizados = data.utilizados;
        articulo.disponibles = data.cantidad - data.utilizados;
        articulo.simbolo = data.simbolo.clone();
        articulo.empresa = Some(data.empresa);
        Ok(articulo.clone())
    }

    async fn eliminar_articulo(&self, id: i64) -> ApiResult<()> {
        self.registrar(format!("DELETE articulos/{}", id));
        let mut estado = self.estado.lock().unwrap();
        let antes = estado.articulos.len();
        estado.articulos.retain(|a| a.id != id);
        if estado.articulos.len() == antes {
            return Err(ApiError::Api { status: 404, message: "Artículo no encontrado".to_string() });
        }
        Ok(())
    }

    async fn utilizar_articulo(&self, id: i64, data: &UtilizarArticulo) -> ApiResult<Articulo> {
        self.registrar(format!("POST articulos/{}/utilizar", id));
        let mut estado = self.estado.lock().unwrap();
        let articulo = estado
            .articulos
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(ApiError::Api { status: 404, message: "Artículo no encontrado".to_string() })?;
        if data.cantidad_utilizada > articulo.disponibles {
            return Err(ApiError::Api { status: 400, message: "Stock insuficiente".to_string() });
        }
        articulo.utilizados += data.cantidad_utilizada;
        articulo.disponibles -= data.cantidad_utilizada;
        Ok(articulo.clone())
    }

    // ==================== MAQUINAS ====================

    async fn listar_maquinas(
        &self,
        empresa: Option<Empresa>,
        edificio: Option<&str>,
    ) -> ApiResult<Vec<Maquina>> {
        self.registrar("GET maquinas");
        let estado = self.estado.lock().unwrap();
        Ok(estado
            .maquinas
            .iter()
            .filter(|m| empresa.map(|e| m.empresa == e).unwrap_or(true))
            .filter(|m| edificio.map(|e| m.edificio == e).unwrap_or(true))
            .cloned()
            .collect())
    }

    async fn listar_edificios(&self, _empresa: Option<Empresa>) -> ApiResult<Vec<String>> {
        self.registrar("GET maquinas/edificios");
        let estado = self.estado.lock().unwrap();
        let mut edificios: Vec<String> =
            estado.maquinas.iter().map(|m| m.edificio.clone()).collect();
        edificios.sort();
        edificios.dedup();
        Ok(edificios)
    }

    async fn crear_maquina(&self, data: &DatosMaquina) -> ApiResult<Maquina> {
        self.registrar("POST maquinas");
        let mut estado = self.estado.lock().unwrap();
        estado.siguiente_id += 1;
        let maquina = Maquina {
            id: estado.siguiente_id,
            nombre: data.nombre.clone(),
            edificio: data.edificio.clone(),
            ubicacion: data.ubicacion.clone(),
            empresa: data.empresa,
            estado: "activa".to_string(),
            created_at: None,
            updated_at: None,
        };
        estado.maquinas.push(maquina.clone());
        Ok(maquina)
    }

    async fn actualizar_maquina(&self, id: i64, data: &DatosMaquina) -> ApiResult<Maquina> {
        self.registrar(format!("PUT maquinas/{}", id));
        let mut estado = self.estado.lock().unwrap();
        let maquina = estado
            .maquinas
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(ApiError::Api { status: 404, message: "Máquina no encontrada".to_string() })?;
        maquina.nombre = data.nombre.clone();
        maquina.edificio = data.edificio.clone();
        maquina.ubicacion = data.ubicacion.clone();
        maquina.empresa = data.empresa;
        Ok(maquina.clone())
    }

    async fn eliminar_maquina(&self, id: i64) -> ApiResult<()> {
        self.registrar(format!("DELETE maquinas/{}", id));
        let mut estado = self.estado.lock().unwrap();
        estado.maquinas.retain(|m| m.id != id);
        Ok(())
    }

    // ==================== CARGAS ====================

    async fn listar_cargas_agrupadas(
        &self,
        _empresa: Empresa,
        filtros: &FiltrosCarga,
    ) -> ApiResult<Vec<CargaAgrupada>> {
        self.registrar("GET cargas/agrupadas");
        let estado = self.estado.lock().unwrap();

        let mut grupos: Vec<CargaAgrupada> = Vec::new();
        for carga in &estado.cargas {
            if let Some(id) = filtros.maquina_id {
                if carga.maquina_id != id {
                    continue;
                }
            }
            if let Some(id) = filtros.articulo_id {
                if carga.articulo_id != id {
                    continue;
                }
            }

            match grupos
                .iter_mut()
                .find(|g| g.maquina_id == carga.maquina_id && g.usuario == carga.usuario)
            {
                Some(grupo) => {
                    grupo.total_productos += 1;
                    grupo.total_cantidad += carga.cantidad_cargada;
                }
                None => {
                    let maquina_nombre = estado
                        .maquinas
                        .iter()
                        .find(|m| m.id == carga.maquina_id)
                        .map(|m| m.nombre.clone())
                        .unwrap_or_else(|| format!("Máquina {}", carga.maquina_id));
                    grupos.push(CargaAgrupada {
                        id: carga.id,
                        maquina_id: carga.maquina_id,
                        usuario: carga.usuario.clone(),
                        observaciones: carga.observaciones.clone(),
                        fecha: Self::fecha_fake(),
                        fecha_carga: carga.fecha_carga.clone(),
                        maquina_nombre,
                        edificio: "Edificio Central".to_string(),
                        ubicacion: None,
                        empresa: Empresa::Telecom,
                        total_productos: 1,
                        total_cantidad: carga.cantidad_cargada,
                        productos_detalle: String::new(),
                    });
                }
            }
        }

        Ok(grupos)
    }

    async fn detalles_carga(
        &self,
        maquina_id: i64,
        _fecha: NaiveDate,
        usuario: Option<&str>,
    ) -> ApiResult<Vec<DetalleCarga>> {
        self.registrar(format!("GET cargas/detalles/{}", maquina_id));
        let estado = self.estado.lock().unwrap();
        Ok(estado
            .cargas
            .iter()
            .filter(|c| c.maquina_id == maquina_id)
            .filter(|c| usuario.map(|u| c.usuario.as_deref() == Some(u)).unwrap_or(true))
            .map(|c| DetalleCarga {
                id: c.id,
                articulo_id: c.articulo_id,
                cantidad_cargada: c.cantidad_cargada,
                fecha_carga: c.fecha_carga.clone(),
                articulo_nombre: estado
                    .articulos
                    .iter()
                    .find(|a| a.id == c.articulo_id)
                    .map(|a| a.nombre.clone())
                    .unwrap_or_default(),
                articulo_simbolo: None,
            })
            .collect())
    }

    async fn crear_carga(&self, data: &NuevaCarga) -> ApiResult<Carga> {
        self.registrar(format!("POST cargas articulo={}", data.articulo_id));
        let mut estado = self.estado.lock().unwrap();

        if estado.fallos_carga.contains(&data.articulo_id) {
            return Err(ApiError::Api { status: 500, message: "Error interno".to_string() });
        }

        let articulo = estado
            .articulos
            .iter_mut()
            .find(|a| a.id == data.articulo_id)
            .ok_or(ApiError::Api { status: 404, message: "Artículo no encontrado".to_string() })?;
        if data.cantidad_cargada > articulo.disponibles {
            return Err(ApiError::Api { status: 400, message: "Stock insuficiente".to_string() });
        }
        articulo.utilizados += data.cantidad_cargada;
        articulo.disponibles -= data.cantidad_cargada;

        estado.siguiente_id += 1;
        let carga = Carga {
            id: estado.siguiente_id,
            maquina_id: data.maquina_id,
            articulo_id: data.articulo_id,
            cantidad_cargada: data.cantidad_cargada,
            fecha_carga: format!("{}T10:00:00Z", FECHA_FAKE),
            usuario: data.usuario.clone(),
            observaciones: data.observaciones.clone(),
            maquina_nombre: None,
            edificio: None,
            ubicacion: None,
            empresa: None,
            articulo_nombre: None,
            articulo_simbolo: None,
        };
        estado.cargas.push(carga.clone());
        Ok(carga)
    }

    async fn eliminar_carga(&self, id: i64) -> ApiResult<()> {
        self.registrar(format!("DELETE cargas/{}", id));
        let mut estado = self.estado.lock().unwrap();
        let posicion = estado
            .cargas
            .iter()
            .position(|c| c.id == id)
            .ok_or(ApiError::Api { status: 404, message: "Carga no encontrada".to_string() })?;
        let carga = estado.cargas.remove(posicion);

        // Reversal contract: stock goes back to its pre-load value.
        if let Some(articulo) = estado.articulos.iter_mut().find(|a| a.id == carga.articulo_id) {
            articulo.utilizados -= carga.cantidad_cargada;
            articulo.disponibles += carga.cantidad_cargada;
        }
        Ok(())
    }

    // ==================== CONTEOS ====================

    async fn listar_ultimos_conteos(&self, _empresa: Empresa, limit: u32) -> ApiResult<Vec<Conteo>> {
        self.registrar("GET conteos/ultimos");
        let estado = self.estado.lock().unwrap();
        Ok(estado
            .conteos
            .iter()
            .rev()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn crear_conteo(&self, data: &NuevoConteo) -> ApiResult<Conteo> {
        self.registrar("POST conteos");
        let mut estado = self.estado.lock().unwrap();
        estado.siguiente_id += 1;
        let conteo = Conteo {
            id: estado.siguiente_id,
            maquina_id: data.maquina_id,
            cantidad_vasos: data.cantidad_vasos,
            observaciones: data.observaciones.clone(),
            fecha: format!("{}T10:00:00Z", FECHA_FAKE).parse().unwrap(),
            maquina_nombre: None,
            edificio: None,
            empresa: Some(data.empresa),
        };
        estado.conteos.push(conteo.clone());
        Ok(conteo)
    }

    async fn actualizar_conteo(&self, id: i64, data: &ActualizarConteo) -> ApiResult<Conteo> {
        self.registrar(format!("PUT conteos/{}", id));
        let mut estado = self.estado.lock().unwrap();
        let conteo = estado
            .conteos
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(ApiError::Api { status: 404, message: "Conteo no encontrado".to_string() })?;
        conteo.cantidad_vasos = data.cantidad_vasos;
        conteo.observaciones = data.observaciones.clone();
        Ok(conteo.clone())
    }

    async fn eliminar_conteo(&self, id: i64) -> ApiResult<()> {
        self.registrar(format!("DELETE conteos/{}", id));
        let mut estado = self.estado.lock().unwrap();
        estado.conteos.retain(|c| c.id != id);
        Ok(())
    }

    // ==================== ESTADISTICAS ====================

    async fn estadisticas_generales(&self, _empresa: Empresa) -> ApiResult<EstadisticasGenerales> {
        self.registrar("GET estadisticas/generales");
        let estado = self.estado.lock().unwrap();
        let total: i64 = estado.conteos.iter().map(|c| c.cantidad_vasos).sum();
        Ok(EstadisticasGenerales {
            total_vasos_hoy: total,
            total_vasos_semana: total,
            total_vasos_mes: total,
            ..Default::default()
        })
    }

    async fn estadisticas_maquinas(
        &self,
        _empresa: Empresa,
        _desde: NaiveDate,
        _hasta: NaiveDate,
    ) -> ApiResult<Vec<EstadisticasMaquina>> {
        self.registrar("GET estadisticas/maquinas");
        Ok(Vec::new())
    }

    async fn datos_consumo(
        &self,
        _empresa: Empresa,
        _desde: NaiveDate,
        _hasta: NaiveDate,
    ) -> ApiResult<DatosConsumo> {
        self.registrar("GET estadisticas/graficos");
        Ok(DatosConsumo::default())
    }
}
