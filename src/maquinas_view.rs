// src/maquinas_view.rs - Machine registry view
use std::sync::Arc;
use validator::Validate;

use crate::api::VendingApi;
use crate::error::ApiResult;
use crate::models::*;
use crate::validator::{FieldValidator, ValidationResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResumenMaquinas {
    pub telecom: usize,
    pub pago_online: usize,
}

/// State container for the machine registry. Unlike the load list, the text
/// search narrows the cached snapshot client-side; only the business-unit and
/// building scopes re-fetch.
pub struct MaquinasView {
    api: Arc<dyn VendingApi>,
    /// `None` is the all-units view.
    empresa: Option<Empresa>,
    maquinas: Vec<Maquina>,
    edificios: Vec<String>,
    pub busqueda: String,
    edificio_seleccionado: Option<String>,
}

impl MaquinasView {
    pub fn nuevo(api: Arc<dyn VendingApi>, empresa: Option<Empresa>) -> Self {
        Self {
            api,
            empresa,
            maquinas: Vec::new(),
            edificios: Vec::new(),
            busqueda: String::new(),
            edificio_seleccionado: None,
        }
    }

    pub fn empresa(&self) -> Option<Empresa> {
        self.empresa
    }

    pub fn maquinas(&self) -> &[Maquina] {
        &self.maquinas
    }

    pub fn edificios(&self) -> &[String] {
        &self.edificios
    }

    pub fn edificio_seleccionado(&self) -> Option<&str> {
        self.edificio_seleccionado.as_deref()
    }

    /// The cached list narrowed by the free-text search. No fetch involved.
    pub fn filtradas(&self) -> Vec<&Maquina> {
        if self.busqueda.trim().is_empty() {
            return self.maquinas.iter().collect();
        }
        self.maquinas
            .iter()
            .filter(|m| m.coincide_busqueda(self.busqueda.trim()))
            .collect()
    }

    pub fn resumen(&self) -> ResumenMaquinas {
        ResumenMaquinas {
            telecom: self
                .maquinas
                .iter()
                .filter(|m| m.empresa == Empresa::Telecom)
                .count(),
            pago_online: self
                .maquinas
                .iter()
                .filter(|m| m.empresa == Empresa::PagoOnline)
                .count(),
        }
    }

    // ==================== FETCH ====================

    pub async fn cargar(&mut self) -> ApiResult<()> {
        self.refrescar_maquinas().await?;
        self.refrescar_edificios().await
    }

    async fn refrescar_maquinas(&mut self) -> ApiResult<()> {
        self.maquinas = self
            .api
            .listar_maquinas(self.empresa, self.edificio_seleccionado.as_deref())
            .await?;
        Ok(())
    }

    async fn refrescar_edificios(&mut self) -> ApiResult<()> {
        self.edificios = self.api.listar_edificios(self.empresa).await?;
        Ok(())
    }

    pub async fn cambiar_empresa(&mut self, empresa: Option<Empresa>) -> ApiResult<()> {
        self.empresa = empresa;
        self.cargar().await
    }

    /// Building scope is a server-side filter, so changing it re-fetches.
    pub async fn seleccionar_edificio(&mut self, edificio: Option<String>) -> ApiResult<()> {
        self.edificio_seleccionado = edificio;
        self.refrescar_maquinas().await
    }

    // ==================== MUTACIONES ====================

    /// Creates when `id` is `None`, updates otherwise; the form submits the
    /// same body for both.
    pub async fn guardar(&mut self, id: Option<i64>, data: DatosMaquina) -> ApiResult<Maquina> {
        data.validate()?;
        let mut resultado = ValidationResult::new();
        if let Err(e) = FieldValidator::not_empty(&data.nombre, "nombre") {
            resultado.add_error("nombre", e);
        }
        if let Err(e) = FieldValidator::not_empty(&data.edificio, "edificio") {
            resultado.add_error("edificio", e);
        }
        resultado.into_result()?;

        let maquina = match id {
            Some(id) => self.api.actualizar_maquina(id, &data).await?,
            None => self.api.crear_maquina(&data).await?,
        };
        log::info!("Máquina '{}' guardada", maquina.nombre);

        self.cargar().await?;
        Ok(maquina)
    }

    pub async fn eliminar(&mut self, id: i64) -> ApiResult<()> {
        self.api.eliminar_maquina(id).await?;
        log::info!("Máquina {} eliminada", id);
        self.cargar().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeApi;

    async fn vista() -> (Arc<FakeApi>, MaquinasView) {
        let fake = Arc::new(FakeApi::new());
        fake.agregar_maquina(1, "Expendedora Hall", "Edificio Central");
        fake.agregar_maquina(2, "Expendedora Cafetería", "Edificio Norte");

        let mut view = MaquinasView::nuevo(fake.clone(), Some(Empresa::Telecom));
        view.cargar().await.unwrap();
        fake.limpiar_llamadas();
        (fake, view)
    }

    #[tokio::test]
    async fn test_busqueda_filtra_sin_red() {
        let (fake, mut view) = vista().await;

        view.busqueda = "cafetería".to_string();
        let filtradas = view.filtradas();
        assert_eq!(filtradas.len(), 1);
        assert_eq!(filtradas[0].nombre, "Expendedora Cafetería");
        assert!(fake.llamadas().is_empty(), "la búsqueda no emite peticiones");

        view.busqueda.clear();
        assert_eq!(view.filtradas().len(), 2);
    }

    #[tokio::test]
    async fn test_seleccionar_edificio_refetch() {
        let (fake, mut view) = vista().await;

        view.seleccionar_edificio(Some("Edificio Norte".to_string()))
            .await
            .unwrap();
        assert_eq!(view.edificio_seleccionado(), Some("Edificio Norte"));
        assert_eq!(view.maquinas().len(), 1);
        assert_eq!(fake.llamadas(), vec!["GET maquinas"]);
    }

    #[tokio::test]
    async fn test_cambiar_empresa_a_todas() {
        let (fake, mut view) = vista().await;
        assert_eq!(view.empresa(), Some(Empresa::Telecom));

        view.cambiar_empresa(None).await.unwrap();
        assert_eq!(view.empresa(), None);
        assert_eq!(view.maquinas().len(), 2);
        assert_eq!(fake.llamadas(), vec!["GET maquinas", "GET maquinas/edificios"]);
    }

    #[tokio::test]
    async fn test_guardar_invalido_sin_red() {
        let (fake, mut view) = vista().await;

        let err = view
            .guardar(
                None,
                DatosMaquina {
                    nombre: String::new(),
                    edificio: "Central".to_string(),
                    ubicacion: None,
                    empresa: Empresa::Telecom,
                },
            )
            .await
            .unwrap_err();
        assert!(err.to_string().contains("nombre"));
        assert!(fake.llamadas().is_empty());
    }

    #[tokio::test]
    async fn test_crear_y_editar_refrescan() {
        let (fake, mut view) = vista().await;

        let creada = view
            .guardar(
                None,
                DatosMaquina {
                    nombre: "Expendedora Pasillo".to_string(),
                    edificio: "Edificio Sur".to_string(),
                    ubicacion: Some("Planta baja".to_string()),
                    empresa: Empresa::Telecom,
                },
            )
            .await
            .unwrap();
        assert_eq!(view.maquinas().len(), 3);
        assert!(view.edificios().contains(&"Edificio Sur".to_string()));

        view.guardar(
            Some(creada.id),
            DatosMaquina {
                nombre: "Expendedora Pasillo B".to_string(),
                edificio: "Edificio Sur".to_string(),
                ubicacion: None,
                empresa: Empresa::Telecom,
            },
        )
        .await
        .unwrap();
        assert!(view.maquinas().iter().any(|m| m.nombre == "Expendedora Pasillo B"));

        let llamadas = fake.llamadas();
        assert_eq!(llamadas[0], "POST maquinas");
        assert!(llamadas.contains(&format!("PUT maquinas/{}", creada.id)));
    }

    #[tokio::test]
    async fn test_eliminar_refresca_lista_y_edificios() {
        let (fake, mut view) = vista().await;

        view.eliminar(2).await.unwrap();
        assert_eq!(view.maquinas().len(), 1);
        assert_eq!(
            fake.llamadas(),
            vec!["DELETE maquinas/2", "GET maquinas", "GET maquinas/edificios"]
        );
    }

    #[tokio::test]
    async fn test_resumen_por_empresa() {
        let fake = Arc::new(FakeApi::new());
        fake.agregar_maquina(1, "A", "Central");
        fake.agregar_maquina(2, "B", "Norte");

        let mut view = MaquinasView::nuevo(fake.clone(), None);
        view.cargar().await.unwrap();

        let resumen = view.resumen();
        assert_eq!(resumen.telecom, 2);
        assert_eq!(resumen.pago_online, 0);
    }
}
