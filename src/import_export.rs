// src/import_export.rs - CSV export of the dashboard lists
use std::io::Write;

use crate::error::{ApiError, ApiResult};
use crate::models::{Articulo, CargaAgrupada, DatoGrafico};

fn error_csv(e: csv::Error) -> ApiError {
    ApiError::Interno(e.to_string())
}

// ==================== ARTICULOS ====================

pub fn exportar_articulos_csv<W: Write>(articulos: &[Articulo], destino: W) -> ApiResult<()> {
    let mut writer = csv::Writer::from_writer(destino);

    writer
        .write_record([
            "Nombre",
            "Cantidad inicial",
            "Utilizados",
            "Disponibles",
            "Símbolo",
            "Empresa",
        ])
        .map_err(error_csv)?;

    for articulo in articulos {
        writer
            .write_record([
                articulo.nombre.clone(),
                articulo.cantidad.to_string(),
                articulo.utilizados.to_string(),
                articulo.disponibles_visibles().to_string(),
                articulo.simbolo.clone().unwrap_or_default(),
                articulo.empresa.map(|e| e.to_string()).unwrap_or_default(),
            ])
            .map_err(error_csv)?;
    }

    writer.flush().map_err(|e| ApiError::Interno(e.to_string()))?;
    Ok(())
}

// ==================== CARGAS ====================

pub fn exportar_cargas_csv<W: Write>(cargas: &[CargaAgrupada], destino: W) -> ApiResult<()> {
    let mut writer = csv::Writer::from_writer(destino);

    writer
        .write_record([
            "Fecha",
            "Máquina",
            "Edificio",
            "Empresa",
            "Productos",
            "Total cantidad",
            "Usuario",
        ])
        .map_err(error_csv)?;

    for carga in cargas {
        writer
            .write_record([
                carga.fecha.format("%Y-%m-%d").to_string(),
                carga.maquina_nombre.clone(),
                carga.edificio.clone(),
                carga.empresa.to_string(),
                carga.total_productos.to_string(),
                carga.total_cantidad.to_string(),
                carga.usuario.clone().unwrap_or_default(),
            ])
            .map_err(error_csv)?;
    }

    writer.flush().map_err(|e| ApiError::Interno(e.to_string()))?;
    Ok(())
}

// ==================== SERIES DE CONSUMO ====================

pub fn exportar_serie_csv<W: Write>(datos: &[DatoGrafico], destino: W) -> ApiResult<()> {
    let mut writer = csv::Writer::from_writer(destino);

    writer
        .write_record(["Fecha", "Cantidad", "Máquina"])
        .map_err(error_csv)?;

    for dato in datos {
        writer
            .write_record([
                dato.fecha.clone(),
                dato.cantidad.to_string(),
                dato.maquina_nombre.clone().unwrap_or_default(),
            ])
            .map_err(error_csv)?;
    }

    writer.flush().map_err(|e| ApiError::Interno(e.to_string()))?;
    Ok(())
}
