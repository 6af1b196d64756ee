// src/main.rs - Operator console for the vending stock dashboard
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

mod api;
mod articulos_view;
mod cargas_view;
mod config;
mod conteos_view;
mod error;
mod estadisticas_view;
mod import_export;
mod maquinas_view;
mod models;
pub mod validator;

use api::{HttpApi, VendingApi};
use articulos_view::ArticulosView;
use cargas_view::CargasView;
use config::{load_config, Config};
use conteos_view::ConteosView;
use estadisticas_view::{maximo, minimo, promedio, EstadisticasView, RangoFechas, VistaGrafico};
use maquinas_view::MaquinasView;
use models::*;
use crate::validator::{parsear_empresa, parsear_fecha};

// ==================== CLI ====================

#[derive(Parser)]
#[command(
    name = "vendstock",
    version,
    about = "Panel de inventario y cargas de máquinas expendedoras"
)]
struct Cli {
    /// Empresa a consultar: Telecom o "Pago Online"
    #[arg(long, global = true)]
    empresa: Option<String>,

    #[command(subcommand)]
    comando: Comando,
}

#[derive(Subcommand)]
enum Comando {
    /// Stock de artículos
    Articulos {
        #[command(subcommand)]
        accion: AccionArticulos,
    },
    /// Registro de máquinas
    Maquinas {
        #[command(subcommand)]
        accion: AccionMaquinas,
    },
    /// Cargas de máquinas
    Cargas {
        #[command(subcommand)]
        accion: AccionCargas,
    },
    /// Conteos manuales de vasos
    Conteos {
        #[command(subcommand)]
        accion: AccionConteos,
    },
    /// Estadísticas de consumo
    Estadisticas {
        /// Inicio del rango (AAAA-MM-DD); por defecto hace 7 días
        #[arg(long)]
        desde: Option<String>,
        /// Fin del rango (AAAA-MM-DD); por defecto hoy
        #[arg(long)]
        hasta: Option<String>,
        /// Exporta una serie a CSV: dia | maquina | tendencia | comparativa
        #[arg(long)]
        exportar: Option<String>,
        /// Archivo de salida para --exportar
        #[arg(long)]
        salida: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum AccionArticulos {
    /// Lista el stock actual
    Listar,
    Crear {
        #[arg(long)]
        nombre: String,
        #[arg(long)]
        cantidad: i64,
        #[arg(long)]
        simbolo: Option<String>,
    },
    /// Reemplaza los datos de un artículo
    Editar {
        id: i64,
        #[arg(long)]
        nombre: String,
        #[arg(long)]
        cantidad: i64,
        #[arg(long)]
        utilizados: i64,
        #[arg(long)]
        simbolo: Option<String>,
    },
    Eliminar {
        id: i64,
        /// No pedir confirmación
        #[arg(long)]
        si: bool,
    },
    /// Descuenta unidades del stock disponible
    Utilizar {
        id: i64,
        #[arg(long)]
        cantidad: i64,
    },
    /// Exporta el listado a CSV
    Exportar {
        #[arg(long, default_value = "articulos.csv")]
        salida: PathBuf,
    },
}

#[derive(Subcommand)]
enum AccionMaquinas {
    Listar {
        /// Filtra por edificio (en el servidor)
        #[arg(long)]
        edificio: Option<String>,
        /// Búsqueda libre sobre la lista descargada
        #[arg(long)]
        busqueda: Option<String>,
        /// Incluye las dos empresas
        #[arg(long)]
        todas: bool,
    },
    Crear {
        #[arg(long)]
        nombre: String,
        #[arg(long)]
        edificio: String,
        #[arg(long)]
        ubicacion: Option<String>,
    },
    Editar {
        id: i64,
        #[arg(long)]
        nombre: String,
        #[arg(long)]
        edificio: String,
        #[arg(long)]
        ubicacion: Option<String>,
    },
    Eliminar {
        id: i64,
        #[arg(long)]
        si: bool,
    },
    /// Lista los edificios conocidos
    Edificios,
}

#[derive(Subcommand)]
enum AccionCargas {
    /// Historial de cargas agrupadas
    Listar {
        #[arg(long)]
        maquina: Option<i64>,
        #[arg(long)]
        articulo: Option<i64>,
        #[arg(long)]
        desde: Option<String>,
        #[arg(long)]
        hasta: Option<String>,
    },
    /// Registra una carga de uno o más productos en una máquina
    Registrar {
        #[arg(long)]
        maquina: i64,
        /// Línea de carga, repetible: --producto ARTICULO_ID:CANTIDAD
        #[arg(long = "producto", value_name = "ARTICULO_ID:CANTIDAD", required = true)]
        productos: Vec<String>,
        #[arg(long)]
        usuario: Option<String>,
        #[arg(long)]
        observaciones: Option<String>,
    },
    /// Desglose de un grupo (máquina + fecha + usuario)
    Detalles {
        #[arg(long)]
        maquina: i64,
        #[arg(long)]
        fecha: String,
        #[arg(long)]
        usuario: Option<String>,
    },
    /// Elimina una carga y revierte el stock
    Eliminar {
        id: i64,
        #[arg(long)]
        si: bool,
    },
    /// Exporta el historial filtrado a CSV
    Exportar {
        #[arg(long, default_value = "cargas.csv")]
        salida: PathBuf,
    },
}

#[derive(Subcommand)]
enum AccionConteos {
    /// Últimos conteos registrados
    Ultimos,
    Registrar {
        #[arg(long)]
        maquina: i64,
        #[arg(long)]
        vasos: i64,
        #[arg(long)]
        observaciones: Option<String>,
    },
    Editar {
        id: i64,
        #[arg(long)]
        vasos: i64,
        #[arg(long)]
        observaciones: Option<String>,
    },
    Eliminar {
        id: i64,
        #[arg(long)]
        si: bool,
    },
}

// ==================== MAIN ====================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config()?;
    setup_logging(&config)?;
    config.print_startup_info();

    let api: Arc<dyn VendingApi> = Arc::new(HttpApi::new(&config.api)?);
    let empresa = match &cli.empresa {
        Some(valor) => parsear_empresa(valor)?,
        None => config.empresa_default(),
    };

    match cli.comando {
        Comando::Articulos { accion } => ejecutar_articulos(api, empresa, accion).await,
        Comando::Maquinas { accion } => ejecutar_maquinas(api, empresa, accion).await,
        Comando::Cargas { accion } => ejecutar_cargas(api, empresa, &config, accion).await,
        Comando::Conteos { accion } => ejecutar_conteos(api, empresa, accion).await,
        Comando::Estadisticas { desde, hasta, exportar, salida } => {
            ejecutar_estadisticas(api, empresa, desde, hasta, exportar, salida).await
        }
    }
}

fn setup_logging(config: &Config) -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(&config.logging.level),
    )
    .format_timestamp(None)
    .try_init()
    .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}

/// Asks before a destructive action, unless `--si` was given.
fn confirmar(mensaje: &str, saltar: bool) -> Result<bool> {
    if saltar {
        return Ok(true);
    }
    print!("{} [s/N]: ", mensaje);
    io::stdout().flush()?;

    let mut linea = String::new();
    io::stdin().read_line(&mut linea)?;
    Ok(matches!(linea.trim().to_lowercase().as_str(), "s" | "si" | "sí"))
}

// ==================== ARTICULOS ====================

async fn ejecutar_articulos(
    api: Arc<dyn VendingApi>,
    empresa: Empresa,
    accion: AccionArticulos,
) -> Result<()> {
    let mut view = ArticulosView::nuevo(api, empresa);
    view.cargar().await?;

    match accion {
        AccionArticulos::Listar => imprimir_articulos(view.articulos()),
        AccionArticulos::Crear { nombre, cantidad, simbolo } => {
            let articulo = view
                .crear(NuevoArticulo { nombre, cantidad, simbolo, empresa })
                .await?;
            println!("Artículo '{}' guardado (id {})", articulo.nombre, articulo.id);
            imprimir_articulos(view.articulos());
        }
        AccionArticulos::Editar { id, nombre, cantidad, utilizados, simbolo } => {
            view.actualizar(id, ActualizarArticulo { nombre, cantidad, utilizados, simbolo, empresa })
                .await?;
            println!("Artículo {} editado", id);
            imprimir_articulos(view.articulos());
        }
        AccionArticulos::Eliminar { id, si } => {
            if confirmar("¿Seguro que deseas eliminar este artículo?", si)? {
                view.eliminar(id).await?;
                println!("Artículo eliminado");
            }
        }
        AccionArticulos::Utilizar { id, cantidad } => {
            let articulo = view.utilizar(id, cantidad).await?;
            println!(
                "Cantidad descontada. '{}' queda con {} disponibles",
                articulo.nombre,
                articulo.disponibles_visibles()
            );
        }
        AccionArticulos::Exportar { salida } => {
            let archivo = File::create(&salida)?;
            import_export::exportar_articulos_csv(view.articulos(), archivo)?;
            println!("{} artículos exportados a {}", view.articulos().len(), salida.display());
        }
    }
    Ok(())
}

fn imprimir_articulos(articulos: &[Articulo]) {
    if articulos.is_empty() {
        println!("No hay artículos registrados");
        return;
    }
    println!(
        "{:<5} {:<4} {:<25} {:>9} {:>11} {:>12}  {}",
        "ID", "", "Nombre", "Cantidad", "Utilizados", "Disponibles", "Nivel"
    );
    for a in articulos {
        println!(
            "{:<5} {:<4} {:<25} {:>9} {:>11} {:>12}  {}",
            a.id,
            a.simbolo.as_deref().unwrap_or("📦"),
            a.nombre,
            a.cantidad,
            a.utilizados,
            a.disponibles_visibles(),
            a.nivel_stock().etiqueta()
        );
    }
}

// ==================== MAQUINAS ====================

async fn ejecutar_maquinas(
    api: Arc<dyn VendingApi>,
    empresa: Empresa,
    accion: AccionMaquinas,
) -> Result<()> {
    let alcance = match &accion {
        AccionMaquinas::Listar { todas: true, .. } => None,
        _ => Some(empresa),
    };
    let mut view = MaquinasView::nuevo(api, alcance);

    match accion {
        AccionMaquinas::Listar { edificio, busqueda, .. } => {
            view.seleccionar_edificio(edificio).await?;
            view.cargar().await?;
            if let Some(termino) = busqueda {
                view.busqueda = termino;
            }
            imprimir_maquinas(&view);
        }
        AccionMaquinas::Crear { nombre, edificio, ubicacion } => {
            view.cargar().await?;
            let maquina = view
                .guardar(None, DatosMaquina { nombre, edificio, ubicacion, empresa })
                .await?;
            println!("Máquina '{}' creada (id {})", maquina.nombre, maquina.id);
        }
        AccionMaquinas::Editar { id, nombre, edificio, ubicacion } => {
            view.cargar().await?;
            view.guardar(Some(id), DatosMaquina { nombre, edificio, ubicacion, empresa })
                .await?;
            println!("Máquina {} editada", id);
        }
        AccionMaquinas::Eliminar { id, si } => {
            view.cargar().await?;
            if confirmar("¿Seguro que deseas eliminar esta máquina?", si)? {
                view.eliminar(id).await?;
                println!("Máquina eliminada");
            }
        }
        AccionMaquinas::Edificios => {
            view.cargar().await?;
            for edificio in view.edificios() {
                println!("{}", edificio);
            }
        }
    }
    Ok(())
}

fn imprimir_maquinas(view: &MaquinasView) {
    let maquinas = view.filtradas();
    if maquinas.is_empty() {
        println!("No hay máquinas registradas");
        return;
    }
    println!(
        "{:<5} {:<28} {:<20} {:<16} {:<12} {}",
        "ID", "Nombre", "Edificio", "Ubicación", "Empresa", "Estado"
    );
    for m in &maquinas {
        println!(
            "{:<5} {:<28} {:<20} {:<16} {:<12} {}",
            m.id,
            m.nombre,
            m.edificio,
            m.ubicacion.as_deref().unwrap_or("-"),
            m.empresa,
            m.estado
        );
    }
    let resumen = view.resumen();
    println!(
        "\n{} máquina(s) en total. Telecom: {}, Pago Online: {}",
        maquinas.len(),
        resumen.telecom,
        resumen.pago_online
    );
}

// ==================== CARGAS ====================

fn parsear_producto(valor: &str) -> Result<(i64, i64)> {
    let (articulo, cantidad) = valor
        .split_once(':')
        .ok_or_else(|| anyhow::anyhow!("Producto inválido '{}' (formato: ARTICULO_ID:CANTIDAD)", valor))?;
    Ok((articulo.trim().parse()?, cantidad.trim().parse()?))
}

fn filtros_desde_argumentos(
    maquina: Option<i64>,
    articulo: Option<i64>,
    desde: Option<String>,
    hasta: Option<String>,
) -> Result<FiltrosCarga> {
    Ok(FiltrosCarga {
        maquina_id: maquina,
        articulo_id: articulo,
        fecha_desde: desde.map(|f| parsear_fecha(&f)).transpose()?,
        fecha_hasta: hasta.map(|f| parsear_fecha(&f)).transpose()?,
    })
}

async fn ejecutar_cargas(
    api: Arc<dyn VendingApi>,
    empresa: Empresa,
    config: &Config,
    accion: AccionCargas,
) -> Result<()> {
    let mut view = CargasView::nuevo(api.clone(), empresa);

    match accion {
        AccionCargas::Listar { maquina, articulo, desde, hasta } => {
            view.filtros = filtros_desde_argumentos(maquina, articulo, desde, hasta)?;
            view.cargar().await?;
            imprimir_cargas(&view);
        }
        AccionCargas::Registrar { maquina, productos, usuario, observaciones } => {
            view.cargar().await?;
            view.formulario.maquina_id = Some(maquina);
            view.formulario.usuario = usuario
                .or_else(|| config.defaults.usuario.clone())
                .unwrap_or_default();
            view.formulario.observaciones = observaciones.unwrap_or_default();

            for (indice, producto) in productos.iter().enumerate() {
                let (articulo_id, cantidad) = parsear_producto(producto)?;
                if indice > 0 {
                    view.formulario.agregar_producto();
                }
                view.formulario.establecer_articulo(indice, Some(articulo_id));
                view.formulario.establecer_cantidad(indice, cantidad);
            }

            let lote = view.registrar().await?;
            if let Some(error) = lote.error_usuario() {
                for (peticion, resultado) in &lote.resultados {
                    if let Err(e) = resultado {
                        log::error!("Artículo {}: {}", peticion.articulo_id, e);
                    }
                }
                anyhow::bail!("{}", error);
            }

            println!("Cargas registradas exitosamente\n");
            imprimir_articulos(view.articulos());
        }
        AccionCargas::Detalles { maquina, fecha, usuario } => {
            let fecha = parsear_fecha(&fecha)?;
            let detalles = api.detalles_carga(maquina, fecha, usuario.as_deref()).await?;
            if detalles.is_empty() {
                println!("Sin cargas para ese grupo");
            }
            for d in detalles {
                println!(
                    "{:<5} {:<4} {:<25} x{}",
                    d.id,
                    d.articulo_simbolo.as_deref().unwrap_or(""),
                    d.articulo_nombre,
                    d.cantidad_cargada
                );
            }
        }
        AccionCargas::Eliminar { id, si } => {
            view.cargar().await?;
            if confirmar("¿Seguro que deseas eliminar esta carga? Se revertirá el stock.", si)? {
                view.eliminar(id).await?;
                println!("Carga eliminada y stock revertido");
            }
        }
        AccionCargas::Exportar { salida } => {
            view.cargar().await?;
            let archivo = File::create(&salida)?;
            import_export::exportar_cargas_csv(view.cargas(), archivo)?;
            println!("{} cargas exportadas a {}", view.cargas().len(), salida.display());
        }
    }
    Ok(())
}

fn imprimir_cargas(view: &CargasView) {
    if view.cargas().is_empty() {
        println!("No hay cargas registradas");
        return;
    }
    println!(
        "{:<5} {:<12} {:<25} {:<12} {:>9} {:>9}  {}",
        "ID", "Fecha", "Máquina", "Empresa", "Productos", "Unidades", "Usuario"
    );
    for c in view.cargas() {
        println!(
            "{:<5} {:<12} {:<25} {:<12} {:>9} {:>9}  {}",
            c.id,
            c.fecha.format("%Y-%m-%d"),
            c.maquina_nombre,
            c.empresa,
            c.total_productos,
            c.total_cantidad,
            c.usuario.as_deref().unwrap_or("-")
        );
        if !c.productos_detalle.is_empty() {
            println!("      {}", c.productos_detalle);
        }
    }
    if !view.filtros.esta_vacio() {
        println!("(filtros aplicados)");
    }
    let resumen = view.resumen();
    println!(
        "\nTotal cargas: {}, artículos cargados: {}",
        resumen.total_cargas, resumen.total_articulos
    );
}

// ==================== CONTEOS ====================

async fn ejecutar_conteos(
    api: Arc<dyn VendingApi>,
    empresa: Empresa,
    accion: AccionConteos,
) -> Result<()> {
    let mut view = ConteosView::nuevo(api, empresa);
    view.cargar().await?;

    match accion {
        AccionConteos::Ultimos => imprimir_conteos(view.ultimos()),
        AccionConteos::Registrar { maquina, vasos, observaciones } => {
            let conteo = view
                .guardar(Some(maquina), vasos, observaciones.as_deref().unwrap_or(""))
                .await?;
            println!("Conteo guardado: {} vasos", conteo.cantidad_vasos);
        }
        AccionConteos::Editar { id, vasos, observaciones } => {
            view.editar(id, ActualizarConteo { cantidad_vasos: vasos, observaciones })
                .await?;
            println!("Conteo actualizado exitosamente");
        }
        AccionConteos::Eliminar { id, si } => {
            if confirmar("¿Seguro que deseas eliminar este conteo?", si)? {
                view.eliminar(id).await?;
                println!("Conteo eliminado exitosamente");
            }
        }
    }
    Ok(())
}

fn imprimir_conteos(conteos: &[Conteo]) {
    if conteos.is_empty() {
        println!("No hay conteos registrados");
        return;
    }
    println!(
        "{:<5} {:<18} {:<25} {:>8}  {}",
        "ID", "Fecha", "Máquina", "Vasos", "Observaciones"
    );
    for c in conteos {
        println!(
            "{:<5} {:<18} {:<25} {:>8}  {}",
            c.id,
            c.fecha.format("%Y-%m-%d %H:%M"),
            c.maquina_nombre.as_deref().unwrap_or("-"),
            c.cantidad_vasos,
            c.observaciones.as_deref().unwrap_or("-")
        );
    }
}

// ==================== ESTADISTICAS ====================

async fn ejecutar_estadisticas(
    api: Arc<dyn VendingApi>,
    empresa: Empresa,
    desde: Option<String>,
    hasta: Option<String>,
    exportar: Option<String>,
    salida: Option<PathBuf>,
) -> Result<()> {
    let mut view = EstadisticasView::nuevo(api, empresa);
    if let (Some(desde), Some(hasta)) = (desde.as_deref(), hasta.as_deref()) {
        view.rango = RangoFechas {
            desde: parsear_fecha(desde)?,
            hasta: parsear_fecha(hasta)?,
        };
    }
    view.refrescar().await?;
    view.refrescar_graficos().await?;

    let generales = view.generales();
    println!("Consumo de {} (tendencia {}):", empresa, generales.tendencia_consumo.etiqueta());
    println!("  Hoy: {} vasos", generales.total_vasos_hoy);
    println!("  Semana: {} vasos", generales.total_vasos_semana);
    println!("  Mes: {} vasos", generales.total_vasos_mes);
    println!("  Promedio por día: {:.1}", generales.promedio_vasos_por_dia);
    if !generales.maquina_mas_usada.is_empty() {
        println!("  Máquina más usada: {}", generales.maquina_mas_usada);
    }

    if !view.por_maquina().is_empty() {
        println!(
            "\n{:<25} {:<20} {:>8} {:>10}  {}",
            "Máquina", "Edificio", "Vasos", "Prom./h", "Último conteo"
        );
        for m in view.por_maquina() {
            println!(
                "{:<25} {:<20} {:>8} {:>10.1}  {}",
                m.maquina_nombre,
                m.edificio,
                m.total_vasos,
                m.promedio_hora,
                m.ultimo_conteo.as_deref().unwrap_or("Sin datos")
            );
        }
    }

    let por_dia = &view.consumo().consumo_por_dia;
    if let (Some(pico), Some(valle)) = (maximo(por_dia), minimo(por_dia)) {
        println!(
            "\nConsumo por día: pico {} ({} vasos), mínimo {} ({} vasos), promedio {:.1}",
            pico.etiqueta(),
            pico.cantidad,
            valle.etiqueta(),
            valle.cantidad,
            promedio(por_dia)
        );
    }

    if let Some(nombre) = exportar {
        let vista = match nombre.as_str() {
            "dia" => VistaGrafico::Dia,
            "maquina" => VistaGrafico::Maquina,
            "tendencia" => VistaGrafico::Tendencia,
            "comparativa" => VistaGrafico::Comparativa,
            otro => anyhow::bail!(
                "Serie desconocida '{}' (valores: dia, maquina, tendencia, comparativa)",
                otro
            ),
        };
        let serie = view.serie(vista);
        let destino = salida.unwrap_or_else(|| PathBuf::from(vista.nombre_archivo()));
        let archivo = File::create(&destino)?;
        import_export::exportar_serie_csv(serie, archivo)?;
        println!(
            "\n{}: {} filas exportadas a {} (promedio {:.1})",
            vista.titulo(),
            serie.len(),
            destino.display(),
            promedio(serie)
        );
    }

    Ok(())
}
