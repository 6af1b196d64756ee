use serde::Deserialize;
use std::fmt;

#[derive(Debug)]
pub enum ApiError {
    /// Local validation failure, detected before any request is issued.
    Validation(String),
    /// Transport-level failure (DNS, refused connection, timeout).
    Network(reqwest::Error),
    /// The backend answered with a non-success status.
    Api { status: u16, message: String },
    /// The backend answered 2xx but the body did not match the expected shape.
    Decode(String),
    Config(String),
    Interno(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Error bodies the backend emits. Article/machine/load endpoints use
/// `{"error": ...}`, count endpoints use `{"message": ...}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ApiError::Validation(msg) => write!(f, "{}", msg),
            ApiError::Network(err) => write!(f, "Error de red: {}", err),
            ApiError::Api { status, message } => write!(f, "Error del servidor ({}): {}", status, message),
            ApiError::Decode(msg) => write!(f, "Respuesta inesperada del servidor: {}", msg),
            ApiError::Config(msg) => write!(f, "Error de configuración: {}", msg),
            ApiError::Interno(msg) => write!(f, "Error interno: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err)
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::Validation(err.to_string())
    }
}

// Errores específicos del dashboard
impl ApiError {
    pub fn stock_insuficiente(nombre: &str) -> Self {
        ApiError::Validation(format!("Stock insuficiente para {}", nombre))
    }

    pub fn seleccion_incompleta() -> Self {
        ApiError::Validation("Debe seleccionar una máquina y al menos un producto".to_string())
    }

    pub fn cargas_parciales() -> Self {
        ApiError::Validation("Error al registrar algunas cargas".to_string())
    }

    pub fn maquina_sin_seleccionar() -> Self {
        ApiError::Validation("Selecciona una máquina".to_string())
    }

    pub fn conteo_vacio() -> Self {
        ApiError::Validation("El conteo debe ser mayor a 0".to_string())
    }

    pub fn articulo_invalido() -> Self {
        ApiError::Validation(
            "Por favor ingresa un nombre y una cantidad mayor a 0.".to_string(),
        )
    }

    /// Builds the error for a non-success HTTP response, preferring the
    /// message the backend put in the body over the bare status line.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error.or(b.message))
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    format!("HTTP {}", status)
                } else {
                    body.trim().to_string()
                }
            });
        ApiError::Api { status, message }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ApiError::Validation(_))
    }
}
