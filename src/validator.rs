// src/validator.rs - Centralized validation module
use crate::error::ApiError;
use crate::models::Empresa;
use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use strum::IntoEnumIterator;

lazy_static! {
    static ref FECHA_REGEX: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();
}

// ==================== VALIDATION RESULT ====================

#[derive(Debug, Default, Serialize)]
pub struct ValidationResult {
    pub errors: HashMap<String, Vec<String>>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn to_api_error(&self) -> ApiError {
        let mut fields: Vec<_> = self.errors.iter().collect();
        fields.sort_by_key(|(field, _)| field.as_str());

        let message = fields
            .iter()
            .map(|(field, errors)| format!("{}: {}", field, errors.join(", ")))
            .collect::<Vec<_>>()
            .join("; ");

        ApiError::Validation(message)
    }

    /// Shortcut used by the views: Ok(()) or the accumulated error.
    pub fn into_result(self) -> Result<(), ApiError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(self.to_api_error())
        }
    }
}

// ==================== FIELD VALIDATORS ====================

pub struct FieldValidator;

impl FieldValidator {
    pub fn not_empty(value: &str, field: &str) -> Result<(), String> {
        if value.trim().is_empty() {
            Err(format!("{} no puede estar vacío", field))
        } else {
            Ok(())
        }
    }

    pub fn length(value: &str, field: &str, min: Option<usize>, max: Option<usize>) -> Result<(), String> {
        let len = value.len();

        if let Some(min_len) = min {
            if len < min_len {
                return Err(format!("{} debe tener al menos {} caracteres", field, min_len));
            }
        }

        if let Some(max_len) = max {
            if len > max_len {
                return Err(format!("{} no puede superar los {} caracteres", field, max_len));
            }
        }

        Ok(())
    }

    pub fn range<T: PartialOrd + std::fmt::Display>(
        value: T,
        field: &str,
        min: Option<T>,
        max: Option<T>,
    ) -> Result<(), String> {
        if let Some(min_val) = min {
            if value < min_val {
                return Err(format!("{} debe ser al menos {}", field, min_val));
            }
        }

        if let Some(max_val) = max {
            if value > max_val {
                return Err(format!("{} no puede superar {}", field, max_val));
            }
        }

        Ok(())
    }
}

// ==================== PARSERS ====================

/// Parses an ISO `YYYY-MM-DD` date, rejecting both malformed strings and
/// impossible calendar dates.
pub fn parsear_fecha(value: &str) -> Result<NaiveDate, ApiError> {
    let value = value.trim();
    if !FECHA_REGEX.is_match(value) {
        return Err(ApiError::Validation(format!(
            "Fecha inválida '{}' (formato esperado: AAAA-MM-DD)",
            value
        )));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        ApiError::Validation(format!("Fecha inválida '{}' (fecha inexistente)", value))
    })
}

/// Parses a business unit, tolerating case and a dashed spelling of
/// "Pago Online".
pub fn parsear_empresa(value: &str) -> Result<Empresa, ApiError> {
    let normalizado = value.trim().to_lowercase().replace('-', " ");
    match normalizado.as_str() {
        "telecom" => Ok(Empresa::Telecom),
        "pago online" => Ok(Empresa::PagoOnline),
        _ => {
            let valores = Empresa::iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            Err(ApiError::Validation(format!(
                "Empresa inválida '{}' (valores: {})",
                value, valores
            )))
        }
    }
}
