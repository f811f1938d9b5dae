//! Utilidades de validação
//!
//! Validadores customizados usados pelos DTOs com `#[derive(Validate)]`
//! e helpers de conversão de tipos.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use validator::ValidationError;

/// Maior valor que cabe numa coluna `NUMERIC(12, 2)`
pub fn valor_monetario_maximo() -> Decimal {
    Decimal::new(999_999_999_999, 2)
}

fn validate_limite_monetario(value: &Decimal) -> Result<(), ValidationError> {
    if *value > valor_monetario_maximo() {
        let mut error = ValidationError::new("max");
        error.add_param("max".into(), &valor_monetario_maximo().to_string());
        error.add_param("actual".into(), &value.to_string());
        error.message = Some("O valor excede o máximo permitido".into());
        return Err(error);
    }
    Ok(())
}

/// Valor monetário estritamente positivo
pub fn validate_positive_decimal(value: &Decimal) -> Result<(), ValidationError> {
    validate_limite_monetario(value)?;
    if *value <= Decimal::ZERO {
        let mut error = ValidationError::new("positive");
        error.add_param("actual".into(), &value.to_string());
        error.message = Some("O valor deve ser positivo".into());
        return Err(error);
    }
    Ok(())
}

/// Valor monetário positivo ou zero
pub fn validate_non_negative_decimal(value: &Decimal) -> Result<(), ValidationError> {
    validate_limite_monetario(value)?;
    if *value < Decimal::ZERO {
        let mut error = ValidationError::new("non_negative");
        error.add_param("actual".into(), &value.to_string());
        error.message = Some("O valor deve ser positivo ou zero".into());
        return Err(error);
    }
    Ok(())
}

/// Período de locação: a entrega não pode ser anterior à retirada
pub fn validate_periodo(inicio: NaiveDate, fim: NaiveDate) -> Result<(), ValidationError> {
    if fim < inicio {
        let mut error = ValidationError::new("periodo");
        error.add_param("data_locacao".into(), &inicio.to_string());
        error.add_param("data_entrega".into(), &fim.to_string());
        error.message = Some("A data de entrega deve ser igual ou posterior à data de locação".into());
        return Err(error);
    }
    Ok(())
}

/// Validar que um string não esteja vazio
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_blank");
        error.message = Some("O campo não pode ficar em branco".into());
        return Err(error);
    }
    Ok(())
}
