//! Modelo de Veículo
//!
//! O cadastro de veículos é mantido fora deste serviço; aqui só interessa
//! o status, que o ciclo de vida das locações controla.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};

use super::DbId;

/// Estado do veículo - mapeia o ENUM veiculo_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "veiculo_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VeiculoStatus {
    Disponivel,
    Locado,
    Vendido,
}

/// Veículo - mapeia a tabela veiculos
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Veiculo {
    pub id: DbId,
    pub marca: String,
    pub modelo: String,
    pub ano: i32,
    pub placa: String,
    pub cor: Option<String>,
    pub valor_diaria: Option<Decimal>,
    pub valor_veiculo: Decimal,
    pub status: VeiculoStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Veiculo {
    /// `"Fiat Argo - ABC1D23"`, usado nas listagens de locações
    pub fn descricao(&self) -> String {
        format!("{} {} - {}", self.marca, self.modelo, self.placa)
    }
}
