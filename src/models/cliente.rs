//! Modelo de Cliente (somente leitura neste serviço)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::DbId;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Cliente {
    pub id: DbId,
    pub nome: String,
    pub cpf: String,
    pub celular: String,
    pub email: String,
    pub endereco: String,
    pub bairro: Option<String>,
    pub cidade: Option<String>,
    pub estado: Option<String>,
    pub cep: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cliente {
    /// Endereço no formato do contrato: `Rua X, Bairro - Cidade/UF, CEP: 00000-000`.
    /// Partes vazias são omitidas.
    pub fn endereco_completo(&self) -> String {
        let preenchido = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let mut partes = Vec::new();
        if !self.endereco.trim().is_empty() {
            partes.push(self.endereco.trim().to_string());
        }
        partes.extend(preenchido(&self.bairro));
        let mut endereco = partes.join(", ");

        let cidade_estado: Vec<String> = [preenchido(&self.cidade), preenchido(&self.estado)]
            .into_iter()
            .flatten()
            .collect();
        if !cidade_estado.is_empty() {
            endereco.push_str(" - ");
            endereco.push_str(&cidade_estado.join("/"));
        }

        if let Some(cep) = preenchido(&self.cep) {
            endereco.push_str(", CEP: ");
            endereco.push_str(&cep);
        }
        endereco
    }
}
