//! Modelos do sistema
//!
//! Este módulo contém os modelos de dados que mapeiam o schema PostgreSQL
//! da locadora (ver `migrations/`).

/// Chave primária das tabelas (BIGSERIAL)
pub type DbId = i64;

pub mod cliente;
pub mod contrato;
pub mod locacao;
pub mod movimentacao;
pub mod veiculo;
pub mod vistoria;
