//! Modelo de Movimentação Financeira

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};

use super::DbId;

pub const CATEGORIA_LOCACAO: &str = "locacao";
pub const CATEGORIA_SEGURO: &str = "seguro";

/// Tipo da movimentação - mapeia o ENUM tipo_movimentacao
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "tipo_movimentacao", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TipoMovimentacao {
    Entrada,
    Saida,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct MovimentacaoFinanceira {
    pub id: DbId,
    pub tipo: TipoMovimentacao,
    pub categoria: String,
    pub descricao: String,
    pub valor: Decimal,
    pub data_movimentacao: NaiveDate,
    pub locacao_id: Option<DbId>,
    pub cliente_id: Option<DbId>,
    pub observacoes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NovaMovimentacao {
    pub tipo: TipoMovimentacao,
    pub categoria: String,
    pub descricao: String,
    pub valor: Decimal,
    pub data_movimentacao: NaiveDate,
    pub locacao_id: Option<DbId>,
    pub cliente_id: Option<DbId>,
    pub observacoes: Option<String>,
}

/// Atualização parcial de uma movimentação. `locacao_id` não é editável.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AtualizarMovimentacao {
    pub tipo: Option<TipoMovimentacao>,
    pub categoria: Option<String>,
    pub descricao: Option<String>,
    pub valor: Option<Decimal>,
    pub data_movimentacao: Option<NaiveDate>,
    pub cliente_id: Option<DbId>,
    pub observacoes: Option<String>,
}

impl AtualizarMovimentacao {
    pub fn is_empty(&self) -> bool {
        *self == AtualizarMovimentacao::default()
    }
}

impl MovimentacaoFinanceira {
    pub fn aplicar(&self, patch: &AtualizarMovimentacao) -> MovimentacaoFinanceira {
        let mut m = self.clone();
        if let Some(v) = patch.tipo {
            m.tipo = v;
        }
        if let Some(v) = &patch.categoria {
            m.categoria = v.trim().to_string();
        }
        if let Some(v) = &patch.descricao {
            m.descricao = v.trim().to_string();
        }
        if let Some(v) = patch.valor {
            m.valor = v;
        }
        if let Some(v) = patch.data_movimentacao {
            m.data_movimentacao = v;
        }
        if patch.cliente_id.is_some() {
            m.cliente_id = patch.cliente_id;
        }
        if let Some(v) = &patch.observacoes {
            m.observacoes = Some(v.clone());
        }
        m
    }
}

/// Receita de locação ou de seguro: lançamento mantido pelo conciliador,
/// um por locação.
pub fn is_lancamento_automatico(tipo: TipoMovimentacao, categoria: &str) -> bool {
    tipo == TipoMovimentacao::Entrada
        && (categoria == CATEGORIA_LOCACAO || categoria == CATEGORIA_SEGURO)
}

/// Chave que identifica a movimentação de uma locação por tipo + categoria
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChaveMovimentacao {
    pub locacao_id: DbId,
    pub tipo: TipoMovimentacao,
    pub categoria: &'static str,
}

impl ChaveMovimentacao {
    pub fn receita_locacao(locacao_id: DbId) -> Self {
        Self {
            locacao_id,
            tipo: TipoMovimentacao::Entrada,
            categoria: CATEGORIA_LOCACAO,
        }
    }

    pub fn receita_seguro(locacao_id: DbId) -> Self {
        Self {
            locacao_id,
            tipo: TipoMovimentacao::Entrada,
            categoria: CATEGORIA_SEGURO,
        }
    }

    pub fn corresponde(&self, mov: &MovimentacaoFinanceira) -> bool {
        mov.locacao_id == Some(self.locacao_id)
            && mov.tipo == self.tipo
            && mov.categoria == self.categoria
    }
}

pub fn descricao_receita_locacao(locacao_id: DbId, atualizada: bool) -> String {
    if atualizada {
        format!("Recebimento da Locação #{} (Valor Atualizado)", locacao_id)
    } else {
        format!("Recebimento da Locação #{}", locacao_id)
    }
}

pub fn descricao_receita_seguro(locacao_id: DbId, atualizada: bool) -> String {
    if atualizada {
        format!("Recebimento de Seguro - Locação #{} (Valor Atualizado)", locacao_id)
    } else {
        format!("Recebimento de Seguro - Locação #{}", locacao_id)
    }
}
