//! Modelo de Locação
//!
//! Contém o registro da locação, o patch parcial usado nas atualizações e
//! as regras puras de período (sobreposição e valor total).

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use validator::ValidationError;

use super::DbId;

/// Estado da locação - mapeia o ENUM locacao_status
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "locacao_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LocacaoStatus {
    #[default]
    Ativa,
    Finalizada,
    Cancelada,
}

impl LocacaoStatus {
    pub fn is_ativa(self) -> bool {
        self == LocacaoStatus::Ativa
    }
}

/// Intervalo fechado `[inicio, fim]` em dias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Periodo {
    pub inicio: NaiveDate,
    pub fim: NaiveDate,
}

impl Periodo {
    pub fn new(inicio: NaiveDate, fim: NaiveDate) -> Self {
        Self { inicio, fim }
    }

    /// Dois períodos se sobrepõem se `s1 <= e2 AND e1 >= s2`. Limites
    /// inclusivos: terminar no dia em que o outro começa já é conflito.
    pub fn sobrepoe(&self, outro: &Periodo) -> bool {
        self.inicio <= outro.fim && self.fim >= outro.inicio
    }

    /// Número de diárias cobradas; locação no mesmo dia conta uma diária.
    pub fn diarias(&self) -> i64 {
        (self.fim - self.inicio).num_days().max(1)
    }
}

/// Valor total derivado: `diarias × valor_diaria`. `None` se estourar
/// a faixa do `Decimal`.
pub fn calcular_valor_total(periodo: Periodo, valor_diaria: Decimal) -> Option<Decimal> {
    Decimal::from(periodo.diarias()).checked_mul(valor_diaria)
}

/// Locação - mapeia a tabela locacoes
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Locacao {
    pub id: DbId,
    pub cliente_id: DbId,
    pub veiculo_id: DbId,
    pub data_locacao: NaiveDate,
    pub data_entrega: NaiveDate,
    pub valor_diaria: Decimal,
    pub valor_total: Decimal,
    pub valor_caucao: Decimal,
    pub valor_seguro: Decimal,
    pub status: LocacaoStatus,
    pub observacoes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Locacao {
    pub fn periodo(&self) -> Periodo {
        Periodo::new(self.data_locacao, self.data_entrega)
    }

    /// Aplica somente os campos presentes no patch. Quando datas ou diária
    /// mudam sem um novo `valor_total`, o total é recalculado; um total
    /// que não cabe num `Decimal` é erro de validação.
    pub fn aplicar(&self, patch: &AtualizarLocacao) -> Result<Locacao, ValidationError> {
        let mut merged = self.clone();

        if let Some(v) = patch.cliente_id {
            merged.cliente_id = v;
        }
        if let Some(v) = patch.veiculo_id {
            merged.veiculo_id = v;
        }
        if let Some(v) = patch.data_locacao {
            merged.data_locacao = v;
        }
        if let Some(v) = patch.data_entrega {
            merged.data_entrega = v;
        }
        if let Some(v) = patch.valor_diaria {
            merged.valor_diaria = v;
        }
        if let Some(v) = patch.valor_caucao {
            merged.valor_caucao = v;
        }
        if let Some(v) = patch.valor_seguro {
            merged.valor_seguro = v;
        }
        if let Some(v) = patch.status {
            merged.status = v;
        }
        if let Some(v) = &patch.observacoes {
            merged.observacoes = Some(v.clone());
        }

        merged.valor_total = match patch.valor_total {
            Some(total) => total,
            None if merged.periodo() != self.periodo() || merged.valor_diaria != self.valor_diaria => {
                calcular_valor_total(merged.periodo(), merged.valor_diaria).ok_or_else(|| {
                    let mut error = ValidationError::new("max");
                    error.message = Some("O valor total excede o máximo permitido".into());
                    error
                })?
            }
            None => self.valor_total,
        };

        Ok(merged)
    }
}

/// Dados para inserir uma locação já validada
#[derive(Debug, Clone)]
pub struct NovaLocacao {
    pub cliente_id: DbId,
    pub veiculo_id: DbId,
    pub data_locacao: NaiveDate,
    pub data_entrega: NaiveDate,
    pub valor_diaria: Decimal,
    pub valor_total: Decimal,
    pub valor_caucao: Decimal,
    pub valor_seguro: Decimal,
    pub status: LocacaoStatus,
    pub observacoes: Option<String>,
}

impl NovaLocacao {
    pub fn periodo(&self) -> Periodo {
        Periodo::new(self.data_locacao, self.data_entrega)
    }
}

/// Atualização parcial: só os campos `Some` são aplicados.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AtualizarLocacao {
    pub cliente_id: Option<DbId>,
    pub veiculo_id: Option<DbId>,
    pub data_locacao: Option<NaiveDate>,
    pub data_entrega: Option<NaiveDate>,
    pub valor_diaria: Option<Decimal>,
    pub valor_total: Option<Decimal>,
    pub valor_caucao: Option<Decimal>,
    pub valor_seguro: Option<Decimal>,
    pub status: Option<LocacaoStatus>,
    pub observacoes: Option<String>,
}

impl AtualizarLocacao {
    pub fn is_empty(&self) -> bool {
        *self == AtualizarLocacao::default()
    }
}

/// Linha da listagem, com nome do cliente e descrição do veículo
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LocacaoResumo {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub locacao: Locacao,
    pub cliente_nome: String,
    pub veiculo_info: String,
}

/// Filtros da listagem de locações
#[derive(Debug, Clone, Default)]
pub struct LocacaoFiltro {
    pub status: Option<LocacaoStatus>,
    pub search: Option<String>,
}

impl LocacaoFiltro {
    /// Termo de busca normalizado; vazio conta como ausente
    pub fn termo(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dia(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn locacao() -> Locacao {
        Locacao {
            id: 1,
            cliente_id: 1,
            veiculo_id: 101,
            data_locacao: dia(1),
            data_entrega: dia(10),
            valor_diaria: Decimal::new(100, 0),
            valor_total: Decimal::new(1000, 0),
            valor_caucao: Decimal::ZERO,
            valor_seguro: Decimal::ZERO,
            status: LocacaoStatus::Ativa,
            observacoes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_sobreposicao_inclusiva() {
        let a = Periodo::new(dia(1), dia(10));
        assert!(a.sobrepoe(&Periodo::new(dia(10), dia(15))));
        assert!(a.sobrepoe(&Periodo::new(dia(3), dia(4))));
        assert!(Periodo::new(dia(3), dia(4)).sobrepoe(&a));
        assert!(!a.sobrepoe(&Periodo::new(dia(11), dia(15))));
    }

    #[test]
    fn test_diarias_minimo_um() {
        assert_eq!(Periodo::new(dia(1), dia(1)).diarias(), 1);
        assert_eq!(Periodo::new(dia(1), dia(10)).diarias(), 9);
    }

    #[test]
    fn test_aplicar_so_observacoes_nao_altera_resto() {
        let atual = locacao();
        let patch = AtualizarLocacao {
            observacoes: Some("cliente pediu cadeirinha".into()),
            ..Default::default()
        };
        let merged = atual.aplicar(&patch).unwrap();
        assert_eq!(merged.observacoes.as_deref(), Some("cliente pediu cadeirinha"));
        assert_eq!(
            Locacao { observacoes: None, ..merged },
            atual
        );
    }

    #[test]
    fn test_aplicar_recalcula_total_quando_datas_mudam() {
        let patch = AtualizarLocacao {
            data_entrega: Some(dia(6)),
            ..Default::default()
        };
        let merged = locacao().aplicar(&patch).unwrap();
        assert_eq!(merged.valor_total, Decimal::new(500, 0));
    }

    #[test]
    fn test_aplicar_respeita_total_informado() {
        let patch = AtualizarLocacao {
            valor_diaria: Some(Decimal::new(120, 0)),
            valor_total: Some(Decimal::new(999, 0)),
            ..Default::default()
        };
        let merged = locacao().aplicar(&patch).unwrap();
        assert_eq!(merged.valor_total, Decimal::new(999, 0));
    }

    #[test]
    fn test_aplicar_rejeita_total_que_estoura() {
        let patch = AtualizarLocacao {
            valor_diaria: Some(Decimal::from_str_exact("40000000000000000000000000000").unwrap()),
            ..Default::default()
        };
        let error = locacao().aplicar(&patch).unwrap_err();
        assert_eq!(error.code, "max");
    }

    #[test]
    fn test_patch_vazio() {
        assert!(AtualizarLocacao::default().is_empty());
        let patch = AtualizarLocacao {
            status: Some(LocacaoStatus::Finalizada),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
