use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::models::locacao::{AtualizarLocacao, LocacaoFiltro, LocacaoStatus, NovaLocacao};
use crate::utils::errors::{bad_request_error, AppResult};
use crate::utils::validation::{
    validate_non_negative_decimal, validate_periodo, validate_positive_decimal,
};

// Request para criar uma locação
#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "validate_periodo_criacao", skip_on_field_errors = false))]
pub struct CreateLocacaoRequest {
    #[validate(range(min = 1, message = "cliente_id inválido"))]
    pub cliente_id: i64,
    #[validate(range(min = 1, message = "veiculo_id inválido"))]
    pub veiculo_id: i64,
    pub data_locacao: NaiveDate,
    pub data_entrega: NaiveDate,
    #[validate(custom = "validate_positive_decimal")]
    pub valor_diaria: Decimal,
    #[validate(custom = "validate_positive_decimal")]
    pub valor_total: Decimal,
    #[serde(default)]
    #[validate(custom = "validate_non_negative_decimal")]
    pub valor_caucao: Decimal,
    #[serde(default)]
    #[validate(custom = "validate_non_negative_decimal")]
    pub valor_seguro: Decimal,
    #[serde(default)]
    pub status: LocacaoStatus,
    #[validate(length(max = 2000))]
    pub observacoes: Option<String>,
}

fn validate_periodo_criacao(request: &CreateLocacaoRequest) -> Result<(), ValidationError> {
    validate_periodo(request.data_locacao, request.data_entrega)
}

impl From<CreateLocacaoRequest> for NovaLocacao {
    fn from(r: CreateLocacaoRequest) -> Self {
        NovaLocacao {
            cliente_id: r.cliente_id,
            veiculo_id: r.veiculo_id,
            data_locacao: r.data_locacao,
            data_entrega: r.data_entrega,
            valor_diaria: r.valor_diaria,
            valor_total: r.valor_total,
            valor_caucao: r.valor_caucao,
            valor_seguro: r.valor_seguro,
            status: r.status,
            observacoes: r.observacoes,
        }
    }
}

// Request para atualização parcial; campos fora desta lista são ignorados
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateLocacaoRequest {
    #[validate(range(min = 1, message = "cliente_id inválido"))]
    pub cliente_id: Option<i64>,
    #[validate(range(min = 1, message = "veiculo_id inválido"))]
    pub veiculo_id: Option<i64>,
    pub data_locacao: Option<NaiveDate>,
    pub data_entrega: Option<NaiveDate>,
    #[validate(custom = "validate_positive_decimal")]
    pub valor_diaria: Option<Decimal>,
    #[validate(custom = "validate_positive_decimal")]
    pub valor_total: Option<Decimal>,
    #[validate(custom = "validate_non_negative_decimal")]
    pub valor_caucao: Option<Decimal>,
    #[validate(custom = "validate_non_negative_decimal")]
    pub valor_seguro: Option<Decimal>,
    pub status: Option<LocacaoStatus>,
    #[validate(length(max = 2000))]
    pub observacoes: Option<String>,
}

impl From<UpdateLocacaoRequest> for AtualizarLocacao {
    fn from(r: UpdateLocacaoRequest) -> Self {
        AtualizarLocacao {
            cliente_id: r.cliente_id,
            veiculo_id: r.veiculo_id,
            data_locacao: r.data_locacao,
            data_entrega: r.data_entrega,
            valor_diaria: r.valor_diaria,
            valor_total: r.valor_total,
            valor_caucao: r.valor_caucao,
            valor_seguro: r.valor_seguro,
            status: r.status,
            observacoes: r.observacoes,
        }
    }
}

// Query string da listagem: ?status=&search=
#[derive(Debug, Default, Deserialize)]
pub struct ListLocacoesQuery {
    pub status: Option<String>,
    pub search: Option<String>,
}

impl ListLocacoesQuery {
    /// `status` vazio ou `todas` não filtra
    pub fn into_filtro(self) -> AppResult<LocacaoFiltro> {
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") | Some("todas") | Some("all") => None,
            Some("ativa") => Some(LocacaoStatus::Ativa),
            Some("finalizada") => Some(LocacaoStatus::Finalizada),
            Some("cancelada") => Some(LocacaoStatus::Cancelada),
            Some(outro) => {
                return Err(bad_request_error(&format!("Status inválido: {}", outro)));
            }
        };

        Ok(LocacaoFiltro {
            status,
            search: self.search,
        })
    }
}
