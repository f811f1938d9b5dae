use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::models::movimentacao::{AtualizarMovimentacao, NovaMovimentacao, TipoMovimentacao};
use crate::models::DbId;
use crate::utils::validation::{validate_not_blank, validate_positive_decimal};

// Query string da listagem: ?locacao_id=
#[derive(Debug, Default, Deserialize)]
pub struct ListMovimentacoesQuery {
    pub locacao_id: Option<DbId>,
}

// Request para lançar uma movimentação avulsa
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMovimentacaoRequest {
    pub tipo: TipoMovimentacao,
    #[validate(custom = "validate_not_blank", length(max = 100))]
    pub categoria: String,
    #[validate(custom = "validate_not_blank", length(max = 500))]
    pub descricao: String,
    #[validate(custom = "validate_positive_decimal")]
    pub valor: Decimal,
    pub data_movimentacao: NaiveDate,
    #[validate(range(min = 1, message = "locacao_id inválido"))]
    pub locacao_id: Option<i64>,
    #[validate(range(min = 1, message = "cliente_id inválido"))]
    pub cliente_id: Option<i64>,
    #[validate(length(max = 2000))]
    pub observacoes: Option<String>,
}

impl From<CreateMovimentacaoRequest> for NovaMovimentacao {
    fn from(r: CreateMovimentacaoRequest) -> Self {
        NovaMovimentacao {
            tipo: r.tipo,
            categoria: r.categoria.trim().to_string(),
            descricao: r.descricao.trim().to_string(),
            valor: r.valor,
            data_movimentacao: r.data_movimentacao,
            locacao_id: r.locacao_id,
            cliente_id: r.cliente_id,
            observacoes: r.observacoes,
        }
    }
}

// Atualização parcial; `locacao_id` e campos desconhecidos são ignorados
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateMovimentacaoRequest {
    pub tipo: Option<TipoMovimentacao>,
    #[validate(custom = "validate_not_blank", length(max = 100))]
    pub categoria: Option<String>,
    #[validate(custom = "validate_not_blank", length(max = 500))]
    pub descricao: Option<String>,
    #[validate(custom = "validate_positive_decimal")]
    pub valor: Option<Decimal>,
    pub data_movimentacao: Option<NaiveDate>,
    #[validate(range(min = 1, message = "cliente_id inválido"))]
    pub cliente_id: Option<i64>,
    #[validate(length(max = 2000))]
    pub observacoes: Option<String>,
}

impl From<UpdateMovimentacaoRequest> for AtualizarMovimentacao {
    fn from(r: UpdateMovimentacaoRequest) -> Self {
        AtualizarMovimentacao {
            tipo: r.tipo,
            categoria: r.categoria,
            descricao: r.descricao,
            valor: r.valor,
            data_movimentacao: r.data_movimentacao,
            cliente_id: r.cliente_id,
            observacoes: r.observacoes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_request_despesa_sem_locacao() {
        let request: CreateMovimentacaoRequest = serde_json::from_value(json!({
            "tipo": "saida",
            "categoria": "manutencao",
            "descricao": "Troca de pastilhas",
            "valor": 380.5,
            "data_movimentacao": "2025-03-12"
        }))
        .unwrap();
        assert!(request.validate().is_ok());

        let nova = NovaMovimentacao::from(request);
        assert_eq!(nova.tipo, TipoMovimentacao::Saida);
        assert!(nova.locacao_id.is_none());
    }

    #[test]
    fn test_create_request_rejeita_campos_invalidos() {
        let request: CreateMovimentacaoRequest = serde_json::from_value(json!({
            "tipo": "entrada",
            "categoria": "  ",
            "descricao": "Multa",
            "valor": 0,
            "data_movimentacao": "2025-03-12",
            "cliente_id": 0
        }))
        .unwrap();
        let errors = request.validate().unwrap_err();
        let campos = errors.field_errors();
        assert!(campos.contains_key("categoria"));
        assert!(campos.contains_key("valor"));
        assert!(campos.contains_key("cliente_id"));
    }

    #[test]
    fn test_update_request_ignora_locacao_id() {
        let request: UpdateMovimentacaoRequest = serde_json::from_value(json!({
            "locacao_id": 5,
            "valor": 90
        }))
        .unwrap();
        let patch = AtualizarMovimentacao::from(request);
        assert_eq!(patch.valor, Some(Decimal::new(90, 0)));
        assert_eq!(
            AtualizarMovimentacao {
                valor: None,
                ..patch
            },
            AtualizarMovimentacao::default()
        );
    }
}
