use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::models::vistoria::{
    AtualizarVistoria, Avaria, Checklist, ChecklistPatch, NovaVistoria, TipoVistoria,
    VistoriaFiltro, VISTORIADOR_SISTEMA,
};
use crate::models::DbId;

// Request para registrar uma vistoria
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVistoriaRequest {
    #[validate(range(min = 1, message = "locacao_id inválido"))]
    pub locacao_id: Option<i64>,
    #[validate(range(min = 1, message = "veiculo_id inválido"))]
    pub veiculo_id: i64,
    #[validate(range(min = 1, message = "cliente_id inválido"))]
    pub cliente_id: i64,
    pub tipo_vistoria: TipoVistoria,
    pub data_vistoria: Option<DateTime<Utc>>,
    pub placa: Option<String>,
    pub modelo: Option<String>,
    pub cor: Option<String>,
    pub nome_condutor: Option<String>,
    pub rg_condutor: Option<String>,
    pub telefone_condutor: Option<String>,
    #[validate(range(min = 0, message = "quilometragem inválida"))]
    pub quilometragem: Option<i32>,
    pub nivel_combustivel: Option<String>,
    #[validate(length(max = 2000))]
    pub observacoes: Option<String>,
    #[serde(default)]
    pub avarias: Vec<Avaria>,
    #[serde(default)]
    pub fotos: Vec<String>,
    #[serde(flatten)]
    pub checklist: Checklist,
    pub assinatura_cliente: Option<String>,
    pub assinatura_vistoriador: Option<String>,
    pub nome_vistoriador: Option<String>,
}

impl CreateVistoriaRequest {
    pub fn into_nova(self, agora: DateTime<Utc>) -> NovaVistoria {
        let nome_vistoriador = self
            .nome_vistoriador
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| VISTORIADOR_SISTEMA.to_string());

        NovaVistoria {
            locacao_id: self.locacao_id,
            veiculo_id: self.veiculo_id,
            cliente_id: self.cliente_id,
            tipo_vistoria: self.tipo_vistoria,
            data_vistoria: self.data_vistoria.unwrap_or(agora),
            placa: self.placa,
            modelo: self.modelo,
            cor: self.cor,
            nome_condutor: self.nome_condutor,
            rg_condutor: self.rg_condutor,
            telefone_condutor: self.telefone_condutor,
            quilometragem: self.quilometragem,
            nivel_combustivel: self.nivel_combustivel,
            observacoes: self.observacoes,
            avarias: self.avarias,
            fotos: self.fotos,
            checklist: self.checklist,
            assinatura_cliente: self.assinatura_cliente,
            assinatura_vistoriador: self.assinatura_vistoriador,
            nome_vistoriador,
        }
    }
}

// Request para atualização parcial; o checklist vem aninhado em `checklist`
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateVistoriaRequest {
    #[validate(range(min = 1, message = "locacao_id inválido"))]
    pub locacao_id: Option<i64>,
    #[validate(range(min = 0, message = "quilometragem inválida"))]
    pub quilometragem: Option<i32>,
    pub nivel_combustivel: Option<String>,
    pub nome_condutor: Option<String>,
    #[validate(length(max = 2000))]
    pub observacoes: Option<String>,
    pub avarias: Option<Vec<Avaria>>,
    pub fotos: Option<Vec<String>>,
    pub checklist: Option<ChecklistPatch>,
    pub assinatura_cliente: Option<String>,
    pub assinatura_vistoriador: Option<String>,
    pub nome_vistoriador: Option<String>,
}

impl From<UpdateVistoriaRequest> for AtualizarVistoria {
    fn from(r: UpdateVistoriaRequest) -> Self {
        AtualizarVistoria {
            locacao_id: r.locacao_id,
            quilometragem: r.quilometragem,
            nivel_combustivel: r.nivel_combustivel,
            nome_condutor: r.nome_condutor,
            observacoes: r.observacoes,
            avarias: r.avarias,
            fotos: r.fotos,
            checklist: r.checklist,
            assinatura_cliente: r.assinatura_cliente,
            assinatura_vistoriador: r.assinatura_vistoriador,
            nome_vistoriador: r.nome_vistoriador,
        }
    }
}

// Query string da listagem
#[derive(Debug, Default, Deserialize)]
pub struct ListVistoriasQuery {
    pub locacao_id: Option<DbId>,
    pub veiculo_id: Option<DbId>,
    pub cliente_id: Option<DbId>,
    pub tipo_vistoria: Option<TipoVistoria>,
    #[serde(default)]
    pub pendentes: bool,
}

impl From<ListVistoriasQuery> for VistoriaFiltro {
    fn from(q: ListVistoriasQuery) -> Self {
        VistoriaFiltro {
            locacao_id: q.locacao_id,
            veiculo_id: q.veiculo_id,
            cliente_id: q.cliente_id,
            tipo_vistoria: q.tipo_vistoria,
            pendentes: q.pendentes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_request_checklist_plano_e_vistoriador_padrao() {
        let request: CreateVistoriaRequest = serde_json::from_value(json!({
            "veiculo_id": 101,
            "cliente_id": 1,
            "tipo_vistoria": "saida",
            "item_pneu": true,
            "item_extintor": true,
            "avarias": [{ "tipo": "risco", "x": 10.5, "y": 20.0 }],
            "nome_vistoriador": "   "
        }))
        .unwrap();
        assert!(request.validate().is_ok());

        let nova = request.into_nova(Utc::now());
        assert!(nova.checklist.item_pneu);
        assert!(nova.checklist.item_extintor);
        assert!(!nova.checklist.item_som);
        assert_eq!(nova.avarias.len(), 1);
        assert_eq!(nova.nome_vistoriador, VISTORIADOR_SISTEMA);
    }

    #[test]
    fn test_update_request_checklist_aninhado() {
        let request: UpdateVistoriaRequest = serde_json::from_value(json!({
            "nome_vistoriador": "Carlos",
            "checklist": { "item_som": false },
            "placa": "ignorada"
        }))
        .unwrap();
        let patch = AtualizarVistoria::from(request);
        assert_eq!(patch.nome_vistoriador.as_deref(), Some("Carlos"));
        assert_eq!(patch.checklist.unwrap().item_som, Some(false));
    }
}
