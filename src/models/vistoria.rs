//! Modelo de Vistoria
//!
//! Vistorias de saída (entrega do veículo ao cliente) e de entrada
//! (devolução). O checklist tem 13 itens, cada um em sua própria coluna.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{FromRow, Type};

use super::DbId;

/// Vistoriador sentinela: vistoria gerada pelo sistema, aguardando conclusão.
pub const VISTORIADOR_SISTEMA: &str = "Sistema";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "tipo_vistoria", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TipoVistoria {
    Entrada,
    Saida,
}

/// Itens ausentes no JSON valem `false`
#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow, PartialEq, Eq)]
#[serde(default)]
pub struct Checklist {
    pub item_calota: bool,
    pub item_pneu: bool,
    pub item_antena: bool,
    pub item_bateria: bool,
    pub item_estepe: bool,
    pub item_macaco: bool,
    pub item_chave_roda: bool,
    pub item_triangulo: bool,
    pub item_extintor: bool,
    pub item_tapetes: bool,
    pub item_som: bool,
    pub item_documentos: bool,
    pub item_higienizacao: bool,
}

/// Atualização item a item do checklist
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChecklistPatch {
    pub item_calota: Option<bool>,
    pub item_pneu: Option<bool>,
    pub item_antena: Option<bool>,
    pub item_bateria: Option<bool>,
    pub item_estepe: Option<bool>,
    pub item_macaco: Option<bool>,
    pub item_chave_roda: Option<bool>,
    pub item_triangulo: Option<bool>,
    pub item_extintor: Option<bool>,
    pub item_tapetes: Option<bool>,
    pub item_som: Option<bool>,
    pub item_documentos: Option<bool>,
    pub item_higienizacao: Option<bool>,
}

impl Checklist {
    pub fn aplicar(&mut self, patch: &ChecklistPatch) {
        let pares: [(&mut bool, Option<bool>); 13] = [
            (&mut self.item_calota, patch.item_calota),
            (&mut self.item_pneu, patch.item_pneu),
            (&mut self.item_antena, patch.item_antena),
            (&mut self.item_bateria, patch.item_bateria),
            (&mut self.item_estepe, patch.item_estepe),
            (&mut self.item_macaco, patch.item_macaco),
            (&mut self.item_chave_roda, patch.item_chave_roda),
            (&mut self.item_triangulo, patch.item_triangulo),
            (&mut self.item_extintor, patch.item_extintor),
            (&mut self.item_tapetes, patch.item_tapetes),
            (&mut self.item_som, patch.item_som),
            (&mut self.item_documentos, patch.item_documentos),
            (&mut self.item_higienizacao, patch.item_higienizacao),
        ];
        for (campo, valor) in pares {
            if let Some(v) = valor {
                *campo = v;
            }
        }
    }
}

/// Avaria marcada no mapa do veículo (coordenadas relativas ao desenho)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Avaria {
    pub tipo: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Vistoria {
    pub id: DbId,
    pub locacao_id: Option<DbId>,
    pub veiculo_id: DbId,
    pub cliente_id: DbId,
    pub tipo_vistoria: TipoVistoria,
    pub data_vistoria: DateTime<Utc>,
    pub placa: Option<String>,
    pub modelo: Option<String>,
    pub cor: Option<String>,
    pub nome_condutor: Option<String>,
    pub rg_condutor: Option<String>,
    pub telefone_condutor: Option<String>,
    pub quilometragem: Option<i32>,
    pub nivel_combustivel: Option<String>,
    pub observacoes: Option<String>,
    pub avarias: Json<Vec<Avaria>>,
    pub fotos: Json<Vec<String>>,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub checklist: Checklist,
    pub assinatura_cliente: Option<String>,
    pub assinatura_vistoriador: Option<String>,
    pub nome_vistoriador: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vistoria {
    pub fn is_pendente(&self) -> bool {
        is_vistoriador_pendente(&self.nome_vistoriador)
    }

    /// Vistoria de entrada pendente copiada desta vistoria de saída.
    pub fn entrada_pendente(&self, agora: DateTime<Utc>) -> NovaVistoria {
        NovaVistoria {
            locacao_id: self.locacao_id,
            veiculo_id: self.veiculo_id,
            cliente_id: self.cliente_id,
            tipo_vistoria: TipoVistoria::Entrada,
            data_vistoria: agora,
            placa: self.placa.clone(),
            modelo: self.modelo.clone(),
            cor: self.cor.clone(),
            nome_condutor: self.nome_condutor.clone(),
            rg_condutor: self.rg_condutor.clone(),
            telefone_condutor: self.telefone_condutor.clone(),
            quilometragem: self.quilometragem,
            nivel_combustivel: self.nivel_combustivel.clone(),
            observacoes: self.observacoes.clone(),
            avarias: self.avarias.0.clone(),
            fotos: self.fotos.0.clone(),
            checklist: self.checklist.clone(),
            assinatura_cliente: None,
            assinatura_vistoriador: None,
            nome_vistoriador: VISTORIADOR_SISTEMA.to_string(),
        }
    }
}

/// Sentinela ou nome em branco: a vistoria ainda não tem vistoriador real.
pub fn is_vistoriador_pendente(nome: &str) -> bool {
    let nome = nome.trim();
    nome.is_empty() || nome == VISTORIADOR_SISTEMA
}

#[derive(Debug, Clone, PartialEq)]
pub struct NovaVistoria {
    pub locacao_id: Option<DbId>,
    pub veiculo_id: DbId,
    pub cliente_id: DbId,
    pub tipo_vistoria: TipoVistoria,
    pub data_vistoria: DateTime<Utc>,
    pub placa: Option<String>,
    pub modelo: Option<String>,
    pub cor: Option<String>,
    pub nome_condutor: Option<String>,
    pub rg_condutor: Option<String>,
    pub telefone_condutor: Option<String>,
    pub quilometragem: Option<i32>,
    pub nivel_combustivel: Option<String>,
    pub observacoes: Option<String>,
    pub avarias: Vec<Avaria>,
    pub fotos: Vec<String>,
    pub checklist: Checklist,
    pub assinatura_cliente: Option<String>,
    pub assinatura_vistoriador: Option<String>,
    pub nome_vistoriador: String,
}

/// Atualização parcial de vistoria (campos fora desta lista são ignorados)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AtualizarVistoria {
    pub locacao_id: Option<DbId>,
    pub quilometragem: Option<i32>,
    pub nivel_combustivel: Option<String>,
    pub nome_condutor: Option<String>,
    pub observacoes: Option<String>,
    pub avarias: Option<Vec<Avaria>>,
    pub fotos: Option<Vec<String>>,
    pub checklist: Option<ChecklistPatch>,
    pub assinatura_cliente: Option<String>,
    pub assinatura_vistoriador: Option<String>,
    pub nome_vistoriador: Option<String>,
}

impl Vistoria {
    pub fn aplicar(&self, patch: &AtualizarVistoria, agora: DateTime<Utc>) -> Vistoria {
        let mut v = self.clone();
        if patch.locacao_id.is_some() {
            v.locacao_id = patch.locacao_id;
        }
        if patch.quilometragem.is_some() {
            v.quilometragem = patch.quilometragem;
        }
        if let Some(x) = &patch.nivel_combustivel {
            v.nivel_combustivel = Some(x.clone());
        }
        if let Some(x) = &patch.nome_condutor {
            v.nome_condutor = Some(x.clone());
        }
        if let Some(x) = &patch.observacoes {
            v.observacoes = Some(x.clone());
        }
        if let Some(x) = &patch.avarias {
            v.avarias = Json(x.clone());
        }
        if let Some(x) = &patch.fotos {
            v.fotos = Json(x.clone());
        }
        if let Some(x) = &patch.checklist {
            v.checklist.aplicar(x);
        }
        if let Some(x) = &patch.assinatura_cliente {
            v.assinatura_cliente = Some(x.clone());
        }
        if let Some(x) = &patch.assinatura_vistoriador {
            v.assinatura_vistoriador = Some(x.clone());
        }
        if let Some(x) = &patch.nome_vistoriador {
            v.nome_vistoriador = x.clone();
        }
        v.updated_at = agora;
        v
    }
}

/// Filtros da listagem de vistorias
#[derive(Debug, Clone, Default)]
pub struct VistoriaFiltro {
    pub locacao_id: Option<DbId>,
    pub veiculo_id: Option<DbId>,
    pub cliente_id: Option<DbId>,
    pub tipo_vistoria: Option<TipoVistoria>,
    pub pendentes: bool,
}

impl VistoriaFiltro {
    pub fn aceita(&self, v: &Vistoria) -> bool {
        self.locacao_id.map_or(true, |id| v.locacao_id == Some(id))
            && self.veiculo_id.map_or(true, |id| v.veiculo_id == id)
            && self.cliente_id.map_or(true, |id| v.cliente_id == id)
            && self.tipo_vistoria.map_or(true, |t| v.tipo_vistoria == t)
            && (!self.pendentes || v.nome_vistoriador == VISTORIADOR_SISTEMA)
    }
}
