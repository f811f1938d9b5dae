//! Dados do contrato de locação, já formatados para impressão

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::cliente::Cliente;
use super::locacao::Locacao;
use super::veiculo::Veiculo;
use super::DbId;
use crate::utils::format::{formatar_data, formatar_data_extenso, formatar_moeda};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ContratoData {
    pub locacao_id: DbId,
    pub cliente_nome: String,
    pub cliente_cpf: String,
    pub cliente_endereco: String,
    pub cliente_celular: String,
    pub cliente_email: String,
    pub veiculo_marca: String,
    pub veiculo_modelo: String,
    pub veiculo_ano: i32,
    pub veiculo_placa: String,
    pub veiculo_cor: Option<String>,
    pub data_locacao: String,
    pub data_entrega: String,
    pub valor_diaria: String,
    pub valor_total: String,
    pub valor_caucao: String,
    pub valor_seguro: String,
    pub data_atual: String,
    pub observacoes: Option<String>,
}

impl ContratoData {
    pub fn montar(locacao: &Locacao, cliente: &Cliente, veiculo: &Veiculo, hoje: NaiveDate) -> Self {
        Self {
            locacao_id: locacao.id,
            cliente_nome: cliente.nome.clone(),
            cliente_cpf: cliente.cpf.clone(),
            cliente_endereco: cliente.endereco_completo(),
            cliente_celular: cliente.celular.clone(),
            cliente_email: cliente.email.clone(),
            veiculo_marca: veiculo.marca.clone(),
            veiculo_modelo: veiculo.modelo.clone(),
            veiculo_ano: veiculo.ano,
            veiculo_placa: veiculo.placa.clone(),
            veiculo_cor: veiculo.cor.clone(),
            data_locacao: formatar_data(locacao.data_locacao),
            data_entrega: formatar_data(locacao.data_entrega),
            valor_diaria: formatar_moeda(locacao.valor_diaria),
            valor_total: formatar_moeda(locacao.valor_total),
            valor_caucao: formatar_caucao(locacao.valor_caucao),
            valor_seguro: formatar_moeda(locacao.valor_seguro),
            data_atual: formatar_data_extenso(hoje),
            observacoes: locacao.observacoes.clone(),
        }
    }
}

fn formatar_caucao(valor: Decimal) -> String {
    if valor.is_zero() {
        "ISENTO".to_string()
    } else {
        formatar_moeda(valor)
    }
}
