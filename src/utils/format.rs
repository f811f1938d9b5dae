//! Formatação pt-BR para moeda e datas (dados de contrato).

use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

const MESES: [&str; 12] = [
    "janeiro", "fevereiro", "março", "abril", "maio", "junho", "julho", "agosto", "setembro",
    "outubro", "novembro", "dezembro",
];

/// Formata um valor em reais: `R$ 1.234,56`.
pub fn formatar_moeda(valor: Decimal) -> String {
    let arredondado = valor
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .abs();
    let texto = format!("{:.2}", arredondado);
    let (inteiro, centavos) = texto.split_once('.').unwrap_or((texto.as_str(), "00"));

    let mut agrupado = String::with_capacity(inteiro.len() + inteiro.len() / 3);
    for (i, c) in inteiro.chars().enumerate() {
        if i > 0 && (inteiro.len() - i) % 3 == 0 {
            agrupado.push('.');
        }
        agrupado.push(c);
    }

    let sinal = if valor.is_sign_negative() && !arredondado.is_zero() { "-" } else { "" };
    format!("{}R$ {},{}", sinal, agrupado, centavos)
}

/// `dd/mm/aaaa`
pub fn formatar_data(data: NaiveDate) -> String {
    data.format("%d/%m/%Y").to_string()
}

/// `18 de outubro de 2026`
pub fn formatar_data_extenso(data: NaiveDate) -> String {
    format!(
        "{} de {} de {}",
        data.day(),
        MESES[data.month0() as usize],
        data.year()
    )
}
