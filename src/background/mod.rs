//! Jobs em segundo plano

pub mod finalizar_locacoes;
