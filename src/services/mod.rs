//! Serviços de domínio
//!
//! Regras do ciclo de vida das locações, conciliação do livro-caixa,
//! movimentações avulsas e vistorias. Os serviços são genéricos sobre o [`Store`](crate::repositories::Store).

pub mod conciliador_financeiro;
pub mod locacao_lifecycle;
pub mod movimentacao_service;
pub mod vistoria_service;

pub use conciliador_financeiro::{ConciliadorFinanceiro, EventoFinanceiro};
pub use locacao_lifecycle::LocacaoService;
pub use movimentacao_service::MovimentacaoService;
pub use vistoria_service::VistoriaService;
