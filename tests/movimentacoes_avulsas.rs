//! Movimentações lançadas à mão: despesas e receitas fora do conciliador.

mod common;

use common::*;
use locadora_backend::models::movimentacao::{
    AtualizarMovimentacao, NovaMovimentacao, TipoMovimentacao, CATEGORIA_LOCACAO,
};
use locadora_backend::models::DbId;
use locadora_backend::utils::errors::AppError;

fn lancamento(tipo: TipoMovimentacao, categoria: &str, locacao_id: Option<DbId>) -> NovaMovimentacao {
    NovaMovimentacao {
        tipo,
        categoria: categoria.into(),
        descricao: format!("Lançamento de {}", categoria),
        valor: reais(150),
        data_movimentacao: dia(3, 5),
        locacao_id,
        cliente_id: None,
        observacoes: None,
    }
}

#[tokio::test]
async fn test_despesa_sem_locacao() {
    let store = seeded_store().await;
    let service = movimentacao_service(&store);

    let despesa = service
        .criar(lancamento(TipoMovimentacao::Saida, "combustivel", None))
        .await
        .unwrap();
    assert_eq!(despesa.tipo, TipoMovimentacao::Saida);
    assert!(despesa.locacao_id.is_none());

    let todas = service.listar(None).await.unwrap();
    assert_eq!(todas.len(), 1);
    assert_eq!(service.obter(despesa.id).await.unwrap(), despesa);
}

#[tokio::test]
async fn test_receita_automatica_nao_pode_ser_lancada_a_mao() {
    let store = seeded_store().await;
    let locacao = locacao_service(&store)
        .criar(nova_locacao(V101, 1, 10))
        .await
        .unwrap();
    let service = movimentacao_service(&store);

    let err = service
        .criar(lancamento(TipoMovimentacao::Entrada, CATEGORIA_LOCACAO, Some(locacao.id)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    assert_eq!(store.snapshot().await.movimentacoes_da_locacao(locacao.id).len(), 1);

    // Sem locação a categoria é livre
    service
        .criar(lancamento(TipoMovimentacao::Entrada, CATEGORIA_LOCACAO, None))
        .await
        .unwrap();

    let err = service
        .criar(lancamento(TipoMovimentacao::Saida, "lavagem", Some(999)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_despesa_da_locacao_sai_na_exclusao() {
    let store = seeded_store().await;
    let locacoes = locacao_service(&store);
    let locacao = locacoes.criar(nova_locacao(V101, 1, 10)).await.unwrap();

    let lavagem = movimentacao_service(&store)
        .criar(lancamento(TipoMovimentacao::Saida, "lavagem", Some(locacao.id)))
        .await
        .unwrap();
    assert_eq!(store.snapshot().await.movimentacoes_da_locacao(locacao.id).len(), 2);

    locacoes.excluir(locacao.id).await.unwrap();

    let state = store.snapshot().await;
    assert!(!state.movimentacoes.contains_key(&lavagem.id));
    assert!(state.movimentacoes.is_empty());
}

#[tokio::test]
async fn test_atualizar_movimentacao() {
    let store = seeded_store().await;
    let locacao = locacao_service(&store)
        .criar(nova_locacao(V101, 1, 10))
        .await
        .unwrap();
    let service = movimentacao_service(&store);

    let receita = store.snapshot().await.movimentacoes_da_locacao(locacao.id)[0].clone();

    // Vinculada a locação: valor muda, classificação não
    let err = service
        .atualizar(
            receita.id,
            AtualizarMovimentacao {
                categoria: Some("multa".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let corrigida = service
        .atualizar(
            receita.id,
            AtualizarMovimentacao {
                valor: Some(reais(950)),
                observacoes: Some("Desconto revertido".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(corrigida.valor, reais(950));
    assert_eq!(corrigida.categoria, CATEGORIA_LOCACAO);

    let avulsa = service
        .criar(lancamento(TipoMovimentacao::Saida, "pedagio", None))
        .await
        .unwrap();
    let reclassificada = service
        .atualizar(
            avulsa.id,
            AtualizarMovimentacao {
                tipo: Some(TipoMovimentacao::Entrada),
                categoria: Some("reembolso".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(reclassificada.tipo, TipoMovimentacao::Entrada);
    assert_eq!(reclassificada.locacao_id, None);

    let err = service
        .atualizar(avulsa.id, AtualizarMovimentacao::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = service
        .atualizar(
            avulsa.id,
            AtualizarMovimentacao {
                cliente_id: Some(999),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = service
        .atualizar(
            999,
            AtualizarMovimentacao {
                valor: Some(reais(1)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_excluir_movimentacao() {
    let store = seeded_store().await;
    let service = movimentacao_service(&store);

    let despesa = service
        .criar(lancamento(TipoMovimentacao::Saida, "seguro_frota", None))
        .await
        .unwrap();
    service.excluir(despesa.id).await.unwrap();
    assert!(store.snapshot().await.movimentacoes.is_empty());

    let err = service.excluir(despesa.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}
