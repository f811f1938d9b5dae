//! DTOs da API HTTP (requests, queries e o envelope de resposta)

pub mod api_response;
pub mod locacao_dto;
pub mod movimentacao_dto;
pub mod vistoria_dto;
