//! Controllers: validam os DTOs, chamam os serviços e montam o envelope

pub mod cron_controller;
pub mod locacao_controller;
pub mod movimentacao_controller;
pub mod vistoria_controller;
