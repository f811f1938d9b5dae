//! Utilidades do sistema
//!
//! Este módulo contém utilidades para manejo de erros, validação
//! e formatação.

pub mod errors;
pub mod format;
pub mod validation;
