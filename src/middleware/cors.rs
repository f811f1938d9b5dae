//! Middleware de CORS
//!
//! O back-office é servido a partir de outro domínio; todas as rotas
//! aceitam qualquer origem.

use tower_http::cors::CorsLayer;

pub fn cors_middleware() -> CorsLayer {
    CorsLayer::permissive()
}
