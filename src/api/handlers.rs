//! API request handlers

use std::sync::Arc;

use actix_web::error::JsonPayloadError;
use actix_web::{web, HttpRequest, HttpResponse};
use log::debug;

use crate::api::predict;
use crate::api::response::{ApiError, HealthResponse};
use crate::api::server::ApiServerState;
use crate::api::validation::{FieldIssue, Loc};
use crate::config::{Config, ServingMode};
use crate::model::ModelHandle;
use crate::service::PredictionService;

/// 配置所有API路由
///
/// 批量接口只在 `pairs` 模式下注册。
pub fn configure_routes(cfg: &mut web::ServiceConfig, mode: ServingMode) {
    cfg.app_data(json_config())
        .route("/health", web::get().to(health_check))
        .route("/predict", web::post().to(predict::handlers::predict_actix));

    if mode == ServingMode::Pairs {
        cfg.route("/predict/batch", web::post().to(predict::handlers::predict_batch_actix));
    }
}

/// 请求体大小上限（字节）
pub const JSON_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// JSON解析失败（格式错误、Content-Type 不对）同样按 422 返回；
/// 超出大小限制返回 413
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_BODY_LIMIT)
        .error_handler(|err, _req: &HttpRequest| {
            debug!("Rejected request body: {}", err);
            match err {
                JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
                    ApiError::PayloadTooLarge(format!(
                        "Request body exceeds {} bytes",
                        JSON_BODY_LIMIT
                    ))
                    .into()
                }
                err => ApiError::Validation(vec![FieldIssue::new(
                    vec![Loc::body()],
                    "json_invalid",
                    format!("JSON decode error: {}", err),
                )])
                .into(),
            }
        })
}

/// 健康检查处理器
async fn health_check(state: web::Data<Arc<ApiServerState>>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        version: state.app.version.clone(),
        model_loaded: state.is_model_loaded(),
    })
}

/// 初始化API服务器状态
/// 在 main.rs 中调用：加载模型并构建共享的预测服务
pub fn init_api_server_state(config: &Config) -> Arc<ApiServerState> {
    let handle = ModelHandle::load(&config.model.path, config.model.mode);
    let service = PredictionService::new(handle, config.model.mode);
    Arc::new(ApiServerState::new(service, config.app.clone()))
}
