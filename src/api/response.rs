//! API响应模块
//! 定义各种API响应结构以及错误到HTTP状态码的映射

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};

use crate::api::validation::{FieldIssue, Loc};
use crate::error::ErrorClass;
use crate::Error;

/// 健康检查响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// 服务状态
    pub status: String,
    /// 版本信息
    pub version: String,
    /// 模型是否加载成功
    pub model_loaded: bool,
}

/// 特征预测响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureRatingResponse {
    pub title: String,
    /// 0-10 区间内的评分
    pub predicted_rating: f64,
    /// 最大类别概率，模型不支持时为 `null`
    pub confidence: Option<f64>,
}

/// 用户-电影预测响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairRatingResponse {
    pub user_id: String,
    pub movie_id: String,
    /// 1-5 区间内的评分，保留两位小数
    pub predicted_rating: f64,
}

/// 批量预测响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRatingResponse {
    pub predictions: Vec<PairRatingResponse>,
}

/// 错误响应体
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody<T: Serialize> {
    pub detail: T,
}

/// API错误
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 请求体校验失败
    #[error("request validation failed with {} issue(s)", .0.len())]
    Validation(Vec<FieldIssue>),

    /// 请求体超过大小限制
    #[error("{0}")]
    PayloadTooLarge(String),

    /// 服务层错误
    #[error(transparent)]
    Service(#[from] Error),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Service(err) => match err.class() {
                ErrorClass::Client => StatusCode::UNPROCESSABLE_ENTITY,
                ErrorClass::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
                ErrorClass::Server => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());
        match self {
            ApiError::Validation(issues) => response.json(ErrorBody { detail: issues }),
            ApiError::PayloadTooLarge(msg) => response.json(ErrorBody { detail: msg }),
            ApiError::Service(Error::InvalidInput(msg)) => response.json(ErrorBody {
                detail: vec![FieldIssue::value_error(vec![Loc::body()], msg)],
            }),
            ApiError::Service(Error::ModelUnavailable(msg)) => response.json(ErrorBody { detail: msg }),
            ApiError::Service(err) => response.json(ErrorBody {
                detail: err.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::Validation(vec![]).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::PayloadTooLarge("too big".to_string()).status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            ApiError::from(Error::invalid_input("year")).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::from(Error::model_unavailable("Model not available")).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::from(Error::inference("boom")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::from(Error::serialization("bad artifact")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_health_response_shape() {
        let health = HealthResponse {
            status: "ok".to_string(),
            version: "1.0.0".to_string(),
            model_loaded: false,
        };
        assert_eq!(
            serde_json::to_value(&health).unwrap(),
            serde_json::json!({"status": "ok", "version": "1.0.0", "model_loaded": false})
        );
    }

    #[test]
    fn test_missing_confidence_serializes_as_null() {
        let response = FeatureRatingResponse {
            title: "Up".to_string(),
            predicted_rating: 8.1,
            confidence: None,
        };
        let value = serde_json::to_value(&response).unwrap();
        assert!(value["confidence"].is_null());
    }
}
