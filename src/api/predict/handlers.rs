//! 预测API HTTP处理器

use std::sync::Arc;

use actix_web::{web, HttpResponse};
use log::{debug, error, warn};

use crate::api::predict::{parse_movie_features, parse_rating_batch, parse_rating_pair};
use crate::api::response::{ApiError, BatchRatingResponse, FeatureRatingResponse, PairRatingResponse};
use crate::api::server::ApiServerState;
use crate::config::ServingMode;
use crate::error::ErrorClass;
use crate::Error;

/// 单条预测处理器，请求形态由部署模式决定
pub async fn predict_actix(
    state: web::Data<Arc<ApiServerState>>,
    body: web::Json<serde_json::Value>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();

    match state.mode() {
        ServingMode::Features => {
            let movie = parse_movie_features(&body).map_err(log_rejection)?;
            let prediction = state
                .service
                .predict_features(&movie)
                .map_err(log_failure)?;

            Ok(HttpResponse::Ok().json(FeatureRatingResponse {
                title: movie.title,
                predicted_rating: prediction.rating,
                confidence: prediction.confidence,
            }))
        }
        ServingMode::Pairs => {
            let pair = parse_rating_pair(&body).map_err(log_rejection)?;
            let rating = state
                .service
                .predict_pair(&pair.user_id, &pair.movie_id)
                .map_err(log_failure)?;

            Ok(HttpResponse::Ok().json(PairRatingResponse {
                user_id: pair.user_id,
                movie_id: pair.movie_id,
                predicted_rating: rating,
            }))
        }
    }
}

/// 批量预测处理器（仅 pairs 模式）
pub async fn predict_batch_actix(
    state: web::Data<Arc<ApiServerState>>,
    body: web::Json<serde_json::Value>,
) -> Result<HttpResponse, ApiError> {
    let pairs = parse_rating_batch(&body.into_inner()).map_err(log_rejection)?;
    debug!("Batch prediction request: count={}", pairs.len());

    let ratings = state.service.predict_batch(&pairs).map_err(log_failure)?;
    let predictions = pairs
        .into_iter()
        .zip(ratings)
        .map(|(pair, rating)| PairRatingResponse {
            user_id: pair.user_id,
            movie_id: pair.movie_id,
            predicted_rating: rating,
        })
        .collect();

    Ok(HttpResponse::Ok().json(BatchRatingResponse { predictions }))
}

fn log_rejection(err: ApiError) -> ApiError {
    debug!("Rejected prediction request: {}", err);
    err
}

fn log_failure(err: Error) -> ApiError {
    match err.class() {
        ErrorClass::Client => debug!("Rejected prediction request: {}", err),
        ErrorClass::Unavailable => warn!("Prediction requested without a model: {}", err),
        ErrorClass::Server => error!("Prediction failed: {}", err),
    }
    ApiError::Service(err)
}
