//! 预测API模块
//! 把JSON请求体转换为领域类型

pub mod handlers;

use serde_json::Value;

use crate::api::response::ApiError;
use crate::api::validation::{FieldIssue, Loc, ObjectView, Validator};
use crate::types::{MovieFeatures, RatingPair, YEAR_MAX, YEAR_MIN};

/// 解析特征预测请求
pub fn parse_movie_features(body: &Value) -> Result<MovieFeatures, ApiError> {
    let mut validator = Validator::new();
    let object = match validator.object(body, vec![Loc::body()]) {
        Some(object) => object,
        None => return Err(validator.into_error()),
    };

    let title = validator.required_string(&object, "title");
    let genre = validator.required_string(&object, "genre");
    let year = validator.required_int(&object, "year", Some(YEAR_MIN), Some(YEAR_MAX));
    let budget = validator.optional_float(&object, "budget", Some(0.0));
    let runtime = validator.optional_int(&object, "runtime", Some(1));

    match (title, genre, year, budget, runtime) {
        (Some(title), Some(genre), Some(year), Some(budget), Some(runtime)) if validator.is_clean() => {
            Ok(MovieFeatures {
                title,
                genre,
                year,
                budget,
                runtime,
            })
        }
        _ => Err(validator.into_error()),
    }
}

/// 解析单个用户-电影预测请求
pub fn parse_rating_pair(body: &Value) -> Result<RatingPair, ApiError> {
    let mut validator = Validator::new();
    let object = match validator.object(body, vec![Loc::body()]) {
        Some(object) => object,
        None => return Err(validator.into_error()),
    };

    match pair_fields(&mut validator, &object) {
        Some(pair) if validator.is_clean() => Ok(pair),
        _ => Err(validator.into_error()),
    }
}

/// 解析批量预测请求 `{"pairs": [...]}`
pub fn parse_rating_batch(body: &Value) -> Result<Vec<RatingPair>, ApiError> {
    let mut validator = Validator::new();
    let object = match validator.object(body, vec![Loc::body()]) {
        Some(object) => object,
        None => return Err(validator.into_error()),
    };
    let items = match validator.required_array(&object, "pairs") {
        Some(items) => items,
        None => return Err(validator.into_error()),
    };
    if items.is_empty() {
        validator.push(FieldIssue::value_error(
            vec![Loc::body(), Loc::from("pairs")],
            "pairs list cannot be empty",
        ));
        return Err(validator.into_error());
    }

    let mut pairs = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let loc = vec![Loc::body(), Loc::from("pairs"), Loc::from(index)];
        if let Some(entry) = validator.object(item, loc) {
            if let Some(pair) = pair_fields(&mut validator, &entry) {
                pairs.push(pair);
            }
        }
    }

    if validator.is_clean() {
        Ok(pairs)
    } else {
        Err(validator.into_error())
    }
}

fn pair_fields(validator: &mut Validator, object: &ObjectView<'_>) -> Option<RatingPair> {
    let user_id = validator.required_id(object, "user_id");
    let movie_id = validator.required_id(object, "movie_id");
    Some(RatingPair::new(user_id?, movie_id?))
}
