//! 请求体字段校验
//!
//! 所有字段一次性校验完毕，违规项统一收集后以 422 返回，格式为
//! `{"detail": [{"type", "loc", "msg"}]}`。

use serde::Serialize;
use serde_json::{Map, Value};

use crate::api::response::ApiError;

/// 违规字段的位置片段
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Loc {
    Field(String),
    Index(usize),
}

impl Loc {
    pub fn body() -> Self {
        Loc::Field("body".to_string())
    }
}

impl From<&str> for Loc {
    fn from(field: &str) -> Self {
        Loc::Field(field.to_string())
    }
}

impl From<usize> for Loc {
    fn from(index: usize) -> Self {
        Loc::Index(index)
    }
}

/// 单个字段的校验错误
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldIssue {
    #[serde(rename = "type")]
    pub kind: String,
    pub loc: Vec<Loc>,
    pub msg: String,
}

impl FieldIssue {
    pub fn new(loc: Vec<Loc>, kind: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            loc,
            msg: msg.into(),
        }
    }

    /// 业务层校验失败（例如空ID）
    pub fn value_error(loc: Vec<Loc>, msg: impl AsRef<str>) -> Self {
        Self::new(loc, "value_error", format!("Value error, {}", msg.as_ref()))
    }
}

/// JSON对象视图，携带其在请求体中的位置
pub struct ObjectView<'a> {
    map: &'a Map<String, Value>,
    loc: Vec<Loc>,
}

impl<'a> ObjectView<'a> {
    fn field_loc(&self, field: &str) -> Vec<Loc> {
        let mut loc = self.loc.clone();
        loc.push(Loc::from(field));
        loc
    }

    /// 字段值；`null` 视为存在
    fn get(&self, field: &str) -> Option<&'a Value> {
        self.map.get(field)
    }
}

/// 校验器，收集所有违规项
#[derive(Debug, Default)]
pub struct Validator {
    issues: Vec<FieldIssue>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, issue: FieldIssue) {
        self.issues.push(issue);
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// 结束校验，返回收集到的错误
    pub fn into_error(self) -> ApiError {
        ApiError::Validation(self.issues)
    }

    /// 要求值为JSON对象
    pub fn object<'a>(&mut self, value: &'a Value, loc: Vec<Loc>) -> Option<ObjectView<'a>> {
        match value.as_object() {
            Some(map) => Some(ObjectView { map, loc }),
            None => {
                self.push(FieldIssue::new(loc, "dict_type", "Input should be a valid dictionary"));
                None
            }
        }
    }

    /// 必填字段，缺失时记录 `missing`
    fn required<'a>(&mut self, object: &ObjectView<'a>, field: &str) -> Option<&'a Value> {
        let value = object.get(field);
        if value.is_none() {
            self.push(FieldIssue::new(object.field_loc(field), "missing", "Field required"));
        }
        value
    }

    /// 必填字符串
    pub fn required_string(&mut self, object: &ObjectView<'_>, field: &str) -> Option<String> {
        let value = self.required(object, field)?;
        match value.as_str() {
            Some(s) => Some(s.to_string()),
            None => {
                self.push(FieldIssue::new(
                    object.field_loc(field),
                    "string_type",
                    "Input should be a valid string",
                ));
                None
            }
        }
    }

    /// 必填标识符：字符串或整数，去除空白后不能为空
    pub fn required_id(&mut self, object: &ObjectView<'_>, field: &str) -> Option<String> {
        let value = self.required(object, field)?;
        let id = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) if n.is_i64() || n.is_u64() => n.to_string(),
            _ => {
                self.push(FieldIssue::new(
                    object.field_loc(field),
                    "string_type",
                    "Input should be a valid string",
                ));
                return None;
            }
        };
        if id.trim().is_empty() {
            self.push(FieldIssue::value_error(
                object.field_loc(field),
                format!("{} cannot be empty", field),
            ));
            return None;
        }
        Some(id)
    }

    /// 必填整数，带可选上下界
    pub fn required_int(
        &mut self,
        object: &ObjectView<'_>,
        field: &str,
        min: Option<i64>,
        max: Option<i64>,
    ) -> Option<i64> {
        let value = self.required(object, field)?;
        self.int_value(object, field, value, min, max)
    }

    /// 可选整数；缺失或 `null` 返回 `Some(None)`，非法返回 `None`
    pub fn optional_int(
        &mut self,
        object: &ObjectView<'_>,
        field: &str,
        min: Option<i64>,
    ) -> Option<Option<i64>> {
        match object.get(field) {
            None | Some(Value::Null) => Some(None),
            Some(value) => self.int_value(object, field, value, min, None).map(Some),
        }
    }

    /// 可选浮点数；缺失或 `null` 返回 `Some(None)`，非法返回 `None`
    pub fn optional_float(
        &mut self,
        object: &ObjectView<'_>,
        field: &str,
        min: Option<f64>,
    ) -> Option<Option<f64>> {
        let value = match object.get(field) {
            None | Some(Value::Null) => return Some(None),
            Some(value) => value,
        };
        // Numeric strings such as "1e6" are a type error, not coerced
        let number = match value.as_f64() {
            Some(n) => n,
            None => {
                self.push(FieldIssue::new(
                    object.field_loc(field),
                    "float_type",
                    "Input should be a valid number",
                ));
                return None;
            }
        };
        if let Some(min) = min {
            if number < min {
                self.push(FieldIssue::new(
                    object.field_loc(field),
                    "greater_than_equal",
                    format!("Input should be greater than or equal to {}", min),
                ));
                return None;
            }
        }
        Some(Some(number))
    }

    /// 必填数组
    pub fn required_array<'a>(&mut self, object: &ObjectView<'a>, field: &str) -> Option<&'a Vec<Value>> {
        let value = self.required(object, field)?;
        match value.as_array() {
            Some(items) => Some(items),
            None => {
                self.push(FieldIssue::new(
                    object.field_loc(field),
                    "list_type",
                    "Input should be a valid list",
                ));
                None
            }
        }
    }

    fn int_value(
        &mut self,
        object: &ObjectView<'_>,
        field: &str,
        value: &Value,
        min: Option<i64>,
        max: Option<i64>,
    ) -> Option<i64> {
        // Whole floats such as 2020.0 are accepted as integers; numeric strings are not
        let number = value.as_i64().or_else(|| {
            value
                .as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        });
        let number = match number {
            Some(n) => n,
            None => {
                self.push(FieldIssue::new(
                    object.field_loc(field),
                    "int_type",
                    "Input should be a valid integer",
                ));
                return None;
            }
        };
        if let Some(min) = min {
            if number < min {
                self.push(FieldIssue::new(
                    object.field_loc(field),
                    "greater_than_equal",
                    format!("Input should be greater than or equal to {}", min),
                ));
                return None;
            }
        }
        if let Some(max) = max {
            if number > max {
                self.push(FieldIssue::new(
                    object.field_loc(field),
                    "less_than_equal",
                    format!("Input should be less than or equal to {}", max),
                ));
                return None;
            }
        }
        Some(number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn issues(validator: Validator) -> Vec<FieldIssue> {
        match validator.into_error() {
            ApiError::Validation(issues) => issues,
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_missing_and_wrong_types_are_all_reported() {
        let body = json!({"genre": 7, "year": "1999"});
        let mut validator = Validator::new();
        let object = validator.object(&body, vec![Loc::body()]).unwrap();

        assert!(validator.required_string(&object, "title").is_none());
        assert!(validator.required_string(&object, "genre").is_none());
        assert!(validator.required_int(&object, "year", Some(1888), Some(2100)).is_none());

        let issues = issues(validator);
        let kinds: Vec<&str> = issues.iter().map(|i| i.kind.as_str()).collect();
        assert_eq!(kinds, vec!["missing", "string_type", "int_type"]);
        assert_eq!(issues[0].loc, vec![Loc::body(), Loc::from("title")]);
    }

    #[test]
    fn test_int_bounds() {
        let body = json!({"low": 1800, "high": 2101, "ok": 2100, "whole": 1999.0, "frac": 1999.5});
        let mut validator = Validator::new();
        let object = validator.object(&body, vec![Loc::body()]).unwrap();

        assert_eq!(validator.required_int(&object, "ok", Some(1888), Some(2100)), Some(2100));
        assert_eq!(validator.required_int(&object, "whole", None, None), Some(1999));
        assert!(validator.is_clean());

        assert!(validator.required_int(&object, "low", Some(1888), Some(2100)).is_none());
        assert!(validator.required_int(&object, "high", Some(1888), Some(2100)).is_none());
        assert!(validator.required_int(&object, "frac", None, None).is_none());

        let kinds: Vec<String> = issues(validator).into_iter().map(|i| i.kind).collect();
        assert_eq!(kinds, vec!["greater_than_equal", "less_than_equal", "int_type"]);
    }

    #[test]
    fn test_optional_fields() {
        let body = json!({"budget": null, "runtime": 0, "bad": "x"});
        let mut validator = Validator::new();
        let object = validator.object(&body, vec![Loc::body()]).unwrap();

        assert_eq!(validator.optional_float(&object, "budget", Some(0.0)), Some(None));
        assert_eq!(validator.optional_float(&object, "absent", Some(0.0)), Some(None));
        assert!(validator.is_clean());
        assert_eq!(validator.optional_int(&object, "runtime", Some(1)), None);
        assert_eq!(validator.optional_float(&object, "bad", None), None);
        assert_eq!(issues(validator).len(), 2);
    }

    #[test]
    fn test_numeric_strings_are_type_errors() {
        let body = json!({"year": "2020", "budget": "1e6"});
        let mut validator = Validator::new();
        let object = validator.object(&body, vec![Loc::body()]).unwrap();

        assert!(validator.required_int(&object, "year", None, None).is_none());
        assert!(validator.optional_float(&object, "budget", Some(0.0)).is_none());

        let kinds: Vec<String> = issues(validator).into_iter().map(|i| i.kind).collect();
        assert_eq!(kinds, vec!["int_type", "float_type"]);
    }

    #[test]
    fn test_ids() {
        let body = json!({"user_id": 196, "movie_id": "  ", "other": null});
        let mut validator = Validator::new();
        let object = validator.object(&body, vec![Loc::body()]).unwrap();

        assert_eq!(validator.required_id(&object, "user_id"), Some("196".to_string()));
        assert_eq!(validator.required_id(&object, "movie_id"), None);
        assert_eq!(validator.required_id(&object, "other"), None);

        let issues = issues(validator);
        assert_eq!(issues[0].kind, "value_error");
        assert_eq!(issues[0].msg, "Value error, movie_id cannot be empty");
        assert_eq!(issues[1].kind, "string_type");
    }

    #[test]
    fn test_non_object_body() {
        let body = json!([1, 2, 3]);
        let mut validator = Validator::new();
        assert!(validator.object(&body, vec![Loc::body()]).is_none());
        assert_eq!(issues(validator)[0].kind, "dict_type");
    }

    #[test]
    fn test_loc_serializes_flat() {
        let issue = FieldIssue::new(
            vec![Loc::body(), Loc::from("pairs"), Loc::from(2usize), Loc::from("user_id")],
            "missing",
            "Field required",
        );
        assert_eq!(
            serde_json::to_value(&issue).unwrap(),
            json!({"type": "missing", "loc": ["body", "pairs", 2, "user_id"], "msg": "Field required"})
        );
    }
}
