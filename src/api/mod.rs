//! HTTP API module
//!
//! This module exposes the health check and prediction endpoints.

pub mod handlers;

// 预测API模块
pub mod predict;

// API响应类型
pub mod response;

// API服务器状态
pub mod server;

// 请求体校验
pub mod validation;


// 重新导出常用类型
pub use handlers::{configure_routes, init_api_server_state, json_config};
pub use response::ApiError;
pub use server::ApiServerState;
