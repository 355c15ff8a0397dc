//! API服务器状态管理
//! 提供API服务器的状态结构

use std::sync::Arc;

use crate::config::{AppConfig, ServingMode};
use crate::service::PredictionService;

/// API服务器状态
/// 所有工作线程共享同一个只读的预测服务
#[derive(Clone)]
pub struct ApiServerState {
    /// 预测服务
    pub service: Arc<PredictionService>,
    /// 应用元数据（名称、版本）
    pub app: AppConfig,
}

impl ApiServerState {
    /// 创建新的API服务器状态
    pub fn new(service: PredictionService, app: AppConfig) -> Self {
        Self {
            service: Arc::new(service),
            app,
        }
    }

    /// 当前部署服务的请求形态
    pub fn mode(&self) -> ServingMode {
        self.service.mode()
    }

    /// 检查模型是否已加载
    pub fn is_model_loaded(&self) -> bool {
        self.service.is_model_loaded()
    }
}
