//! 模型文件序列化工具
//!
//! 按文件扩展名选择编码格式：`.json` 使用 JSON，`.msgpack`/`.mpk` 使用
//! MessagePack，其余一律使用 Bincode。

use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::Result;

/// 序列化格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerializationFormat {
    /// Bincode（二进制，高效）
    Bincode,
    /// JSON（文本，可读）
    Json,
    /// MessagePack（二进制，紧凑）
    MessagePack,
}

impl SerializationFormat {
    /// 根据文件扩展名推断格式
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        match extension.as_deref() {
            Some("json") => SerializationFormat::Json,
            Some("msgpack") | Some("mpk") => SerializationFormat::MessagePack,
            _ => SerializationFormat::Bincode,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SerializationFormat::Bincode => "bincode",
            SerializationFormat::Json => "json",
            SerializationFormat::MessagePack => "msgpack",
        }
    }
}

/// 序列化器
pub struct Serializer {
    format: SerializationFormat,
}

impl Serializer {
    /// 创建新的序列化器
    pub fn new(format: SerializationFormat) -> Self {
        Self { format }
    }

    /// 为给定路径创建序列化器
    pub fn for_path(path: &Path) -> Self {
        Self::new(SerializationFormat::from_path(path))
    }

    pub fn format(&self) -> SerializationFormat {
        self.format
    }

    /// 序列化数据
    pub fn serialize<T: Serialize>(&self, data: &T) -> Result<Vec<u8>> {
        match self.format {
            SerializationFormat::Bincode => bincode::serialize(data)
                .map_err(|e| crate::Error::serialization(format!("bincode encode failed: {}", e))),
            SerializationFormat::Json => serde_json::to_vec_pretty(data)
                .map_err(|e| crate::Error::serialization(format!("json encode failed: {}", e))),
            SerializationFormat::MessagePack => rmp_serde::to_vec_named(data)
                .map_err(|e| crate::Error::serialization(format!("msgpack encode failed: {}", e))),
        }
    }

    /// 反序列化数据
    pub fn deserialize<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T> {
        match self.format {
            SerializationFormat::Bincode => bincode::deserialize(data)
                .map_err(|e| crate::Error::serialization(format!("bincode decode failed: {}", e))),
            SerializationFormat::Json => serde_json::from_slice(data)
                .map_err(|e| crate::Error::serialization(format!("json decode failed: {}", e))),
            SerializationFormat::MessagePack => rmp_serde::from_slice(data)
                .map_err(|e| crate::Error::serialization(format!("msgpack decode failed: {}", e))),
        }
    }
}
