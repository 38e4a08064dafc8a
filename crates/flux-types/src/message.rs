use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

/// 常用操作类型
pub const UPDATE_OPERATION: &str = "update";
pub const RESPONSE_OPERATION: &str = "response";

/// 消息头
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageHeader {
    pub id: Uuid,
    /// 回复消息时指向原消息 ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Uuid>,
    pub timestamp: i64,
    #[serde(default)]
    pub sync: bool,
}

/// 路由信息：谁发的、发给哪类资源、做什么操作
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageRoute {
    pub source: String,
    pub group: String,
    pub resource: String,
    pub operation: String,
}

/// 模块间传递的路由消息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub header: MessageHeader,
    pub router: MessageRoute,
    pub content: serde_json::Value,
}

impl Message {
    pub fn new() -> Self {
        Self {
            header: MessageHeader {
                id: Uuid::new_v4(),
                parent_id: None,
                timestamp: chrono::Utc::now().timestamp_millis(),
                sync: false,
            },
            router: MessageRoute::default(),
            content: serde_json::Value::Null,
        }
    }

    /// 构建针对 `parent` 的回复消息，沿用原路由
    pub fn new_response(parent: &Message) -> Self {
        let mut msg = Self::new();
        msg.header.parent_id = Some(parent.header.id);
        msg.router = MessageRoute {
            operation: RESPONSE_OPERATION.to_string(),
            ..parent.router.clone()
        };
        msg
    }

    /// 设置路由信息
    pub fn build_router(
        mut self,
        source: impl Into<String>,
        group: impl Into<String>,
        resource: impl Into<String>,
        operation: impl Into<String>,
    ) -> Self {
        self.router = MessageRoute {
            source: source.into(),
            group: group.into(),
            resource: resource.into(),
            operation: operation.into(),
        };
        self
    }

    pub fn fill_body(mut self, content: serde_json::Value) -> Self {
        self.content = content;
        self
    }

    /// 将任意可序列化对象写入消息体
    pub fn with_content<T: Serialize>(self, content: &T) -> Result<Self, serde_json::Error> {
        let value = serde_json::to_value(content)?;
        Ok(self.fill_body(value))
    }

    /// 反序列化消息体
    pub fn decode_content<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.content)
    }

    pub fn id(&self) -> Uuid {
        self.header.id
    }

    pub fn source(&self) -> &str {
        &self.router.source
    }

    pub fn group(&self) -> &str {
        &self.router.group
    }

    pub fn resource(&self) -> &str {
        &self.router.resource
    }

    pub fn operation(&self) -> &str {
        &self.router.operation
    }
}

impl Default for Message {
    fn default() -> Self {
        Self::new()
    }
}
