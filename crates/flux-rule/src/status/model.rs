use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const STATUS_SUCCESS: &str = "SUCCESS";
pub const STATUS_FAIL: &str = "FAIL";

/// 一次规则执行的结果，由执行引擎产生
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecResult {
    #[serde(rename = "RuleID")]
    pub rule_id: String,
    /// 路由用的项目（命名空间）标识
    #[serde(rename = "ProjectID")]
    pub project_id: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Error", default)]
    pub error: ErrorMsg,
}

/// 执行失败详情
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorMsg {
    #[serde(rename = "Detail", default)]
    pub detail: String,
    #[serde(rename = "Timestamp", default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl ExecResult {
    pub fn success(project_id: impl Into<String>, rule_id: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.into(),
            project_id: project_id.into(),
            status: STATUS_SUCCESS.to_string(),
            error: ErrorMsg::default(),
        }
    }

    pub fn failure(
        project_id: impl Into<String>,
        rule_id: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            project_id: project_id.into(),
            status: STATUS_FAIL.to_string(),
            error: ErrorMsg {
                detail: detail.into(),
                timestamp: Some(Utc::now()),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }
}
