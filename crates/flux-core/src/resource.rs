use crate::error::{FluxError, Result};

/// 资源路径分隔符
pub const RESOURCE_SEP: char = '/';

/// 规则执行状态
pub const RESOURCE_TYPE_RULE_STATUS: &str = "rulestatus";

/// 路由资源的各组成部分
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterResource {
    pub project_id: String,
    pub resource_type: String,
    pub resource_id: String,
}

/// 构建路由资源：`<project_id>/<resource_type>/<resource_id>`
pub fn build_resource_for_router(
    project_id: &str,
    resource_type: &str,
    resource_id: &str,
) -> Result<String> {
    for (field, value) in [
        ("project id", project_id),
        ("resource type", resource_type),
        ("resource id", resource_id),
    ] {
        if value.is_empty() {
            return Err(FluxError::InvalidResource(format!(
                "required parameter is not set ({})",
                field
            )));
        }
        if value.contains(RESOURCE_SEP) {
            return Err(FluxError::InvalidResource(format!(
                "{} {:?} must not contain {:?}",
                field, value, RESOURCE_SEP
            )));
        }
    }

    Ok(format!(
        "{}{sep}{}{sep}{}",
        project_id,
        resource_type,
        resource_id,
        sep = RESOURCE_SEP
    ))
}

/// 解析路由资源，供接收方还原 project/rule
pub fn parse_router_resource(resource: &str) -> Result<RouterResource> {
    let parts: Vec<&str> = resource.split(RESOURCE_SEP).collect();
    match parts.as_slice() {
        [project_id, resource_type, resource_id]
            if !project_id.is_empty() && !resource_type.is_empty() && !resource_id.is_empty() =>
        {
            Ok(RouterResource {
                project_id: project_id.to_string(),
                resource_type: resource_type.to_string(),
                resource_id: resource_id.to_string(),
            })
        }
        _ => Err(FluxError::InvalidResource(format!(
            "malformed router resource: {}",
            resource
        ))),
    }
}
