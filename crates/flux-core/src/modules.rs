//! 模块名称与路由分组常量

/// 路由模块（规则准入与状态回传）
pub const ROUTER_MODULE_NAME: &str = "router";

/// 负责处理规则状态更新的协调模块
pub const EDGE_CONTROLLER_MODULE_NAME: &str = "edgecontroller";

/// 资源类消息分组
pub const GROUP_RESOURCE: &str = "resource";
