use serde::{Deserialize, Serialize};

use crate::service::{GroupingPolicy, TimelineMode};

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub source: SourceConfig,
    pub normalizer: NormalizerConfig,
    pub orders: OrdersConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// 采购单表格数据源 (CSV 文件)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub path: String,
    pub has_header: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// 金额字段前缀, 解析前去除
    pub currency_prefix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrdersConfig {
    pub grouping: GroupingPolicy,
    pub timeline: TimelineMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// 未显式指定操作人时使用 (如驳回)
    pub actor: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            source: SourceConfig {
                path: "data/purchase_orders.csv".to_string(),
                has_header: true,
            },
            normalizer: NormalizerConfig {
                currency_prefix: "Rp".to_string(),
            },
            orders: OrdersConfig {
                grouping: GroupingPolicy::FirstLineWins,
                timeline: TimelineMode::Derived,
            },
            session: SessionConfig {
                actor: "Manager".to_string(),
            },
        }
    }
}

impl AppConfig {
    /// 加载配置: 默认值 -> 可选配置文件 purchase-settlement.* -> PO_ 前缀环境变量
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let defaults = Self::default();
        ::config::Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", defaults.server.port as i64)?
            .set_default("source.path", defaults.source.path)?
            .set_default("source.has_header", defaults.source.has_header)?
            .set_default("normalizer.currency_prefix", defaults.normalizer.currency_prefix)?
            .set_default("orders.grouping", "first_line_wins")?
            .set_default("orders.timeline", "derived")?
            .set_default("session.actor", defaults.session.actor)?
            .add_source(::config::File::with_name("purchase-settlement").required(false))
            .add_source(
                ::config::Environment::with_prefix("PO")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.normalizer.currency_prefix, "Rp");
        assert_eq!(config.orders.grouping, GroupingPolicy::FirstLineWins);
        assert_eq!(config.orders.timeline, TimelineMode::Derived);
        assert!(config.source.has_header);
    }

    #[test]
    fn environment_overrides_use_single_underscore_prefix() {
        std::env::set_var("PO_SERVER__PORT", "9000");
        std::env::set_var("PO_SESSION__ACTOR", "Budi");
        std::env::set_var("PO_ORDERS__TIMELINE", "recorded");
        let config = AppConfig::load();
        std::env::remove_var("PO_SERVER__PORT");
        std::env::remove_var("PO_SESSION__ACTOR");
        std::env::remove_var("PO_ORDERS__TIMELINE");

        let config = config.unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.session.actor, "Budi");
        assert_eq!(config.orders.timeline, TimelineMode::Recorded);
        assert_eq!(config.server.host, "127.0.0.1");
    }
}
