use crate::error::ConfigError;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 站点列表文件
    pub sites_file: String,
    /// 题目输出 JSON 文件
    pub output_json_file: String,
    /// 输出日志文件
    pub output_log_file: String,
    /// 同时抓取的站点数量
    pub max_concurrent_sites: usize,
    /// 两批站点之间的等待时间（秒）
    pub site_delay_secs: u64,
    /// 每次打开页面前的随机等待区间（毫秒）
    pub min_request_delay_ms: u64,
    pub max_request_delay_ms: u64,
    /// 等待正文容器出现的超时时间（秒）
    pub page_load_timeout_secs: u64,
    /// 浏览器调试端口；设置后连接已运行的浏览器，否则启动无头浏览器
    pub browser_debug_port: Option<u16>,
    /// 浏览器可执行文件路径（可选）
    pub chrome_executable: Option<String>,
    /// 是否调用 LLM 生成提示
    pub enable_hints: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    pub llm_max_tokens: u32,
    pub llm_temperature: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sites_file: "sites.toml".to_string(),
            output_json_file: "scraped_questions.json".to_string(),
            output_log_file: "output.txt".to_string(),
            max_concurrent_sites: 1,
            site_delay_secs: 5,
            min_request_delay_ms: 1000,
            max_request_delay_ms: 3000,
            page_load_timeout_secs: 10,
            browser_debug_port: None,
            chrome_executable: None,
            enable_hints: true,
            verbose_logging: false,
            llm_api_key: String::new(),
            llm_api_base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            llm_model_name: "gemini-2.0-flash".to_string(),
            llm_max_tokens: 500,
            llm_temperature: 0.7,
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            sites_file: std::env::var("SITES_FILE").unwrap_or(default.sites_file),
            output_json_file: std::env::var("OUTPUT_JSON_FILE").unwrap_or(default.output_json_file),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            max_concurrent_sites: env_parse("MAX_CONCURRENT_SITES")
                .unwrap_or(default.max_concurrent_sites),
            site_delay_secs: env_parse("SITE_DELAY_SECS").unwrap_or(default.site_delay_secs),
            min_request_delay_ms: env_parse("MIN_REQUEST_DELAY_MS")
                .unwrap_or(default.min_request_delay_ms),
            max_request_delay_ms: env_parse("MAX_REQUEST_DELAY_MS")
                .unwrap_or(default.max_request_delay_ms),
            page_load_timeout_secs: env_parse("PAGE_LOAD_TIMEOUT_SECS")
                .unwrap_or(default.page_load_timeout_secs),
            browser_debug_port: env_parse("BROWSER_DEBUG_PORT").or(default.browser_debug_port),
            chrome_executable: std::env::var("CHROME_EXECUTABLE")
                .ok()
                .or(default.chrome_executable),
            enable_hints: env_parse("ENABLE_HINTS").unwrap_or(default.enable_hints),
            verbose_logging: env_parse("VERBOSE_LOGGING").unwrap_or(default.verbose_logging),
            llm_api_key: std::env::var("LLM_API_KEY")
                .or_else(|_| std::env::var("GEMINI_API_KEY"))
                .unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            llm_max_tokens: env_parse("LLM_MAX_TOKENS").unwrap_or(default.llm_max_tokens),
            llm_temperature: env_parse("LLM_TEMPERATURE").unwrap_or(default.llm_temperature),
        }
    }

    /// 检查取值之间的约束
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrent_sites == 0 {
            return Err(ConfigError::invalid_value(
                "MAX_CONCURRENT_SITES",
                self.max_concurrent_sites,
                "必须大于 0",
            ));
        }
        if self.min_request_delay_ms > self.max_request_delay_ms {
            return Err(ConfigError::invalid_value(
                "MIN_REQUEST_DELAY_MS",
                self.min_request_delay_ms,
                format!("不能大于 MAX_REQUEST_DELAY_MS ({})", self.max_request_delay_ms),
            ));
        }
        if self.page_load_timeout_secs == 0 {
            return Err(ConfigError::invalid_value(
                "PAGE_LOAD_TIMEOUT_SECS",
                self.page_load_timeout_secs,
                "必须大于 0",
            ));
        }
        if !(0.0..=2.0).contains(&self.llm_temperature) {
            return Err(ConfigError::invalid_value(
                "LLM_TEMPERATURE",
                self.llm_temperature,
                "必须在 0.0 到 2.0 之间",
            ));
        }
        if self.enable_hints && self.llm_api_key.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "LLM_API_KEY",
                "",
                "启用提示生成时必须设置",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Config {
        Config {
            llm_api_key: "test-key".to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn default_with_key_is_valid() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn rejects_zero_concurrency() {
        let config = Config {
            max_concurrent_sites: 0,
            ..valid()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_inverted_delay_range() {
        let config = Config {
            min_request_delay_ms: 5000,
            max_request_delay_ms: 1000,
            ..valid()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_key_is_fine_when_hints_are_disabled() {
        let config = Config {
            enable_hints: false,
            ..Config::default()
        };
        assert!(config.validate().is_ok());
        assert!(Config::default().validate().is_err());
    }
}
