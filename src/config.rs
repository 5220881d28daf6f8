/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 后端 API 地址（生成服务 / 蓝图存储 / 试卷分区）
    pub api_base_url: String,
    /// 登录后获得的访问令牌（OTP 登录流程不在本程序内）
    pub api_token: String,
    /// 待处理的试卷方案（TOML）目录
    pub plan_folder: String,
    /// 同时处理的方案数量
    pub max_concurrent_plans: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
    /// 只生成请求，不调用生成服务
    pub dry_run: bool,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080/api".to_string(),
            api_token: String::new(),
            plan_folder: "plans".to_string(),
            max_concurrent_plans: 4,
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
            dry_run: false,
            request_timeout_secs: 120,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            api_base_url: std::env::var("API_BASE_URL").unwrap_or(default.api_base_url),
            api_token: std::env::var("API_TOKEN").unwrap_or(default.api_token),
            plan_folder: std::env::var("PLAN_FOLDER").unwrap_or(default.plan_folder),
            max_concurrent_plans: std::env::var("MAX_CONCURRENT_PLANS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_concurrent_plans),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            dry_run: std::env::var("DRY_RUN").ok().and_then(|v| v.parse().ok()).unwrap_or(default.dry_run),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_secs),
        }
    }
}
