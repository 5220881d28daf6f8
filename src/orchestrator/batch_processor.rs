//! 批量方案处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量方案的处理和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：日志文件、HTTP 客户端
//! 2. **批量加载**：扫描并加载所有待处理的方案（`Vec<ExamPlan>`）
//! 3. **并发控制**：使用 Semaphore 限制并发数量
//! 4. **分批处理**：将方案分批次处理，每批完成后再开始下一批
//! 5. **全局统计**：汇总所有方案的处理结果
//!
//! 每个任务拥有自己的 `ConfigSession`，任务之间不共享可变状态。

use crate::clients::PaperApiClient;
use crate::config::Config;
use crate::models::loaders::load_all_plans;
use crate::models::plan::ExamPlan;
use crate::orchestrator::plan_processor::{self, PlanResult};
use crate::utils::logging;
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    client: Arc<PaperApiClient>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        // 初始化日志文件
        logging::init_log_file(&config.output_log_file)?;

        logging::log_startup(config.max_concurrent_plans, config.dry_run);

        let client = PaperApiClient::new(&config).context("无法创建 API 客户端")?;

        Ok(Self {
            config,
            client: Arc::new(client),
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        // 加载所有待处理的方案
        let all_plans = self.load_plans().await?;

        if all_plans.is_empty() {
            warn!("⚠️ 没有找到待处理的TOML文件，程序结束");
            return Ok(());
        }

        logging::log_plans_loaded(all_plans.len(), self.batch_size());

        let stats = self.process_all_plans(all_plans).await?;

        logging::print_final_stats(
            stats.success,
            stats.blocked,
            stats.failed,
            stats.total,
            &self.config.output_log_file,
        );

        Ok(())
    }

    fn batch_size(&self) -> usize {
        self.config.max_concurrent_plans.max(1)
    }

    /// 加载方案
    async fn load_plans(&self) -> Result<Vec<ExamPlan>> {
        info!("\n📁 正在扫描待处理的方案...");
        load_all_plans(&self.config.plan_folder).await
    }

    /// 处理所有方案
    async fn process_all_plans(&self, all_plans: Vec<ExamPlan>) -> Result<ProcessingStats> {
        let batch_size = self.batch_size();
        let semaphore = Arc::new(Semaphore::new(batch_size));
        let total_plans = all_plans.len();
        let total_batches = total_plans.div_ceil(batch_size);
        let mut stats = ProcessingStats {
            total: total_plans,
            ..Default::default()
        };

        for (batch_idx, batch_plans) in all_plans.chunks(batch_size).enumerate() {
            let batch_start = batch_idx * batch_size;
            let batch_num = batch_idx + 1;

            logging::log_batch_start(
                batch_num,
                total_batches,
                batch_start + 1,
                batch_start + batch_plans.len(),
                total_plans,
            );

            let batch_result = self
                .process_batch(batch_plans, batch_start, semaphore.clone())
                .await?;

            stats.success += batch_result.success;
            stats.blocked += batch_result.blocked;
            stats.failed += batch_result.failed;

            logging::log_batch_complete(batch_num, batch_result.success, batch_plans.len());
        }

        Ok(stats)
    }

    /// 处理单个批次
    async fn process_batch(
        &self,
        batch_plans: &[ExamPlan],
        batch_start: usize,
        semaphore: Arc<Semaphore>,
    ) -> Result<BatchResult> {
        let mut batch_handles = Vec::new();

        for (idx, plan) in batch_plans.iter().enumerate() {
            let plan_index = batch_start + idx + 1;
            let permit = semaphore.clone().acquire_owned().await?;

            let client = Arc::clone(&self.client);
            let plan = plan.clone();
            let config = self.config.clone();

            let handle = tokio::spawn(async move {
                let _permit = permit;
                plan_processor::process_plan(&*client, plan, plan_index, &config)
                    .await
                    .inspect_err(|e| {
                        error!("[方案 {}] ❌ 处理过程中发生错误: {:#}", plan_index, e)
                    })
            });
            batch_handles.push((plan_index, handle));
        }

        // 等待本批所有任务完成
        let mut result = BatchResult::default();

        for (plan_index, handle) in batch_handles {
            match handle.await {
                Ok(Ok(PlanResult::Success)) => result.success += 1,
                Ok(Ok(PlanResult::Blocked)) => result.blocked += 1,
                Ok(Err(_)) => result.failed += 1,
                Err(e) => {
                    error!("[方案 {}] 任务执行失败: {}", plan_index, e);
                    result.failed += 1;
                }
            }
        }

        Ok(result)
    }
}

/// 处理统计
#[derive(Debug, Default)]
struct ProcessingStats {
    success: usize,
    blocked: usize,
    failed: usize,
    total: usize,
}

/// 批次处理结果
#[derive(Debug, Default)]
struct BatchResult {
    success: usize,
    blocked: usize,
    failed: usize,
}
