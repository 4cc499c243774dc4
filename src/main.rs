// ==========================================
// 飞行日志本 - 命令行入口
// ==========================================
// 命令: import / flights / log / stats / documents / config
// 输出: 文本（默认）或 JSON（--json）
// ==========================================

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use flight_logbook::api::ApiResult;
use flight_logbook::app::{get_default_db_path, AppState};
use flight_logbook::engine::format_hours;
use flight_logbook::{logging, DashboardStats, FlightLog, FlightRecord, ImportSummary};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "flight-logbook", version, about = "Personal flight logbook")]
struct Cli {
    /// 数据库路径（默认: FLIGHT_LOGBOOK_DB_PATH 或用户数据目录）
    #[arg(long, global = true)]
    db: Option<String>,

    /// 当前用户
    #[arg(long, global = true)]
    user: Option<String>,

    /// 以 JSON 输出结果
    #[arg(long, global = true)]
    json: bool,

    /// 以 JSON 输出日志
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 导入 CSV / 电子表格
    Import {
        #[arg(required = true)]
        files: Vec<String>,
    },
    /// 航班列表（日期倒序）
    Flights {
        /// 按机型 / 航班号 / 起降地搜索
        #[arg(long)]
        search: Option<String>,
    },
    /// 飞行日志（日期正序 + 合计）
    Log,
    /// 驾驶舱统计
    Stats,
    /// 证照列表（含到期状态）
    Documents,
    /// 查看或修改配置
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// 设置配置值
    Set { key: String, value: String },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_flight(f: &FlightRecord) {
    println!(
        "{:<10}  {:<10}  {:<6}  {:<5} {:<5}  {:<6} → {:<6}  {:<4}  {:<16}  {:>5}",
        f.date,
        f.aircraft,
        f.flight_number,
        f.chocks_off,
        f.chocks_on,
        f.from,
        f.to,
        f.sortie_type,
        f.type_of_flight,
        f.duration
    );
}

fn print_summary(path: &str, result: &ApiResult<ImportSummary>) {
    match result {
        Ok(s) => {
            println!(
                "{}: {} 行, 成功 {}, 失败 {} ({} ms)",
                path, s.total_rows, s.success_count, s.error_count, s.elapsed_ms
            );
            for rejection in &s.rejections {
                println!("  行 {}: {}", rejection.row_number, rejection.reason);
            }
        }
        Err(e) => println!("{}: 导入失败: {}", path, e),
    }
}

fn print_log(log: &FlightLog) {
    for f in &log.rows {
        print_flight(f);
    }
    println!(
        "合计: {} h (带飞 {} h, 单飞 {} h)",
        format_hours(log.totals.total),
        format_hours(log.totals.dual),
        format_hours(log.totals.solo)
    );
}

fn print_stats(stats: &DashboardStats) {
    println!("航班数: {}", stats.total_flights);
    println!(
        "总时长: {} h  带飞: {} h  单飞: {} h",
        format_hours(stats.hours.total),
        format_hours(stats.hours.dual),
        format_hours(stats.hours.solo)
    );
    match &stats.medical_validity {
        Some(m) => println!("体检合格证: {}", m.expiry),
        None => println!("体检合格证: 未登记"),
    }
    println!("最近航班:");
    for f in &stats.recent_flights {
        print_flight(f);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.log_json {
        logging::init_json();
    } else {
        logging::init();
    }

    let db_path = cli.db.clone().unwrap_or_else(get_default_db_path);
    tracing::debug!("使用数据库: {}", db_path);
    let state = AppState::new(db_path).map_err(|e| anyhow!(e))?;

    let user = cli.user.as_deref();
    let today = Local::now().date_naive();

    match cli.command {
        Command::Import { files } => {
            let results = state.import_api.import_many(files.clone(), user).await;
            if cli.json {
                let view: Vec<serde_json::Value> = results
                    .iter()
                    .map(|r| match r {
                        Ok(s) => serde_json::to_value(s).unwrap_or_default(),
                        Err(e) => serde_json::json!({ "error": e.to_string() }),
                    })
                    .collect();
                print_json(&view)?;
            } else {
                for (path, result) in files.iter().zip(&results) {
                    print_summary(path, result);
                }
            }
            if results.iter().all(|r| r.is_err()) {
                return Err(anyhow!("所有文件导入失败"));
            }
        }
        Command::Flights { search } => {
            let flights = match search {
                Some(term) => state.flight_api.search_flights(user, &term),
                None => state.flight_api.list_flights(user),
            }
            .context("读取航班失败")?;
            if cli.json {
                print_json(&flights)?;
            } else {
                flights.iter().for_each(print_flight);
            }
        }
        Command::Log => {
            let log = state.flight_api.flight_log(user).context("读取飞行日志失败")?;
            if cli.json {
                print_json(&log)?;
            } else {
                print_log(&log);
            }
        }
        Command::Stats => {
            let stats = state
                .dashboard_api
                .get_dashboard_stats(user, today)
                .await
                .context("统计失败")?;
            if cli.json {
                print_json(&stats)?;
            } else {
                print_stats(&stats);
            }
        }
        Command::Documents => {
            let documents = state
                .document_api
                .list_documents(user, today)
                .await
                .context("读取证照失败")?;
            if cli.json {
                print_json(&documents)?;
            } else {
                for d in &documents {
                    println!(
                        "{:<8}  {:<24}  签发 {:<10}  {}",
                        d.document.doc_type, d.document.name, d.document.issue_date, d.expiry
                    );
                }
            }
        }
        Command::Config { action } => {
            if let Some(ConfigAction::Set { key, value }) = action {
                state
                    .config
                    .set_config_value(&key, &value)
                    .map_err(|e| anyhow!("配置写入失败: {}", e))?;
            }
            let snapshot = state
                .config
                .get_config_snapshot()
                .map_err(|e| anyhow!("配置读取失败: {}", e))?;
            if cli.json {
                print_json(&snapshot)?;
            } else {
                for (key, value) in &snapshot {
                    println!("{} = {}", key, value);
                }
            }
        }
    }

    Ok(())
}
