//! 日志初始化
//!
//! tracing-subscriber 控制台输出，可选按天滚动的文件输出。

use tracing_subscriber::EnvFilter;

/// 控制台日志，默认级别 info (`RUST_LOG` 可覆盖)
pub fn init_logger() {
    init_logger_with_file(None, None);
}

/// 带可选文件输出的日志初始化
///
/// 嵌入式数据库和 HTTP 客户端的日志太吵，默认压到 warn。
/// `log_dir` 不存在时自动创建，创建失败则退回纯控制台输出。
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) {
    let default_filter = format!(
        "{},surrealdb=warn,surrealdb_core=warn,reqwest=warn,hyper=warn",
        log_level.unwrap_or("info")
    );
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false);

    if let Some(dir) = log_dir {
        match std::fs::create_dir_all(dir) {
            Ok(()) => {
                let appender = tracing_appender::rolling::daily(dir, "booking-server.log");
                subscriber.with_writer(appender).init();
                return;
            }
            Err(e) => {
                eprintln!("log dir {} unavailable ({}), logging to stderr", dir, e);
            }
        }
    }

    subscriber.init();
}
