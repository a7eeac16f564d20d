//! 日志系统模块
//!
//! 基于 `tracing` 提供结构化的日志记录功能，同时充当装配流程的诊断输出。
//! 诊断信息只用于观察，从不参与控制流。
//!
//! # 使用示例
//!
//! ```no_run
//! use mesh_assembly::core::{config::LogLevel, log};
//!
//! log::init_logger(LogLevel::Info, false, None);
//! tracing::info!(objects = 3, "Buffer ready");
//! ```

use tracing::Level;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};
use std::path::Path;

use super::config::LogLevel;

/// 初始化日志系统
///
/// 必须在程序开始时调用一次。
///
/// # 参数
///
/// * `level` - 日志级别
/// * `file_output` - 是否输出到文件
/// * `log_file_path` - 日志文件路径（可选，默认为 "mesh_assembly.log"）
pub fn init_logger(level: LogLevel, file_output: bool, log_file_path: Option<&str>) {
    let filter = EnvFilter::new(filter_directive(level));

    if file_output {
        let log_path = log_file_path.unwrap_or("mesh_assembly.log");
        let path = Path::new(log_path);
        let directory = path.parent().unwrap_or(Path::new("."));
        let filename = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("mesh_assembly.log");

        // 每天滚动
        let file_appender = RollingFileAppender::new(Rotation::DAILY, directory, filename);

        let console_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_ansi(true);

        let file_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_ansi(false)
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(filter)
            .with(console_layer)
            .with(file_layer)
            .init();
    } else {
        let fmt_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_ansi(true);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

fn filter_directive(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Trace => "trace",
        LogLevel::Debug => "debug",
        LogLevel::Info => "info",
        LogLevel::Warn => "warn",
        LogLevel::Error => "error",
    }
}

/// 几何模块日志 - Info 级别
#[macro_export]
macro_rules! geometry_info {
    ($($arg:tt)*) => {
        tracing::info!(target: "mesh_assembly::geometry", $($arg)*)
    };
}

/// 几何模块日志 - Warn 级别
#[macro_export]
macro_rules! geometry_warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: "mesh_assembly::geometry", $($arg)*)
    };
}

/// 几何模块日志 - Debug 级别
#[macro_export]
macro_rules! geometry_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: "mesh_assembly::geometry", $($arg)*)
    };
}

/// 日志级别转换
impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

/// 性能追踪宏
///
/// 创建一个 TRACE 级别的 span，进入后在作用域结束时关闭。
///
/// ```no_run
/// let span = mesh_assembly::span_trace!("assemble_object");
/// let _guard = span.enter();
/// ```
#[macro_export]
macro_rules! span_trace {
    ($name:expr) => {
        tracing::span!(tracing::Level::TRACE, $name)
    };
}

/// 测试用的日志捕获
///
/// 在作用域内安装一个只收集事件的订阅者，用于断言诊断信息确实被输出。
#[cfg(test)]
pub(crate) mod capture {
    use std::fmt;
    use std::sync::{Arc, Mutex};
    use tracing::field::{Field, Visit};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, Layer};
    use tracing_subscriber::prelude::*;

    /// 捕获到的一条日志事件
    #[derive(Debug, Clone)]
    pub struct CapturedEvent {
        pub level: Level,
        pub target: String,
        pub message: String,
    }

    #[derive(Clone, Default)]
    struct CaptureLayer {
        events: Arc<Mutex<Vec<CapturedEvent>>>,
    }

    #[derive(Default)]
    struct MessageVisitor {
        message: String,
    }

    impl Visit for MessageVisitor {
        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            if field.name() == "message" {
                self.message = format!("{:?}", value);
            }
        }
    }

    impl<S: Subscriber> Layer<S> for CaptureLayer {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut visitor = MessageVisitor::default();
            event.record(&mut visitor);

            let metadata = event.metadata();
            if let Ok(mut events) = self.events.lock() {
                events.push(CapturedEvent {
                    level: *metadata.level(),
                    target: metadata.target().to_string(),
                    message: visitor.message,
                });
            }
        }
    }

    /// 运行 `f` 并返回期间输出的所有事件
    pub fn capture_events<F: FnOnce()>(f: F) -> Vec<CapturedEvent> {
        let layer = CaptureLayer::default();
        let events = Arc::clone(&layer.events);

        tracing::subscriber::with_default(tracing_subscriber::registry().with(layer), f);

        let captured = events.lock().map(|e| e.clone()).unwrap_or_default();
        captured
    }

    /// 筛选几何模块的警告
    pub fn geometry_warnings(events: &[CapturedEvent]) -> Vec<&str> {
        events
            .iter()
            .filter(|e| e.level == Level::WARN && e.target == "mesh_assembly::geometry")
            .map(|e| e.message.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(Level::from(LogLevel::Info), Level::INFO);
        assert_eq!(Level::from(LogLevel::Error), Level::ERROR);
    }

    #[test]
    fn test_capture_geometry_macros() {
        let events = capture::capture_events(|| {
            crate::geometry_warn!("未找到材质: {}", "matC");
            crate::geometry_info!("装配对象: {}", "cube");
        });

        assert_eq!(capture::geometry_warnings(&events), ["未找到材质: matC"]);
        assert!(events.iter().any(|e| e.level == Level::INFO && e.message == "装配对象: cube"));
    }

    #[test]
    fn test_filter_directive() {
        assert_eq!(filter_directive(LogLevel::Warn), "warn");
        assert_eq!(filter_directive(LogLevel::Trace), "trace");
    }
}
