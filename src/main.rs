use crate::widgets::Terminal;
use std::io::{IsTerminal, Write};

#[macro_use]
mod macros;

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod export;
pub mod helper;
pub mod kline;
pub mod logger;
pub mod path_env;
pub mod provider;
pub mod refresh;
pub mod render;
pub mod system;
pub mod ui;
pub mod widgets;

mod views;

#[macro_use]
extern crate rust_i18n;
i18n!("locales");

pub use cli::Args;

const LOCALE_ENV: &str = "ASHARE_PANEL_LOCALE";

#[tokio::main]
async fn main() {
    let bin_name = std::env::args()
        .next()
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());

    let command = match cli::parse_args(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(err) => {
            eprintln!("{}", err.message);
            std::process::exit(err.code);
        }
    };

    let args = match command {
        cli::Command::Help => {
            println!("{}", cli::help_text(&bin_name));
            return;
        }
        cli::Command::Version => {
            println!("{}", cli::version_text());
            return;
        }
        cli::Command::Run(args) => args,
    };

    dotenvy::dotenv().ok();

    let _guard = match logger::init() {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("日志初始化失败：{err:#}");
            None
        }
    };

    let mut config = config::load();
    args.apply(&mut config);

    if args.init_config {
        match config::save(&config) {
            Ok(path) => println!("配置已写入：{}", path.display()),
            Err(err) => {
                eprintln!("写入配置失败：{err}");
                std::process::exit(1);
            }
        }
        return;
    }

    if !std::io::stdout().is_terminal() {
        eprintln!("A 股行情面板需要在交互式终端（TTY）中运行。");
        std::process::exit(1);
    }

    let locale = std::env::var(LOCALE_ENV).unwrap_or_else(|_| "zh-CN".to_string());
    rust_i18n::set_locale(&locale);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        pid = std::process::id(),
        locale = %locale,
        log_dir = %logger::active_log_dir().display(),
        "应用启动"
    );

    // Set up panic hook to restore terminal
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        Terminal::exit_full_screen();
        hook(info);
    }));

    let _ = std::io::stdout().write_all(b"\n");
    let _ = std::io::stdout().flush();

    Terminal::enter_full_screen();
    let result = tokio::select! {
        result = app::run(config) => {
            tracing::info!("应用主循环已退出");
            result
        }
        () = wait_for_shutdown_signal() => {
            tracing::warn!("收到退出信号，正在退出");
            Ok(())
        }
    };
    Terminal::exit_full_screen();

    if let Err(err) = result {
        tracing::error!("应用异常退出：{err:#}");
        eprintln!("应用异常退出：{err:#}");
        std::process::exit(2);
    }
}

#[cfg(unix)]
async fn wait_for_shutdown_signal() {
    use std::future::pending;
    use tokio::signal::unix::{signal, Signal, SignalKind};

    async fn recv_or_pending(signal: Option<Signal>) {
        let mut signal = signal;
        if let Some(sig) = signal.as_mut() {
            let _ = sig.recv().await;
            return;
        }
        pending::<()>().await;
    }

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        () = recv_or_pending(signal(SignalKind::terminate()).ok()) => {}
        () = recv_or_pending(signal(SignalKind::hangup()).ok()) => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
