use crate::config::Config;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Args {
    /// Replaces the configured stock list
    pub stocks: Option<Vec<String>>,
    pub interval: Option<u64>,
    pub init_config: bool,
}

impl Args {
    /// Layer command line overrides on top of `config`
    pub fn apply(&self, config: &mut Config) {
        if let Some(stocks) = &self.stocks {
            config.stock_list.clone_from(stocks);
        }
        if let Some(interval) = self.interval {
            config.refresh_secs = interval;
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Run(Args),
    Help,
    Version,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub code: i32,
    pub message: String,
}

impl ParseError {
    fn usage(message: String) -> Self {
        Self {
            code: 2,
            message: format!("{message}\n\n{}", help_text(env!("CARGO_PKG_NAME"))),
        }
    }
}

#[must_use]
pub fn help_text(bin_name: &str) -> String {
    indoc::formatdoc! {"
        A 股行情面板

        用法：
          {bin_name} [选项]

        选项：
          -h, --help            显示帮助信息
          -V, --version         显示版本信息
              --stocks <a,b>    覆盖自选股票（逗号分隔的名称）
              --interval <秒>   自动刷新间隔，0 表示仅手动刷新
              --init-config     写出当前生效的配置文件后退出
    "}
}

#[must_use]
pub fn version_text() -> String {
    format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

pub fn parse_args<I, S>(args: I) -> Result<Command, ParseError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut parsed = Args::default();
    let mut show_help = false;
    let mut show_version = false;

    let mut args = args.into_iter().map(Into::into);
    while let Some(arg) = args.next() {
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag.to_string(), Some(value.to_string())),
            _ => (arg.clone(), None),
        };

        match flag.as_str() {
            "-h" | "--help" => show_help = true,
            "-V" | "--version" => show_version = true,
            "--init-config" => parsed.init_config = true,
            "--stocks" => {
                let value = inline
                    .or_else(|| args.next())
                    .ok_or_else(|| ParseError::usage("--stocks 缺少参数".to_string()))?;
                parsed.stocks = Some(
                    value
                        .split([',', '，'])
                        .map(str::trim)
                        .filter(|name| !name.is_empty())
                        .map(String::from)
                        .collect(),
                );
            }
            "--interval" => {
                let value = inline
                    .or_else(|| args.next())
                    .ok_or_else(|| ParseError::usage("--interval 缺少参数".to_string()))?;
                let secs = value
                    .trim()
                    .parse()
                    .map_err(|_| ParseError::usage(format!("无效的刷新间隔：{value}")))?;
                parsed.interval = Some(secs);
            }
            _ if arg.starts_with('-') => {
                return Err(ParseError::usage(format!("未知选项：{arg}")));
            }
            _ => {
                return Err(ParseError::usage(format!("不支持的位置参数：{arg}")));
            }
        }
    }

    if show_help {
        return Ok(Command::Help);
    }

    if show_version {
        return Ok(Command::Version);
    }

    Ok(Command::Run(parsed))
}

#[cfg(test)]
mod tests {
    use super::{parse_args, Args, Command};
    use crate::config::Config;

    fn run_args(args: &[&str]) -> Args {
        match parse_args(args.iter().copied()) {
            Ok(Command::Run(args)) => args,
            other => panic!("expected run command, got {other:?}"),
        }
    }

    #[test]
    fn parses_default_run_command() {
        assert_eq!(run_args(&[]), Args::default());
    }

    #[test]
    fn parses_help_command() {
        assert_eq!(parse_args(["--help"]), Ok(Command::Help));
        assert_eq!(parse_args(["--interval", "5", "-h"]), Ok(Command::Help));
    }

    #[test]
    fn parses_version_command() {
        assert_eq!(parse_args(["-V"]), Ok(Command::Version));
    }

    #[test]
    fn parses_stock_list() {
        let args = run_args(&["--stocks", "贵州茅台, 五粮液,,"]);
        assert_eq!(
            args.stocks,
            Some(vec!["贵州茅台".to_string(), "五粮液".to_string()])
        );

        let args = run_args(&["--stocks=招商银行"]);
        assert_eq!(args.stocks, Some(vec!["招商银行".to_string()]));
    }

    #[test]
    fn parses_interval_and_init_flag() {
        let args = run_args(&["--interval", "30", "--init-config"]);
        assert_eq!(args.interval, Some(30));
        assert!(args.init_config);
    }

    #[test]
    fn overrides_config() {
        let mut config = Config::default();
        run_args(&["--stocks", "五粮液", "--interval=10"]).apply(&mut config);
        assert_eq!(config.stock_list, ["五粮液"]);
        assert_eq!(config.refresh_secs, 10);
        assert_eq!(config.index_list, Config::default().index_list);
    }

    #[test]
    fn fails_on_bad_interval() {
        let err = parse_args(["--interval", "soon"]).expect_err("expected parse error");
        assert_eq!(err.code, 2);
        assert!(err.message.contains("无效的刷新间隔"));

        let err = parse_args(["--interval"]).expect_err("expected parse error");
        assert!(err.message.contains("缺少参数"));
    }

    #[test]
    fn fails_on_unknown_option() {
        let err = parse_args(["--unknown"]).expect_err("expected parse error");
        assert_eq!(err.code, 2);
        assert!(err.message.contains("未知选项"));
    }

    #[test]
    fn fails_on_positional_argument() {
        let err = parse_args(["abc"]).expect_err("expected parse error");
        assert_eq!(err.code, 2);
        assert!(err.message.contains("不支持的位置参数"));
    }
}
