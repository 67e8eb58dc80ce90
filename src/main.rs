use anyhow::Result;
use qsar_batch::cli::{self, CliCommand};
use qsar_batch::utils::logging;
use qsar_batch::{App, ChromeDriver, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logging::init();

    // 解析命令行
    let args = match cli::parse_args(std::env::args().skip(1)) {
        CliCommand::Run(args) => args,
        CliCommand::Help => {
            println!("{}", cli::help_text(&Config::default().target_url));
            return Ok(());
        }
        CliCommand::Malformed(err) => {
            eprintln!("{}", cli::misuse_banner(&err));
            println!("{}", cli::help_text(&Config::default().target_url));
            std::process::exit(2);
        }
    };

    // 加载配置：默认值 → 设置文件 → 环境变量 → 命令行
    let config = Config::load(args.settings.as_deref())?
        .with_env()?
        .with_cli(&args);

    // 初始化并运行应用
    let driver = ChromeDriver::new(config.browser.clone());
    let app = App::initialize(config).await?;
    let summary = app.run(&driver).await?;

    println!("\n{} 已写入", summary.output_path.display());
    Ok(())
}
