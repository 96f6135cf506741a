use anyhow::Result;
use tracing::error;

use mcq_scrape::error::ConfigError;
use mcq_scrape::utils::logging;
use mcq_scrape::{App, Config, Site};

/// 用法: mcq_scrape [<url> <max_questions> <category>]
fn site_from_args(args: &[String]) -> Result<Option<Site>, ConfigError> {
    match args {
        [] => Ok(None),
        [url, max, category] => {
            let max_questions = max.parse::<usize>().map_err(|_| ConfigError::InvalidArgument {
                name: "max_questions".to_string(),
                value: max.clone(),
            })?;
            Ok(Some(Site {
                url: url.clone(),
                max_questions,
                category: category.clone(),
            }))
        }
        _ => Err(ConfigError::InvalidArgument {
            name: "usage".to_string(),
            value: "mcq_scrape [<url> <max_questions> <category>]".to_string(),
        }),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::from_env();

    // 初始化日志
    logging::init(config.verbose_logging);

    if let Err(e) = config.validate() {
        error!("❌ {}", e);
        return Err(e.into());
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    let single_site = site_from_args(&args)?;

    // 初始化并运行应用
    let app = App::initialize(config).await?;
    let outcome = match single_site {
        Some(site) => app.run_sites(vec![site]).await,
        None => app.run().await,
    };
    app.shutdown().await;
    outcome?;

    Ok(())
}
