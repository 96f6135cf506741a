use std::path::Path;
use std::time::Duration;

use mcq_scrape::browser::launch_headless_browser;
use mcq_scrape::config::Config;
use mcq_scrape::models::load_sites;
use mcq_scrape::utils::logging;
use mcq_scrape::workflow::{ProcessResult, ScrapeFlow, SiteCtx};
use mcq_scrape::{extract_html, PageSource};

#[tokio::test]
async fn bundled_sites_file_is_valid() {
    let sites = load_sites(Path::new("sites.toml"))
        .await
        .expect("加载 sites.toml 失败");
    assert_eq!(sites.len(), 3);
    assert!(sites.iter().all(|s| s.url.starts_with("https://")));
}

#[tokio::test]
#[ignore] // 需要本机安装 Chrome/Chromium 并能访问外网：cargo test -- --ignored
async fn test_scrape_first_site_without_hints() {
    logging::init(true);

    let config = Config {
        enable_hints: false,
        min_request_delay_ms: 0,
        max_request_delay_ms: 0,
        page_load_timeout_secs: 30,
        ..Config::from_env()
    };

    let mut sites = load_sites(Path::new("sites.toml"))
        .await
        .expect("加载 sites.toml 失败");
    let mut site = sites.remove(0);
    site.max_questions = 5;

    let browser = launch_headless_browser(&config)
        .await
        .expect("启动浏览器失败");
    let flow = ScrapeFlow::new(&config);
    let outcome = flow
        .run(&browser, &SiteCtx::new(site, 1))
        .await
        .expect("抓取站点失败");

    assert_eq!(outcome.result, ProcessResult::Success);
    assert!(!outcome.questions.is_empty());
    assert!(outcome.questions.len() <= 5);
    for question in &outcome.questions {
        println!("{}", question.record);
        assert_eq!(question.hint, "");
    }
}

#[tokio::test]
#[ignore]
async fn test_page_source_reads_rendered_html() {
    logging::init(true);

    let config = Config::from_env();
    let browser = launch_headless_browser(&config)
        .await
        .expect("启动浏览器失败");

    let source = PageSource::open(
        &browser,
        "https://www.sanfoundry.com/software-engineering-questions-answers/",
        Duration::from_secs(30),
    )
    .await
    .expect("打开页面失败");
    let html = source.html().await.expect("读取 HTML 失败");
    source.close().await;

    assert!(html.contains("entry-content"));
    println!("提取到 {} 道题目", extract_html(&html, 100).len());
}
