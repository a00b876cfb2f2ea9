mod checks;
mod config;
mod util;

use crate::checks::{run_check, suite, Check};
use crate::config::read_tester_config;
use anyhow::bail;
use clap::{App, Arg};
use dotenv::dotenv;

const TESTER_CONFIG_PATH: &str = "./tester.conf";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    util::setup_logging("tester", "info")?;

    let app = App::new("maix-httpd-tester")
        .about("queries a maix-httpd device and checks its replies")
        .arg(
            Arg::new("url")
                .long("url")
                .takes_value(true)
                .help("device base url, overrides URL"),
        )
        .arg(
            Arg::new("cmd")
                .long("cmd")
                .takes_value(true)
                .conflicts_with("raw")
                .help("send a single cmd value"),
        )
        .arg(
            Arg::new("raw")
                .long("raw")
                .takes_value(true)
                .help("send a raw query string"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .takes_value(true)
                .help("path to tester.conf"),
        );
    let matches = app.get_matches();

    let mut settings =
        read_tester_config(matches.value_of("config").unwrap_or(TESTER_CONFIG_PATH))?;
    if let Some(url) = matches.value_of("url") {
        settings.url = url.to_string();
    }
    log::info!("device {}", settings.url);

    let checks = if let Some(cmd) = matches.value_of("cmd") {
        vec![Check::cmd(cmd)]
    } else if let Some(raw) = matches.value_of("raw") {
        vec![Check::new("raw", Some(raw))]
    } else {
        suite()
    };

    let client = reqwest::Client::builder()
        .timeout(settings.timeout())
        .build()?;

    let mut failed = 0;
    for check in checks.iter() {
        match run_check(&client, &settings.url, check).await {
            Ok(outcome) if outcome.passed() => {
                log::info!("PASS {}: {}", check.name, outcome.body);
            }
            Ok(outcome) => {
                failed += 1;
                log::error!(
                    "FAIL {}: status {} content-type {:?}",
                    check.name,
                    outcome.status,
                    outcome.content_type
                );
                log::error!("  expected {}", outcome.expected);
                log::error!("  got      {}", outcome.body);
            }
            Err(e) => {
                failed += 1;
                log::error!("FAIL {}: {}", check.name, e);
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} checks failed", failed, checks.len());
    }
    log::info!("all {} checks passed", checks.len());
    Ok(())
}
