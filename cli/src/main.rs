use std::io::Write as _;

use clap::Parser;
use colored::Colorize as _;
use cph_cli::cmd::GlobalArgs;
use cph_core::style::ColorTheme as _;

fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let level = record.level();
            writeln!(
                buf,
                "{} {}",
                format!("[{}]", level).color(level.color()).bold(),
                record.args()
            )
        })
        .init();
}

#[tokio::main]
async fn main() {
    init_logger();
    let app = GlobalArgs::parse();
    app.exec_subcmd().await.unwrap_or_else(|e| {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    });
}
