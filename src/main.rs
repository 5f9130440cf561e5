use clap::Parser;
use portfolio_common::{CarouselSession, DetailOverlay, Viewport};
use portfolio_rust::{cli, cms, config, error, report, scanner};
use cli::{Cli, Commands};
use config::Config;
use error::{PortfolioError, Result};
use std::path::PathBuf;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Check { path, recursive } => {
            println!("🔍 portfolio - コンテンツ検証\n");

            let path = resolve_content_path(path, &config)?;
            println!("[1/2] コンテンツをスキャン中...");
            let files = scanner::scan_content(&path, recursive)?;
            println!("✔ {}件のJSONを検出\n", files.len());

            if files.is_empty() {
                return Err(PortfolioError::NoContentFound(path.display().to_string()));
            }

            println!("[2/2] 検証中...");
            let mut failed = 0;
            let mut total = 0;
            for file in &files {
                match scanner::load_section(&file.path) {
                    Ok(section) => {
                        total += section.projects.len();
                        println!("✔ {}: {}件のプロジェクト", file.file_name, section.projects.len());
                        if section.is_empty() {
                            println!("  ⚠ プロジェクトが0件のためカルーセルは表示されません");
                        }
                        for warning in report::check_section(&section) {
                            println!("  ⚠ {}", warning);
                        }
                        if cli.verbose {
                            for record in &section.projects {
                                println!("    - {} [{}]", record.display_name(), report::card_tags(record));
                            }
                        }
                    }
                    Err(e) => {
                        failed += 1;
                        println!("✗ {}: {}", file.file_name, e);
                    }
                }
            }

            if total == 0 && failed == 0 {
                return Err(PortfolioError::NoContentFound(path.display().to_string()));
            }
            if failed > 0 {
                return Err(PortfolioError::Config(format!(
                    "{}件のファイルを読み込めませんでした",
                    failed
                )));
            }
            println!("\n✅ 検証完了");
        }

        Commands::Preview { path, index, mobile } => {
            let path = resolve_content_path(path, &config)?;
            let section = scanner::load_projects(&path)?;
            let projects = &section.projects;
            let viewport = if mobile { Viewport::Mobile } else { Viewport::Desktop };

            let mut session = CarouselSession::mount(projects.len(), viewport)
                .ok_or_else(|| PortfolioError::EmptyProjectList(path.display().to_string()))?;
            session.jump_to(index);

            println!(
                "🎠 {} ({})\n",
                section.heading.as_deref().unwrap_or("Projects"),
                report::viewport_label(session.viewport())
            );
            for line in report::placement_table(&session, projects) {
                println!("{}", line);
            }

            let overlay = DetailOverlay::open(projects, session.current_index())
                .ok_or_else(|| PortfolioError::EmptyProjectList(path.display().to_string()))?;
            println!();
            for line in report::detail_lines(&overlay, projects) {
                println!("{}", line);
            }
            session.unmount();
        }

        Commands::Fetch { repo, document_type, output } => {
            println!("☁ portfolio - CMS取得\n");

            let repo = match repo {
                Some(repo) => repo,
                None => config.get_repo()?,
            };
            let document_type = document_type.unwrap_or_else(|| config.document_type.clone());

            println!("[1/2] {} から {} を取得中...", repo, document_type);
            let client = cms::PrismicClient::new(
                &repo,
                config.get_access_token(),
                config.timeout_seconds,
                cli.verbose,
            )?;
            let section = client.fetch_section(&document_type).await?;
            println!("✔ {}件のプロジェクトを取得\n", section.projects.len());

            for warning in report::check_section(&section) {
                println!("  ⚠ {}", warning);
            }

            println!("[2/2] 結果を保存中...");
            let json = serde_json::to_string_pretty(&section)?;
            match output {
                Some(output) => {
                    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&output, json)?;
                    println!("✔ 結果を保存: {}", output.display());
                }
                None => println!("{}", json),
            }

            println!("\n✅ 取得完了");
        }

        Commands::Config { set_repo, set_content, show } => {
            let mut config = config;

            if let Some(repo) = set_repo {
                config.set_repo(repo)?;
                println!("✔ Prismicリポジトリを設定しました");
            }

            if let Some(path) = set_content {
                config.set_content_path(path)?;
                println!("✔ コンテンツファイルを設定しました");
            }

            if show {
                println!("設定:");
                println!("  パス: {}", Config::config_path()?.display());
                println!(
                    "  リポジトリ: {}",
                    config.get_repo().unwrap_or_else(|_| "未設定".into())
                );
                println!("  ドキュメント型: {}", config.document_type);
                println!(
                    "  コンテンツ: {}",
                    config
                        .content_path
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "未設定".into())
                );
                println!(
                    "  アクセストークン: {}",
                    if config.get_access_token().is_some() { "設定済み" } else { "未設定" }
                );
                println!("  タイムアウト: {}秒", config.timeout_seconds);
            }
        }
    }

    Ok(())
}

fn resolve_content_path(path: Option<PathBuf>, config: &Config) -> Result<PathBuf> {
    path.or_else(|| config.content_path.clone()).ok_or_else(|| {
        PortfolioError::Config(
            "コンテンツのパスを指定するか `portfolio config --set-content PATH` で設定してください".into(),
        )
    })
}
