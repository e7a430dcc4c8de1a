use anyhow::Result;
use clap::{Arg, ArgAction, Command};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use study_video_recommender::{Config, RecommendRequest, Recommender};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("Study Video Recommender")
        .version(env!("CARGO_PKG_VERSION"))
        .author("TigreRoll")
        .about("Recommend educational videos for learning topics")
        .arg(
            Arg::new("topic")
                .short('t')
                .long("topic")
                .value_name("TOPIC")
                .help("Learning topic, in priority order (repeatable)")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("query")
                .short('q')
                .long("query")
                .value_name("TEXT")
                .help("Free text used when no topics are given"),
        )
        .arg(
            Arg::new("max-results")
                .short('n')
                .long("max-results")
                .value_name("NUM")
                .help("Maximum number of videos to return")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Path to a TOML configuration file"),
        )
        .arg(
            Arg::new("serve")
                .long("serve")
                .help("Run the HTTP API instead of a one-shot recommendation")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("Port for the HTTP API (overrides config)")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let config_path = matches.get_one::<String>("config").map(PathBuf::from);
    let mut config = Config::load(config_path.as_deref())?;
    if let Some(port) = matches.get_one::<u16>("port") {
        config.server.port = *port;
    }

    let level = if matches.get_flag("verbose") { "debug" } else { config.logging.level.as_str() };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("study_video_recommender={},warn", level))),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("🚀 Study Video Recommender starting...");
    info!("{}", config.summary());

    if matches.get_flag("serve") {
        return serve(config).await;
    }

    let request = RecommendRequest {
        key_topics: matches
            .get_many::<String>("topic")
            .map(|values| values.cloned().collect())
            .unwrap_or_default(),
        query: matches.get_one::<String>("query").cloned(),
        max_results: matches.get_one::<usize>("max-results").copied(),
        ..RecommendRequest::default()
    };

    let recommender = Recommender::from_config(&config).await?;
    let videos = recommender.recommend(&request).await;

    println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "videos": videos }))?);
    Ok(())
}

#[cfg(feature = "api")]
async fn serve(config: Config) -> Result<()> {
    use std::sync::Arc;
    use study_video_recommender::api::ApiServer;

    let recommender = Arc::new(Recommender::from_config(&config).await?);
    ApiServer::new(recommender, Arc::new(config)).start().await
}

#[cfg(not(feature = "api"))]
async fn serve(_config: Config) -> Result<()> {
    Err(anyhow::anyhow!(
        "HTTP API not available: rebuild with `--features api`"
    ))
}
