use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::Arg;
use clap::Command;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::configuration::Config;
use crate::configuration::ConfigKey;

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if !config_file_path.parent().unwrap().exists() {
        fs::create_dir_all(config_file_path.parent().unwrap()).await?;
    }

    let mut file = fs::File::create(config_file_path.clone()).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    let config_path_display = config_file_path.as_os_str().to_str().unwrap();
    println!("Created default config file at {config_path_display}");
    return Ok(());
}

pub fn build() -> Command {
    return Command::new("artifex")
        .about("Terminal client that turns natural-language prompts into runnable code artifacts using a language-model backend and a sandboxed code runner.")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand(
            Command::new("config")
                .about("Configuration file helpers")
                .subcommand(Command::new("default").about("Print the default config file to stdout"))
                .subcommand(Command::new("create").about("Write the default config file to disk"))
        )
        .arg(
            Arg::new("config-file")
                .short('c')
                .long("config-file")
                .env("ARTIFEX_CONFIG_FILE")
                .num_args(1)
                .help(format!("Path to the config file [default: {}]", Config::default(ConfigKey::ConfigFile))),
        )
        .arg(
            Arg::new("generation-url")
                .long("generation-url")
                .env("ARTIFEX_GENERATION_URL")
                .num_args(1)
                .help("URL of the structured-completion endpoint [default: http://localhost:3000]"),
        )
        .arg(
            Arg::new("sandbox-url")
                .long("sandbox-url")
                .env("ARTIFEX_SANDBOX_URL")
                .num_args(1)
                .help("URL of the sandboxed execution endpoint [default: http://localhost:3000]"),
        )
        .arg(
            Arg::new("analytics-url")
                .long("analytics-url")
                .env("ARTIFEX_ANALYTICS_URL")
                .num_args(1)
                .help("URL of the analytics collector. Telemetry is disabled when empty [default: ]"),
        )
        .arg(
            Arg::new("model")
                .short('m')
                .long("model")
                .env("ARTIFEX_MODEL")
                .num_args(1)
                .help("Model id used for generation [default: claude-3-5-sonnet-20240620]"),
        )
        .arg(
            Arg::new("template")
                .short('t')
                .long("template")
                .env("ARTIFEX_TEMPLATE")
                .num_args(1)
                .help("Artifact template id, or auto to let the model pick [default: auto]"),
        )
        .arg(
            Arg::new("user-id")
                .short('u')
                .long("user-id")
                .env("ARTIFEX_USER_ID")
                .num_args(1)
                .help("Authenticated user id. Submissions are deferred while empty [default: ]"),
        )
        .arg(
            Arg::new("api-key")
                .short('k')
                .long("api-key")
                .env("ARTIFEX_API_KEY")
                .num_args(1)
                .help("Execution backend API key sent with sandbox requests [default: ]"),
        )
        .arg(
            Arg::new("health-check-timeout")
                .long("health-check-timeout")
                .env("ARTIFEX_HEALTH_CHECK_TIMEOUT")
                .num_args(1)
                .help("Generation endpoint health check timeout in milliseconds [default: 1000]"),
        );
}

/// Returns false when the invocation was fully handled by a subcommand and the
/// chat loop should not start.
pub async fn parse() -> Result<bool> {
    let matches = build().get_matches();

    if let Some(("config", config_matches)) = matches.subcommand() {
        match config_matches.subcommand() {
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
                return Ok(false);
            }
            Some(("create", _)) => {
                create_config_file().await?;
                return Ok(false);
            }
            _ => {}
        }
    }

    Config::load(vec![&matches]).await?;

    return Ok(true);
}
