#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

use std::io;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::builder::PossibleValuesParser;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use yansi::Paint;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Flag;
use crate::domain::models::IssueType;
use crate::domain::models::SessionRecord;
use crate::infrastructure::storage::host_log_path;
use crate::infrastructure::storage::LogReader;

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
    std::process::exit(0);
}

fn format_record(record: &SessionRecord) -> String {
    let end_time = record
        .end_time
        .map(|end_time| return end_time.to_rfc3339())
        .unwrap_or_else(|| return "unfinished".to_string());

    let mut res = format!(
        "- #{} ({}) {}, {} -> {}, spent {:.2}h of {:.2}h estimated",
        record.issue_id,
        record.project_id,
        record.issue_type,
        record.start_time.to_rfc3339(),
        end_time,
        record.spent_hours,
        record.estimated_hours,
    );

    if let Some(parent) = record.parent {
        res = format!("{res}, parent #{}", parent.id);
    }

    if !record.user.first_name.is_empty() || !record.user.last_name.is_empty() {
        res = format!(
            "{res}, by {} {}",
            record.user.first_name, record.user.last_name
        );
    }

    return res;
}

async fn print_log(log_path: Option<&String>) -> Result<()> {
    let reader = match log_path {
        Some(log_path) => LogReader::new(path::PathBuf::from(log_path)),
        None => LogReader::for_host(&path::PathBuf::from(Config::get(ConfigKey::DataDir)))?,
    };

    let records = reader
        .read()
        .await?
        .iter()
        .map(format_record)
        .collect::<Vec<String>>();

    if records.is_empty() {
        println!("There are no sessions logged yet. Start your first one!");
    } else {
        println!("{}", records.join("\n"));
    }

    return Ok(());
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if let Some(parent) = config_file_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    let mut file = fs::File::create(&config_file_path).await?;
    file.write_all(Config::serialize_default().as_bytes())
        .await?;

    println!("Created default config file at {config_file_path_str}");
    return Ok(());
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_log() -> Command {
    return Command::new("log")
        .about("List the sessions recorded on this machine.")
        .arg(
            clap::Arg::new("log-file")
                .short('f')
                .long("file")
                .help("Read this log file instead of the one named after this host.")
                .num_args(1),
        )
        .subcommand(Command::new("path").about("Print the path of this host's session log."));
}

fn subcommand_start() -> Command {
    return Command::new("start")
        .about("Self-assign the issue and time the session until CTRL+C. This is the default when no subcommand is given.");
}

fn flag_help(key: ConfigKey) -> String {
    let Some(flag) = Flag::find(key) else {
        return "".to_string();
    };

    // Placeholder defaults such as the unset issue id are not worth showing.
    let default = flag.default_value();
    if default.is_empty() || flag.validate(&default).is_err() {
        return flag.usage.to_string();
    }

    return format!("{} [default: {default}]", flag.usage);
}

fn arg_flag(key: ConfigKey, env_var: &'static str) -> Arg {
    return Arg::new(key.to_string())
        .long(key.to_string())
        .env(env_var)
        .num_args(1)
        .help(flag_help(key))
        .global(true);
}

pub fn build() -> Command {
    let about = format!(
        "{}\n\nVersion: {}\nCommit: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_GIT_DESCRIBE")
    );

    let notes = format!(
        "{}\n  The issue will be self assigned.\n  The results will be written to \"./data/<your_host_name>\".\n\n{}\n  issuetimer --project-id=111 --issue-id=632 --redmine-base-url=https://redmine.com --api-key=<your_api_key>",
        Paint::new("NOTES:").underline().bold(),
        Paint::new("EXAMPLE:").underline().bold(),
    );

    return Command::new("issuetimer")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(notes)
        .arg_required_else_help(false)
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(subcommand_log())
        .subcommand(subcommand_start())
        .arg(arg_flag(ConfigKey::ProjectID, "ISSUETIMER_PROJECT_ID"))
        .arg(arg_flag(ConfigKey::IssueID, "ISSUETIMER_ISSUE_ID").short('i'))
        .arg(arg_flag(ConfigKey::ApiKey, "ISSUETIMER_API_KEY").hide_env_values(true))
        .arg(arg_flag(ConfigKey::RedmineBaseURL, "ISSUETIMER_REDMINE_BASE_URL"))
        .arg(arg_flag(ConfigKey::EstimatedTime, "ISSUETIMER_ESTIMATED_TIME"))
        .arg(
            arg_flag(ConfigKey::IssueType, "ISSUETIMER_ISSUE_TYPE")
                .value_parser(PossibleValuesParser::new(IssueType::FLAG_VALUES)),
        )
        .arg(
            Arg::new(ConfigKey::DataDir.to_string())
                .short('d')
                .long(ConfigKey::DataDir.to_string())
                .env("ISSUETIMER_DATA_DIR")
                .num_args(1)
                .help("Directory holding the per-host session logs. [default: ./data]")
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::ConfigFile.to_string())
                .short('c')
                .long(ConfigKey::ConfigFile.to_string())
                .env("ISSUETIMER_CONFIG_FILE")
                .num_args(1)
                .help(format!("Path to configuration file [default: {}]", Config::default(ConfigKey::ConfigFile)))
                .global(true)
        );
}

/// Returns true when a session should be started.
pub async fn parse() -> Result<bool> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
            return Ok(false);
        }
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file().await?;
                return Ok(false);
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default());
                return Ok(false);
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
                return Ok(false);
            }
            _ => {
                subcommand_config().print_long_help()?;
                return Ok(false);
            }
        },
        Some(("log", subcmd_matches)) => {
            Config::load(vec![&matches, subcmd_matches]).await?;
            match subcmd_matches.subcommand() {
                Some(("path", _)) => {
                    let data_dir = path::PathBuf::from(Config::get(ConfigKey::DataDir));
                    println!("{}", host_log_path(&data_dir)?.to_string_lossy());
                }
                _ => {
                    print_log(subcmd_matches.get_one::<String>("log-file")).await?;
                }
            }
            return Ok(false);
        }
        Some(("start", subcmd_matches)) => {
            Config::load(vec![&matches, subcmd_matches]).await?;
        }
        _ => {
            Config::load(vec![&matches]).await?;
        }
    }

    return Ok(true);
}
