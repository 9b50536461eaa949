mod commands;
mod terminal;

use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use friend_reminder_core::{config::Config, models::ContactMethod};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Remember to stay in touch with your friends.
#[derive(Debug, Parser)]
#[command(name = "friend-reminder", version)]
struct Cli {
	/// TOML config file
	#[arg(long, env = "FRIEND_REMINDER_CONFIG", global = true)]
	config: Option<PathBuf>,

	/// Override the data directory from the config
	#[arg(long, global = true)]
	data_dir: Option<PathBuf>,

	#[command(subcommand)]
	command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
	/// Show everyone, most overdue first
	List {
		#[arg(long)]
		json: bool,
	},
	/// Add a friend, contacted as of now
	Add {
		name: String,
		/// message, call, email, in-person or video-call
		#[arg(long, default_value = "message")]
		method: ContactMethod,
		/// Days between contacts
		#[arg(long, default_value_t = 7, value_parser = clap::value_parser!(u32).range(1..))]
		every: u32,
	},
	/// Change a friend's name, method or frequency
	Edit {
		id: String,
		#[arg(long)]
		name: Option<String>,
		#[arg(long)]
		method: Option<ContactMethod>,
		#[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
		every: Option<u32>,
	},
	/// Mark a friend as contacted just now
	Done { id: String },
	/// Remove a friend
	Delete {
		id: String,
		/// Don't ask for confirmation
		#[arg(long)]
		yes: bool,
	},
	/// Write a backup file of all friends
	Export,
	/// Replace all friends with the contents of a backup file
	Import {
		/// Backup file; asks for one when omitted
		file: Option<PathBuf>,
		/// Don't ask for confirmation
		#[arg(long)]
		yes: bool,
	},
	/// How many friends a backup would contain
	Info,
}

fn init_logging(config: &Config) {
	std::fs::create_dir_all(&config.log_dir).ok();
	let file_appender = tracing_appender::rolling::never(&config.log_dir, "friend-reminder.log");
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

	tracing_subscriber::registry()
		.with(filter)
		.with(tracing_subscriber::fmt::layer().with_writer(file_appender).with_ansi(false))
		.init();
}

#[tokio::main]
async fn main() -> ExitCode {
	let cli = Cli::parse();

	let mut config = match Config::load(cli.config.as_deref()) {
		Ok(config) => config,
		Err(e) => {
			eprintln!("error: {e}");
			return ExitCode::FAILURE;
		}
	};
	if let Some(dir) = cli.data_dir {
		config.data_dir = dir;
	}

	init_logging(&config);
	tracing::debug!("using data dir {}", config.data_dir.display());

	match commands::run(cli.command, &config).await {
		Ok(code) => code,
		Err(e) => {
			tracing::error!("{e:#}");
			eprintln!("error: {e:#}");
			ExitCode::FAILURE
		}
	}
}
