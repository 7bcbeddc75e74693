mod cli;
mod commands;
mod output;

use std::{env::current_exe, fs, process};

use cli::flags::CTagger;
use commands::{generate_tags::GenerateTagsCommand, Command};
use tracing::{subscriber, Level};
use tracing_appender::{
	non_blocking::WorkerGuard,
	rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{
	fmt::{layer, writer::MakeWriterExt},
	layer::SubscriberExt,
	Registry,
};

/// Entry point for the tag extractor.
pub fn main() {
	match CTagger::from_env() {
		Ok(flags) => {
			if flags.version {
				println!("ctagger {}", env!("CARGO_PKG_VERSION"));
				return;
			}

			let _guard = init_logging(&flags);

			let command = GenerateTagsCommand::new(flags);
			if let Err(err) = command.run() {
				eprintln!("{}", err);
				process::exit(1);
			}
		}
		Err(err) => {
			println!();
			println!("{}", err);
			println!();
		}
	}
}

/// Installs a rolling-file tracing subscriber when '`--logpath`' names a
/// directory; without it, tracing stays disabled and the run is silent.
fn init_logging(flags: &CTagger) -> Option<WorkerGuard> {
	let logpath = flags.logpath.as_ref()?;
	let loglevel = flags.loglevel.as_deref().unwrap_or("debug").parse::<Level>().unwrap_or(Level::DEBUG);

	match fs::metadata(logpath) {
		Ok(ref pathinfo) if pathinfo.is_dir() => {
			let file_writer = RollingFileAppender::new(Rotation::NEVER, logpath, format!("{}.log", get_logfile_stem()));
			let (non_blocking, guard) = tracing_appender::non_blocking(file_writer);
			let subscriber = Registry::default().with(layer().with_writer(non_blocking.with_max_level(loglevel)));

			subscriber::set_global_default(subscriber).expect("Unable to set global tracing subscriber.");

			Some(guard)
		}
		_ => None,
	}
}

/// Returns a log filename stem (a filename without an extension).
#[inline]
fn get_logfile_stem() -> String {
	let default_name: String = String::from("ctagger");
	let executable_name = current_exe()
		.ok()
		.and_then(|path_buffer| path_buffer.file_stem().map(|s| s.to_os_string()).and_then(|s| s.into_string().ok()));

	executable_name.unwrap_or(default_name)
}

// Unit test fixtures.
#[cfg(test)]
mod tests;
