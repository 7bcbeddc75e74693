use thiserror::Error;

pub(crate) mod generate_tags;

/// Defines a command invocation error.
#[derive(Error, Debug)]
pub enum CommandInvocationError {
	/// Nothing to do.
	#[error("No input files were supplied.")]
	NoInput,

	#[error("Unrecognized output format '{0}' (expected 'tags' or 'json').")]
	UnknownFormat(String),

	#[error("Unrecognized locate mode '{0}' (expected 'pattern' or 'number').")]
	UnknownLocate(String),

	#[error("Invalid exclude pattern '{pattern}': {source}")]
	BadExcludePattern {
		pattern: String,
		source: glob::PatternError,
	},

	/// An unexpected I/O failure writing the output.
	#[error("Unable to write output: {0}")]
	Output(#[from] std::io::Error),
}

/// A tag extractor command.
pub(crate) trait Command {
	/// Runs the command.
	fn run(&self) -> Result<(), CommandInvocationError>;
}
