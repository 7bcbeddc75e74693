use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use glob::Pattern;
use itertools::Itertools;
use tagger_core::{Extractor, Language, LocateMode, Options};
use walkdir::WalkDir;

use crate::cli::flags::CTagger;
use crate::commands::{Command, CommandInvocationError};
use crate::output::{self, FileTag, OutputFormat};

/// Reads every requested source file and writes one record per macro tag.
pub struct GenerateTagsCommand {
	flags: CTagger,
}

impl GenerateTagsCommand {
	/// Initializes a new [`GenerateTagsCommand`] instance.
	pub fn new(flags: CTagger) -> Self { GenerateTagsCommand { flags } }

	pub(crate) fn options(&self) -> Result<Options, CommandInvocationError> {
		let locate = match self.flags.locate.as_deref() {
			None | Some("pattern") => LocateMode::Pattern,
			Some("number") => LocateMode::LineNumber,
			Some(other) => return Err(CommandInvocationError::UnknownLocate(other.to_string())),
		};
		Ok(Options {
			include_file_scope: !self.flags.no_file_scope,
			locate,
			if0: self.flags.if0,
			include_define_tags: !self.flags.no_define_tags,
		})
	}

	pub(crate) fn format(&self) -> Result<OutputFormat, CommandInvocationError> {
		match self.flags.format.as_deref() {
			None | Some("tags") => Ok(OutputFormat::Tags),
			Some("json") => Ok(OutputFormat::Json),
			Some(other) => Err(CommandInvocationError::UnknownFormat(other.to_string())),
		}
	}

	fn exclusions(&self) -> Result<Vec<Pattern>, CommandInvocationError> {
		self.flags
			.exclude
			.iter()
			.map(|p| {
				Pattern::new(p)
					.map_err(|source| CommandInvocationError::BadExcludePattern { pattern: p.clone(), source })
			})
			.collect()
	}

	pub(crate) fn excluded(patterns: &[Pattern], path: &Path) -> bool {
		patterns.iter().any(|p| {
			p.matches_path(path) || path.file_name().map_or(false, |n| p.matches(&n.to_string_lossy()))
		})
	}

	/// Expands directories (with `--recursive`) into the C-family files
	/// they contain and applies the exclusion patterns.
	pub(crate) fn collect_files(&self, patterns: &[Pattern]) -> Vec<PathBuf> {
		let mut files = Vec::new();
		for path in &self.flags.paths {
			if path.is_dir() {
				if !self.flags.recursive {
					tracing::warn!(path = %path.display(), "skipping directory without --recursive");
					eprintln!("ctagger: skipping directory '{}' (use --recursive)", path.display());
					continue;
				}
				for entry in WalkDir::new(path).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
					let candidate = entry.path();
					if entry.file_type().is_file()
						&& Language::from_path(candidate).is_some()
						&& !Self::excluded(patterns, candidate)
					{
						files.push(candidate.to_path_buf());
					}
				}
			} else if !Self::excluded(patterns, path) {
				files.push(path.clone());
			}
		}
		files
	}

	fn read_source(path: &Path) -> anyhow::Result<Vec<u8>> {
		fs::read(path).with_context(|| format!("unable to read '{}'", path.display()))
	}
}

impl Command for GenerateTagsCommand {
	fn run(&self) -> Result<(), CommandInvocationError> {
		if self.flags.paths.is_empty() {
			return Err(CommandInvocationError::NoInput);
		}
		let options = self.options()?;
		let format = self.format()?;
		let patterns = self.exclusions()?;
		let extractor = Extractor::new(options);

		let mut found = Vec::new();
		for path in self.collect_files(&patterns) {
			let contents = match Self::read_source(&path) {
				Ok(contents) => contents,
				Err(err) => {
					// A single unreadable file never aborts the run.
					tracing::warn!("{err:#}");
					eprintln!("ctagger: {err:#}");
					continue;
				}
			};
			match extractor.extract(&path, contents.clone()) {
				Some(tags) => {
					tracing::debug!(path = %path.display(), count = tags.len(), "extracted");
					for entry in tags {
						found.push(FileTag::new(path.clone(), entry, &contents));
					}
				}
				None => tracing::debug!(path = %path.display(), "not a C-family file"),
			}
		}

		let found: Vec<_> = found
			.into_iter()
			.sorted_by(|a, b| a.entry.name.cmp(&b.entry.name).then_with(|| a.path.cmp(&b.path)))
			.collect();

		match &self.flags.output {
			Some(path) => {
				let mut writer = BufWriter::new(fs::File::create(path)?);
				output::write(&mut writer, &found, format)?;
				writer.flush()?;
			}
			None => {
				let stdout = io::stdout();
				let mut writer = stdout.lock();
				output::write(&mut writer, &found, format)?;
			}
		}
		Ok(())
	}
}
