use std::io::{self, Write};
use std::path::PathBuf;

use serde::Serialize;
use tagger_core::TagEntry;

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub(crate) enum OutputFormat {
	/// Classic tags-file lines.
	Tags,
	/// One JSON object per line.
	Json,
}

/// A tag paired with the file it came from and the text of its source
/// line, from which pattern addresses are built.
pub(crate) struct FileTag {
	pub path: PathBuf,
	pub entry: TagEntry,
	line_text: String,
}

impl FileTag {
	pub fn new(path: PathBuf, entry: TagEntry, contents: &[u8]) -> Self {
		let line_text = line_at(contents, entry.offset);
		FileTag { path, entry, line_text }
	}

	/// The tags-file address. Truncatable patterns are cut right after
	/// the tag name and lose their closing anchor.
	pub(crate) fn address(&self) -> String {
		if self.entry.line_number_entry {
			return self.entry.line_number.to_string();
		}
		let mut line = self.line_text.as_str();
		let mut truncated = false;
		if self.entry.truncate_line {
			if let Some(at) = line.find(&self.entry.name) {
				line = &line[..at + self.entry.name.len()];
				truncated = true;
			}
		}
		let mut escaped = String::with_capacity(line.len() + 4);
		for ch in line.chars() {
			if ch == '\\' || ch == '/' {
				escaped.push('\\');
			}
			escaped.push(ch);
		}
		if truncated {
			format!("/^{}/", escaped)
		} else {
			format!("/^{}$/", escaped)
		}
	}
}

fn line_at(contents: &[u8], offset: usize) -> String {
	let offset = offset.min(contents.len());
	let start = contents[..offset].iter().rposition(|&b| b == b'\n').map_or(0, |p| p + 1);
	let end = contents[start..].iter().position(|&b| b == b'\n').map_or(contents.len(), |p| start + p);
	String::from_utf8_lossy(&contents[start..end]).into_owned()
}

#[derive(Serialize)]
struct JsonTag<'a> {
	#[serde(rename = "_type")]
	record: &'static str,
	name: &'a str,
	path: String,
	kind: &'static str,
	line: u64,
	#[serde(skip_serializing_if = "Option::is_none")]
	pattern: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	signature: Option<&'a str>,
	#[serde(rename = "fileScope", skip_serializing_if = "is_false")]
	file_scope: bool,
}

fn is_false(b: &bool) -> bool { !*b }

pub(crate) fn write(w: &mut dyn Write, tags: &[FileTag], format: OutputFormat) -> io::Result<()> {
	match format {
		OutputFormat::Tags => {
			for tag in tags {
				write!(w, "{}\t{}\t{};\"\t{}", tag.entry.name, tag.path.display(), tag.address(), tag.entry.kind.letter())?;
				if let Some(signature) = &tag.entry.signature {
					write!(w, "\tsignature:{}", signature)?;
				}
				writeln!(w)?;
			}
		}
		OutputFormat::Json => {
			for tag in tags {
				let record = JsonTag {
					record: "tag",
					name: &tag.entry.name,
					path: tag.path.display().to_string(),
					kind: tag.entry.kind.name(),
					line: tag.entry.line_number,
					pattern: if tag.entry.line_number_entry { None } else { Some(tag.address()) },
					signature: tag.entry.signature.as_deref(),
					file_scope: tag.entry.file_scope,
				};
				writeln!(w, "{}", serde_json::to_string(&record)?)?;
			}
		}
	}
	Ok(())
}
