pub mod arglist;
pub mod options;
pub mod preprocessor;
pub mod source;
pub mod tags;

use std::path::Path;

pub use options::{LocateMode, Options};
pub use preprocessor::{CppChar, Preprocessor, SessionFlags};
pub use source::{Pos, SourceReader};
pub use tags::{TagEntry, TagKind, TagSink};

/// The C-family languages this extractor understands. The language only
/// selects which literal syntaxes the preprocessor recognizes; the
/// directive handling is common to all of them.
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Copy, Hash)]
pub enum Language {
	C,
	Cpp,
	Csharp,
	D,
	ObjectiveC,
	Vera,
}

impl Language {
	/// Guesses the language from a file extension.
	pub fn from_path(path: &Path) -> Option<Language> {
		let ext = path.extension()?.to_str()?;
		let language = match ext {
			"c" => Language::C,
			"C" | "cc" | "cpp" | "cxx" | "c++" | "h" | "hh" | "hpp" | "hxx" | "h++" | "inl" => Language::Cpp,
			"cs" => Language::Csharp,
			"d" | "di" => Language::D,
			"m" | "mm" => Language::ObjectiveC,
			"vr" | "vri" | "vrh" => Language::Vera,
			_ => return None,
		};
		Some(language)
	}

	pub fn session_flags(self, is_header: bool) -> SessionFlags {
		SessionFlags {
			brace_format: false,
			has_at_literal_strings: matches!(self, Language::Csharp | Language::ObjectiveC),
			has_raw_literal_strings: matches!(self, Language::C | Language::Cpp),
			is_header,
		}
	}
}

/// Whether tags from this file should be treated as globally visible.
pub fn is_header_file(path: &Path) -> bool {
	matches!(
		path.extension().and_then(|e| e.to_str()),
		Some("h" | "H" | "hh" | "hpp" | "hxx" | "h++" | "inl" | "di" | "vrh")
	)
}

/// Batch entry point: runs a whole preprocessing session over one file's
/// contents and returns the macro tags found.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
	pub options: Options,
}

impl Extractor {
	pub fn new(options: Options) -> Self { Extractor { options } }

	/// Extracts tags from a file whose language can be guessed from its
	/// path; `None` when the extension is not a C-family one.
	pub fn extract(&self, path: &Path, contents: Vec<u8>) -> Option<Vec<TagEntry>> {
		let language = Language::from_path(path)?;
		Some(self.run(language.session_flags(is_header_file(path)), contents))
	}

	/// Drives a session to end of input, discarding the filtered stream;
	/// the tags are the side effect of the directive lines.
	pub fn run(&self, flags: SessionFlags, contents: Vec<u8>) -> Vec<TagEntry> {
		let mut tags = Vec::new();
		let reader = SourceReader::new(contents);
		let mut session = Preprocessor::new(reader, self.options.clone(), flags, &mut tags);
		while session.next_char() != CppChar::Eof {}
		drop(session);
		tags
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn language_from_extension() {
		assert_eq!(Language::from_path(Path::new("x/y.c")), Some(Language::C));
		assert_eq!(Language::from_path(Path::new("y.hpp")), Some(Language::Cpp));
		assert_eq!(Language::from_path(Path::new("y.cs")), Some(Language::Csharp));
		assert_eq!(Language::from_path(Path::new("y.d")), Some(Language::D));
		assert_eq!(Language::from_path(Path::new("y.m")), Some(Language::ObjectiveC));
		assert_eq!(Language::from_path(Path::new("y.vr")), Some(Language::Vera));
		assert_eq!(Language::from_path(Path::new("y.rs")), None);
		assert_eq!(Language::from_path(Path::new("Makefile")), None);
	}

	#[test]
	fn header_detection() {
		assert!(is_header_file(Path::new("a.h")));
		assert!(is_header_file(Path::new("a.hpp")));
		assert!(!is_header_file(Path::new("a.c")));
	}

	#[test]
	fn extract_collects_tags() {
		let extractor = Extractor::default();
		let tags = extractor
			.extract(Path::new("t.c"), b"#define ONE 1\n#define TWO(a) (a)+(a)\n".to_vec())
			.unwrap();
		let names: Vec<_> = tags.iter().map(|t| t.name.as_str()).collect();
		assert_eq!(names, vec!["ONE", "TWO"]);
		assert_eq!(tags[1].signature.as_deref(), Some("(a)"));
	}

	#[test]
	fn unknown_extension_yields_none() {
		let extractor = Extractor::default();
		assert!(extractor.extract(Path::new("t.py"), b"#define X 1\n".to_vec()).is_none());
	}
}
