use std::path::{Path, PathBuf};

use glob::Pattern;
use pretty_assertions::assert_eq;
use tagger_core::{Extractor, LocateMode, Options};

use crate::cli::flags::CTagger;
use crate::commands::generate_tags::GenerateTagsCommand;
use crate::output::{self, FileTag, OutputFormat};

fn parse(args: &[&str]) -> CTagger {
	CTagger::from_vec(args.iter().map(|&a| a.into()).collect()).expect("flags should parse")
}

#[test]
fn flags_parse() {
	let flags = parse(&["src/a.c", "src/b.c", "-R", "--format", "json", "--if0", "--exclude", "*.inc.c"]);
	assert_eq!(flags.paths, vec![PathBuf::from("src/a.c"), PathBuf::from("src/b.c")]);
	assert!(flags.recursive);
	assert!(flags.if0);
	assert_eq!(flags.format.as_deref(), Some("json"));
	assert_eq!(flags.exclude, vec!["*.inc.c".to_string()]);
	assert!(!flags.version);
}

#[test]
fn options_map_onto_core() {
	let cmd = GenerateTagsCommand::new(parse(&["a.c", "--if0", "--no-file-scope", "--locate", "number"]));
	let options = cmd.options().expect("valid options");
	assert_eq!(
		options,
		Options { include_file_scope: false, locate: LocateMode::LineNumber, if0: true, include_define_tags: true }
	);
}

#[test]
fn bad_locate_and_format_are_rejected() {
	assert!(GenerateTagsCommand::new(parse(&["a.c", "--locate", "offset"])).options().is_err());
	assert!(GenerateTagsCommand::new(parse(&["a.c", "--format", "xml"])).format().is_err());
}

#[test]
fn exclusion_globs_match_paths_and_names() {
	let patterns = vec![Pattern::new("*.inc.c").unwrap(), Pattern::new("vendor").unwrap()];
	assert!(GenerateTagsCommand::excluded(&patterns, Path::new("src/gen.inc.c")));
	assert!(GenerateTagsCommand::excluded(&patterns, Path::new("a/b/vendor")));
	assert!(!GenerateTagsCommand::excluded(&patterns, Path::new("src/main.c")));
}

#[test]
fn directory_walk_keeps_only_c_family_files() {
	let root = std::env::temp_dir().join(format!("ctagger-walk-{}", std::process::id()));
	let sub = root.join("sub");
	std::fs::create_dir_all(&sub).expect("temp tree");
	for name in ["a.c", "b.rs", "c.hpp", "note.txt", "Makefile"] {
		std::fs::write(root.join(name), b"").expect("temp file");
	}
	std::fs::write(sub.join("d.m"), b"").expect("temp file");

	let names = |paths: Vec<std::path::PathBuf>| {
		let mut names: Vec<String> =
			paths.iter().filter_map(|p| p.file_name()).map(|n| n.to_string_lossy().into_owned()).collect();
		names.sort();
		names
	};

	// The recursive walk filters on language by extension.
	let cmd = GenerateTagsCommand::new(parse(&[root.to_str().expect("utf-8 temp path"), "-R"]));
	assert_eq!(names(cmd.collect_files(&[])), vec!["a.c", "c.hpp", "d.m"]);

	// Exclusions apply on top of the language filter.
	let patterns = vec![Pattern::new("*.hpp").unwrap()];
	assert_eq!(names(cmd.collect_files(&patterns)), vec!["a.c", "d.m"]);

	std::fs::remove_dir_all(&root).expect("temp tree cleanup");
}

fn sample_tags(contents: &[u8], options: Options) -> Vec<FileTag> {
	let extractor = Extractor::new(options);
	let path = PathBuf::from("t.c");
	extractor
		.extract(&path, contents.to_vec())
		.expect("t.c is a C file")
		.into_iter()
		.map(|entry| FileTag::new(path.clone(), entry, contents))
		.collect()
}

#[test]
fn tags_format_lines() {
	let contents = b"#define FOO 42\n#define ADD(a,b) a+b\n";
	let tags = sample_tags(contents, Options::default());
	let mut out = Vec::new();
	output::write(&mut out, &tags, OutputFormat::Tags).unwrap();
	assert_eq!(
		String::from_utf8(out).unwrap(),
		"FOO\tt.c\t/^#define FOO/;\"\td\nADD\tt.c\t/^#define ADD/;\"\td\tsignature:(a,b)\n"
	);
}

#[test]
fn line_number_addresses() {
	let contents = b"\n#define FOO 42\n";
	let options = Options { locate: LocateMode::LineNumber, ..Options::default() };
	let tags = sample_tags(contents, options);
	assert_eq!(tags[0].address(), "2");
}

#[test]
fn pattern_addresses_escape_slashes() {
	// An untruncated pattern keeps the whole line, escapes its slashes
	// and keeps the closing anchor.
	let contents = b"#define RATIO 22/7\n";
	let mut tags = sample_tags(contents, Options::default());
	tags[0].entry.truncate_line = false;
	assert_eq!(tags[0].address(), "/^#define RATIO 22\\/7$/");
	// A truncatable pattern whose name is missing from the line text
	// falls back to the full anchored form too.
	tags[0].entry.truncate_line = true;
	tags[0].entry.name = "missing".to_string();
	assert_eq!(tags[0].address(), "/^#define RATIO 22\\/7$/");
}

#[test]
fn json_format_lines() {
	let contents = b"#define FOO 42\n";
	let tags = sample_tags(contents, Options::default());
	let mut out = Vec::new();
	output::write(&mut out, &tags, OutputFormat::Json).unwrap();
	assert_eq!(
		String::from_utf8(out).unwrap(),
		"{\"_type\":\"tag\",\"name\":\"FOO\",\"path\":\"t.c\",\"kind\":\"macro\",\"line\":1,\"pattern\":\"/^#define FOO/\",\"fileScope\":true}\n"
	);
}
