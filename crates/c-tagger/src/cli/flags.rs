use std::path::PathBuf;

xflags::xflags! {
	src "./src/cli/flags.rs"

	/// A macro tag extractor for C, C++, C#, D, Objective-C and Vera
	/// source files.
	cmd c-tagger {
		/// Files or directories to read.
		repeated paths: PathBuf

		/// Recurse into directories.
		optional -R,--recursive

		/// Skip files matching this glob (may be repeated).
		repeated --exclude pattern: String

		/// Output format: 'tags' (default) or 'json'.
		optional --format format: String

		/// Write output here instead of stdout.
		optional -o,--output path: PathBuf

		/// Scan the bodies of '#if 0' blocks.
		optional --if0

		/// Do not emit macro tags.
		optional --no-define-tags

		/// Drop tags that are only visible inside their own source file.
		optional --no-file-scope

		/// Tag addressing: 'pattern' (default) or 'number'.
		optional --locate mode: String

		/// Optional path to a folder where a log file will be written.
		optional --logpath path: PathBuf

		/// Optional log level to apply when writing to the log file. Defaults to 'debug'.
		optional --loglevel level: String

		///  Displays the version number.
		optional -v,--version
	}
}
// generated start
// The following code is generated by `xflags` macro.
// Run `env UPDATE_XFLAGS=1 cargo build` to regenerate.
#[derive(Debug)]
pub struct CTagger {
    pub paths: Vec<PathBuf>,
    pub recursive: bool,
    pub exclude: Vec<String>,
    pub format: Option<String>,
    pub output: Option<PathBuf>,
    pub if0: bool,
    pub no_define_tags: bool,
    pub no_file_scope: bool,
    pub locate: Option<String>,
    pub logpath: Option<PathBuf>,
    pub loglevel: Option<String>,
    pub version: bool,
}

impl CTagger {
    #[allow(dead_code)]
    pub fn from_env_or_exit() -> Self {
        Self::from_env_or_exit_()
    }

    #[allow(dead_code)]
    pub fn from_env() -> xflags::Result<Self> {
        Self::from_env_()
    }

    #[allow(dead_code)]
    pub fn from_vec(args: Vec<std::ffi::OsString>) -> xflags::Result<Self> {
        Self::from_vec_(args)
    }
}
// generated end
