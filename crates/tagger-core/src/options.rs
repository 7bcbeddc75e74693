/// How emitted tags should be addressed by a consumer.
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Copy)]
pub enum LocateMode {
	/// Address tags by line number.
	LineNumber,
	/// Address tags by a search pattern built from the source line.
	Pattern,
}

/// Extraction options, passed to each session explicitly rather than read
/// from process-wide state.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Options {
	/// Emit tags whose visibility is limited to the file being read.
	pub include_file_scope: bool,
	pub locate: LocateMode,
	/// Scan the bodies of `#if 0` blocks instead of skipping them.
	pub if0: bool,
	/// Emit macro tags at all.
	pub include_define_tags: bool,
}

impl Default for Options {
	fn default() -> Self {
		Options {
			include_file_scope: true,
			locate: LocateMode::Pattern,
			if0: false,
			include_define_tags: true,
		}
	}
}
