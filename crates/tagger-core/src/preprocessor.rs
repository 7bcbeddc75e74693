use crate::arglist;
use crate::options::{LocateMode, Options};
use crate::source::{Pos, SourceReader};
use crate::tags::{TagEntry, TagKind, TagSink};

/// One element of the filtered character stream.
///
/// String and character literals are elided and replaced by the
/// [`StringLiteral`](CppChar::StringLiteral) and
/// [`CharLiteral`](CppChar::CharLiteral) sentinels, which a consumer treats
/// as opaque single tokens. They are deliberately not bytes, so they can
/// never collide with source text.
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Copy, Hash)]
pub enum CppChar {
	Byte(u8),
	StringLiteral,
	CharLiteral,
	Eof,
}

/// Per-session capabilities, fixed at construction.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Default)]
pub struct SessionFlags {
	/// The consumer delimits blocks by brace counting rather than by
	/// statement completion, which disables the single-branch heuristics
	/// of the conditional evaluator.
	pub brace_format: bool,
	/// Recognize `@"..."` verbatim strings (C#, Objective-C).
	pub has_at_literal_strings: bool,
	/// Recognize `R"delim(...)delim"` raw strings (C++).
	pub has_raw_literal_strings: bool,
	/// The file being read is a header, so macro tags are not file-scoped.
	pub is_header: bool,
}

const MAX_NESTING: usize = 20;

/// One level of `#if`...`#endif` nesting.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Default)]
struct ConditionalFrame {
	/// The enclosing frame was already suppressing when this conditional
	/// was entered, so every branch of it is suppressed.
	ignore_all_branches: bool,
	/// Only one branch of this conditional may be followed.
	single_branch: bool,
	/// Some branch of this conditional has already been accepted.
	branch_chosen: bool,
	/// Bytes in the current branch are being suppressed right now.
	ignoring: bool,
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
enum DirectiveState {
	None,
	Hash,
	Define,
	Undef,
	If,
	Pragma,
}

struct Directive {
	state: DirectiveState,
	/// True iff a `#` at the current position would start a directive:
	/// at start of input and after each newline, until a token lands on
	/// the line.
	accept: bool,
	/// Scratch identifier buffer.
	name: String,
	/// Conditional stack depth; frame 0 is the always-active outermost
	/// frame and is never written.
	nest_level: usize,
	ifdef: [ConditionalFrame; MAX_NESTING],
}

enum CommentKind {
	C,
	Cplus,
	D,
}

/// A preprocessing session over one source file.
///
/// Pulls bytes from its [`SourceReader`] and yields the filtered stream
/// via [`next_char`](Self::next_char): comments collapse to a space,
/// string/char literals collapse to sentinels, trigraphs and digraphs fold
/// to their canonical characters, backslash-newline joins lines, and
/// preprocessor directives are consumed entirely, emitting one macro tag
/// per `#define`/`#undef` and per `#pragma weak` into the sink.
pub struct Preprocessor<'s> {
	reader: SourceReader,
	options: Options,
	flags: SessionFlags,
	sink: &'s mut dyn TagSink,
	pushback: [CppChar; 2],
	pushback_len: usize,
	/// Set by the consumer while a multi-token construct is in progress;
	/// restricts conditionals to following at most one branch.
	resolve_required: bool,
	directive: Directive,
}

fn is_ident1(c: u8) -> bool { c.is_ascii_alphabetic() || c == b'_' }

fn is_ident(c: u8) -> bool { c.is_ascii_alphanumeric() || c == b'_' }

/// Anything may delimit a raw string except whitespace, parentheses and
/// backslash.
fn is_raw_delim(c: u8) -> bool { !matches!(c, b' ' | 0x0c | b'\n' | b'\r' | b'\t' | 0x0b | b'(' | b')' | b'\\') }

impl<'s> Preprocessor<'s> {
	pub fn new(reader: SourceReader, options: Options, flags: SessionFlags, sink: &'s mut dyn TagSink) -> Self {
		Preprocessor {
			reader,
			options,
			flags,
			sink,
			pushback: [CppChar::Eof; 2],
			pushback_len: 0,
			resolve_required: false,
			directive: Directive {
				state: DirectiveState::None,
				accept: true,
				name: String::new(),
				nest_level: 0,
				ifdef: [ConditionalFrame::default(); MAX_NESTING],
			},
		}
	}

	/// The consumer has begun a multi-token construct.
	pub fn begin_statement(&mut self) { self.resolve_required = true }

	/// The consumer has reached a statement boundary.
	pub fn end_statement(&mut self) { self.resolve_required = false }

	/// Current conditional nesting depth.
	pub fn nest_level(&self) -> usize { self.directive.nest_level }

	pub fn is_brace_format(&self) -> bool { self.flags.brace_format }

	/// Pushes a character back onto the filtered stream. At most two
	/// characters may be outstanding; any further pushback is a caller
	/// bug and is dropped.
	pub fn unget_char(&mut self, c: CppChar) {
		debug_assert!(self.pushback_len < 2, "more than two outstanding pushback characters");
		if self.pushback_len < 2 {
			self.pushback[self.pushback_len] = c;
			self.pushback_len += 1;
		}
	}

	/// Re-reads `[start, head)` and reconstructs `name`'s parenthesized
	/// argument list from it.
	pub fn arglist_from_file_pos(&mut self, start: &Pos, name: &str) -> Option<String> {
		arglist::arglist_from_file_pos(&mut self.reader, start, name)
	}

	/// Returns the next filtered character.
	pub fn next_char(&mut self) -> CppChar {
		if self.pushback_len > 0 {
			self.pushback_len -= 1;
			return self.pushback[self.pushback_len];
		}

		// `directive` is set while the bytes of a directive line are being
		// consumed; `ignore` while inside a suppressed conditional branch.
		// Either one keeps the loop eating input instead of returning it.
		let mut directive = false;
		let mut ignore = false;

		'next: loop {
			let mut c = self.reader.read();

			// Folding `??=`/`??/`/`%:` produces a character that must be
			// classified again from the top, so classification is a loop
			// over a slot rather than a straight match.
			let out = 'classify: loop {
				match c {
					None => return CppChar::Eof,
					Some(b @ b' ') | Some(b @ b'\t') => break 'classify CppChar::Byte(b),
					Some(b'\n') => {
						if directive && !ignore {
							directive = false;
						}
						self.directive.accept = true;
						break 'classify CppChar::Byte(b'\n');
					}
					Some(b'"') => {
						self.directive.accept = false;
						match self.skip_string(false) {
							CppChar::Eof => c = None,
							other => break 'classify other,
						}
					}
					Some(b'\'') => {
						self.directive.accept = false;
						match self.skip_char() {
							CppChar::Eof => c = None,
							other => break 'classify other,
						}
					}
					Some(b'#') => {
						if self.directive.accept {
							directive = true;
							self.directive.state = DirectiveState::Hash;
							self.directive.accept = false;
						}
						break 'classify CppChar::Byte(b'#');
					}
					Some(b'/') => match self.comment_kind() {
						Some(kind) => {
							let skipped = match kind {
								CommentKind::C => self.skip_c_comment(),
								CommentKind::Cplus => self.skip_cplus_comment(),
								CommentKind::D => self.skip_d_comment(),
							};
							match skipped {
								CppChar::Eof => c = None,
								other => break 'classify other,
							}
						}
						None => {
							// A bare slash; make sure a later `#` on this
							// line cannot start a directive.
							self.directive.accept = false;
							break 'classify CppChar::Byte(b'/');
						}
					},
					Some(b'\\') => match self.reader.read() {
						Some(b'\n') => continue 'next,
						Some(nb) => {
							self.reader.unget(nb);
							break 'classify CppChar::Byte(b'\\');
						}
						None => break 'classify CppChar::Byte(b'\\'),
					},
					Some(b'?') => match self.reader.read() {
						Some(b'?') => match self.reader.read() {
							Some(b'(') => break 'classify CppChar::Byte(b'['),
							Some(b')') => break 'classify CppChar::Byte(b']'),
							Some(b'<') => break 'classify CppChar::Byte(b'{'),
							Some(b'>') => break 'classify CppChar::Byte(b'}'),
							Some(b'!') => break 'classify CppChar::Byte(b'|'),
							Some(b'\'') => break 'classify CppChar::Byte(b'^'),
							Some(b'-') => break 'classify CppChar::Byte(b'~'),
							Some(b'=') => {
								c = Some(b'#');
								continue 'classify;
							}
							Some(b'/') => {
								c = Some(b'\\');
								continue 'classify;
							}
							Some(other) => {
								// Not a trigraph; put everything but the
								// first '?' back.
								self.reader.unget(other);
								self.reader.unget(b'?');
								break 'classify CppChar::Byte(b'?');
							}
							None => {
								self.reader.unget(b'?');
								break 'classify CppChar::Byte(b'?');
							}
						},
						Some(other) => {
							self.reader.unget(other);
							break 'classify CppChar::Byte(b'?');
						}
						None => break 'classify CppChar::Byte(b'?'),
					},
					Some(b'<') => {
						let folded = match self.reader.read() {
							Some(b':') => b'[',
							Some(b'%') => b'{',
							Some(other) => {
								self.reader.unget(other);
								b'<'
							}
							None => b'<',
						};
						break 'classify self.classify_default(folded, directive, &mut ignore);
					}
					Some(b':') => {
						let folded = match self.reader.read() {
							Some(b'>') => b']',
							Some(other) => {
								self.reader.unget(other);
								b':'
							}
							None => b':',
						};
						break 'classify self.classify_default(folded, directive, &mut ignore);
					}
					Some(b'%') => match self.reader.read() {
						Some(b'>') => break 'classify self.classify_default(b'}', directive, &mut ignore),
						Some(b':') => {
							c = Some(b'#');
							continue 'classify;
						}
						Some(other) => {
							self.reader.unget(other);
							break 'classify self.classify_default(b'%', directive, &mut ignore);
						}
						None => break 'classify self.classify_default(b'%', directive, &mut ignore),
					},
					Some(b) => break 'classify self.classify_default(b, directive, &mut ignore),
				}
			};

			if !(directive || ignore) {
				return out;
			}
		}
	}

	/// Everything that is not special at the top level: verbatim and raw
	/// string openers, and otherwise an ordinary character that may belong
	/// to a directive line.
	fn classify_default(&mut self, b: u8, directive: bool, ignore: &mut bool) -> CppChar {
		if b == b'@' && self.flags.has_at_literal_strings {
			match self.reader.read() {
				Some(b'"') => {
					self.directive.accept = false;
					return self.skip_string(true);
				}
				Some(nb) => self.reader.unget(nb),
				None => {}
			}
		} else if b == b'R' && self.flags.has_raw_literal_strings && self.raw_literal_prefix_ok() {
			match self.reader.read() {
				Some(b'"') => {
					self.directive.accept = false;
					return self.skip_raw_string();
				}
				Some(nb) => self.reader.unget(nb),
				None => {}
			}
		}
		self.directive.accept = false;
		if directive {
			*ignore = self.handle_directive(b);
		}
		CppChar::Byte(b)
	}

	/// `R` opens a raw string only when it is not the tail of an ordinary
	/// identifier; an encoding prefix of exactly `L`, `u`, `U` or `u8` is
	/// allowed. The head sits just past the `R`, so lookbehind starts at 2.
	fn raw_literal_prefix_ok(&self) -> bool {
		let prev = self.reader.nth_prev(2);
		let prev2 = self.reader.nth_prev(3);
		let prev3 = self.reader.nth_prev(4);
		!is_ident(prev)
			|| ((prev == b'u' || prev == b'U' || prev == b'L') && !is_ident(prev2))
			|| (prev == b'8' && prev2 == b'u' && !is_ident(prev3))
	}

	fn comment_kind(&mut self) -> Option<CommentKind> {
		match self.reader.read() {
			Some(b'*') => Some(CommentKind::C),
			Some(b'/') => Some(CommentKind::Cplus),
			Some(b'+') => Some(CommentKind::D),
			Some(other) => {
				self.reader.unget(other);
				None
			}
			None => None,
		}
	}

	/// Entered after `/*`; consumes up to and including `*/`.
	fn skip_c_comment(&mut self) -> CppChar {
		loop {
			match self.reader.read() {
				None => return CppChar::Eof,
				Some(b'*') => loop {
					match self.reader.read() {
						Some(b'/') => return CppChar::Byte(b' '),
						Some(b'*') => {}
						Some(_) => break,
						None => return CppChar::Eof,
					}
				},
				Some(_) => {}
			}
		}
	}

	/// Entered after `/+`; consumes up to and including `+/`. Nested
	/// `/+ +/` comments are not matched.
	fn skip_d_comment(&mut self) -> CppChar {
		loop {
			match self.reader.read() {
				None => return CppChar::Eof,
				Some(b'+') => loop {
					match self.reader.read() {
						Some(b'/') => return CppChar::Byte(b' '),
						Some(b'+') => {}
						Some(_) => break,
						None => return CppChar::Eof,
					}
				},
				Some(_) => {}
			}
		}
	}

	/// Entered after `//`; consumes up to but not including the newline,
	/// so the driver still sees the line end. A backslash continues the
	/// comment onto the next line.
	fn skip_cplus_comment(&mut self) -> CppChar {
		loop {
			match self.reader.read() {
				None => return CppChar::Eof,
				Some(b'\\') => {
					let _ = self.reader.read();
				}
				Some(b'\n') => {
					self.reader.unget(b'\n');
					return CppChar::Byte(b' ');
				}
				Some(_) => {}
			}
		}
	}

	/// Entered after the opening quote; consumes up to and including the
	/// closing quote. `ignore_backslash` is set for verbatim strings,
	/// where a backslash has no escape meaning.
	fn skip_string(&mut self, ignore_backslash: bool) -> CppChar {
		loop {
			match self.reader.read() {
				None => return CppChar::Eof,
				Some(b'\\') if !ignore_backslash => {
					let _ = self.reader.read();
				}
				Some(b'"') => return CppChar::StringLiteral,
				Some(_) => {}
			}
		}
	}

	/// Entered after the opening quote. Also understands the Vera base
	/// notation `'b1010`-style literals: after a base character, the
	/// literal extends through the following alphanumerics.
	fn skip_char(&mut self) -> CppChar {
		let mut count = 0u32;
		let mut vera_base = false;
		loop {
			let c = match self.reader.read() {
				None => return CppChar::Eof,
				Some(c) => c,
			};
			count += 1;
			match c {
				b'\\' => {
					let _ = self.reader.read();
				}
				b'\'' => break,
				b'\n' => {
					self.reader.unget(b'\n');
					break;
				}
				_ if count == 1 && matches!(c.to_ascii_uppercase(), b'D' | b'H' | b'O' | b'B') => vera_base = true,
				_ if vera_base && !c.is_ascii_alphanumeric() => {
					self.reader.unget(c);
					break;
				}
				_ => {}
			}
		}
		CppChar::CharLiteral
	}

	/// Entered after `R"`. Reads the delimiter (at most 16 bytes) up to
	/// the opening parenthesis, then scans for `)delim"`. A character that
	/// cannot be part of a delimiter demotes the whole literal to a plain
	/// string scan.
	fn skip_raw_string(&mut self) -> CppChar {
		const MAX_DELIM: usize = 16;
		let mut delim = [0u8; MAX_DELIM];
		let mut delim_len = 0usize;
		loop {
			match self.reader.read() {
				None => return CppChar::Eof,
				Some(b'(') => break,
				Some(b) if delim_len < MAX_DELIM && is_raw_delim(b) => {
					delim[delim_len] = b;
					delim_len += 1;
				}
				Some(_) => return self.skip_string(false),
			}
		}
		let mut held = [0u8; MAX_DELIM + 1];
		loop {
			match self.reader.read() {
				None => return CppChar::Eof,
				Some(b')') => {
					let mut n = 0usize;
					let mut ok = true;
					for &expected in &delim[..delim_len] {
						match self.reader.read() {
							Some(b) => {
								held[n] = b;
								n += 1;
								if b != expected {
									ok = false;
									break;
								}
							}
							None => {
								ok = false;
								break;
							}
						}
					}
					if ok {
						match self.reader.read() {
							Some(b'"') => return CppChar::StringLiteral,
							Some(b) => {
								held[n] = b;
								n += 1;
							}
							None => {}
						}
					}
					// Mismatch; the bytes read past ')' are body text.
					while n > 0 {
						n -= 1;
						self.reader.unget(held[n]);
					}
				}
				Some(_) => {}
			}
		}
	}

	/// Feeds one directive-line character into the directive state
	/// machine; returns whether the stream is now suppressed.
	fn handle_directive(&mut self, c: u8) -> bool {
		let mut ignore = self.is_ignore();
		match self.directive.state {
			DirectiveState::None => {}
			DirectiveState::Hash => ignore = self.directive_hash(c),
			DirectiveState::Define | DirectiveState::Undef => self.directive_define(c),
			DirectiveState::If => ignore = self.directive_if(c),
			DirectiveState::Pragma => self.directive_pragma(c),
		}
		ignore
	}

	/// Reads the directive word (at most 9 characters) and dispatches.
	fn directive_hash(&mut self, c: u8) -> bool {
		let mut ignore = false;
		let word = self.read_directive_word(c);
		match word.as_str() {
			"define" => self.directive.state = DirectiveState::Define,
			"undef" => self.directive.state = DirectiveState::Undef,
			w if w.starts_with("if") => self.directive.state = DirectiveState::If,
			"elif" | "else" => {
				let branch_ignored = self.is_ignore_branch();
				ignore = self.set_ignore(branch_ignored);
				if !ignore && word == "else" {
					self.choose_branch();
				}
				self.directive.state = DirectiveState::None;
			}
			"endif" => {
				ignore = self.pop_conditional();
				self.directive.state = DirectiveState::None;
			}
			"pragma" => self.directive.state = DirectiveState::Pragma,
			_ => self.directive.state = DirectiveState::None,
		}
		ignore
	}

	fn read_directive_word(&mut self, first: u8) -> String {
		let mut word = String::new();
		word.push(first as char);
		while word.len() < 9 {
			match self.reader.read() {
				Some(c) if c.is_ascii_alphabetic() => word.push(c as char),
				Some(c) => {
					self.reader.unget(c);
					break;
				}
				None => break,
			}
		}
		word
	}

	/// Reads an identifier starting with `first` into the scratch buffer,
	/// leaving the terminating character unread.
	fn read_identifier(&mut self, first: u8) {
		self.directive.name.clear();
		let mut c = first;
		loop {
			self.directive.name.push(c as char);
			match self.reader.read() {
				Some(nc) if is_ident(nc) => c = nc,
				Some(nc) => {
					self.reader.unget(nc);
					break;
				}
				None => break,
			}
		}
	}

	/// `#define NAME` / `#define NAME(args)` / `#undef NAME`.
	fn directive_define(&mut self, c: u8) {
		if is_ident1(c) {
			let start = Pos { offset: self.reader.tell() - 1, line: self.reader.line() };
			self.read_identifier(c);
			let nc = self.reader.read();
			if let Some(nc) = nc {
				self.reader.unget(nc);
			}
			let parameterized = nc == Some(b'(');
			if !self.is_ignore() {
				if parameterized {
					// Move the head past the parameter list so the
					// re-read range below contains all of it.
					self.skip_parameter_list();
				}
				self.make_define_tag(&start, parameterized);
			}
		}
		self.directive.state = DirectiveState::None;
	}

	/// Consumes a balanced `(...)` group on the directive line. Stops
	/// short at an unescaped newline so the driver still terminates the
	/// directive there.
	fn skip_parameter_list(&mut self) {
		let mut depth = 0usize;
		let mut prev = b'\0';
		loop {
			let b = match self.reader.read() {
				None => break,
				Some(b) => b,
			};
			match b {
				b'(' => depth += 1,
				b')' => {
					depth = depth.saturating_sub(1);
					if depth == 0 {
						break;
					}
				}
				b'\n' if prev != b'\\' => {
					self.reader.unget(b'\n');
					break;
				}
				_ => {}
			}
			prev = b;
		}
	}

	fn make_define_tag(&mut self, start: &Pos, parameterized: bool) {
		let file_scope = !self.flags.is_header;
		if !self.options.include_define_tags {
			return;
		}
		if file_scope && !self.options.include_file_scope {
			return;
		}
		let signature =
			if parameterized { arglist::arglist_from_file_pos(&mut self.reader, start, &self.directive.name) } else { None };
		self.sink.tag(TagEntry {
			name: self.directive.name.clone(),
			kind: TagKind::Macro,
			line_number: start.line,
			line_number_entry: self.options.locate != LocateMode::Pattern,
			file_scope,
			truncate_line: true,
			signature,
			offset: start.offset,
		});
	}

	/// `#pragma weak NAME` emits a macro tag for NAME; all other pragmas
	/// are discarded.
	fn directive_pragma(&mut self, c: u8) {
		if is_ident1(c) {
			self.read_identifier(c);
			if self.directive.name == "weak" {
				let mut nc = self.reader.read();
				while matches!(nc, Some(b' ') | Some(b'\t')) {
					nc = self.reader.read();
				}
				if let Some(nc) = nc {
					if is_ident1(nc) {
						let start = Pos { offset: self.reader.tell() - 1, line: self.reader.line() };
						self.read_identifier(nc);
						self.make_define_tag(&start, false);
					}
				}
			}
		}
		self.directive.state = DirectiveState::None;
	}

	/// `c` is the first non-space character after `#if`/`#ifdef`/`#ifndef`.
	/// The branch counts as chosen unless it is the literal `#if 0`; the
	/// expression itself is never evaluated.
	fn directive_if(&mut self, c: u8) -> bool {
		let ignore = self.push_conditional(c != b'0');
		self.directive.state = DirectiveState::None;
		ignore
	}

	fn current(&self) -> &ConditionalFrame { &self.directive.ifdef[self.directive.nest_level] }

	fn is_ignore(&self) -> bool { self.current().ignoring }

	/// Records the suppression state of the current branch. Frame 0 stays
	/// untouched; a stray `#else` at depth 0 has nothing to suppress.
	fn set_ignore(&mut self, ignore: bool) -> bool {
		let level = self.directive.nest_level;
		if level > 0 {
			self.directive.ifdef[level].ignoring = ignore;
		}
		ignore
	}

	/// Whether the branch that a `#elif`/`#else` introduces must be
	/// suppressed. While a statement is in progress the conditional is
	/// latched to single-branch mode.
	fn is_ignore_branch(&mut self) -> bool {
		let level = self.directive.nest_level;
		if self.resolve_required && !self.flags.brace_format && level > 0 {
			self.directive.ifdef[level].single_branch = true;
		}
		let frame = self.current();
		frame.ignore_all_branches || (frame.branch_chosen && frame.single_branch)
	}

	fn choose_branch(&mut self) {
		let level = self.directive.nest_level;
		if !self.flags.brace_format && level > 0 {
			let frame = &mut self.directive.ifdef[level];
			frame.branch_chosen = frame.single_branch || self.resolve_required;
		}
	}

	/// Opens a conditional frame. At the depth cap the directive is still
	/// parsed but no frame opens, and the current suppression state is
	/// simply carried forward.
	fn push_conditional(&mut self, first_branch_chosen: bool) -> bool {
		let ignore_all_branches = self.is_ignore();
		if self.directive.nest_level < MAX_NESTING - 1 {
			self.directive.nest_level += 1;
			let single_branch = self.resolve_required;
			let ignoring = ignore_all_branches
				|| (!first_branch_chosen && !self.flags.brace_format && (single_branch || !self.options.if0));
			self.directive.ifdef[self.directive.nest_level] = ConditionalFrame {
				ignore_all_branches,
				single_branch,
				branch_chosen: first_branch_chosen,
				ignoring,
			};
			ignoring
		} else {
			self.is_ignore()
		}
	}

	fn pop_conditional(&mut self) -> bool {
		if self.directive.nest_level > 0 {
			self.directive.nest_level -= 1;
		}
		self.is_ignore()
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use pretty_assertions::assert_eq;

	fn session(input: &str, flags: SessionFlags, options: Options) -> (String, Vec<TagEntry>) {
		let mut tags = Vec::new();
		let reader = SourceReader::new(input.as_bytes().to_vec());
		let mut pp = Preprocessor::new(reader, options, flags, &mut tags);
		let mut out = String::new();
		loop {
			match pp.next_char() {
				CppChar::Eof => break,
				CppChar::Byte(b) => out.push(b as char),
				CppChar::StringLiteral => out.push('S'),
				CppChar::CharLiteral => out.push('C'),
			}
		}
		(out, tags)
	}

	fn filter(input: &str) -> String { session(input, SessionFlags::default(), Options::default()).0 }

	#[test]
	fn plain_text_passes_through() {
		assert_eq!(filter("int x;\n"), "int x;\n");
	}

	#[test]
	fn comments_collapse_to_a_space() {
		assert_eq!(filter("a/* hi */b"), "a b");
		assert_eq!(filter("a// hi\nb"), "a \nb");
		assert_eq!(filter("a/+ hi +/b"), "a b");
	}

	#[test]
	fn d_comment_is_not_nested() {
		// The inner `/+` is not tracked; the first `+/` closes the comment.
		assert_eq!(filter("a/+ x /+ y +/b"), "a b");
	}

	#[test]
	fn cplus_comment_keeps_its_newline() {
		assert_eq!(filter("x//c\n#define A 1\n"), "x \n\n");
	}

	#[test]
	fn cplus_comment_continuation() {
		assert_eq!(filter("a//c\\\nstill comment\nb"), "a \nb");
	}

	#[test]
	fn string_and_char_sentinels() {
		assert_eq!(filter("\"abc\\\"de\" 'x'"), "S C");
	}

	#[test]
	fn char_literal_stops_at_newline() {
		assert_eq!(filter("'x\ny"), "C\ny");
	}

	#[test]
	fn vera_base_char_literal() {
		// 'b1010 runs through the trailing alphanumerics; the space ends it.
		assert_eq!(filter("'b1010 x"), "C x");
	}

	#[test]
	fn backslash_newline_joins_lines() {
		assert_eq!(filter("ab\\\ncd"), "abcd");
	}

	#[test]
	fn lone_backslash_passes_through() {
		assert_eq!(filter("a\\b"), "a\\b");
	}

	#[test]
	fn trigraphs_fold() {
		assert_eq!(filter("??( ??) ??< ??> ??! ??' ??-"), "[ ] { } | ^ ~");
	}

	#[test]
	fn partial_trigraph_is_restored() {
		assert_eq!(filter("??x"), "??x");
		assert_eq!(filter("?x"), "?x");
		assert_eq!(filter("a?"), "a?");
	}

	#[test]
	fn digraphs_fold() {
		assert_eq!(filter("<: :> <% %>"), "[ ] { }");
	}

	#[test]
	fn digraph_pair_folds_to_token_paste() {
		// `%:%:` arrives as two successive `%:` foldings.
		assert_eq!(filter("a %:%: b"), "a ## b");
	}

	#[test]
	fn digraph_partial_is_restored() {
		assert_eq!(filter("a<b"), "a<b");
		assert_eq!(filter("a:b"), "a:b");
		assert_eq!(filter("a%b"), "a%b");
	}

	#[test]
	fn trigraph_hash_starts_a_directive() {
		let (out, tags) = session("??=define X 1\n", SessionFlags::default(), Options::default());
		assert_eq!(out, "\n");
		assert_eq!(tags.len(), 1);
		assert_eq!(tags[0].name, "X");
	}

	#[test]
	fn digraph_hash_starts_a_directive() {
		let (out, tags) = session("%:define Y 1\n", SessionFlags::default(), Options::default());
		assert_eq!(out, "\n");
		assert_eq!(tags.len(), 1);
		assert_eq!(tags[0].name, "Y");
	}

	#[test]
	fn hash_mid_line_is_not_a_directive() {
		let (out, tags) = session("a # define X\n", SessionFlags::default(), Options::default());
		assert_eq!(out, "a # define X\n");
		assert_eq!(tags, vec![]);
	}

	#[test]
	fn at_literal_strings() {
		let flags = SessionFlags { has_at_literal_strings: true, ..SessionFlags::default() };
		let (out, _) = session("@\"a\\b\" x", flags, Options::default());
		assert_eq!(out, "S x");
	}

	#[test]
	fn at_without_quote_passes_through() {
		let flags = SessionFlags { has_at_literal_strings: true, ..SessionFlags::default() };
		let (out, _) = session("@interface", flags, Options::default());
		assert_eq!(out, "@interface");
	}

	#[test]
	fn raw_literal_strings() {
		let flags = SessionFlags { has_raw_literal_strings: true, ..SessionFlags::default() };
		let (out, _) = session("R\"xy(a)xy\" + R\"(b)\"", flags, Options::default());
		assert_eq!(out, "S + S");
	}

	#[test]
	fn raw_string_with_decoy_closer() {
		let flags = SessionFlags { has_raw_literal_strings: true, ..SessionFlags::default() };
		let (out, _) = session("R\"ab()a)ab\" y", flags, Options::default());
		assert_eq!(out, "S y");
	}

	#[test]
	fn raw_string_prefix_rules() {
		let flags = SessionFlags { has_raw_literal_strings: true, ..SessionFlags::default() };
		// `xR"(...)"` is an identifier followed by a string.
		let (out, _) = session("xR\"(a)\"", flags, Options::default());
		assert_eq!(out, "xRS");
		// `u8R"(...)"` is an encoded raw string.
		let (out, _) = session("u8R\"(a)\" z", flags, Options::default());
		assert_eq!(out, "u8S z");
		let (out, _) = session("LR\"(a)\" z", flags, Options::default());
		assert_eq!(out, "LS z");
	}

	#[test]
	fn pushback_is_lifo_and_bounded() {
		let mut tags: Vec<TagEntry> = Vec::new();
		let reader = SourceReader::new(b"a".to_vec());
		let mut pp = Preprocessor::new(reader, Options::default(), SessionFlags::default(), &mut tags);
		pp.unget_char(CppChar::Byte(b'x'));
		pp.unget_char(CppChar::StringLiteral);
		assert_eq!(pp.next_char(), CppChar::StringLiteral);
		assert_eq!(pp.next_char(), CppChar::Byte(b'x'));
		assert_eq!(pp.next_char(), CppChar::Byte(b'a'));
		assert_eq!(pp.next_char(), CppChar::Eof);
	}

	#[test]
	fn unterminated_comment_hits_eof() {
		assert_eq!(filter("a/* never closed"), "a");
		assert_eq!(filter("a\"never closed"), "a");
		assert_eq!(filter("a'never closed"), "a");
	}

	#[test]
	fn directive_word_is_capped() {
		// Ten alphabetic characters; the tenth terminates the word and
		// comes back as ordinary (discarded) directive text.
		let (out, tags) = session("#abcdefghij\nx\n", SessionFlags::default(), Options::default());
		assert_eq!(out, "\nx\n");
		assert_eq!(tags, vec![]);
	}
}
