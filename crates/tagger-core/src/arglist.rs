//! Reconstruction of a macro's parameter list from a re-read span of the
//! source file.

use crate::source::{Pos, SourceReader};

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
enum StripState {
	None,
	Escape,
	CComment,
	CppComment,
	DQuote,
	SQuote,
}

/// Rewrites `buf` in place: comments become a single space, runs of
/// whitespace collapse to a single space, and string/char literals are
/// copied through untouched (backslash escapes respected). Stripping an
/// already-stripped buffer changes nothing.
pub fn strip_code_buffer(buf: &mut Vec<u8>) {
	use StripState::*;

	let n = buf.len();
	let mut w = 0usize;
	let mut i = 0usize;
	let mut state = None;
	let mut prior = None;

	// Writes at most one byte per byte read, so the write cursor can
	// never overtake the read cursor.
	while i < n {
		let b = buf[i];
		match state {
			None => {
				if b == b'/' && i + 1 < n && buf[i + 1] == b'*' {
					// The '*' is consumed as comment text; "/*/" closes.
					state = CComment;
				} else if b == b'/' && i + 1 < n && buf[i + 1] == b'/' {
					state = CppComment;
				} else if b == b'"' {
					buf[w] = b;
					w += 1;
					state = DQuote;
				} else if b == b'\'' {
					buf[w] = b;
					w += 1;
					state = SQuote;
				} else if b == b'\\' {
					buf[w] = b;
					w += 1;
					prior = None;
					state = Escape;
				} else if b.is_ascii_whitespace() {
					if w > 0 && buf[w - 1] != b' ' {
						buf[w] = b' ';
						w += 1;
					}
				} else {
					buf[w] = b;
					w += 1;
				}
			}
			Escape => {
				buf[w] = b;
				w += 1;
				state = prior;
			}
			CComment => {
				if b == b'*' && i + 1 < n && buf[i + 1] == b'/' {
					i += 1;
					state = None;
					if w > 0 && buf[w - 1] != b' ' {
						buf[w] = b' ';
						w += 1;
					}
				}
			}
			CppComment => {
				if b == b'\n' {
					state = None;
					if w > 0 && buf[w - 1] != b' ' {
						buf[w] = b' ';
						w += 1;
					}
				}
			}
			DQuote => {
				buf[w] = b;
				w += 1;
				if b == b'\\' {
					prior = DQuote;
					state = Escape;
				} else if b == b'"' {
					state = None;
				}
			}
			SQuote => {
				buf[w] = b;
				w += 1;
				if b == b'\\' {
					prior = SQuote;
					state = Escape;
				} else if b == b'\'' {
					state = None;
				}
			}
		}
		i += 1;
	}
	buf.truncate(w);
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
	if needle.is_empty() || haystack.len() < needle.len() {
		return Option::None;
	}
	haystack.windows(needle.len()).position(|w| w == needle)
}

/// Strips `buf` in place, then returns the balanced `(...)` group that
/// follows the first occurrence of `name`, or `None` when the name or an
/// opening parenthesis is absent, or the group never closes.
pub fn arglist_from_str(buf: &mut Vec<u8>, name: &str) -> Option<String> {
	strip_code_buffer(buf);
	let at = find(buf, name.as_bytes())?;
	let open = at + buf[at..].iter().position(|&b| b == b'(')?;
	let mut depth = 1usize;
	let mut end = open + 1;
	while end < buf.len() && depth > 0 {
		match buf[end] {
			b'(' => depth += 1,
			b')' => depth -= 1,
			_ => {}
		}
		end += 1;
	}
	if depth > 0 {
		return None;
	}
	Some(String::from_utf8_lossy(&buf[open..end]).into_owned())
}

/// Re-reads `[start.offset, head)` and extracts `name`'s argument list
/// from those bytes. The reader is put back exactly where it was on every
/// path out.
pub fn arglist_from_file_pos(reader: &mut SourceReader, start: &Pos, name: &str) -> Option<String> {
	let end = reader.tell();
	let saved = reader.save();
	let mut result = None;
	if end > start.offset {
		reader.seek(start.offset);
		let mut buf = Vec::with_capacity(end - start.offset);
		while reader.tell() < end {
			match reader.read() {
				Some(b) => buf.push(b),
				None => break,
			}
		}
		result = arglist_from_str(&mut buf, name);
	}
	reader.restore(saved);
	result
}
