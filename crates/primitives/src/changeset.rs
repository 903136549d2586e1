use ropey::Rope;

use crate::range::{CharIdx, CharLen};

/// Bias determines how positions at change boundaries are mapped.
///
/// When mapping a position through an insertion at exactly that position,
/// bias decides whether the position stays before the inserted text or
/// moves after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bias {
	/// Position stays before insertions at the same location.
	Left,
	/// Position moves after insertions at the same location.
	Right,
}

/// A text insertion with cached character length.
///
/// The cached count avoids repeated O(n) `.chars().count()` calls in
/// `apply` and `map_pos`. Fields are private so `char_len` always equals
/// `text.chars().count()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
	text: String,
	char_len: CharLen,
}

impl Insertion {
	/// Creates a new insertion, computing the character length once.
	#[inline]
	fn new(text: String) -> Self {
		let char_len = text.chars().count();
		Self { text, char_len }
	}

	/// Returns the inserted text.
	pub fn text(&self) -> &str {
		&self.text
	}

	/// Returns the insertion length in characters.
	pub fn char_len(&self) -> CharLen {
		self.char_len
	}
}

/// A single document change operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
	/// Keep N characters from the source document.
	Retain(CharLen),
	/// Remove N characters from the source document.
	Delete(CharLen),
	/// Insert text at the current position.
	Insert(Insertion),
}

/// A sequence of retain/delete/insert operations describing one document
/// mutation.
///
/// Decoration anchors are carried across edits by mapping them through the
/// changeset of every document change as it arrives; positions that are
/// not remapped silently desync from the text they annotate.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ChangeSet {
	changes: Vec<Operation>,
	len: CharLen,
	len_after: CharLen,
}

impl ChangeSet {
	/// Creates an empty changeset.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a changeset replacing `[from, to)` of a document of
	/// `doc_len` characters with `replacement`.
	///
	/// An empty replacement is a pure deletion; `from == to` is a pure
	/// insertion.
	pub fn replace(doc_len: CharLen, from: CharIdx, to: CharIdx, replacement: &str) -> Self {
		debug_assert!(from <= to && to <= doc_len, "replace {from}..{to} out of bounds for len {doc_len}");
		let mut changes = Self::new();
		changes.retain(from);
		changes.delete(to - from);
		changes.insert(replacement);
		changes.retain(doc_len - to);
		changes
	}

	/// Returns the length of the source document (before changes).
	pub fn len(&self) -> CharLen {
		self.len
	}

	/// Returns the length of the document after applying changes.
	pub fn len_after(&self) -> CharLen {
		self.len_after
	}

	/// Returns true if this changeset contains no operations.
	pub fn is_empty(&self) -> bool {
		self.changes.is_empty()
	}

	/// Returns a slice of all operations.
	pub fn changes(&self) -> &[Operation] {
		&self.changes
	}

	/// Adds a retain operation, preserving N characters from the source.
	///
	/// Consecutive retains are merged.
	pub fn retain(&mut self, n: CharLen) {
		if n == 0 {
			return;
		}

		self.len += n;
		self.len_after += n;

		if let Some(Operation::Retain(count)) = self.changes.last_mut() {
			*count += n;
		} else {
			self.changes.push(Operation::Retain(n));
		}
	}

	/// Adds a delete operation, removing N characters from the source.
	///
	/// Consecutive deletes are merged.
	pub fn delete(&mut self, n: CharLen) {
		if n == 0 {
			return;
		}

		self.len += n;

		if let Some(Operation::Delete(count)) = self.changes.last_mut() {
			*count += n;
		} else {
			self.changes.push(Operation::Delete(n));
		}
	}

	/// Adds an insert operation at the current position.
	///
	/// Adjacent inserts are merged; insert-before-delete ordering is
	/// preserved so a delete never splits a merged insert.
	pub fn insert(&mut self, text: &str) {
		if text.is_empty() {
			return;
		}

		let ins = Insertion::new(text.to_owned());
		self.len_after += ins.char_len;

		match self.changes.as_mut_slice() {
			[.., Operation::Insert(prev)] | [.., Operation::Insert(prev), Operation::Delete(_)] => {
				prev.text.push_str(&ins.text);
				prev.char_len += ins.char_len;
			}
			[.., last @ Operation::Delete(_)] => {
				let del = std::mem::replace(last, Operation::Insert(ins));
				self.changes.push(del);
			}
			_ => {
				self.changes.push(Operation::Insert(ins));
			}
		}
	}

	/// Applies this changeset to a document, modifying it in place.
	pub fn apply(&self, doc: &mut Rope) {
		if self.changes.is_empty() {
			return;
		}

		let mut pos = 0;
		for op in &self.changes {
			match op {
				Operation::Retain(n) => {
					pos += n;
				}
				Operation::Delete(n) => {
					doc.remove(pos..pos + n);
				}
				Operation::Insert(ins) => {
					doc.insert(pos, &ins.text);
					pos += ins.char_len;
				}
			}
		}
	}

	/// Maps a position through this changeset using the specified bias.
	///
	/// Positions inside deleted spans collapse to the deletion point.
	pub fn map_pos(&self, pos: CharIdx, bias: Bias) -> CharIdx {
		let mut old_pos = 0;
		let mut new_pos = 0;

		for op in &self.changes {
			if old_pos > pos {
				break;
			}

			match op {
				Operation::Retain(n) => {
					if old_pos + n > pos {
						return new_pos + (pos - old_pos);
					}
					old_pos += n;
					new_pos += n;
				}
				Operation::Delete(n) => {
					if old_pos + n > pos {
						return new_pos;
					}
					old_pos += n;
				}
				Operation::Insert(ins) => {
					if old_pos == pos && bias == Bias::Left {
						// Position is exactly at the insert point, stay before.
					} else {
						new_pos += ins.char_len;
					}
				}
			}
		}

		new_pos + (pos - old_pos)
	}
}
