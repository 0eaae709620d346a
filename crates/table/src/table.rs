//! The finalized, read-only table handed to the snapshot subsystem.

/// Ordered external-reference table produced by a single export.
///
/// Index `i` of the table is the stable id the serializer writes in place of
/// the address at `as_slice()[i]`. The backing storage carries one extra `0`
/// entry so the engine can consume it as a null-terminated array; that
/// terminator is not part of [`len`](Self::len) or [`as_slice`](Self::as_slice).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalReferenceTable {
	terminated: Box<[isize]>,
}

impl ExternalReferenceTable {
	pub(crate) fn from_entries(mut entries: Vec<isize>) -> Self {
		entries.push(0);
		Self {
			terminated: entries.into_boxed_slice(),
		}
	}

	/// Registered addresses in registration order.
	pub fn as_slice(&self) -> &[isize] {
		&self.terminated[..self.terminated.len() - 1]
	}

	/// Registered addresses followed by the `0` terminator.
	pub fn as_terminated_slice(&self) -> &[isize] {
		&self.terminated
	}

	/// Pointer to the null-terminated array, valid for as long as `self` is.
	pub fn as_ptr(&self) -> *const isize {
		self.terminated.as_ptr()
	}

	pub fn len(&self) -> usize {
		self.terminated.len() - 1
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Address stored at `index`.
	pub fn get(&self, index: usize) -> Option<isize> {
		self.as_slice().get(index).copied()
	}

	pub fn iter(&self) -> impl ExactSizeIterator<Item = isize> + '_ {
		self.as_slice().iter().copied()
	}
}

impl<'a> IntoIterator for &'a ExternalReferenceTable {
	type Item = &'a isize;
	type IntoIter = std::slice::Iter<'a, isize>;

	fn into_iter(self) -> Self::IntoIter {
		self.as_slice().iter()
	}
}
