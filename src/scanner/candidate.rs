use crate::common::Address;

/// Hypothesized location of a real branch, with its aggregate timing score.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Candidate {
	pub address: Address,
	pub score: u64
}
impl Candidate {
	pub const fn new(address: Address, score: u64) -> Self {
		Candidate { address, score }
	}
}
impl std::fmt::Display for Candidate {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "{} : {}", self.address, self.score)
	}
}

/// Fixed capacity set of the highest scoring candidates, ordered ascending by score.
///
/// The lowest scoring candidate is always evicted first. Among equal scores the earlier
/// insertion is preferred, so a later candidate with a score equal to the minimum of a
/// full set is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateTopK {
	capacity: usize,
	candidates: Vec<Candidate>
}
impl CandidateTopK {
	pub fn new(capacity: usize) -> Self {
		CandidateTopK {
			capacity,
			candidates: Vec::with_capacity(capacity)
		}
	}

	pub const fn capacity(&self) -> usize {
		self.capacity
	}

	pub fn len(&self) -> usize {
		self.candidates.len()
	}

	pub fn is_empty(&self) -> bool {
		self.candidates.is_empty()
	}

	pub fn is_full(&self) -> bool {
		self.candidates.len() >= self.capacity
	}

	/// Lowest retained score, if any.
	pub fn min_score(&self) -> Option<u64> {
		self.candidates.first().map(|candidate| candidate.score)
	}

	/// Highest scoring candidate, if any.
	pub fn best(&self) -> Option<&Candidate> {
		self.candidates.last()
	}

	/// Candidates in ascending order of score.
	pub fn as_slice(&self) -> &[Candidate] {
		&self.candidates
	}

	pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
		self.candidates.iter()
	}

	/// Offers a candidate to the set.
	///
	/// Returns `true` if it was retained.
	pub fn insert(&mut self, candidate: Candidate) -> bool {
		if self.capacity == 0 {
			return false
		}

		if self.is_full() {
			match self.min_score() {
				Some(min) if candidate.score > min => {
					self.candidates.remove(0);
				}
				_ => return false
			}
		}

		// placed before equal scores so that among ties it is the first to go
		let position = self
			.candidates
			.partition_point(|retained| retained.score < candidate.score);
		self.candidates.insert(position, candidate);

		true
	}
}
impl<'a> IntoIterator for &'a CandidateTopK {
	type IntoIter = std::slice::Iter<'a, Candidate>;
	type Item = &'a Candidate;

	fn into_iter(self) -> Self::IntoIter {
		self.candidates.iter()
	}
}
