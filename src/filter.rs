//! Search filtering over the candidate list, with a snapshot stack so that
//! deleting a character restores exactly the previously-seen broader set
//! rather than re-deriving it from a live (and possibly shifted) window list.

use tracing::warn;

use crate::winjump::{friendly_name, ProgramEntry, WinjumpError};




/// Stack of frozen candidate-list copies, one pushed per search-string growth
# [ derive (Debug, Default) ]
pub struct SnapshotStack ( Vec <Vec <ProgramEntry>> );

impl SnapshotStack {

    pub fn push_copy (&mut self, candidates:&[ProgramEntry]) -> Result <(), WinjumpError> {
        let mut copy : Vec<ProgramEntry> = Vec::new();
        copy .try_reserve_exact (candidates.len())?;
        copy .extend_from_slice (candidates);
        self.0 .push (copy);
        Ok(())
    }
    pub fn pop (&mut self) -> Option <Vec<ProgramEntry>> {
        self.0 .pop()
    }
    pub fn clear (&mut self) {
        self.0 .clear()
    }
    pub fn depth (&self) -> usize {
        self.0 .len()
    }

}




/// Per-tick filter state machine .. tracks the previous search-string length so
/// length transitions drive the snapshot push/pop discipline
# [ derive (Debug, Default) ]
pub struct FilterEngine {
    snapshots       : SnapshotStack,
    prev_search_len : usize,
}

impl FilterEngine {

    /// Refreshes `candidates` for this tick. With an empty search string the
    /// snapshots are discarded and `fresh` supplies a live enumeration. While
    /// filtering, a lengthened string pushes a copy before narrowing in place,
    /// an unchanged length re-filters in place, and a shortened string pops the
    /// stack to restore the prior broader set before re-filtering. A shortened
    /// string with nothing left to pop falls back to a live enumeration.
    pub fn apply (
        &mut self, candidates:&mut Vec<ProgramEntry>, search:&str,
        fresh: impl FnOnce() -> Vec<ProgramEntry>,
    ) -> Result <(), WinjumpError> {

        let new_len = search.chars().count();

        if new_len == 0 {
            self.snapshots.clear();
            self.prev_search_len = 0;
            *candidates = fresh();
            return Ok(())
        }

        if new_len > self.prev_search_len {
            self.snapshots .push_copy (candidates)?;
        }
        else if new_len < self.prev_search_len {
            match self.snapshots.pop() {
                Some (snapshot) => { *candidates = snapshot }
                None => {
                    warn! ("filter snapshot stack empty on search-string shrink .. rebuilding from live enumeration");
                    *candidates = fresh();
                }
            }
        }
        // (unchanged length just re-filters whatever is in place)

        filter_in_place (candidates, search);
        self.prev_search_len = new_len;
        Ok(())
    }

    pub fn snapshot_depth (&self) -> usize {
        self.snapshots.depth()
    }

}




/// Stable removal of all candidates not matching the search string ..
/// a no-op for the empty string
pub fn filter_in_place (candidates:&mut Vec<ProgramEntry>, search:&str) {
    if search.is_empty() { return }
    let search_lc = search.to_ascii_lowercase();
    let pins = parse_digit_runs (&search_lc);
    candidates .retain (|entry| entry_matches (entry, &search_lc, &pins));
}


fn entry_matches (entry:&ProgramEntry, search_lc:&str, pins:&[u64]) -> bool {
    if pins .iter() .any (|&n| pinned_index_matches (entry.stable_index + 1, n)) {
        return true
    }
    friendly_name (entry) .to_ascii_lowercase() .contains (search_lc)
}


/// Whether a searched number pins the 1-based displayed index .. the displayed
/// number is peeled a trailing digit at a time, so searching "1" keeps both
/// entries "1" and "14" (the accepted behavior of the numeric shortcut)
pub fn pinned_index_matches (displayed:usize, wanted:u64) -> bool {
    let mut d = displayed as u64;
    while d > 0 {
        if d == wanted { return true }
        d /= 10;
    }
    false
}


/// Each maximal run of decimal digits in the search string, parsed as a number
pub fn parse_digit_runs (s:&str) -> Vec<u64> {
    let mut runs = Vec::new();
    let mut cur : Option<String> = None;
    for c in s.chars() {
        if c.is_ascii_digit() {
            cur .get_or_insert_with (String::new) .push (c);
        } else if let Some(run) = cur.take() {
            runs .extend (run.parse::<u64>().ok());
        }
    }
    if let Some(run) = cur.take() {
        runs .extend (run.parse::<u64>().ok());
    }
    runs
}
