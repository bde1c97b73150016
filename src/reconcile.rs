//! Syncs the filtered candidate list into the host's list control by editing
//! rows in place instead of clearing and refilling .. a full refill every tick
//! would flicker and drop the scroll position.

use crate::winjump::friendly_name;
use crate::winjump::ProgramEntry;


/// The slice of list-control behavior the reconciler needs .. the win32 listbox
/// impl lives in the platform layer, and tests drive a plain vec-backed one.
pub trait ListDisplay {

    fn len (&self) -> usize;

    fn text_at (&self, idx:usize) -> Option<String>;
    fn tag_at  (&self, idx:usize) -> Option<u32>;

    fn insert  (&mut self, idx:usize, text:&str, tag:u32);
    fn remove  (&mut self, idx:usize);
    fn set_tag (&mut self, idx:usize, tag:u32);

    fn top_index (&self) -> usize;
    fn set_top_index (&mut self, idx:usize);

}


/// Walks both lists positionally and patches only the rows that differ. A text
/// mismatch is rewritten as insert-at-idx then delete-at-idx+1 so the control
/// never transits through a shorter list mid-edit. Restores the scroll anchor
/// afterwards since row edits can reset it.
pub fn reconcile (display:&mut impl ListDisplay, candidates:&[ProgramEntry]) {

    let top = display.top_index();

    for (idx, entry) in candidates.iter().enumerate() {
        let name = friendly_name (entry);
        if idx < display.len() {
            if display.text_at(idx).as_deref() != Some(name.as_str()) {
                display .insert (idx, &name, entry.pid);
                display .remove (idx + 1);
            }
            else if display.tag_at(idx) != Some(entry.pid) {
                display .set_tag (idx, entry.pid);
            }
        } else {
            display .insert (idx, &name, entry.pid);
        }
    }
    while display.len() > candidates.len() {
        display .remove (candidates.len());
    }

    if top != display.top_index() && top < display.len() {
        display .set_top_index (top);
    }
}
