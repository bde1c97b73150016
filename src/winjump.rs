#![ allow (non_camel_case_types) ]

use serde::{Deserialize, Serialize};

use crate::enumerate::{enumerate_candidates, WindowQuery};
use crate::filter::FilterEngine;
use crate::reconcile::{reconcile, ListDisplay};


/// Opaque OS window identifier .. only ever handed back to the platform layer,
/// never dereferenced here.
pub type Hwnd = isize;




# [ derive (Debug, Default, Eq, PartialEq, Hash, Clone, Serialize, Deserialize) ]
pub struct ProgramEntry {
    pub title        : String,
    pub exe_name     : Option<String>,
    pub hwnd         : Hwnd,
    pub pid          : u32,
    /// position this entry held in the last full (unfiltered) enumeration ..
    /// drives the numbered display label and the numeric search shortcuts
    pub stable_index : usize,
}


/// Builds the list-row label, e.g. `1: Google Search - firefox.exe` ..
/// the exe part renders empty when the owning process could not be queried
pub fn friendly_name (entry:&ProgramEntry) -> String {
    format! ("{}: {} - {}", entry.stable_index + 1, entry.title, entry.exe_name.as_deref().unwrap_or(""))
}




# [ derive (Debug, thiserror::Error) ]
pub enum WinjumpError {
    /// storage for a filter snapshot could not be reserved .. continuing with an
    /// inconsistent filter state is worse than stopping, so this halts the loop
    # [ error ("could not reserve snapshot storage: {0}") ]
    SnapshotAlloc (#[from] std::collections::TryReserveError),

    # [ error ("failed to register activation hotkey {0}") ]
    HotkeyRegister (String),
}




/// Application context for one winjump instance .. owns the candidate list and
/// (via the filter engine) the snapshot stack. The host shell owns everything
/// else and passes its controls in per tick.
# [ derive (Debug, Default) ]
pub struct WinjumpState {
    candidates : Vec <ProgramEntry>,
    filter     : FilterEngine,
}


impl WinjumpState {

    pub fn new () -> WinjumpState {
        WinjumpState { candidates: Vec::new(), filter: FilterEngine::default() }
    }

    /// One full update .. refresh the candidate list (live enumeration while the
    /// search box is empty, snapshot-stack filtering while it is not), then sync
    /// the display list to it with the minimal set of row edits.
    pub fn update_tick (
        &mut self, wq:&impl WindowQuery, search:&str, display:&mut impl ListDisplay
    ) -> Result <(), WinjumpError> {
        self.filter .apply (&mut self.candidates, search, || enumerate_candidates(wq))?;
        reconcile (display, &self.candidates);
        Ok(())
    }

    pub fn candidates (&self) -> &[ProgramEntry] {
        &self.candidates
    }

    /// The window to activate when the user commits a selection .. Enter takes
    /// the top filtered entry, a list click passes the clicked row index
    pub fn selection_target (&self, row:usize) -> Option<Hwnd> {
        self.candidates .get (row) .map (|e| e.hwnd)
    }

    /// Brings the selected row's window to foreground (restoring it first if
    /// minimized) .. false when the row is out of bounds
    #[cfg(windows)]
    pub fn activate_entry (&self, row:usize) -> bool {
        match self.selection_target (row) {
            Some (hwnd) => { crate::win_apis::window_activate (hwnd); true }
            None => false,
        }
    }

}
