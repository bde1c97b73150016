//! Builds the candidate list .. walks every top-level window and keeps the ones
//! the alt-tab switcher would show, in the platform's z-order.

use crate::winjump::{Hwnd, ProgramEntry};


/// The window queries the enumerator needs from the platform .. the win32 impl
/// lives in the platform layer, and tests drive a synthetic window tree.
pub trait WindowQuery {

    /// Every top-level window, in z-order
    fn top_level_windows (&self) -> Vec<Hwnd>;

    fn window_title (&self, hwnd:Hwnd) -> String;
    fn is_visible   (&self, hwnd:Hwnd) -> bool;

    fn root_owner        (&self, hwnd:Hwnd) -> Hwnd;
    fn last_active_popup (&self, hwnd:Hwnd) -> Hwnd;

    fn window_pid (&self, hwnd:Hwnd) -> u32;
    /// Full image path of the owning process .. None when access is denied
    /// (elevated processes) or the process is gone
    fn exe_path (&self, pid:u32) -> Option<String>;

}


/// The switcher-visibility walk .. start from the root owner and chase
/// last-active-popup links; the window belongs in the switcher iff the walk
/// lands back on it while visible. Owned dialogs and tool popups terminate the
/// walk elsewhere and are dropped.
pub fn is_switcher_window (wq:&impl WindowQuery, hwnd:Hwnd) -> bool {
    let mut walk = wq.root_owner (hwnd);
    loop {
        let popup = wq.last_active_popup (walk);
        if popup == hwnd && wq.is_visible (popup) { return true }
        if popup == walk { return false }
        walk = popup;
    }
}


pub fn enumerate_candidates (wq:&impl WindowQuery) -> Vec<ProgramEntry> {
    let mut out : Vec<ProgramEntry> = Vec::new();
    for hwnd in wq.top_level_windows() {
        if !is_switcher_window (wq, hwnd) { continue }
        let title = wq.window_title (hwnd);
        if title.is_empty() { continue }
        let pid = wq.window_pid (hwnd);
        out .push ( ProgramEntry {
            title, pid, hwnd,
            exe_name: wq.exe_path(pid) .as_deref() .and_then (parse_exe_name),
            stable_index: out.len(),
        } );
    }
    out
}


/// Final path component of the exe image path, accepting either separator
pub fn parse_exe_name (path:&str) -> Option<String> {
    path .split (['\\', '/']) .last()
        .filter (|s| !s.is_empty())
        .map (|s| s.to_string())
}




#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Synthetic window tree .. owner/popup links default to self, the win32
    /// convention for windows with no owner and no active popup
    # [ derive (Debug, Default) ]
    struct FakeWindows {
        order     : Vec <Hwnd>,
        titles    : HashMap <Hwnd, String>,
        visible   : HashMap <Hwnd, bool>,
        owners    : HashMap <Hwnd, Hwnd>,
        popups    : HashMap <Hwnd, Hwnd>,
        pids      : HashMap <Hwnd, u32>,
        exe_paths : HashMap <u32, String>,
    }
    impl FakeWindows {
        fn add (&mut self, hwnd:Hwnd, title:&str, visible:bool, pid:u32) -> &mut Self {
            self.order.push (hwnd);
            self.titles.insert (hwnd, title.to_string());
            self.visible.insert (hwnd, visible);
            self.pids.insert (hwnd, pid);
            self
        }
    }
    impl WindowQuery for FakeWindows {
        fn top_level_windows (&self) -> Vec<Hwnd> { self.order.clone() }
        fn window_title (&self, hwnd:Hwnd) -> String { self.titles.get(&hwnd).cloned().unwrap_or_default() }
        fn is_visible (&self, hwnd:Hwnd) -> bool { *self.visible.get(&hwnd).unwrap_or(&false) }
        fn root_owner (&self, hwnd:Hwnd) -> Hwnd { *self.owners.get(&hwnd).unwrap_or(&hwnd) }
        fn last_active_popup (&self, hwnd:Hwnd) -> Hwnd { *self.popups.get(&hwnd).unwrap_or(&hwnd) }
        fn window_pid (&self, hwnd:Hwnd) -> u32 { *self.pids.get(&hwnd).unwrap_or(&0) }
        fn exe_path (&self, pid:u32) -> Option<String> { self.exe_paths.get(&pid).cloned() }
    }

    #[test]
    fn plain_visible_window_is_included () {
        let mut fw = FakeWindows::default();
        fw.add (0x10, "Editor", true, 100);
        fw.exe_paths.insert (100, r"C:\Tools\editor.exe".into());

        let entries = enumerate_candidates (&fw);
        assert_eq! (entries.len(), 1);
        assert_eq! (entries[0].title, "Editor");
        assert_eq! (entries[0].exe_name.as_deref(), Some("editor.exe"));
        assert_eq! (entries[0].stable_index, 0);
    }

    #[test]
    fn invisible_and_untitled_windows_are_excluded () {
        let mut fw = FakeWindows::default();
        fw.add (0x10, "Hidden", false, 1);
        fw.add (0x20, "", true, 2);
        fw.add (0x30, "Shown", true, 3);
        let entries = enumerate_candidates (&fw);
        assert_eq! (entries.len(), 1);
        assert_eq! (entries[0].title, "Shown");
    }

    #[test]
    fn owned_dialog_is_excluded_in_favor_of_its_owner () {
        let mut fw = FakeWindows::default();
        fw.add (0x10, "Main", true, 1);
        fw.add (0x20, "Save As", true, 1);
        // dialog 0x20 is owned by 0x10, and the owner's last active popup is the
        // dialog itself .. the walk from 0x20 reaches 0x20, so only the dialog's
        // walk terminates on itself; alt-tab shows neither the dialog-as-entry
        // duplicate nor hides the app
        fw.owners.insert (0x20, 0x10);
        fw.popups.insert (0x10, 0x20);

        assert! ( ! is_switcher_window (&fw, 0x10) );  // main window, its popup chain ends on the dialog
        assert! (   is_switcher_window (&fw, 0x20) );  // the active dialog represents the app
        let entries = enumerate_candidates (&fw);
        assert_eq! (entries.len(), 1);
        assert_eq! (entries[0].title, "Save As");
    }

    #[test]
    fn owned_window_with_inactive_popup_chain_is_excluded () {
        let mut fw = FakeWindows::default();
        fw.add (0x10, "Main", true, 1);
        fw.add (0x20, "Tool Palette", true, 1);
        fw.owners.insert (0x20, 0x10);
        // the owner's active popup is itself .. the palette's walk lands on the
        // owner and stops without ever reaching the palette
        let entries = enumerate_candidates (&fw);
        assert_eq! (entries.len(), 1);
        assert_eq! (entries[0].title, "Main");
    }

    #[test]
    fn stable_index_counts_only_included_windows () {
        let mut fw = FakeWindows::default();
        fw.add (0x10, "One", true, 1);
        fw.add (0x20, "", true, 2);
        fw.add (0x30, "Two", true, 3);
        let entries = enumerate_candidates (&fw);
        assert_eq! (entries .iter() .map (|e| e.stable_index) .collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn missing_exe_path_yields_no_exe_name () {
        let mut fw = FakeWindows::default();
        fw.add (0x10, "Elevated App", true, 4);  // no exe_paths entry, access denied
        let entries = enumerate_candidates (&fw);
        assert_eq! (entries[0].exe_name, None);
    }

    #[test]
    fn exe_name_parses_from_either_separator () {
        assert_eq! (parse_exe_name (r"C:\Program Files\App\app.exe"), Some("app.exe".into()));
        assert_eq! (parse_exe_name ("/usr/bin/thing"), Some("thing".into()));
        assert_eq! (parse_exe_name (r"C:\trailing\"), None);
        assert_eq! (parse_exe_name (""), None);
    }
}
