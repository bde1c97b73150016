#![ allow (non_upper_case_globals, non_snake_case) ]

use windows::core::PWSTR;
use windows::Win32::Foundation::{BOOL, CloseHandle, HWND, LPARAM, WPARAM};
use windows::Win32::System::Threading::{
    OpenProcess, PROCESS_NAME_WIN32, PROCESS_QUERY_LIMITED_INFORMATION, QueryFullProcessImageNameW,
};
use windows::Win32::UI::WindowsAndMessaging::{
    DispatchMessageW, EnumWindows, GetAncestor, GetLastActivePopup, GetWindowPlacement,
    GetWindowTextW, GetWindowThreadProcessId, IsWindowVisible, PeekMessageW, SetForegroundWindow,
    ShowWindowAsync, TranslateMessage, GA_ROOTOWNER, LB_DELETESTRING, LB_GETCOUNT, LB_GETITEMDATA,
    LB_GETTEXT, LB_GETTEXTLEN, LB_GETTOPINDEX, LB_INSERTSTRING, LB_SETITEMDATA, LB_SETTOPINDEX,
    MSG, PM_REMOVE, SW_RESTORE, SW_SHOW, SW_SHOWMINIMIZED, SendMessageW, WINDOWPLACEMENT, WM_QUIT,
};

use crate::enumerate::WindowQuery;
use crate::reconcile::ListDisplay;
use crate::winjump::Hwnd;




pub fn check_window_visible (hwnd:Hwnd) -> bool { unsafe {
    IsWindowVisible (HWND(hwnd as _)) .as_bool()
} }

pub fn get_window_root_owner (hwnd:Hwnd) -> Hwnd { unsafe {
    GetAncestor (HWND(hwnd as _), GA_ROOTOWNER).0 as Hwnd
} }

pub fn get_window_last_active_popup (hwnd:Hwnd) -> Hwnd { unsafe {
    GetLastActivePopup (HWND(hwnd as _)).0 as Hwnd
} }

pub fn get_window_text (hwnd:Hwnd) -> String { unsafe {
    const MAX_LEN : usize = 512;
    let mut lpstr = [0u16; MAX_LEN];
    let copied_len = GetWindowTextW (HWND(hwnd as _), &mut lpstr);
    String::from_utf16_lossy (&lpstr[..(copied_len as _)])
} }

pub fn get_hwnd_pid (hwnd:Hwnd) -> u32 { unsafe {
    let mut pid : u32 = 0;
    let _ = GetWindowThreadProcessId (HWND(hwnd as _), Some(&mut pid));
    pid
} }

pub fn get_pid_exe_path (pid:u32) -> Option<String> { unsafe {
    const MAX_LEN : usize = 1024;
    let handle = OpenProcess (PROCESS_QUERY_LIMITED_INFORMATION, BOOL::from(false), pid) .ok()?;
    let mut lpstr = [0u16; MAX_LEN];
    let mut lpdwsize = MAX_LEN as u32;
    let res = QueryFullProcessImageNameW ( handle, PROCESS_NAME_WIN32, PWSTR::from_raw(lpstr.as_mut_ptr()), &mut lpdwsize );
    let _ = CloseHandle (handle);
    res .ok() ?;
    Some ( String::from_utf16_lossy (&lpstr[..(lpdwsize as _)]) )
} }


pub fn window_activate (hwnd:Hwnd) { unsafe {
    // a minimized window needs restoring, anything else just gets shown as-is
    let mut win_state = WINDOWPLACEMENT::default();
    let _ = GetWindowPlacement (HWND(hwnd as _), &mut win_state);
    if win_state.showCmd == SW_SHOWMINIMIZED.0 as u32 {
        ShowWindowAsync (HWND(hwnd as _), SW_RESTORE);
    } else {
        ShowWindowAsync (HWND(hwnd as _), SW_SHOW);
    }
    let _ = SetForegroundWindow (HWND(hwnd as _));
} }


/// Drains every message currently queued for this thread, dispatching each ..
/// returns false once WM_QUIT is seen
pub fn pump_messages () -> bool { unsafe {
    let mut msg = MSG::default();
    while PeekMessageW (&mut msg, HWND::default(), 0, 0, PM_REMOVE) .as_bool() {
        if msg.message == WM_QUIT { return false }
        let _ = TranslateMessage (&msg);
        DispatchMessageW (&msg);
    }
    true
} }




// EnumWindows hands each hwnd to the callback with our lparam .. we pass the
// output vec through it rather than stashing it in a static
unsafe extern "system" fn enum_windows_cb (hwnd:HWND, lparam:LPARAM) -> BOOL {
    let hwnds = &mut *(lparam.0 as *mut Vec<Hwnd>);
    hwnds .push (hwnd.0 as Hwnd);
    BOOL (true as i32)
}

pub fn get_top_level_windows () -> Vec<Hwnd> { unsafe {
    let mut hwnds : Vec<Hwnd> = Vec::new();
    let _ = EnumWindows ( Some(enum_windows_cb), LPARAM (&mut hwnds as *mut Vec<Hwnd> as isize) );
    hwnds
} }


/// The live desktop as a [`WindowQuery`]
# [ derive (Debug, Default, Clone, Copy) ]
pub struct WinQuery;

impl WindowQuery for WinQuery {
    fn top_level_windows (&self) -> Vec<Hwnd> { get_top_level_windows() }
    fn window_title      (&self, hwnd:Hwnd) -> String { get_window_text (hwnd) }
    fn is_visible        (&self, hwnd:Hwnd) -> bool   { check_window_visible (hwnd) }
    fn root_owner        (&self, hwnd:Hwnd) -> Hwnd   { get_window_root_owner (hwnd) }
    fn last_active_popup (&self, hwnd:Hwnd) -> Hwnd   { get_window_last_active_popup (hwnd) }
    fn window_pid        (&self, hwnd:Hwnd) -> u32    { get_hwnd_pid (hwnd) }
    fn exe_path          (&self, pid:u32) -> Option<String> { get_pid_exe_path (pid) }
}




/// A win32 listbox control as a [`ListDisplay`] .. rows are LB_* messages, the
/// per-row tag rides in the listbox item-data slot
# [ derive (Debug, Clone, Copy) ]
pub struct ListBoxDisplay {
    pub hwnd : Hwnd,
}

impl ListBoxDisplay {
    pub fn new (hwnd:Hwnd) -> ListBoxDisplay {
        ListBoxDisplay { hwnd }
    }
    fn send (&self, msg:u32, wparam:usize, lparam:isize) -> isize { unsafe {
        SendMessageW ( HWND(self.hwnd as _), msg, WPARAM(wparam), LPARAM(lparam) ) .0
    } }
}

impl ListDisplay for ListBoxDisplay {

    fn len (&self) -> usize {
        self.send (LB_GETCOUNT, 0, 0) .max(0) as usize
    }

    fn text_at (&self, idx:usize) -> Option<String> {
        let text_len = self.send (LB_GETTEXTLEN, idx, 0);
        if text_len < 0 { return None }     // LB_ERR, row doesnt exist
        let mut buf = vec![0u16; text_len as usize + 1];
        let copied = self.send (LB_GETTEXT, idx, buf.as_mut_ptr() as isize);
        if copied < 0 { return None }
        Some ( String::from_utf16_lossy (&buf[..(copied as usize).min(buf.len())]) )
    }
    fn tag_at (&self, idx:usize) -> Option<u32> {
        if idx >= self.len() { return None }
        Some ( self.send (LB_GETITEMDATA, idx, 0) as u32 )
    }

    fn insert (&mut self, idx:usize, text:&str, tag:u32) {
        let text_wide : Vec<u16> = text .encode_utf16() .chain (std::iter::once(0)) .collect();
        let row = self.send (LB_INSERTSTRING, idx, text_wide.as_ptr() as isize);
        if row >= 0 {
            self.send (LB_SETITEMDATA, row as usize, tag as isize);
        }
    }
    fn remove (&mut self, idx:usize) {
        self.send (LB_DELETESTRING, idx, 0);
    }
    fn set_tag (&mut self, idx:usize, tag:u32) {
        self.send (LB_SETITEMDATA, idx, tag as isize);
    }

    fn top_index (&self) -> usize {
        self.send (LB_GETTOPINDEX, 0, 0) .max(0) as usize
    }
    fn set_top_index (&mut self, idx:usize) {
        self.send (LB_SETTOPINDEX, idx, 0);
    }

}
