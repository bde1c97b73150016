//! The system-wide activation hotkey .. parsing/formatting of the configured
//! "<modifier>+<letter>" string plus the win32 registration call.

use std::fmt;

use serde::{Deserialize, Serialize};


/// Registration id passed to the OS .. arbitrary but fixed so a restarted
/// instance replaces a stale registration instead of colliding with it
pub const HOTKEY_ID : i32 = 10983;


# [ derive (Debug, Default, Eq, PartialEq, Clone, Copy, Serialize, Deserialize) ]
pub enum HotkeyModifier {
    #[default] Alt,
    Ctrl,
    Shift,
    Win,
}


/// An activation chord .. one modifier plus one A-Z letter (stored uppercase,
/// matching the virtual-key code it registers as)
# [ derive (Debug, Eq, PartialEq, Clone, Copy, Serialize, Deserialize) ]
pub struct HotkeySpec {
    pub modifier : HotkeyModifier,
    pub key      : char,
}

impl Default for HotkeySpec {
    fn default () -> HotkeySpec {
        HotkeySpec { modifier: HotkeyModifier::Alt, key: 'K' }
    }
}

impl fmt::Display for HotkeySpec {
    fn fmt (&self, f:&mut fmt::Formatter) -> fmt::Result {
        let modifier = match self.modifier {
            HotkeyModifier::Alt => "Alt",  HotkeyModifier::Ctrl  => "Ctrl",
            HotkeyModifier::Win => "Win",  HotkeyModifier::Shift => "Shift",
        };
        write! (f, "{}+{}", modifier, self.key)
    }
}

impl HotkeySpec {

    /// Parses the config-file form, e.g. "alt+k" .. case-insensitive on both
    /// sides of the '+'
    pub fn parse (s:&str) -> Option<HotkeySpec> {
        let (modifier, key) = s .trim() .split_once ('+') ?;
        let modifier = match modifier .trim() .to_ascii_lowercase() .as_str() {
            "alt" => HotkeyModifier::Alt,   "ctrl"  => HotkeyModifier::Ctrl,
            "win" => HotkeyModifier::Win,   "shift" => HotkeyModifier::Shift,
            _ => return None,
        };
        let key = key.trim();
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() =>
                Some ( HotkeySpec { modifier, key: c.to_ascii_uppercase() } ),
            _ => None,
        }
    }

    /// The config-file form, e.g. "alt+k"
    pub fn to_conf_string (&self) -> String {
        self .to_string() .to_ascii_lowercase()
    }

    /// A spec guaranteed registrable .. anything outside A-Z falls back to the
    /// default chord rather than failing registration later
    pub fn validated (self) -> HotkeySpec {
        if self.key.is_ascii_uppercase() { self } else { HotkeySpec::default() }
    }

}




#[cfg(windows)]
pub mod registration {

    use tracing::info;

    use windows::Win32::Foundation::HWND;
    use windows::Win32::UI::Input::KeyboardAndMouse::{
        RegisterHotKey, UnregisterHotKey, HOT_KEY_MODIFIERS, MOD_ALT, MOD_CONTROL, MOD_SHIFT, MOD_WIN,
    };

    use crate::winjump::{Hwnd, WinjumpError};
    use super::{HotkeyModifier, HotkeySpec, HOTKEY_ID};

    fn os_modifier (modifier:HotkeyModifier) -> HOT_KEY_MODIFIERS {
        match modifier {
            HotkeyModifier::Alt => MOD_ALT,  HotkeyModifier::Ctrl  => MOD_CONTROL,
            HotkeyModifier::Win => MOD_WIN,  HotkeyModifier::Shift => MOD_SHIFT,
        }
    }

    /// Registers the chord against the host window .. WM_HOTKEY with
    /// [`HOTKEY_ID`] arrives on its message queue when pressed
    pub fn register_hotkey (hwnd:Hwnd, spec:HotkeySpec) -> Result <(), WinjumpError> {
        let spec = spec.validated();
        unsafe {
            RegisterHotKey ( HWND (hwnd as _), HOTKEY_ID, os_modifier(spec.modifier), spec.key as u32 )
                .map_err (|e| WinjumpError::HotkeyRegister (format!("{spec}: {e}"))) ?
        }
        info! ("registered activation hotkey {spec}");
        Ok(())
    }

    pub fn unregister_hotkey (hwnd:Hwnd) {
        unsafe {
            let _ = UnregisterHotKey ( HWND (hwnd as _), HOTKEY_ID );
        }
    }

}
