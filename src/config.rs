#![ allow (non_snake_case) ]

use std::fs;
use std::ops::{Deref, Not};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, RwLock};

use once_cell::sync::OnceCell;
use toml_edit::DocumentMut;

use tracing::warn;
use tracing::metadata::LevelFilter;
use tracing_appender::non_blocking;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{Layer, Registry, reload};
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::reload::Handle;
use tracing_subscriber::prelude::*;

use crate::hotkey::HotkeySpec;




/// Font the shell applies to the list and search controls .. follows the win32
/// logfont convention of negative height meaning character height
# [ derive (Debug, Clone, PartialEq) ]
pub struct FontDesc {
    pub name   : String,
    pub height : i32,
    pub weight : i32,
    pub italic : bool,
}

impl Default for FontDesc {
    fn default () -> FontDesc {
        FontDesc { name: String::new(), height: -11, weight: 0, italic: false }
    }
}




# [ derive (Debug) ]
pub struct _Config {
    pub toml     : RwLock <Option <DocumentMut>>,
    pub default  : DocumentMut,
    pub loglevel : RwLock <Option <Handle <LevelFilter, Registry>>>,
}


# [ derive (Debug, Clone) ]
pub struct Config ( Arc <_Config> );

impl Deref for Config {
    type Target = _Config;
    fn deref (&self) -> &_Config { &self.0 }
}




// first some module level helper functions ..
/// Returns the directory of the currently running executable
fn get_app_dir () -> Option<PathBuf> {
    std::env::current_exe().ok() .and_then (|p| p.parent() .map (|p| p.to_path_buf()))
}

/// Checks whether a path is writeable by the current user by attempting to open/create a file in write mode
fn is_writeable (path: &Path) -> bool {
    fs::OpenOptions::new().write(true).create(true).truncate(false).open(path).is_ok()
    // note that ^^ this is similar to 'touch' and will create an empty file if it doesnt exist
}




impl Config {

    pub fn instance () -> Config {
        static INSTANCE: OnceCell <Config> = OnceCell::new();
        INSTANCE .get_or_init ( || {
            let conf = Config::unloaded();
            conf.load();
            conf
        } ) .clone()
    }

    /// A config backed by the compiled-in defaults only .. [`Config::load`] (or
    /// [`Config::load_path`]) attaches the on-disk file
    pub fn unloaded () -> Config {
        Config ( Arc::new ( _Config {
            toml    : RwLock::new (None),
            default : DocumentMut::from_str (include_str!("../winjump.conf.toml")) .unwrap_or_default(),
            // ^^ our winjump.conf.toml is at root of project, the include_str macro will load the contents at compile time
            loglevel : RwLock::new (None),
        } ) )
    }

    pub const CONF_FILE_NAME : &'static str = "winjump.conf.toml";

    pub const WINJUMP_VERSION : &'static str = env!("CARGO_PKG_VERSION");


    fn get_config_file (&self) -> Option<PathBuf> {
        let app_dir_loc = get_app_dir() .map (|p| p.join(Self::CONF_FILE_NAME));
        if app_dir_loc.as_ref() .is_some_and (|p| is_writeable(p)) {
            return app_dir_loc
        }
        let data_dir = dirs::data_local_dir() .map (|p| p.join("Winjump"));
        if let Some(p) = data_dir.as_ref() .filter (|p| !p.exists()) {
            let _ = fs::create_dir (p);
        }
        let data_dir_loc = data_dir .map (|p| p.join(Self::CONF_FILE_NAME));
        if data_dir_loc .as_ref() .is_some_and (|p| is_writeable(p)) {
            return data_dir_loc
        }
        None
    }
    pub fn get_log_loc (&self) -> Option<PathBuf> {
        self.get_config_file() .and_then (|p| p.parent() .map (|p| p.to_path_buf()))
    }


    pub fn load (&self) {
        if let Some(conf_path) = self.get_config_file().as_ref() {
            if self.load_path (conf_path) { return }
        }
        // there's no writeable location, or the file was empty, or we failed to read or parse it .. load default and write back
        self.reset_to_default();
    }

    /// Loads a specific config file .. false when missing/empty/unparseable, in
    /// which case whatever was loaded before (or the defaults) stays in effect
    pub fn load_path (&self, conf_path:&Path) -> bool {
        if let Ok(cfg_str) = fs::read_to_string(conf_path) {
            if !cfg_str.trim().is_empty() {
                if let Ok(toml) = DocumentMut::from_str(&cfg_str) {
                    // successfully read and parsed a non-empty toml, we'll use that
                    if let Ok(mut guard) = self.toml.write() { guard.replace(toml); }
                    return true
        } } }
        warn! ("could not load config from {:?}, falling back to defaults", conf_path);
        false
    }

    pub fn reset_to_default (&self) {
        if let Ok(mut guard) = self.toml.write() { guard.replace (self.default.clone()); }
        self.write_back_toml();
    }


    /// One-time log-file setup per the logging_enabled / logging_level keys ..
    /// the returned flush guard must be held for the life of the process
    pub fn setup_log_subscriber (&self) -> Option<WorkerGuard> {

        if self.check_flag__logging_enabled().not()
            || self.loglevel.read() .map (|g| g.is_some()) .unwrap_or (true) {
            return None
        }
        let log_loc = self.get_log_loc()?;

        let log_appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix("winjump_log")
            .filename_suffix("log")
            .max_log_files(7)
            .build(log_loc)
            .ok()?;

        let (nb_log_appender, guard) = non_blocking (log_appender);

        let (level_filter, filter_handle) = reload::Layer::new (self.get_log_level());

        if let Ok(mut guard) = self.loglevel.write() { *guard = Some(filter_handle); }

        let timer = LocalTime::new ( ::time::format_description::parse (
            "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]"
        ).ok()? );

        let subscriber = tracing_subscriber::fmt::Layer::new()
            .with_writer(nb_log_appender)
            .with_timer(timer)
            .with_ansi(false)
            .with_filter(level_filter);

        tracing_subscriber::registry().with(subscriber).init();

        Some (guard)
    }

    pub fn reload_log_level (&self) {
        let log_level = self.get_log_level();
        warn! ("Setting log-level to {:?}", log_level.into_level());
        if let Ok(guard) = self.loglevel.read() {
            if let Some(h) = guard.as_ref() {
                let _ = h.modify (|f| *f = log_level);
        } }
    }


    fn write_back_toml (&self) {
        let Some(conf_path) = self.get_config_file() else { return };
        let toml_str = self.toml.read() .ok()
            .and_then (|g| g.as_ref() .map (|d| d.to_string()))
            .unwrap_or_default();
        let _ = fs::write (conf_path, toml_str);
    }
    fn write_back_toml_if_changed (&self) -> bool {
        let Some(conf_path) = self.get_config_file() else { return false };
        let toml_str = self.toml.read() .ok()
            .and_then (|g| g.as_ref() .map (|d| d.to_string()))
            .unwrap_or_default();
        let old_toml_str = fs::read_to_string (&conf_path) .unwrap_or_default();
        if toml_str != old_toml_str {
            return fs::write (conf_path, toml_str) .is_ok()
        }
        true
    }



    fn check_flag (&self, flag_name:&str) -> bool {
        self.toml.read() .ok()
            .and_then (|g| g.as_ref() .and_then (|t| t.get(flag_name)) .and_then (|t| t.as_bool()))
            .or_else  (|| self.default.get(flag_name) .and_then (|t| t.as_bool()))
            .unwrap_or (false)
    }

    fn get_number (&self, key:&str) -> i64 {
        self.toml.read() .ok()
            .and_then (|g| g.as_ref() .and_then (|t| t.get(key)) .and_then (|t| t.as_integer()))
            .or_else  (|| self.default.get(key) .and_then (|t| t.as_integer()))
            .unwrap_or (0)
    }

    fn get_string (&self, key:&str) -> String {
        self.toml.read() .ok()
            .and_then (|g| g.as_ref() .and_then (|t| t.get(key)) .and_then (|t| t.as_str()) .map (|s| s.to_string()))
            .or_else  (|| self.default.get(key) .and_then (|t| t.as_str()) .map (|s| s.to_string()))
            .unwrap_or_default()
    }



    pub fn check_flag__logging_enabled (&self) -> bool { self.check_flag ("logging_enabled") }

    pub fn get_log_level (&self) -> LevelFilter {
        if !self.check_flag__logging_enabled() {
            return LevelFilter::OFF;
        }
        match self.get_string("logging_level").as_str() {
            "TRACE" => LevelFilter::TRACE,
            "DEBUG" => LevelFilter::DEBUG,
            "WARN"  => LevelFilter::WARN,
            "ERROR" => LevelFilter::ERROR,
            "OFF"   => LevelFilter::OFF,
            _       => LevelFilter::INFO,
        }
    }

    pub fn get_target_updates_per_second (&self) -> u64 {
        self.get_number ("target_updates_per_second") .max (0) as u64
    }



    pub fn read_conf__font (&self) -> FontDesc {
        let default = FontDesc::default();
        let Ok(guard) = self.toml.read() else { return default };
        let Some(toml) = guard.as_ref() else { return default };
        let font = toml.get ("font");
        let get_int = |key:&str, fallback:i32| {
            font .and_then (|t| t.get(key)) .and_then (|v| v.as_integer()) .map (|n| n as i32) .unwrap_or (fallback)
        };
        let height = get_int ("height", default.height);
        FontDesc {
            name   : font .and_then (|t| t.get("name")) .and_then (|v| v.as_str()) .unwrap_or (&default.name) .to_string(),
            // a positive (cell) height in the file is normalized to the negative (char) height convention
            height : if height > 0 { -height } else { height },
            weight : get_int ("weight", default.weight),
            italic : font .and_then (|t| t.get("italic")) .and_then (|v| v.as_bool()) .unwrap_or (default.italic),
        }
    }
    pub fn update_conf__font (&self, font:&FontDesc) {
        if let Ok(mut guard) = self.toml.write() {
            if let Some(toml) = guard.as_mut() {
                toml ["font"] ["name"]   = toml_edit::value (font.name.as_str());
                toml ["font"] ["height"] = toml_edit::value (font.height as i64);
                toml ["font"] ["weight"] = toml_edit::value (font.weight as i64);
                toml ["font"] ["italic"] = toml_edit::value (font.italic);
        } }
    }


    pub fn read_conf__hotkey (&self) -> HotkeySpec {
        match HotkeySpec::parse (&self.get_string ("activation_hotkey")) {
            Some (spec) => spec.validated(),
            None => {
                warn! ("unparseable activation_hotkey in config, using default {}", HotkeySpec::default());
                HotkeySpec::default()
            }
        }
    }
    pub fn update_conf__hotkey (&self, spec:HotkeySpec) {
        if let Ok(mut guard) = self.toml.write() {
            if let Some(toml) = guard.as_mut() {
                toml ["activation_hotkey"] = toml_edit::value (spec.to_conf_string());
        } }
    }



    /// The settings the shell needs at startup .. bad or missing values have
    /// already decayed to defaults by the time this returns
    pub fn load_config (&self) -> (FontDesc, HotkeySpec) {
        ( self.read_conf__font(), self.read_conf__hotkey() )
    }

    /// Persists the current font/hotkey choices .. false if the file could not
    /// be written (the in-memory settings stay in effect regardless)
    pub fn save_config (&self, font:&FontDesc, hotkey:HotkeySpec) -> bool {
        self.update_conf__font (font);
        self.update_conf__hotkey (hotkey);
        self.write_back_toml_if_changed()
    }

}




#[cfg(test)]
mod tests {
    use super::*;
    use crate::hotkey::HotkeyModifier;

    #[test]
    fn compiled_in_defaults_parse_and_apply () {
        let conf = Config::unloaded();
        assert_eq! (conf.check_flag__logging_enabled(), false);
        assert_eq! (conf.get_log_level(), LevelFilter::OFF);
        assert_eq! (conf.get_target_updates_per_second(), 24);
        assert_eq! (conf.read_conf__hotkey(), HotkeySpec::default());
        assert_eq! (conf.read_conf__font(), FontDesc::default());
    }

    #[test]
    fn loaded_values_override_defaults () {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join (Config::CONF_FILE_NAME);
        std::fs::write (&path, r#"
            logging_enabled = true
            logging_level = "DEBUG"
            target_updates_per_second = 12
            activation_hotkey = "ctrl+j"
            [font]
            name = "Consolas"
            height = -13
            weight = 700
            italic = true
        "#) .unwrap();

        let conf = Config::unloaded();
        assert! (conf.load_path (&path));
        assert_eq! (conf.get_log_level(), LevelFilter::DEBUG);
        assert_eq! (conf.get_target_updates_per_second(), 12);
        assert_eq! (conf.read_conf__hotkey(), HotkeySpec { modifier: HotkeyModifier::Ctrl, key: 'J' });
        assert_eq! (conf.read_conf__font(), FontDesc {
            name: "Consolas".into(), height: -13, weight: 700, italic: true,
        });
    }

    #[test]
    fn unloadable_file_leaves_defaults_in_effect () {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join ("broken.toml");
        std::fs::write (&path, "logging_level = [not toml").unwrap();

        let conf = Config::unloaded();
        assert! ( ! conf.load_path (&path) );
        assert! ( ! conf.load_path (&dir.path().join("missing.toml")) );
        assert_eq! (conf.get_target_updates_per_second(), 24);
    }

    #[test]
    fn bad_hotkey_value_decays_to_default () {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join (Config::CONF_FILE_NAME);
        std::fs::write (&path, r#"activation_hotkey = "hyper+k!""#) .unwrap();

        let conf = Config::unloaded();
        assert! (conf.load_path (&path));
        assert_eq! (conf.read_conf__hotkey(), HotkeySpec::default());
    }

    #[test]
    fn positive_font_height_is_normalized_negative () {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join (Config::CONF_FILE_NAME);
        std::fs::write (&path, "[font]\nheight = 13\n") .unwrap();

        let conf = Config::unloaded();
        assert! (conf.load_path (&path));
        assert_eq! (conf.read_conf__font().height, -13);
    }

    #[test]
    fn font_and_hotkey_updates_round_trip_through_the_doc () {
        let conf = Config::unloaded();
        // start from the default doc so the in-memory updates have a target
        if let Ok(mut guard) = conf.toml.write() { guard.replace (conf.default.clone()); }

        let font = FontDesc { name: "Segoe UI".into(), height: -15, weight: 400, italic: false };
        let hotkey = HotkeySpec { modifier: HotkeyModifier::Win, key: 'M' };
        conf.update_conf__font (&font);
        conf.update_conf__hotkey (hotkey);

        assert_eq! (conf.read_conf__font(), font);
        assert_eq! (conf.read_conf__hotkey(), hotkey);
    }
}
