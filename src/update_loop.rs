//! The frame-paced main loop .. drain pending window messages, run one update
//! tick, then sleep out the rest of the frame so the process idles between
//! refreshes instead of spinning.

use std::time::{Duration, Instant};

use tracing::{debug, error};

use crate::winjump::WinjumpError;


pub const MIN_UPDATES_PER_SECOND : u64 = 8;
pub const MAX_UPDATES_PER_SECOND : u64 = 24;


/// Fixed-period frame timing .. the period is derived once from the configured
/// refresh rate (clamped to a sane band) and each frame sleeps whatever the
/// tick's work left unused.
# [ derive (Debug, Clone, Copy) ]
pub struct FramePacer {
    period : Duration,
}

impl FramePacer {

    pub fn new (updates_per_second:u64) -> FramePacer {
        let ups = updates_per_second .clamp (MIN_UPDATES_PER_SECOND, MAX_UPDATES_PER_SECOND);
        FramePacer { period: Duration::from_micros (1_000_000 / ups) }
    }

    pub fn period (&self) -> Duration {
        self.period
    }

    /// How long to sleep after a tick that took `worked` .. zero when the tick
    /// overran the frame
    pub fn remaining (&self, worked:Duration) -> Duration {
        self.period .saturating_sub (worked)
    }

}


/// What the loop needs from its host shell each frame
pub trait TickHost {

    /// Drains pending OS messages .. returns false once a quit is seen
    fn pump_messages (&mut self) -> bool;

    /// Current contents of the search box
    fn search_text (&self) -> String;

    /// One update pass over the window list and display
    fn tick (&mut self, search:&str) -> Result <(), WinjumpError>;

}


/// Runs the host until it quits or a tick fails fatally .. returns the error in
/// the latter case so the shell can surface it before exiting.
pub fn run_loop (host:&mut impl TickHost, pacer:FramePacer) -> Result <(), WinjumpError> {
    debug! ("update loop starting at {:?} per frame", pacer.period());
    loop {
        let frame_start = Instant::now();

        if ! host.pump_messages() {
            debug! ("quit message received, update loop exiting");
            return Ok(())
        }
        let search = host.search_text();
        if let Err(e) = host.tick (&search) {
            error! ("update tick failed fatally: {e}");
            return Err(e)
        }

        std::thread::sleep ( pacer.remaining (frame_start.elapsed()) );
    }
}




#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pacer_clamps_refresh_rate () {
        assert_eq! (FramePacer::new(24).period(), Duration::from_micros (1_000_000 / 24));
        assert_eq! (FramePacer::new(1000).period(), FramePacer::new(24).period());
        assert_eq! (FramePacer::new(0).period(),    FramePacer::new(8).period());
    }

    #[test]
    fn pacer_sleep_absorbs_tick_work () {
        let pacer = FramePacer::new (10);   // 100ms frames
        assert_eq! (pacer.remaining (Duration::from_millis(30)), Duration::from_millis(70));
        // an overrunning tick just starts the next frame immediately
        assert_eq! (pacer.remaining (Duration::from_millis(150)), Duration::ZERO);
    }

    /// Scripted host .. quits after n ticks, optionally failing one of them
    struct ScriptedHost {
        ticks_before_quit : usize,
        fail_on_tick      : Option<usize>,
        ticks_seen        : usize,
        searches_seen     : Vec<String>,
    }
    impl ScriptedHost {
        fn new (ticks_before_quit:usize) -> ScriptedHost {
            ScriptedHost { ticks_before_quit, fail_on_tick: None, ticks_seen: 0, searches_seen: Vec::new() }
        }
    }
    impl TickHost for ScriptedHost {
        fn pump_messages (&mut self) -> bool {
            self.ticks_seen < self.ticks_before_quit
        }
        fn search_text (&self) -> String {
            format! ("s{}", self.ticks_seen)
        }
        fn tick (&mut self, search:&str) -> Result<(), WinjumpError> {
            self.searches_seen .push (search.to_string());
            self.ticks_seen += 1;
            if self.fail_on_tick == Some(self.ticks_seen) {
                let mut v : Vec<u8> = Vec::new();
                return Err ( v.try_reserve_exact(usize::MAX) .unwrap_err() .into() )
            }
            Ok(())
        }
    }

    #[test]
    fn loop_exits_cleanly_on_quit () {
        let mut host = ScriptedHost::new (3);
        run_loop (&mut host, FramePacer::new (MAX_UPDATES_PER_SECOND)) .unwrap();
        assert_eq! (host.ticks_seen, 3);
        // each tick saw the search text sampled just before it ran
        assert_eq! (host.searches_seen, vec! ["s0", "s1", "s2"]);
    }

    #[test]
    fn loop_stops_and_reports_fatal_tick_error () {
        let mut host = ScriptedHost::new (10);
        host.fail_on_tick = Some (2);
        let res = run_loop (&mut host, FramePacer::new (MAX_UPDATES_PER_SECOND));
        assert! ( matches! (res, Err (WinjumpError::SnapshotAlloc(_))) );
        assert_eq! (host.ticks_seen, 2);
    }
}
