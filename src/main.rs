#[cfg(windows)]
fn main () {

    use winjump::config::Config;
    use winjump::enumerate::enumerate_candidates;
    use winjump::filter::filter_in_place;
    use winjump::win_apis::WinQuery;
    use winjump::winjump::friendly_name;

    let conf = Config::instance();

    // we want the non-blocking log-appender guard to be here in main, to ensure any pending logs get flushed upon crash etc
    let _guard = conf.setup_log_subscriber();

    tracing::info! ("Starting Winjump v{} ...", Config::WINJUMP_VERSION);

    // console harness .. enumerate the switcher set, optionally filtered by an
    // argv search string, and print it the way the list control would show it
    let search = std::env::args().nth(1) .unwrap_or_default();
    let mut candidates = enumerate_candidates (&WinQuery);
    filter_in_place (&mut candidates, &search);
    for entry in &candidates {
        println! ("{}", friendly_name (entry));
    }

}


#[cfg(not(windows))]
fn main () {
    eprintln! ("winjump drives the win32 window switcher .. there is nothing to run on this platform");
}
