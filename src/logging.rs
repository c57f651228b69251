use env_logger::Builder;
use log::LevelFilter;

pub struct Logger;

impl Logger {
    /// Installs the global colog-formatted logger at the requested
    /// verbosity. Call once, before any log statement.
    pub fn init(verbosity: LevelFilter) {
        let mut builder: Builder = colog::default_builder();
        builder.filter_level(verbosity);
        builder.init();
    }
}
