use env_logger::{Builder, Env};
use log::debug;

/// Install the process logger.  `RUST_LOG` selects the filter, errors only
/// when unset.
pub fn init() {
    let res = Builder::from_env(Env::default().default_filter_or("error")).try_init();
    debug!("logger: {res:?}");
}

#[ctor::ctor]
fn log_init() {
    init();
}
