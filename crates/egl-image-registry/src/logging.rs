//! `tracing` subscriber setup.

use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str =
    "egl_image_interop=info,egl_image_registry=info,egl_image_ffi=info,warn";

/// Install a formatting subscriber filtered by `RUST_LOG`, falling back to
/// [`DEFAULT_FILTER`].
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_tracing() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    init_with_filter(filter)
}

/// Install a formatting subscriber with an explicit filter directive.
pub fn init_tracing_with_filter(directives: &str) -> bool {
    init_with_filter(EnvFilter::new(directives))
}

fn init_with_filter(filter: EnvFilter) -> bool {
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(true)
        .try_init()
        .is_ok()
}
