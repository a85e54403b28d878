// Adapters - External system implementations

pub mod fs_local;
pub mod mock;
pub mod probe_ffprobe;
#[cfg(feature = "libav")]
pub mod probe_libav;
pub mod tracing_log;

// Re-export adapters
pub use fs_local::LocalFsAdapter;
pub use probe_ffprobe::FFprobeAdapter;
#[cfg(feature = "libav")]
pub use probe_libav::LibavKeyframeAdapter;
pub use tracing_log::TracingLogAdapter;
