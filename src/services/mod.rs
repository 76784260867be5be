pub mod stream_prober;

pub use stream_prober::{LivenessProbe, StreamProber};
