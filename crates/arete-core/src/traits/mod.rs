mod archive_sink;
mod clock;
mod local_store;
mod remote_store;

pub use archive_sink::IArchiveSink;
pub use clock::{Clock, ManualClock, SystemClock};
pub use local_store::ILocalStore;
pub use remote_store::IRemoteStore;
