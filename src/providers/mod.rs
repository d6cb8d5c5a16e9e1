pub mod http_snapshot;
pub mod util;

pub use http_snapshot::{HttpSnapshotProvider, load_price_book};
