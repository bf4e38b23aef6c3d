pub mod file;

pub use file::FileTemperatureSource;

use crate::models::Reading;
use std::future::Future;

/// Something that can produce a temperature for an opaque source id.
///
/// Implementations must not fail or block indefinitely: any problem is
/// reported as [`Reading::Unavailable`].
pub trait TemperatureSource {
    fn read(&self, source_id: &str) -> impl Future<Output = Reading>;
}
