pub mod confidence;
pub mod draft;
pub mod kinds;
pub mod record;

pub use confidence::Confidence;
pub use draft::FactDraft;
pub use kinds::{Category, FactSource, Maturity, Visibility};
pub use record::Fact;
