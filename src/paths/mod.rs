pub mod browse;
pub mod enumerate;
pub mod protected;

pub use browse::{safe_roots, selection_size, DisplayItem};
pub use enumerate::PathEnumerator;
pub use protected::ProtectedPathSet;
