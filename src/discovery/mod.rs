pub mod delivery;
pub mod guard;

mod advertiser;
mod searcher;

pub use delivery::*;
pub use guard::*;
