pub mod traits;
pub mod udp;

pub use traits::*;
pub use udp::*;
