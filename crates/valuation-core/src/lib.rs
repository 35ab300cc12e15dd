pub mod error;
pub mod ratio;
pub mod ticker;
pub mod traits;
pub mod types;

pub use error::*;
pub use ratio::Ratio;
pub use ticker::normalize_ticker;
pub use traits::*;
pub use types::*;
