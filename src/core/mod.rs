pub mod lookup;
pub mod traits;

pub use lookup::ContactLookup;
pub use traits::RiskProvider;
