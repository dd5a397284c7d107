pub mod amount;
pub mod percentage;
pub mod price;

pub use amount::{Amount, TokenAmount};
pub use percentage::Percentage;
pub use price::Price;
