pub mod card;
pub mod selectors;

pub use card::Card;
