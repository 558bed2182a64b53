pub mod customers;
pub mod measurements;
pub mod outfits;
pub mod products;
pub mod style_profiles;
pub mod try_on;
