pub mod customer;
pub mod deletion;
pub mod measurement;
pub mod outfit;
pub mod product;
pub mod stored_file;
pub mod style_profile;
pub mod try_on;

pub use customer::Customer;
pub use deletion::DeletionState;
pub use measurement::{BodyMeasurement, MeasurementField, MeasurementSet};
pub use outfit::{Outfit, OutfitDetail, OutfitProduct};
pub use product::{Category, GarmentCategory, Product, ProductDetail, ProductVariant, Tag};
pub use stored_file::StoredFile;
pub use style_profile::StyleProfile;
pub use try_on::{TryOnRequest, TryOnStatus};
