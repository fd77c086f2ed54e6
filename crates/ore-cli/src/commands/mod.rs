pub mod localize;
pub mod toy;
pub mod toys;
