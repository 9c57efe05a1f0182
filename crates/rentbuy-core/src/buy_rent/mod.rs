pub mod comparator;
pub mod property;
pub mod sensitivity;
