pub mod accounts;
pub mod instructors;
pub mod seed;
