pub mod cart;
pub mod compliments;
pub mod orders;
pub mod payments;
pub mod stores;
pub mod users;
