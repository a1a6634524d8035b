pub mod brands;
pub mod payments;
pub mod plans;
pub mod products;
pub mod subscriptions;
pub mod users;
pub mod videos;
