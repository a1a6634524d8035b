pub mod brands;
pub mod customers;
pub mod entitlement;
pub mod payments;
pub mod plans;
pub mod products;
pub mod subscriptions;
pub mod usage;
pub mod users;
pub mod videos;
