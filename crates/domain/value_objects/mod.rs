pub mod brands;
pub mod entitlements;
pub mod enums;
pub mod ownership;
pub mod pagination;
pub mod payments;
pub mod plans;
pub mod products;
pub mod subscriptions;
pub mod users;
pub mod videos;
