pub mod payment_statuses;
pub mod subscription_statuses;
pub mod user_roles;
pub mod video_statuses;
