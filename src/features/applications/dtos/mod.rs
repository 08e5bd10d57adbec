mod subscription_dto;

pub use subscription_dto::SubscriptionForm;
