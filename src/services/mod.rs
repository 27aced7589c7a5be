pub mod cart_service;
pub mod compliment_service;
pub mod email_service;
pub mod order_service;
pub mod payment_service;
pub mod store_service;
