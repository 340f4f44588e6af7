pub mod owner;
pub mod payment;

pub use owner::OwnerActions;
pub use payment::{normalize_phone, MobilePayment, PaymentReceipt, Payments};
