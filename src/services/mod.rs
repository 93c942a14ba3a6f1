// Order lifecycle
pub mod checkout;
pub mod orders;
pub mod payments;

// Contact form and SMTP smoke test
pub mod contact;
