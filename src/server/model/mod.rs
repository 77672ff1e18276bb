pub(crate) mod cart;
pub(crate) mod checkout;
pub(crate) mod session;
