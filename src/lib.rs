//! Cart, checkout and QR redemption core for restaurant ordering, plus the
//! storefront service that hosts it.

pub mod backend;
pub mod cart;
pub mod checkout;
pub mod confirmation;
pub mod error;
pub mod flow;
pub mod model;
pub mod redemption;
pub mod server;
pub mod util;
