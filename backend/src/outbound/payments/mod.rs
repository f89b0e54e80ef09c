//! Payment provider outbound adapters.
//!
//! This module provides a thin HTTP implementation of the `PaymentGateway`
//! port against the Stripe Checkout Sessions API.

mod dto;
mod stripe_checkout;

pub use stripe_checkout::StripeCheckoutGateway;
