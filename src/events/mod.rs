// src/events/mod.rs
//
// Change notification - Public API

pub mod broadcast;

pub use broadcast::{DeliveryContext, FavoritesBroadcaster, InlineDelivery, Subscription};
