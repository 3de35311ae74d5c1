//! ShelfLife desktop client: predicts the remaining shelf life of stored
//! food through the prediction backend and explains the result by voice and
//! chat.

pub mod api;
pub mod app;
pub mod chat;
pub mod config;
pub mod form;
pub mod prediction;
pub mod view;
pub mod voice;
