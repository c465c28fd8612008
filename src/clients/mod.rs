pub mod bluray;
pub mod kodi;
pub mod notifications;
