pub mod auth;
pub mod google;
pub mod notes;
pub mod otp;
