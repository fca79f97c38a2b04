pub mod google;
pub mod jwt;
pub mod otp;
pub mod password;
pub mod session;
