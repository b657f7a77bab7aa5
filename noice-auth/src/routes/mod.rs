pub mod forgot_password;
pub mod health;
pub mod login;
pub mod logout;
pub mod register;
pub mod reset_password;
pub mod update;
pub mod verify_otp;
