pub mod login;
pub mod logout;
pub mod refresh;
pub mod register;
pub mod token_utils;
