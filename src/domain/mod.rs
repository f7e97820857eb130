pub mod song;
pub mod validator;
