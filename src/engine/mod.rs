pub mod status;
pub mod validator;
