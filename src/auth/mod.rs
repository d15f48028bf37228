pub mod identity;
pub mod password;
pub mod permissions;
pub mod rate_limit;
pub mod session;
pub mod token;
pub mod validate;
