// Providers layer - Work performers and business logic
//
// Providers hold the logic coordinators compose: hashing, tokens and the
// authorization gate. They never open transactions themselves.

pub mod authorization_provider;
pub mod password_provider;
pub mod token_provider;

pub use authorization_provider::AuthorizationGate;
pub use password_provider::PasswordProvider;
pub use token_provider::TokenProvider;
