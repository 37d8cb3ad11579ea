//! Credential infrastructure

pub mod env_provider;

pub use env_provider::EnvCredentialProvider;
