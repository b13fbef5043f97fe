mod client;

pub use client::{Client, ClientFields, DeletionResult, PHONE_DELIMITER};
