//! crates/domains/src/lib.rs
//!
//! The domain models, error type and port traits for Gaceta.

pub mod error;
pub mod models;
pub mod ports;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use ports::*;

#[cfg(test)]
mod tests {
    use super::models::*;

    #[test]
    fn identity_drops_the_password_hash() {
        let user = User {
            id: 7,
            name: "Ana".to_string(),
            email: "a@x.com".to_string(),
            password_hash: "$argon2id$v=19$...".to_string(),
        };

        let identity = user.identity();
        assert_eq!(identity.id, 7);
        assert_eq!(identity.name, "Ana");

        let json = serde_json::to_value(&identity).unwrap();
        assert_eq!(json, serde_json::json!({ "id": 7, "nombre": "Ana", "email": "a@x.com" }));
    }

    #[test]
    fn not_found_names_the_resource() {
        let err = crate::DomainError::NotFound("post", "42".to_string());
        assert_eq!(err.to_string(), "post not found with ID 42");
    }
}
