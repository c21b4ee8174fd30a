pub mod category;
pub mod container;
pub mod store;
pub mod user;

pub use category::{Category, CategoryParams};
pub use container::{Container, ContainerParams};
pub use store::{Store, StoreParams};
pub use user::{NewUser, User, UserParams, UserUpdate};

/// Binary columns travel over JSON as standard base64 strings.
pub mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn serialize_option<S: Serializer>(bytes: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error> {
        match bytes {
            Some(bytes) => serialize(bytes, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        // null decodes to an empty buffer
        let encoded = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        STANDARD.decode(encoded.as_bytes()).map_err(serde::de::Error::custom)
    }
}
