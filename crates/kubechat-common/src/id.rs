/// Prefix reserved for sessions that exist only in client memory.
///
/// Backend-issued session ids never start with it.
pub const TEMPORARY_ID_PREFIX: &str = "temp_";

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Generate a locally-unique id for an unsaved session.
pub fn new_temporary_id() -> String {
    format!("{TEMPORARY_ID_PREFIX}{}", new_id())
}

pub fn is_temporary_id(id: &str) -> bool {
    id.starts_with(TEMPORARY_ID_PREFIX)
}
