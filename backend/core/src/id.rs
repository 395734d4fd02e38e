use uuid::Uuid;

/// Length of the share-link token, in hex characters.
const ID_LEN: usize = 8;

/// Generate a short opaque id for a new file record.
///
/// 8 hex chars of a v4 UUID. Collisions are possible at this length; the
/// store enforces uniqueness and the upload path retries on rejection.
pub fn short_id() -> String {
    let mut buf = Uuid::encode_buffer();
    let hex = Uuid::new_v4().simple().encode_lower(&mut buf);
    hex[..ID_LEN].to_string()
}
