//! String <-> ObjectId conversion kept for callers of older releases
//!
//! Both helpers are deprecated and will be removed; use
//! [`ObjectId::parse_str`] and [`ObjectId::to_hex`] directly.

use bson::oid::ObjectId;
use mongo_api_common::Result;

/// Parse a 24-character hex string into an ObjectId
#[deprecated(note = "use bson::oid::ObjectId::parse_str")]
pub fn str_to_object_id(value: &str) -> Result<ObjectId> {
    Ok(ObjectId::parse_str(value)?)
}

/// Render an ObjectId as its 24-character hex string
#[deprecated(note = "use bson::oid::ObjectId::to_hex")]
pub fn object_id_to_str(id: &ObjectId) -> String {
    id.to_hex()
}
