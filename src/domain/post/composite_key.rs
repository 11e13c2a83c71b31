//! Engagement cursor for the `comment_count` ordering.
//!
//! The key packs `(comment count, last activity seconds, post id suffix)` into
//! 16 bytes and renders them as padded base64. The base64 characters are the
//! URL-safe set assigned in ASCII order (`-0-9A-Z_a-z`), so comparing two keys
//! as plain strings gives the same result as comparing the packed tuples, and a
//! key can be echoed back in a query string without escaping. Every key is 24
//! characters long and ends with `==`.

use base64::{
	alphabet::Alphabet,
	engine::general_purpose::{GeneralPurpose, PAD},
	Engine,
};
use chrono::{DateTime, Utc};

use crate::domain::id::ObjectId;

const SORTABLE_ALPHABET: Alphabet =
	match Alphabet::new("-0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ_abcdefghijklmnopqrstuvwxyz") {
		Ok(alphabet) => alphabet,
		Err(_) => panic!("sortable base64 alphabet is invalid"),
	};

const SORTABLE: GeneralPurpose = GeneralPurpose::new(&SORTABLE_ALPHABET, PAD);

pub const COMPOSITE_KEY_BYTES: usize = 16;

/// Encodes the pagination key of a post.
///
/// `comment_count` is stored as `u32`; callers never pass a negative count.
/// `last_activity` is truncated to whole seconds, which fit in `u32` until 2106.
/// Posts with equal count and second are ordered by the trailing 8 bytes of
/// their id, which carry no meaningful order.
pub fn composite_key(
	comment_count: i32,
	last_activity: DateTime<Utc>,
	post_id: &ObjectId,
) -> String {
	let mut buf = [0u8; COMPOSITE_KEY_BYTES];
	buf[0..4].copy_from_slice(&(comment_count as u32).to_be_bytes());
	buf[4..8].copy_from_slice(&(last_activity.timestamp() as u32).to_be_bytes());
	buf[8..16].copy_from_slice(&post_id.bytes()[4..12]);
	SORTABLE.encode(buf)
}
