use std::{
	fmt::{self, Debug, Display},
	str::FromStr,
	sync::{
		atomic::{AtomicU32, Ordering},
		OnceLock,
	},
};

use chrono::Utc;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::services::response::ServiceError;

/// 12-byte identifier shared by posts, comments and users.
///
/// Layout: 4 bytes big-endian creation time in seconds, 5 bytes random per
/// process, 3 bytes big-endian counter. Identifiers from different seconds sort
/// by creation time. Within one second the counter, which starts at a random
/// value and wraps at 2^24, gives no ordering guarantee.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ObjectId([u8; 12]);

impl ObjectId {
	pub const LEN: usize = 12;

	pub fn new() -> Self {
		Self::with_timestamp(Utc::now().timestamp() as u32)
	}

	pub fn with_timestamp(seconds: u32) -> Self {
		let mut bytes = [0u8; 12];
		bytes[0..4].copy_from_slice(&seconds.to_be_bytes());
		bytes[4..9].copy_from_slice(process_unique());
		let count = counter().fetch_add(1, Ordering::Relaxed) & 0x00ff_ffff;
		bytes[9..12].copy_from_slice(&count.to_be_bytes()[1..4]);
		Self(bytes)
	}

	pub const fn from_bytes(bytes: [u8; 12]) -> Self {
		Self(bytes)
	}

	pub fn from_slice(slice: &[u8]) -> Option<Self> {
		<[u8; 12]>::try_from(slice).ok().map(Self)
	}

	pub fn bytes(&self) -> &[u8; 12] {
		&self.0
	}

	pub fn to_hex(&self) -> String {
		hex::encode(self.0)
	}

	/// Seconds since the Unix epoch stored in the leading bytes.
	pub fn timestamp(&self) -> u32 {
		u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
	}
}

fn process_unique() -> &'static [u8; 5] {
	static PROCESS_UNIQUE: OnceLock<[u8; 5]> = OnceLock::new();
	PROCESS_UNIQUE.get_or_init(rand::random)
}

fn counter() -> &'static AtomicU32 {
	static COUNTER: OnceLock<AtomicU32> = OnceLock::new();
	COUNTER.get_or_init(|| AtomicU32::new(rand::random::<u32>() & 0x00ff_ffff))
}

impl FromStr for ObjectId {
	type Err = ServiceError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		if s.len() != Self::LEN * 2 {
			return Err(ServiceError::InvalidRequest);
		}
		let mut bytes = [0u8; 12];
		hex::decode_to_slice(s, &mut bytes).map_err(|_| ServiceError::InvalidRequest)?;
		Ok(Self(bytes))
	}
}

impl Display for ObjectId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_hex())
	}
}

impl Debug for ObjectId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "ObjectId({})", self.to_hex())
	}
}

impl Serialize for ObjectId {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&self.to_hex())
	}
}

impl<'de> Deserialize<'de> for ObjectId {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let hex = String::deserialize(deserializer)?;
		hex.parse().map_err(|_| de::Error::custom(format!("invalid object id: {hex}")))
	}
}
