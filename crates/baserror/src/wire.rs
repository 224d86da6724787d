//! Serialized form: `{"code": .., "msg": ..}`.
//!
//! Only the identifying fields cross the wire. Classification, chain,
//! cause and stack stay in-process. Deserialization also accepts
//! `message` in place of `msg`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::BaseError;

#[derive(Serialize)]
struct WireRef<'a> {
    code: &'a str,
    msg: &'a str,
}

#[derive(Deserialize)]
struct WireOwned {
    #[serde(default)]
    code: String,
    #[serde(default, alias = "message")]
    msg: String,
}

impl Serialize for BaseError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        WireRef {
            code: &self.code,
            msg: &self.message,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for BaseError {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = WireOwned::deserialize(deserializer)?;
        Ok(BaseError {
            code: wire.code,
            message: wire.msg,
            ..Default::default()
        })
    }
}
