use std::fmt;

use autokong_sdk::ApiRegistration;
use serde::de::{Deserializer, Error as _, IgnoredAny, MapAccess, Visitor};
use serde::Deserialize;

/// Wire shape of `POST /add`.
///
/// Field names match case-insensitively and the last occurrence wins.
/// Missing or `null` fields stay empty and unknown fields are ignored.
#[derive(Debug, Default)]
pub struct ApiRegistrationDto {
    pub url: String,
    pub name: String,
    pub path: String,
    pub groups: String,
}

impl ApiRegistrationDto {
    fn field_mut(&mut self, key: &str) -> Option<&mut String> {
        if key.eq_ignore_ascii_case("url") {
            Some(&mut self.url)
        } else if key.eq_ignore_ascii_case("name") {
            Some(&mut self.name)
        } else if key.eq_ignore_ascii_case("path") {
            Some(&mut self.path)
        } else if key.eq_ignore_ascii_case("groups") {
            Some(&mut self.groups)
        } else {
            None
        }
    }
}

impl<'de> Deserialize<'de> for ApiRegistrationDto {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(DtoVisitor)
    }
}

struct DtoVisitor;

impl<'de> Visitor<'de> for DtoVisitor {
    type Value = ApiRegistrationDto;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a registration object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut dto = ApiRegistrationDto::default();
        while let Some(key) = map.next_key::<String>()? {
            match dto.field_mut(&key) {
                Some(slot) => {
                    if let Some(value) = map.next_value::<Option<String>>()? {
                        *slot = value;
                    }
                }
                None => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }
        Ok(dto)
    }
}

impl From<ApiRegistrationDto> for ApiRegistration {
    fn from(dto: ApiRegistrationDto) -> Self {
        Self {
            url: dto.url,
            name: dto.name,
            path: dto.path,
            groups: dto.groups,
        }
    }
}

/// Decode the first JSON value of `body` into a registration.
///
/// Anything after the first value is ignored; `null` yields an empty
/// registration.
///
/// # Errors
/// Returns the JSON error for an empty body or a first value that is not a
/// registration object.
pub fn decode_registration(body: &[u8]) -> Result<ApiRegistration, serde_json::Error> {
    let first = serde_json::Deserializer::from_slice(body)
        .into_iter::<Option<ApiRegistrationDto>>()
        .next()
        .ok_or_else(|| serde_json::Error::custom("empty request body"))??;
    Ok(first.unwrap_or_default().into())
}
