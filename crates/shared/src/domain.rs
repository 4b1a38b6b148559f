use serde::{Deserialize, Deserializer, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(CustomerId);
id_newtype!(AddressId);
id_newtype!(PhoneId);

impl std::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Root record. Identifiers are only ever filled in from remote responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CustomerId>,
    #[serde(rename = "nome", default)]
    pub name: String,
    #[serde(rename = "nomeSocial", default)]
    pub social_name: String,
    /// Always serialized; `None` goes out as `null`, never as `""`.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub email: Option<String>,
    #[serde(rename = "endereco", default, deserialize_with = "null_as_default")]
    pub address: Address,
    #[serde(rename = "telefones", default, deserialize_with = "null_as_default")]
    pub phones: Vec<Phone>,
}

impl Customer {
    /// Blank draft for a new registration: one address and exactly one phone slot.
    pub fn blank() -> Self {
        Self {
            phones: vec![Phone::default()],
            ..Self::default()
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    pub fn primary_phone(&self) -> Option<&Phone> {
        self.phones.first()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AddressId>,
    #[serde(rename = "estado", default, deserialize_with = "null_as_default")]
    pub state: String,
    #[serde(rename = "cidade", default, deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(rename = "bairro", default, deserialize_with = "null_as_default")]
    pub neighborhood: String,
    #[serde(rename = "rua", default, deserialize_with = "null_as_default")]
    pub street: String,
    #[serde(rename = "numero", default, deserialize_with = "null_as_default")]
    pub number: String,
    #[serde(rename = "codigoPostal", default, deserialize_with = "null_as_default")]
    pub postal_code: String,
    #[serde(rename = "informacoesAdicionais", default, deserialize_with = "null_as_default")]
    pub additional_info: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phone {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PhoneId>,
    #[serde(rename = "ddd", default, deserialize_with = "null_as_default")]
    pub area_code: String,
    #[serde(rename = "numero", default, deserialize_with = "null_as_default")]
    pub number: String,
}

/// Collapses an empty or whitespace-only email into the absent state.
pub fn normalize_email(value: Option<String>) -> Option<String> {
    value.filter(|email| !email.trim().is_empty())
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(normalize_email)
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
