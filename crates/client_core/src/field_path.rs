//! Typed addressing of editable slots inside a [`Customer`] draft.
//!
//! Hosts emit change events as `(name, value)` pairs using the form's input
//! names (`nome`, `endereco.rua`, `telefone.ddd`, ...). Those names are parsed
//! once into a [`FieldPath`] and every mutation after that is an exhaustive
//! match instead of string surgery.

use std::{fmt, str::FromStr};

use shared::domain::{normalize_email, Customer};
use thiserror::Error;

const ADDRESS_PREFIX: &str = "endereco.";
const PHONE_PREFIX: &str = "telefone.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldPathError {
    #[error("unknown field path '{0}'")]
    Unknown(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CustomerField {
    Name,
    SocialName,
    Email,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressField {
    State,
    City,
    Neighborhood,
    Street,
    Number,
    PostalCode,
    AdditionalInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhoneField {
    AreaCode,
    Number,
}

/// Form section a field is edited in. Workflows only accept edits for the
/// section of their current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Personal,
    Phone,
    Address,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldPath {
    Customer(CustomerField),
    Address(AddressField),
    Phone { index: usize, field: PhoneField },
}

impl CustomerField {
    pub const ALL: [Self; 3] = [Self::Name, Self::SocialName, Self::Email];

    pub fn key(self) -> &'static str {
        match self {
            Self::Name => "nome",
            Self::SocialName => "nomeSocial",
            Self::Email => "email",
        }
    }
}

impl AddressField {
    pub const ALL: [Self; 7] = [
        Self::Street,
        Self::Number,
        Self::Neighborhood,
        Self::City,
        Self::State,
        Self::PostalCode,
        Self::AdditionalInfo,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::State => "estado",
            Self::City => "cidade",
            Self::Neighborhood => "bairro",
            Self::Street => "rua",
            Self::Number => "numero",
            Self::PostalCode => "codigoPostal",
            Self::AdditionalInfo => "informacoesAdicionais",
        }
    }
}

impl PhoneField {
    pub const ALL: [Self; 2] = [Self::AreaCode, Self::Number];

    pub fn key(self) -> &'static str {
        match self {
            Self::AreaCode => "ddd",
            Self::Number => "numero",
        }
    }
}

fn lookup<T: Copy>(all: &[T], key: fn(T) -> &'static str, name: &str) -> Option<T> {
    all.iter().copied().find(|candidate| key(*candidate) == name)
}

impl FieldPath {
    /// Shorthand for the only phone slot the forms edit.
    pub const fn first_phone(field: PhoneField) -> Self {
        Self::Phone { index: 0, field }
    }

    pub fn section(self) -> Section {
        match self {
            Self::Customer(_) => Section::Personal,
            Self::Phone { .. } => Section::Phone,
            Self::Address(_) => Section::Address,
        }
    }

    /// Every path the forms expose, in form order.
    pub fn all() -> impl Iterator<Item = Self> {
        CustomerField::ALL
            .into_iter()
            .map(Self::Customer)
            .chain(PhoneField::ALL.into_iter().map(Self::first_phone))
            .chain(AddressField::ALL.into_iter().map(Self::Address))
    }

    /// Current value of the slot, `None` when the phone slot does not exist.
    /// An absent email reads as an empty string.
    pub fn value_in(self, record: &Customer) -> Option<&str> {
        match self {
            Self::Customer(CustomerField::Name) => Some(record.name.as_str()),
            Self::Customer(CustomerField::SocialName) => Some(record.social_name.as_str()),
            Self::Customer(CustomerField::Email) => Some(record.email.as_deref().unwrap_or("")),
            Self::Address(field) => {
                let address = &record.address;
                let value = match field {
                    AddressField::State => &address.state,
                    AddressField::City => &address.city,
                    AddressField::Neighborhood => &address.neighborhood,
                    AddressField::Street => &address.street,
                    AddressField::Number => &address.number,
                    AddressField::PostalCode => &address.postal_code,
                    AddressField::AdditionalInfo => &address.additional_info,
                };
                Some(value.as_str())
            }
            Self::Phone { index, field } => record.phones.get(index).map(|phone| match field {
                PhoneField::AreaCode => phone.area_code.as_str(),
                PhoneField::Number => phone.number.as_str(),
            }),
        }
    }
}

impl FromStr for FieldPath {
    type Err = FieldPathError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let name = raw.trim();
        let parsed = if let Some(rest) = name.strip_prefix(ADDRESS_PREFIX) {
            lookup(&AddressField::ALL, AddressField::key, rest).map(Self::Address)
        } else if let Some(rest) = name.strip_prefix(PHONE_PREFIX) {
            lookup(&PhoneField::ALL, PhoneField::key, rest).map(Self::first_phone)
        } else {
            lookup(&CustomerField::ALL, CustomerField::key, name).map(Self::Customer)
        };
        parsed.ok_or_else(|| FieldPathError::Unknown(raw.to_string()))
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Customer(field) => f.write_str(field.key()),
            Self::Address(field) => write!(f, "{ADDRESS_PREFIX}{}", field.key()),
            Self::Phone { index: 0, field } => write!(f, "{PHONE_PREFIX}{}", field.key()),
            Self::Phone { index, field } => write!(f, "telefones[{index}].{}", field.key()),
        }
    }
}

/// Writes `value` into the slot addressed by `path`.
///
/// Returns `false` and leaves the record untouched when the path points at a
/// phone that does not exist yet.
pub fn apply(record: &mut Customer, path: FieldPath, value: &str) -> bool {
    match path {
        FieldPath::Customer(CustomerField::Name) => record.name = value.to_string(),
        FieldPath::Customer(CustomerField::SocialName) => record.social_name = value.to_string(),
        FieldPath::Customer(CustomerField::Email) => {
            record.email = normalize_email(Some(value.to_string()));
        }
        FieldPath::Address(field) => {
            let address = &mut record.address;
            let slot = match field {
                AddressField::State => &mut address.state,
                AddressField::City => &mut address.city,
                AddressField::Neighborhood => &mut address.neighborhood,
                AddressField::Street => &mut address.street,
                AddressField::Number => &mut address.number,
                AddressField::PostalCode => &mut address.postal_code,
                AddressField::AdditionalInfo => &mut address.additional_info,
            };
            *slot = value.to_string();
        }
        FieldPath::Phone { index, field } => {
            let Some(phone) = record.phones.get_mut(index) else {
                return false;
            };
            match field {
                PhoneField::AreaCode => phone.area_code = value.to_string(),
                PhoneField::Number => phone.number = value.to_string(),
            }
        }
    }
    true
}

/// Non-mutating form of [`apply`]: the updated copy, or `None` when the
/// change is ignored.
pub fn resolve(record: &Customer, path: FieldPath, value: &str) -> Option<Customer> {
    let mut next = record.clone();
    apply(&mut next, path, value).then_some(next)
}

#[cfg(test)]
#[path = "tests/field_path_tests.rs"]
mod tests;
