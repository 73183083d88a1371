//! DealDesk - shared types for the KYC registry and the SPA contracts.

#![no_std]
use soroban_sdk::{contracterror, contracttype, BytesN, Env, String, Vec};

/// Business-identity record. Field order is the positional order used by
/// every register/update call.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CompanyInfo {
    pub name: String,
    pub hq_address: String,
    pub city: String,
    pub country: String,
    pub company_id: String,
    pub registration_institution: String,
    pub phone: String,
    pub mobile: String,
    pub legal_representative: String,
    pub position: String,
    pub passport_number: String,
    pub passport_country: String,
    pub email: String,
    pub passport_hash: BytesN<32>, // all-zero means unset
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CompanyField {
    Name,
    Country,
    CompanyId,
    RegistrationInstitution,
    LegalRepresentative,
    PassportNumber,
    PassportHash,
}

pub const REQUIRED_FIELDS: [CompanyField; 7] = [
    CompanyField::Name,
    CompanyField::Country,
    CompanyField::CompanyId,
    CompanyField::RegistrationInstitution,
    CompanyField::LegalRepresentative,
    CompanyField::PassportNumber,
    CompanyField::PassportHash,
];

impl CompanyField {
    pub fn is_missing(&self, info: &CompanyInfo) -> bool {
        match self {
            CompanyField::Name => info.name.len() == 0,
            CompanyField::Country => info.country.len() == 0,
            CompanyField::CompanyId => info.company_id.len() == 0,
            CompanyField::RegistrationInstitution => info.registration_institution.len() == 0,
            CompanyField::LegalRepresentative => info.legal_representative.len() == 0,
            CompanyField::PassportNumber => info.passport_number.len() == 0,
            CompanyField::PassportHash => info.passport_hash.to_array() == [0u8; 32],
        }
    }

    pub fn error(&self) -> Error {
        match self {
            CompanyField::Name => Error::EmptyName,
            CompanyField::Country => Error::EmptyCountry,
            CompanyField::CompanyId => Error::EmptyCompanyId,
            CompanyField::RegistrationInstitution => Error::EmptyRegistrationInstitution,
            CompanyField::LegalRepresentative => Error::EmptyLegalRepresentative,
            CompanyField::PassportNumber => Error::EmptyPassportNumber,
            CompanyField::PassportHash => Error::ZeroPassportHash,
        }
    }
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // Validation
    EmptyName = 1,
    EmptyCountry = 2,
    EmptyCompanyId = 3,
    EmptyRegistrationInstitution = 4,
    EmptyLegalRepresentative = 5,
    EmptyPassportNumber = 6,
    ZeroPassportHash = 7,
    AlreadyRegistered = 8,
    // Authorization
    NotOwner = 20,
    UpdateNotApproved = 21,
    NotBuyer = 22,
    NotSeller = 23,
    NotParty = 24,
    // Referential
    NotRegistered = 30,
    SellerNotRegistryOwner = 31,
    BuyerNotRegistered = 32,
    // State
    AlreadyInitialized = 40,
    NotInitialized = 41,
    SignaturesMissing = 42,
    AlreadyFinalized = 43,
    NotFinalized = 44,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Validation,
    Authorization,
    Referential,
    State,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match *self as u32 {
            1..=19 => ErrorKind::Validation,
            20..=29 => ErrorKind::Authorization,
            30..=39 => ErrorKind::Referential,
            _ => ErrorKind::State,
        }
    }
}

/// Rejects `info` with the error of the first required field that is empty
/// (or, for the passport hash, all zero).
pub fn validate(info: &CompanyInfo) -> Result<(), Error> {
    match REQUIRED_FIELDS.iter().find(|f| f.is_missing(info)) {
        Some(field) => Err(field.error()),
        None => Ok(()),
    }
}

/// Every required field `info` is missing, in declaration order.
pub fn missing_fields(env: &Env, info: &CompanyInfo) -> Vec<CompanyField> {
    let mut out = Vec::new(env);
    for field in REQUIRED_FIELDS.iter() {
        if field.is_missing(info) {
            out.push_back(*field);
        }
    }
    out
}
