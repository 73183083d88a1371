//! DealDesk - KYC Registry (Soroban)
//! Business-identity registry: one owner record plus self-registered company
//! records whose updates are gated by owner approval.

#![no_std]
use dealdesk_common::{validate, CompanyField, CompanyInfo, Error};
use soroban_sdk::{
    contract, contractimpl, contracttype, log, symbol_short, Address, BytesN, Env, String, Vec,
};

#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct OwnerRecord {
    pub owner: Address,
    pub info: CompanyInfo,
    pub registered_at: u64,
    pub updated_at: u64,
}

#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct CompanyRecord {
    pub account: Address,
    pub info: CompanyInfo,
    pub update_approval: bool,
    pub registered_at: u64,
    pub updated_at: u64,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Owner,
    OwnerRecord,
    CompanyCount,
    Company(Address),
}

const INSTANCE_LIFETIME_THRESHOLD: u32 = 17_280;
const INSTANCE_BUMP_AMOUNT: u32 = 86_400;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 120_960;
const PERSISTENT_BUMP_AMOUNT: u32 = 1_051_200;

#[contract]
pub struct KycRegistryContract;

#[contractimpl]
impl KycRegistryContract {
    pub fn initialize(env: Env, owner: Address, info: CompanyInfo) -> Result<(), Error> {
        extend_instance(&env);
        if env.storage().instance().has(&DataKey::Owner) {
            return Err(Error::AlreadyInitialized);
        }
        owner.require_auth();
        validate(&info)?;

        let now = env.ledger().timestamp();
        let record = OwnerRecord {
            owner: owner.clone(),
            info,
            registered_at: now,
            updated_at: now,
        };
        env.storage().instance().set(&DataKey::Owner, &owner);
        env.storage().instance().set(&DataKey::OwnerRecord, &record);
        env.storage().instance().set(&DataKey::CompanyCount, &0u64);

        env.events()
            .publish((symbol_short!("kyc"), symbol_short!("init")), owner);
        Ok(())
    }

    pub fn register_company(env: Env, caller: Address, info: CompanyInfo) -> Result<(), Error> {
        extend_instance(&env);
        caller.require_auth();
        let owner = read_owner(&env)?;
        validate(&info)?;

        if caller == owner || has_company(&env, &caller) {
            log!(&env, "duplicate registration", caller);
            return Err(Error::AlreadyRegistered);
        }

        let now = env.ledger().timestamp();
        let record = CompanyRecord {
            account: caller.clone(),
            info,
            update_approval: false,
            registered_at: now,
            updated_at: now,
        };
        store_company(&env, &record);

        let count: u64 = env
            .storage()
            .instance()
            .get(&DataKey::CompanyCount)
            .unwrap_or(0);
        env.storage()
            .instance()
            .set(&DataKey::CompanyCount, &(count + 1));

        env.events()
            .publish((symbol_short!("kyc"), symbol_short!("register")), caller);
        Ok(())
    }

    pub fn update_owner_info(env: Env, caller: Address, info: CompanyInfo) -> Result<(), Error> {
        extend_instance(&env);
        caller.require_auth();
        let mut record = read_owner_record(&env)?;
        if caller != record.owner {
            return Err(Error::NotOwner);
        }
        validate(&info)?;

        record.info = info;
        record.updated_at = env.ledger().timestamp();
        env.storage().instance().set(&DataKey::OwnerRecord, &record);

        env.events()
            .publish((symbol_short!("kyc"), symbol_short!("owner_upd")), caller);
        Ok(())
    }

    /// Consumes the caller's update approval: the owner has to approve again
    /// before the next update.
    pub fn update_company_info(env: Env, caller: Address, info: CompanyInfo) -> Result<(), Error> {
        extend_instance(&env);
        caller.require_auth();
        let mut record = read_company(&env, &caller)?;
        if !record.update_approval {
            log!(&env, "update without approval", caller);
            return Err(Error::UpdateNotApproved);
        }
        validate(&info)?;

        record.info = info;
        record.update_approval = false;
        record.updated_at = env.ledger().timestamp();
        store_company(&env, &record);

        env.events()
            .publish((symbol_short!("kyc"), symbol_short!("updated")), caller);
        Ok(())
    }

    pub fn approve_update(env: Env, caller: Address, account: Address) -> Result<(), Error> {
        extend_instance(&env);
        caller.require_auth();
        require_owner(&env, &caller)?;

        let mut record = read_company(&env, &account)?;
        record.update_approval = true;
        store_company(&env, &record);

        env.events()
            .publish((symbol_short!("kyc"), symbol_short!("approved")), account);
        Ok(())
    }

    pub fn revoke_update_approval(env: Env, caller: Address, account: Address) -> Result<(), Error> {
        extend_instance(&env);
        caller.require_auth();
        require_owner(&env, &caller)?;

        let mut record = read_company(&env, &account)?;
        record.update_approval = false;
        store_company(&env, &record);

        env.events()
            .publish((symbol_short!("kyc"), symbol_short!("revoked")), account);
        Ok(())
    }

    pub fn owner(env: Env) -> Result<Address, Error> {
        extend_instance(&env);
        read_owner(&env)
    }

    pub fn update_approval(env: Env, account: Address) -> bool {
        extend_instance(&env);
        env.storage()
            .persistent()
            .get::<DataKey, CompanyRecord>(&DataKey::Company(account))
            .map(|r| r.update_approval)
            .unwrap_or(false)
    }

    pub fn is_registered(env: Env, account: Address) -> bool {
        extend_instance(&env);
        has_company(&env, &account)
    }

    pub fn get_company_name(env: Env, account: Address) -> Result<String, Error> {
        extend_instance(&env);
        Ok(read_company(&env, &account)?.info.name)
    }

    pub fn get_company_country(env: Env, account: Address) -> Result<String, Error> {
        extend_instance(&env);
        Ok(read_company(&env, &account)?.info.country)
    }

    pub fn get_company_id(env: Env, account: Address) -> Result<String, Error> {
        extend_instance(&env);
        Ok(read_company(&env, &account)?.info.company_id)
    }

    pub fn get_registration_institution(env: Env, account: Address) -> Result<String, Error> {
        extend_instance(&env);
        Ok(read_company(&env, &account)?.info.registration_institution)
    }

    pub fn get_passport_number(env: Env, account: Address) -> Result<String, Error> {
        extend_instance(&env);
        Ok(read_company(&env, &account)?.info.passport_number)
    }

    pub fn get_passport_hash(env: Env, account: Address) -> Result<BytesN<32>, Error> {
        extend_instance(&env);
        Ok(read_company(&env, &account)?.info.passport_hash)
    }

    pub fn get_company_info(env: Env, account: Address) -> Result<CompanyInfo, Error> {
        extend_instance(&env);
        Ok(read_company(&env, &account)?.info)
    }

    pub fn get_company_record(env: Env, account: Address) -> Option<CompanyRecord> {
        extend_instance(&env);
        env.storage().persistent().get(&DataKey::Company(account))
    }

    pub fn get_owner_info(env: Env) -> Result<CompanyInfo, Error> {
        extend_instance(&env);
        Ok(read_owner_record(&env)?.info)
    }

    pub fn get_owner_record(env: Env) -> Result<OwnerRecord, Error> {
        extend_instance(&env);
        read_owner_record(&env)
    }

    pub fn company_count(env: Env) -> u64 {
        extend_instance(&env);
        env.storage()
            .instance()
            .get(&DataKey::CompanyCount)
            .unwrap_or(0)
    }

    pub fn missing_fields(env: Env, info: CompanyInfo) -> Vec<CompanyField> {
        dealdesk_common::missing_fields(&env, &info)
    }
}

fn extend_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

fn read_owner(env: &Env) -> Result<Address, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Owner)
        .ok_or(Error::NotInitialized)
}

fn read_owner_record(env: &Env) -> Result<OwnerRecord, Error> {
    env.storage()
        .instance()
        .get(&DataKey::OwnerRecord)
        .ok_or(Error::NotInitialized)
}

fn require_owner(env: &Env, caller: &Address) -> Result<(), Error> {
    if *caller != read_owner(env)? {
        return Err(Error::NotOwner);
    }
    Ok(())
}

fn has_company(env: &Env, account: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::Company(account.clone()))
}

fn read_company(env: &Env, account: &Address) -> Result<CompanyRecord, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::Company(account.clone()))
        .ok_or(Error::NotRegistered)
}

fn store_company(env: &Env, record: &CompanyRecord) {
    let _ttl_key = DataKey::Company(record.account.clone());
    env.storage().persistent().set(&_ttl_key, record);
    env.storage().persistent().extend_ttl(
        &_ttl_key,
        PERSISTENT_LIFETIME_THRESHOLD,
        PERSISTENT_BUMP_AMOUNT,
    );
}
