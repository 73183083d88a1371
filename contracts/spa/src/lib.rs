//! DealDesk - Share Purchase Agreement (Soroban)
//! Two-party due-diligence agreement between a KYC registry's owner (seller)
//! and one of its registered companies (buyer). Once both parties sign, their
//! registry records are frozen into the agreement.

#![no_std]
use dealdesk_common::{CompanyInfo, Error};
use soroban_sdk::{contract, contractimpl, contracttype, log, symbol_short, Address, Env};

mod kyc;

#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct AgreementTerms {
    pub registry: Address,
    pub buyer: Address,
    pub seller: Address,
    pub buyer_signed: bool,
    pub seller_signed: bool,
    pub finalized: bool,
    pub created_at: u64,
    pub finalized_at: Option<u64>,
}

#[contracttype]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AgreementStatus {
    Created,
    BuyerSigned,
    SellerSigned,
    BothSigned,
    Finalized,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Terms,
    BuyerSnapshot,
    SellerSnapshot,
}

#[derive(Clone, Copy)]
enum Party {
    Buyer,
    Seller,
}

const INSTANCE_LIFETIME_THRESHOLD: u32 = 17_280;
const INSTANCE_BUMP_AMOUNT: u32 = 86_400;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 120_960;
const PERSISTENT_BUMP_AMOUNT: u32 = 1_051_200;

#[contract]
pub struct SpaContract;

#[contractimpl]
impl SpaContract {
    /// Binds the agreement to `registry`. The seller must be the registry's
    /// owner and the buyer must hold a company record there.
    pub fn initialize(
        env: Env,
        caller: Address,
        registry: Address,
        buyer: Address,
        seller: Address,
    ) -> Result<(), Error> {
        extend_instance(&env);
        if env.storage().instance().has(&DataKey::Terms) {
            return Err(Error::AlreadyInitialized);
        }
        caller.require_auth();

        if kyc::owner(&env, &registry) != seller {
            log!(&env, "seller must be registry owner", seller);
            return Err(Error::SellerNotRegistryOwner);
        }
        if !kyc::is_registered(&env, &registry, &buyer) {
            log!(&env, "buyer not registered", buyer);
            return Err(Error::BuyerNotRegistered);
        }

        let terms = AgreementTerms {
            registry,
            buyer: buyer.clone(),
            seller: seller.clone(),
            buyer_signed: false,
            seller_signed: false,
            finalized: false,
            created_at: env.ledger().timestamp(),
            finalized_at: None,
        };
        env.storage().instance().set(&DataKey::Terms, &terms);

        env.events()
            .publish((symbol_short!("spa"), symbol_short!("created")), (buyer, seller));
        Ok(())
    }

    pub fn sign_info_as_buyer(env: Env, caller: Address) -> Result<(), Error> {
        sign(&env, caller, Party::Buyer)
    }

    pub fn sign_info_as_seller(env: Env, caller: Address) -> Result<(), Error> {
        sign(&env, caller, Party::Seller)
    }

    /// Snapshots both parties' current registry records. Succeeds exactly once.
    pub fn finalize_due_diligence(env: Env, caller: Address) -> Result<(), Error> {
        extend_instance(&env);
        caller.require_auth();
        let mut terms = load_terms(&env)?;
        if caller != terms.buyer && caller != terms.seller {
            return Err(Error::NotParty);
        }
        if terms.finalized {
            return Err(Error::AlreadyFinalized);
        }
        if !(terms.buyer_signed && terms.seller_signed) {
            log!(&env, "both parties must sign", terms.buyer_signed, terms.seller_signed);
            return Err(Error::SignaturesMissing);
        }

        // the seller is the registry owner, so its record is the owner record
        let buyer_info = kyc::company_info(&env, &terms.registry, &terms.buyer);
        let seller_info = kyc::owner_info(&env, &terms.registry);
        store_snapshot(&env, DataKey::BuyerSnapshot, &buyer_info);
        store_snapshot(&env, DataKey::SellerSnapshot, &seller_info);

        terms.finalized = true;
        terms.finalized_at = Some(env.ledger().timestamp());
        env.storage().instance().set(&DataKey::Terms, &terms);

        log!(&env, "due diligence finalized", terms.buyer, terms.seller);
        env.events().publish(
            (symbol_short!("spa"), symbol_short!("finalized")),
            (terms.buyer, terms.seller),
        );
        Ok(())
    }

    pub fn buyer_info(env: Env) -> Result<CompanyInfo, Error> {
        extend_instance(&env);
        load_snapshot(&env, DataKey::BuyerSnapshot)
    }

    pub fn seller_info(env: Env) -> Result<CompanyInfo, Error> {
        extend_instance(&env);
        load_snapshot(&env, DataKey::SellerSnapshot)
    }

    pub fn get_terms(env: Env) -> Result<AgreementTerms, Error> {
        extend_instance(&env);
        load_terms(&env)
    }

    pub fn status(env: Env) -> Result<AgreementStatus, Error> {
        extend_instance(&env);
        let terms = load_terms(&env)?;
        Ok(if terms.finalized {
            AgreementStatus::Finalized
        } else {
            match (terms.buyer_signed, terms.seller_signed) {
                (true, true) => AgreementStatus::BothSigned,
                (true, false) => AgreementStatus::BuyerSigned,
                (false, true) => AgreementStatus::SellerSigned,
                (false, false) => AgreementStatus::Created,
            }
        })
    }

    pub fn is_finalized(env: Env) -> bool {
        extend_instance(&env);
        env.storage()
            .instance()
            .get::<DataKey, AgreementTerms>(&DataKey::Terms)
            .map(|t| t.finalized)
            .unwrap_or(false)
    }

    pub fn registry(env: Env) -> Result<Address, Error> {
        extend_instance(&env);
        Ok(load_terms(&env)?.registry)
    }
}

fn extend_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

fn load_terms(env: &Env) -> Result<AgreementTerms, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Terms)
        .ok_or(Error::NotInitialized)
}

fn sign(env: &Env, caller: Address, party: Party) -> Result<(), Error> {
    extend_instance(env);
    caller.require_auth();
    let mut terms = load_terms(env)?;

    let already = match party {
        Party::Buyer => {
            if caller != terms.buyer {
                return Err(Error::NotBuyer);
            }
            terms.buyer_signed
        }
        Party::Seller => {
            if caller != terms.seller {
                return Err(Error::NotSeller);
            }
            terms.seller_signed
        }
    };
    if already {
        return Ok(());
    }

    match party {
        Party::Buyer => terms.buyer_signed = true,
        Party::Seller => terms.seller_signed = true,
    }
    env.storage().instance().set(&DataKey::Terms, &terms);

    env.events()
        .publish((symbol_short!("spa"), symbol_short!("signed")), caller);
    Ok(())
}

fn store_snapshot(env: &Env, key: DataKey, info: &CompanyInfo) {
    env.storage().persistent().set(&key, info);
    env.storage().persistent().extend_ttl(
        &key,
        PERSISTENT_LIFETIME_THRESHOLD,
        PERSISTENT_BUMP_AMOUNT,
    );
}

fn load_snapshot(env: &Env, key: DataKey) -> Result<CompanyInfo, Error> {
    if !load_terms(env)?.finalized {
        return Err(Error::NotFinalized);
    }
    env.storage()
        .persistent()
        .get(&key)
        .ok_or(Error::NotFinalized)
}
